// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::script::write_install_script;
use super::{Component, ComponentSpec};
use crate::config::required;
use crate::error::{Result, TaskError};
use crate::host::TaskHost;
use crate::platform::process::CommandLine;
use crate::platform::{PlatformKind, PlatformProfile};
use crate::sudo::SudoNegotiator;
use std::path::Path;

/// Build the command that installs `spec`.
///
/// For script driven installs this writes the install script first, so it
/// must only be called once the decision to install has been made.
pub fn install_command<H: TaskHost + ?Sized>(
    host: &H,
    profile: &PlatformProfile,
    spec: &ComponentSpec,
) -> Result<CommandLine> {
    if spec.component == Component::Gem {
        return gem_install_command(spec);
    }

    let script = write_install_script(host, profile)?;

    if let Some(target) = &spec.target_path
        && !host.exists(Path::new(target))
    {
        return Err(TaskError::InstallerNotFound(target.clone()));
    }

    match profile.kind() {
        PlatformKind::Windows => powershell_command(script, spec),
        PlatformKind::Linux => {
            let prefix = SudoNegotiator::check(host, profile, spec.use_sudo)?;
            bash_command(&prefix, script, spec)
        }
    }
}

fn gem_install_command(spec: &ComponentSpec) -> Result<CommandLine> {
    let gem = required(&spec.gem_name, "gemName")?;

    let mut cmd = CommandLine::new("chef");
    cmd.args(["gem", "install", gem]);
    if let Some(version) = &spec.version {
        cmd.args(["--version", version.as_str()]);
    }
    Ok(cmd)
}

fn powershell_command(script: &Path, spec: &ComponentSpec) -> Result<CommandLine> {
    let mut cmd = CommandLine::new("powershell.exe");
    cmd.arg("-Command")
        .arg(script.to_string_lossy())
        .args([";", "Install-Project"]);

    match &spec.target_path {
        Some(target) => {
            cmd.args(["-Filename", target.as_str()]);
        }
        None => {
            let channel = required(&spec.channel, "channel")?;
            cmd.args(["-Project", spec.component.name(), "-Channel", channel]);
            if let Some(version) = &spec.version {
                cmd.args(["-Version", version.as_str()]);
            }
        }
    }
    Ok(cmd)
}

fn bash_command(prefix: &[String], script: &Path, spec: &ComponentSpec) -> Result<CommandLine> {
    let mut cmd = CommandLine::with_prefix(prefix, "bash");
    cmd.arg(script.to_string_lossy());

    match &spec.target_path {
        Some(target) => {
            cmd.args(["-f", target.as_str()]);
        }
        None => {
            let channel = required(&spec.channel, "channel")?;
            cmd.args(["-P", spec.component.name(), "-c", channel]);
            if let Some(version) = &spec.version {
                cmd.args(["-v", version.as_str()]);
            }
        }
    }
    Ok(cmd)
}
