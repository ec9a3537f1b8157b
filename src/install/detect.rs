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

//! Detect whether a component is already on the agent.

use super::{Component, ComponentSpec};
use crate::config::required;
use crate::error::{Result, TaskError};
use crate::host::TaskHost;
use crate::platform::process::{CommandLine, ExecOptions};
use crate::platform::{PathKey, PlatformProfile};

/// `gem list -i <gem>` prints `true` or `false`.
pub fn gem_installed_cmd(gem: &str) -> CommandLine {
    let mut cmd = CommandLine::new("gem");
    cmd.args(["list", "-i", gem]);
    cmd
}

pub fn is_installed<H: TaskHost + ?Sized>(
    host: &H,
    profile: &PlatformProfile,
    spec: &ComponentSpec,
) -> Result<bool> {
    let installed = match spec.component {
        Component::Gem => {
            let gem = required(&spec.gem_name, "gemName")?;
            match host.exec(&gem_installed_cmd(gem), &ExecOptions::capture()) {
                Ok(output) => output.stdout.trim() == "true",
                Err(TaskError::ExecutableNotFound { .. }) => {
                    log::debug!("gem is not on the PATH, treating {gem} as not installed");
                    false
                }
                Err(e) => return Err(e),
            }
        }
        Component::ChefWorkstation => profile
            .path(PathKey::WorkstationDir)
            .is_some_and(|dir| host.exists(dir)),
        Component::Inspec => profile.inspec_path(host).is_some(),
        Component::Chef => profile.chef_client_path(host).is_some(),
    };

    log::debug!("{} installed: {installed}", spec.label());
    Ok(installed)
}
