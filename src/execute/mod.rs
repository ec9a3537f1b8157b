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

//! Running one of the installed Chef tools.

use crate::error::{Result, TaskError};
use crate::host::TaskHost;
use crate::platform::process::{CommandLine, ExecOptions, ExecOutput, split_arguments};
use crate::platform::{FileSystem, PathKey, PlatformProfile};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// InSpec exit code for a run where some controls failed.
pub const INSPEC_FAILED_CONTROLS: i32 = 100;
/// InSpec exit code for a run where some controls were skipped.
pub const INSPEC_SKIPPED_CONTROLS: i32 = 101;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Executable {
    Chef,
    ChefClient,
    Knife,
    Berks,
    Inspec,
    Kitchen,
}

impl Executable {
    pub const ALL: [Executable; 6] = [
        Executable::Chef,
        Executable::ChefClient,
        Executable::Knife,
        Executable::Berks,
        Executable::Inspec,
        Executable::Kitchen,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Executable::Chef => "chef",
            Executable::ChefClient => "chef-client",
            Executable::Knife => "knife",
            Executable::Berks => "berks",
            Executable::Inspec => "inspec",
            Executable::Kitchen => "kitchen",
        }
    }

    /// Profile entries to try, most preferred first.
    fn candidates(&self) -> &'static [PathKey] {
        match self {
            Executable::Chef => &[PathKey::Chef],
            Executable::ChefClient => &[PathKey::ChefClientStandalone, PathKey::ChefClient],
            Executable::Knife => &[PathKey::Knife],
            Executable::Berks => &[PathKey::Berks],
            Executable::Inspec => &[PathKey::Inspec, PathKey::InspecEmbedded],
            Executable::Kitchen => &[PathKey::Kitchen],
        }
    }

    /// Locate the executable on the agent.
    ///
    /// InSpec and chef-client can come from a standalone package or from
    /// Chef Workstation, so they must exist at one of their locations. The
    /// other tools only ship with Workstation and resolve to their table entry.
    pub fn resolve<F: FileSystem + ?Sized>(
        &self,
        profile: &PlatformProfile,
        fs: &F,
    ) -> Result<PathBuf> {
        let found = match self {
            Executable::Inspec => profile.inspec_path(fs),
            Executable::ChefClient => profile.chef_client_path(fs),
            _ => {
                let key = self.candidates()[0];
                return profile.require(key).map(Path::to_path_buf);
            }
        };

        found.ok_or_else(|| TaskError::ExecutableNotFound {
            name: self.name().to_string(),
            searched: self
                .candidates()
                .iter()
                .filter_map(|key| profile.path(*key))
                .map(|p| p.display().to_string())
                .collect(),
        })
    }
}

impl fmt::Display for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Executable {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        Executable::ALL
            .into_iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| TaskError::UnknownComponent {
                name: s.to_string(),
                expected: Executable::ALL
                    .iter()
                    .map(|e| e.name().to_string())
                    .collect(),
            })
    }
}

pub struct ExecuteCommandBuilder<'a> {
    profile: &'a PlatformProfile,
    executable: Executable,
    arguments: Option<String>,
    sudo_prefix: Vec<String>,
}

impl<'a> ExecuteCommandBuilder<'a> {
    pub fn new(profile: &'a PlatformProfile, executable: Executable) -> Self {
        Self {
            profile,
            executable,
            arguments: None,
            sudo_prefix: Vec::new(),
        }
    }

    pub fn arguments(mut self, arguments: Option<&str>) -> Self {
        self.arguments = arguments.map(str::to_string);
        self
    }

    /// Prefix from [`SudoNegotiator::check`](crate::sudo::SudoNegotiator::check).
    pub fn sudo_prefix(mut self, prefix: Vec<String>) -> Self {
        self.sudo_prefix = prefix;
        self
    }

    pub fn generate_cmd<F: FileSystem + ?Sized>(&self, fs: &F) -> Result<CommandLine> {
        let path = self.executable.resolve(self.profile, fs)?;

        let mut cmd = CommandLine::with_prefix(&self.sudo_prefix, path.to_string_lossy());
        if let Some(arguments) = &self.arguments {
            cmd.args(split_arguments(arguments));
        }

        log::debug!("Generated {} command: {cmd}", self.executable);
        Ok(cmd)
    }
}

/// Map a finished run to success, success with a warning, or failure.
pub fn interpret_exit(
    executable: Executable,
    command: &CommandLine,
    output: &ExecOutput,
) -> Result<Option<&'static str>> {
    match (executable, output.code) {
        (_, 0) => Ok(None),
        (Executable::Inspec, INSPEC_FAILED_CONTROLS) => Ok(Some("InSpec ran with failing controls")),
        (Executable::Inspec, INSPEC_SKIPPED_CONTROLS) => {
            Ok(Some("InSpec ran with skipped controls"))
        }
        (_, code) => Err(TaskError::CommandFailed {
            command: command.to_string(),
            code,
        }),
    }
}

/// Run a built command through the host and raise any warning it warrants.
pub fn run<H: TaskHost + ?Sized>(
    host: &H,
    executable: Executable,
    command: &CommandLine,
    working_directory: Option<&str>,
) -> Result<()> {
    let mut options = ExecOptions::inherit();
    if let Some(dir) = working_directory {
        options = options.in_dir(dir);
    }

    let output = host.exec(command, &options)?;
    if let Some(warning) = interpret_exit(executable, command, &output)? {
        host.warn(warning);
    }
    Ok(())
}
