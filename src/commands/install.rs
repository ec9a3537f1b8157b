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

use crate::error::{Result, TaskError};
use crate::host::{TaskHost, TaskOutcome};
use crate::install::{ComponentSpec, Decision, DecisionInputs, decide, install_command, is_installed};
use crate::platform::PlatformProfile;
use crate::platform::process::ExecOptions;
use crate::sudo::sudo_installed;
use log::{debug, info};

pub struct InstallCommand<'a, H: TaskHost + ?Sized> {
    host: &'a H,
    profile: &'a PlatformProfile,
}

impl<'a, H: TaskHost + ?Sized> InstallCommand<'a, H> {
    pub fn new(host: &'a H, profile: &'a PlatformProfile) -> Self {
        Self { host, profile }
    }

    pub fn execute(&self, spec: &ComponentSpec) -> Result<TaskOutcome> {
        let label = spec.label();
        info!("Installing {label}");
        debug!("Install options: {spec:?}");

        let installed = is_installed(self.host, self.profile, spec)?;
        let inputs = DecisionInputs {
            platform: self.profile.kind(),
            is_elevated: self.profile.is_elevated(),
            use_sudo: spec.use_sudo,
            sudo_installed: sudo_installed(self.host, self.profile),
            installed,
            force_install: spec.force_install,
        };
        debug!("Install decision inputs: {inputs:?}");

        match decide(&inputs) {
            Decision::Fail(err) => Err(err.into()),
            Decision::SkipInstall(reason) => {
                info!("{label}: {reason}");
                Ok(TaskOutcome::Skipped(format!("{label}: {reason}")))
            }
            Decision::ShouldInstall => {
                if installed {
                    info!("{label} is installed, reinstalling because force install is set");
                }

                let command = install_command(self.host, self.profile, spec)?;
                let output = self.host.exec(&command, &ExecOptions::inherit())?;
                if !output.success() {
                    return Err(TaskError::CommandFailed {
                        command: command.to_string(),
                        code: output.code,
                    });
                }

                Ok(TaskOutcome::Succeeded(format!("{label} installed")))
            }
        }
    }
}
