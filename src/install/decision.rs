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

//! Whether a component should be installed, given the agent's privileges.

use crate::error::TaskError;
use crate::platform::PlatformKind;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecisionInputs {
    pub platform: PlatformKind,
    pub is_elevated: bool,
    pub use_sudo: bool,
    pub sudo_installed: bool,
    pub installed: bool,
    pub force_install: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrivilegeError {
    ElevationRequired,
    SudoNotEnabled,
    SudoNotInstalled,
}

impl From<PrivilegeError> for TaskError {
    fn from(err: PrivilegeError) -> Self {
        match err {
            PrivilegeError::ElevationRequired => TaskError::ElevationRequired,
            PrivilegeError::SudoNotEnabled => TaskError::SudoNotEnabled,
            PrivilegeError::SudoNotInstalled => TaskError::SudoNotInstalled,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Decision {
    ShouldInstall,
    SkipInstall(String),
    Fail(PrivilegeError),
}

pub const ALREADY_INSTALLED: &str = "Component is already installed";

pub fn decide(inputs: &DecisionInputs) -> Decision {
    if let Err(err) = check_privilege(inputs) {
        return Decision::Fail(err);
    }

    if inputs.installed && !inputs.force_install {
        return Decision::SkipInstall(ALREADY_INSTALLED.to_string());
    }

    Decision::ShouldInstall
}

fn check_privilege(inputs: &DecisionInputs) -> Result<(), PrivilegeError> {
    if inputs.is_elevated {
        return Ok(());
    }

    match inputs.platform {
        PlatformKind::Windows => Err(PrivilegeError::ElevationRequired),
        PlatformKind::Linux if !inputs.use_sudo => Err(PrivilegeError::SudoNotEnabled),
        PlatformKind::Linux if !inputs.sudo_installed => Err(PrivilegeError::SudoNotInstalled),
        PlatformKind::Linux => Ok(()),
    }
}
