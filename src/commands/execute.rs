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

use crate::config::{ComponentConfig, required};
use crate::error::Result;
use crate::execute::{self, Executable, ExecuteCommandBuilder};
use crate::host::{TaskHost, TaskOutcome};
use crate::platform::PlatformProfile;
use crate::sudo::SudoNegotiator;
use log::info;

pub struct ExecuteCommand<'a, H: TaskHost + ?Sized> {
    host: &'a H,
    profile: &'a PlatformProfile,
}

impl<'a, H: TaskHost + ?Sized> ExecuteCommand<'a, H> {
    pub fn new(host: &'a H, profile: &'a PlatformProfile) -> Self {
        Self { host, profile }
    }

    pub fn execute(&self, component: &ComponentConfig) -> Result<TaskOutcome> {
        let executable: Executable = required(&component.name, "component")?.parse()?;

        let prefix = SudoNegotiator::check(self.host, self.profile, component.use_sudo)?;
        let command = ExecuteCommandBuilder::new(self.profile, executable)
            .arguments(component.arguments.as_deref())
            .sudo_prefix(prefix)
            .generate_cmd(self.host)?;

        info!("Running {executable}");
        execute::run(
            self.host,
            executable,
            &command,
            component.working_directory.as_deref(),
        )?;

        Ok(TaskOutcome::Succeeded(format!("{executable} completed")))
    }
}
