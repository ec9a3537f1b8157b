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


use crate::config::{CookbookConfig, required};
use crate::error::{Result, TaskError};
use crate::execute::{self, Executable, ExecuteCommandBuilder};
use crate::host::{TaskHost, TaskOutcome};
use crate::platform::PlatformProfile;
use log::info;

/// Install the gems of a cookbook's Gemfile with `chef exec bundle`.
pub struct CookbookGemsCommand<'a, H: TaskHost + ?Sized> {
    host: &'a H,
    profile: &'a PlatformProfile,
}

impl<'a, H: TaskHost + ?Sized> CookbookGemsCommand<'a, H> {
    pub fn new(host: &'a H, profile: &'a PlatformProfile) -> Self {
        Self { host, profile }
    }

    pub fn execute(&self, cookbook: &CookbookConfig) -> Result<TaskOutcome> {
        let folder = required(&cookbook.gemfile_folder, "gemfileFolder")?;

        let chef = Executable::Chef.resolve(self.profile, self.host)?;
        if !self.host.exists(&chef) {
            return Err(TaskError::ExecutableNotFound {
                name: Executable::Chef.name().to_string(),
                searched: vec![chef.display().to_string()],
            });
        }

        let command = ExecuteCommandBuilder::new(self.profile, Executable::Chef)
            .arguments(Some("exec bundle"))
            .generate_cmd(self.host)?;

        info!("Installing gems from {folder}");
        execute::run(self.host, Executable::Chef, &command, Some(folder))?;

        Ok(TaskOutcome::Succeeded(format!("Gems installed from {folder}")))
    }
}
