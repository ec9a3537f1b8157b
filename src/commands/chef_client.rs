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

use crate::config::ComponentConfig;
use crate::error::Result;
use crate::execute::{self, Executable, ExecuteCommandBuilder};
use crate::host::{TaskHost, TaskOutcome};
use crate::platform::PlatformProfile;
use crate::sudo::SudoNegotiator;
use log::info;

/// Converge the node once with whichever chef-client is installed.
pub struct ChefClientCommand<'a, H: TaskHost + ?Sized> {
    host: &'a H,
    profile: &'a PlatformProfile,
}

impl<'a, H: TaskHost + ?Sized> ChefClientCommand<'a, H> {
    pub fn new(host: &'a H, profile: &'a PlatformProfile) -> Self {
        Self { host, profile }
    }

    pub fn execute(&self, component: &ComponentConfig) -> Result<TaskOutcome> {
        let prefix = SudoNegotiator::check(self.host, self.profile, component.use_sudo)?;
        let mut command = ExecuteCommandBuilder::new(self.profile, Executable::ChefClient)
            .sudo_prefix(prefix)
            .generate_cmd(self.host)?;
        command.arg("--once");

        info!("Running chef-client");
        execute::run(
            self.host,
            Executable::ChefClient,
            &command,
            component.working_directory.as_deref(),
        )?;

        Ok(TaskOutcome::Succeeded("chef-client run completed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::platform::PlatformKind;
    use crate::test::fixtures::MemoryHost;
    use std::path::Path;

    #[test]
    fn test_runs_standalone_client_once() {
        let host = MemoryHost::windows().with_file(r"C:\opscode\chef\bin\chef-client.bat");
        let profile = PlatformProfile::new(PlatformKind::Windows, Path::new(r"D:\task"), true);

        ChefClientCommand::new(&host, &profile)
            .execute(&ComponentConfig::default())
            .unwrap();
        assert_eq!(
            host.commands(),
            vec![vec![r"C:\opscode\chef\bin\chef-client.bat", "--once"]]
        );
    }

    #[test]
    fn test_client_missing() {
        let host = MemoryHost::linux();
        let profile = PlatformProfile::new(PlatformKind::Linux, Path::new("/task"), true);

        let err = ChefClientCommand::new(&host, &profile)
            .execute(&ComponentConfig::default())
            .unwrap_err();
        assert!(
            matches!(err, TaskError::ExecutableNotFound { ref name, .. } if name == "chef-client")
        );
        assert!(host.commands().is_empty());
    }
}
