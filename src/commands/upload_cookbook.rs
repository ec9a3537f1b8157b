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


use super::private_key::PrivateKeyFile;
use crate::config::{TaskConfig, required};
use crate::error::Result;
use crate::execute::{self, Executable, ExecuteCommandBuilder};
use crate::host::{TaskHost, TaskOutcome};
use crate::platform::process::split_arguments;
use crate::platform::{FileMode, PathKey, PlatformProfile};
use log::info;
use serde_json::json;
use std::path::Path;

/// Berkshelf configuration pointing at the Chef server and the written key.
pub fn berks_config(config: &TaskConfig, key: &Path) -> Result<String> {
    let server = &config.server;
    let value = json!({
        "chef": {
            "chef_server_url": required(&server.url, "chefServerUrl")?,
            "node_name": required(&server.username, "chefUsername")?,
            "client_key": key.to_string_lossy(),
        },
        "ssl": {
            "verify": server.ssl_verify,
        },
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Resolve a cookbook's dependencies and upload it with Berkshelf.
pub struct UploadCookbookCommand<'a, H: TaskHost + ?Sized> {
    host: &'a H,
    profile: &'a PlatformProfile,
}

impl<'a, H: TaskHost + ?Sized> UploadCookbookCommand<'a, H> {
    pub fn new(host: &'a H, profile: &'a PlatformProfile) -> Self {
        Self { host, profile }
    }

    pub fn execute(&self, config: &TaskConfig) -> Result<TaskOutcome> {
        let pem = required(&config.server.user_key, "chefUserKey")?;
        let cookbook_path = required(&config.cookbook.path, "chefCookbookPath")?;
        let berks_config_path = self.profile.require(PathKey::BerksConfig)?;

        let key = PrivateKeyFile::write(self.host, self.profile, pem, config.delete_private_key)?;
        let result = (|| -> Result<()> {
            let contents = berks_config(config, key.path())?;
            info!("Writing Berkshelf config: {}", berks_config_path.display());
            self.host
                .write_file(berks_config_path, contents.as_bytes(), FileMode::Regular)?;

            for (action, arguments) in [
                ("install", config.berks.install_arguments.as_deref()),
                ("upload", config.berks.upload_arguments.as_deref()),
            ] {
                let mut command = ExecuteCommandBuilder::new(self.profile, Executable::Berks)
                    .generate_cmd(self.host)?;
                command.arg(action);
                if let Some(arguments) = arguments {
                    command.args(split_arguments(arguments));
                }
                command.arg("-c").arg(berks_config_path.to_string_lossy());

                info!("Running berks {action} in {cookbook_path}");
                execute::run(self.host, Executable::Berks, &command, Some(cookbook_path))?;
            }
            Ok(())
        })();
        key.cleanup();
        result?;

        Ok(TaskOutcome::Succeeded(format!(
            "Cookbook uploaded from {cookbook_path}"
        )))
    }
}
