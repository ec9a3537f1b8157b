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
use crate::execute::{self, Executable};
use crate::host::{TaskHost, TaskOutcome};
use crate::platform::PlatformProfile;
use crate::platform::process::CommandLine;
use log::info;

/// Share a cookbook on a Supermarket with knife.
pub struct PublishSupermarketCommand<'a, H: TaskHost + ?Sized> {
    host: &'a H,
    profile: &'a PlatformProfile,
}

impl<'a, H: TaskHost + ?Sized> PublishSupermarketCommand<'a, H> {
    pub fn new(host: &'a H, profile: &'a PlatformProfile) -> Self {
        Self { host, profile }
    }

    pub fn execute(&self, config: &TaskConfig) -> Result<TaskOutcome> {
        let url = required(&config.server.url, "chefServerUrl")?;
        let username = required(&config.server.username, "chefUsername")?;
        let pem = required(&config.server.user_key, "chefUserKey")?;
        let cookbook = required(&config.cookbook.name, "chefCookbookName")?;
        let cookbook_path = required(&config.cookbook.path, "chefCookbookPath")?;
        let knife = Executable::Knife.resolve(self.profile, self.host)?;

        let key = PrivateKeyFile::write(self.host, self.profile, pem, config.delete_private_key)?;
        let key_path = key.path().to_string_lossy().into_owned();
        let credentials = ["-u", username, "-k", key_path.as_str()];

        let result = (|| -> Result<()> {
            if !config.server.ssl_verify {
                info!("Fetching SSL certificates: {url}");
                let mut fetch = CommandLine::new(knife.to_string_lossy());
                fetch.args(["ssl", "fetch", url]).args(credentials);
                execute::run(self.host, Executable::Knife, &fetch, None)?;
            }

            info!("Sharing cookbook '{cookbook}' from {cookbook_path}");
            let mut share = CommandLine::new(knife.to_string_lossy());
            share
                .args(["supermarket", "share", cookbook, "-o", cookbook_path, "-m", url])
                .args(credentials);
            execute::run(self.host, Executable::Knife, &share, None)
        })();
        key.cleanup();
        result?;

        Ok(TaskOutcome::Succeeded(format!(
            "Cookbook '{cookbook}' shared on {url}"
        )))
    }
}
