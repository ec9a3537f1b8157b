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

//! Typed task configuration built from task inputs.

use crate::error::{Result, TaskError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use config::Config;
use serde::Deserialize;

/// Task input name and the configuration key it lands on.
pub const INPUT_FIELDS: &[(&str, &str)] = &[
    ("component", "component.name"),
    ("gemName", "component.gem_name"),
    ("version", "component.version"),
    ("channel", "component.channel"),
    ("targetPath", "component.target_path"),
    ("forceInstall", "component.force_install"),
    ("sudo", "component.use_sudo"),
    ("arguments", "component.arguments"),
    ("workingDirectory", "component.working_directory"),
    ("chefServerUrl", "server.url"),
    ("chefUsername", "server.username"),
    ("chefUserKey", "server.user_key"),
    ("chefSSLVerify", "server.ssl_verify"),
    ("chefCookbookName", "cookbook.name"),
    ("chefCookbookVersion", "cookbook.version"),
    ("chefCookbookMetadata", "cookbook.metadata"),
    ("chefCookbookPath", "cookbook.path"),
    ("gemfileFolder", "cookbook.gemfile_folder"),
    ("berksInstallArguments", "berks.install_arguments"),
    ("berksUploadArguments", "berks.upload_arguments"),
    ("knifePrivateKey", "knife.private_key"),
    ("chefEnvName", "environment.name"),
    ("chefEnvironmentNamespace", "environment.namespace"),
    ("addEnvironmentAttributes", "environment.add_attributes"),
    ("deletePrivateKey", "delete_private_key"),
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub component: ComponentConfig,
    pub server: ServerConfig,
    pub cookbook: CookbookConfig,
    pub environment: EnvironmentConfig,
    pub berks: BerksConfig,
    pub knife: KnifeConfig,
    pub delete_private_key: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComponentConfig {
    pub name: Option<String>,
    pub gem_name: Option<String>,
    pub version: Option<String>,
    pub channel: Option<String>,
    pub target_path: Option<String>,
    pub force_install: bool,
    pub use_sudo: bool,
    pub arguments: Option<String>,
    pub working_directory: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub url: Option<String>,
    pub username: Option<String>,
    /// PEM text, already decoded from the base64 input
    pub user_key: Option<String>,
    pub ssl_verify: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            user_key: None,
            ssl_verify: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CookbookConfig {
    pub name: Option<String>,
    pub version: Option<String>,
    pub metadata: Option<String>,
    /// Cookbook directory for Supermarket and Berkshelf
    pub path: Option<String>,
    pub gemfile_folder: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BerksConfig {
    pub install_arguments: Option<String>,
    pub upload_arguments: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KnifeConfig {
    /// Write the user key to disk and pass it with `--key`
    pub private_key: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub add_attributes: bool,
}

impl TaskConfig {
    /// Build the configuration from an input lookup such as
    /// [`TaskHost::input`](crate::host::TaskHost::input).
    pub fn from_inputs<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder();
        for (input, key) in INPUT_FIELDS {
            if let Some(value) = lookup(input) {
                log::trace!("Input {input} -> {key}");
                builder = builder.set_override(*key, value)?;
            }
        }

        let mut config: TaskConfig = builder
            .build()?
            .try_deserialize()
            .map_err(|e| TaskError::InvalidConfig(e.to_string()))?;

        if let Some(encoded) = config.server.user_key.take() {
            config.server.user_key = Some(decode_user_key(&encoded)?);
        }

        Ok(config)
    }
}

fn decode_user_key(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| TaskError::InvalidConfig(format!("chefUserKey is not valid base64: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|_| TaskError::InvalidConfig("chefUserKey does not decode to text".to_string()))
}

/// Value of a required configuration entry, reported by its input name.
pub fn required<'a>(value: &'a Option<String>, input: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| TaskError::MissingInput(input.to_string()))
}
