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

mod context;
mod exit_codes;
mod format;
#[cfg(test)]
mod tests;

pub use context::ErrorContext;
pub use exit_codes::get_exit_code;
pub use format::{format_error_chain, format_error_with_color};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("{0} is not a supported platform")]
    UnsupportedPlatform(String),

    #[error("Required input '{0}' has not been set")]
    MissingInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown component '{name}'")]
    UnknownComponent { name: String, expected: Vec<String> },

    #[error("Agent must be running with Elevated Privileges to install software")]
    ElevationRequired,

    #[error(
        "Agent must be running as root or the option to Use Sudo must be enabled to install \
         software"
    )]
    SudoNotEnabled,

    #[error("The option to UseSudo has been set but Sudo is not installed")]
    SudoNotInstalled,

    #[error(
        "A password is required for Sudo. Please configure the agent account to run sudo without \
         a password"
    )]
    SudoPasswordRequired,

    #[error("Unable to find installation file: {0}")]
    InstallerNotFound(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("{name} is not installed")]
    ExecutableNotFound { name: String, searched: Vec<String> },

    #[error("Chef install script was not written out successfully: {0}")]
    ScriptVerification(String),

    #[error("Command '{command}' failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("{method} {host}{path}: {status}")]
    ApiStatus {
        method: String,
        host: String,
        path: String,
        status: u16,
    },

    #[error("Failed to sign request: {0}")]
    Signing(String),

    #[error("Failed to decode private key: {0}")]
    KeyDecode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] attohttpc::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, TaskError>;
