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

//! One module per pipeline task.

pub mod chef_client;
pub mod cookbook_gems;
pub mod cookbook_version;
pub mod execute;
pub mod install;
pub mod knife;
mod private_key;
pub mod publish_supermarket;
pub mod update_environment;
pub mod upload_cookbook;

use crate::config::TaskConfig;
use crate::error::{Result, format_error_chain, get_exit_code};
use crate::host::{TaskHost, TaskOutcome};

/// Register decoded secrets with the host before anything can log them.
pub fn register_secrets<H: TaskHost + ?Sized>(host: &H, config: &TaskConfig) {
    if let Some(pem) = &config.server.user_key {
        host.set_secret(pem);
    }
}

/// Report the result of a task to the host and return the process exit code.
pub fn finish<H: TaskHost + ?Sized>(host: &H, result: Result<TaskOutcome>) -> i32 {
    let (outcome, code) = match result {
        Ok(outcome) => {
            let code = i32::from(outcome.is_failure());
            (outcome, code)
        }
        Err(e) => {
            log::debug!("Task failed: {e:?}");
            (TaskOutcome::Failed(format_error_chain(&e)), get_exit_code(&e))
        }
    };

    host.complete(&outcome);
    code
}
