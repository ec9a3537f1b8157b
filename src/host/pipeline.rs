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

use super::{EnvSnapshot, IssueKind, PipelineVariable, TaskHost, TaskOutcome};
use crate::error::Result;
use crate::platform::filesystem::{FileMode, FileSystem, LocalFileSystem};
use crate::platform::process::{self, CommandLine, ExecOptions, ExecOutput};
use crate::platform::{elevation, host_platform_name};
use std::path::Path;

/// Names of the non-secret variables the agent exposes to a task.
const PUBLIC_VARIABLES_ENV: &str = "VSTS_PUBLIC_VARIABLES";

/// Host for runs started by a pipeline agent.
#[derive(Debug)]
pub struct PipelineHost {
    env: EnvSnapshot,
    fs: LocalFileSystem,
}

impl PipelineHost {
    pub fn from_env() -> Self {
        Self::with_env(EnvSnapshot::capture())
    }

    pub(crate) fn with_env(env: EnvSnapshot) -> Self {
        Self {
            env,
            fs: LocalFileSystem,
        }
    }
}

/// `Chef Server Url` -> `INPUT_CHEF_SERVER_URL`, `chefServerUrl` -> `INPUT_CHEFSERVERURL`
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// `build.buildId` -> `BUILD_BUILDID`
pub fn variable_env_name(name: &str) -> String {
    name.replace(['.', ' '], "_").to_uppercase()
}

/// Escape a logging-command message so it stays on one line.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%AZP25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub fn format_issue(kind: IssueKind, message: &str) -> String {
    format!("##vso[task.logissue type={}]{}", kind.as_str(), escape_data(message))
}

pub fn format_debug(message: &str) -> String {
    format!("##vso[task.debug]{}", escape_data(message))
}

/// One `setsecret` command per line, since the agent masks line by line.
pub fn format_secret(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("##vso[task.setsecret]{}", escape_data(line)))
        .collect()
}

pub fn format_complete(outcome: &TaskOutcome) -> String {
    format!(
        "##vso[task.complete result={};]{}",
        outcome.result_name(),
        escape_data(outcome.message())
    )
}

impl FileSystem for PipelineHost {
    fn exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.fs.read_to_string(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8], mode: FileMode) -> Result<()> {
        self.fs.write_file(path, contents, mode)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.fs.remove_file(path)
    }
}

impl TaskHost for PipelineHost {
    fn platform_name(&self) -> String {
        host_platform_name().to_string()
    }

    fn is_elevated(&self) -> bool {
        elevation::is_elevated()
    }

    fn input(&self, name: &str) -> Option<String> {
        self.env.get(&input_env_name(name))
    }

    fn variables(&self) -> Vec<PipelineVariable> {
        let Some(names) = self.env.get(PUBLIC_VARIABLES_ENV) else {
            return Vec::new();
        };

        let names: Vec<String> = match serde_json::from_str(&names) {
            Ok(names) => names,
            Err(e) => {
                log::warn!("Ignoring malformed {PUBLIC_VARIABLES_ENV}: {e}");
                return Vec::new();
            }
        };

        names
            .into_iter()
            .filter_map(|name| {
                let value = self.env.get(&variable_env_name(&name))?;
                Some(PipelineVariable::new(name, value))
            })
            .collect()
    }

    fn exec(&self, command: &CommandLine, options: &ExecOptions) -> Result<ExecOutput> {
        println!("[command]{command}");
        process::run_command(command, options)
    }

    fn issue(&self, kind: IssueKind, message: &str) {
        println!("{}", format_issue(kind, message));
    }

    fn debug(&self, message: &str) {
        println!("{}", format_debug(message));
    }

    fn set_secret(&self, value: &str) {
        for command in format_secret(value) {
            println!("{command}");
        }
    }

    fn complete(&self, outcome: &TaskOutcome) {
        println!("{}", format_complete(outcome));
    }
}
