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
use colored::Colorize;
use std::path::Path;

/// Set to `1` to run outside an agent.
pub const DEV_MODE_ENV: &str = "CHEF_TASKS_DEV";

const VARIABLE_PREFIX: &str = "CHEF_TASKS_VAR_";

/// Host for local runs: inputs are plain environment variables and results
/// are printed as text.
#[derive(Debug)]
pub struct DevHost {
    env: EnvSnapshot,
    platform: Option<String>,
    fs: LocalFileSystem,
}

impl DevHost {
    pub fn from_env(platform: Option<String>) -> Self {
        Self::with_env(EnvSnapshot::capture(), platform)
    }

    pub(crate) fn with_env(env: EnvSnapshot, platform: Option<String>) -> Self {
        Self {
            env,
            platform,
            fs: LocalFileSystem,
        }
    }

    /// Whether dev mode was requested through the environment.
    pub fn requested() -> bool {
        std::env::var(DEV_MODE_ENV)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false)
    }
}

impl FileSystem for DevHost {
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

impl TaskHost for DevHost {
    fn platform_name(&self) -> String {
        self.platform
            .clone()
            .unwrap_or_else(|| host_platform_name().to_string())
    }

    fn is_elevated(&self) -> bool {
        elevation::is_elevated()
    }

    fn input(&self, name: &str) -> Option<String> {
        self.env.get(&name.replace(' ', "_").to_uppercase())
    }

    fn variables(&self) -> Vec<PipelineVariable> {
        let mut vars: Vec<PipelineVariable> = self
            .env
            .iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(VARIABLE_PREFIX)?;
                (!name.is_empty()).then(|| PipelineVariable::new(name, value.clone()))
            })
            .collect();
        vars.sort_by(|a, b| a.name.cmp(&b.name));
        vars
    }

    fn exec(&self, command: &CommandLine, options: &ExecOptions) -> Result<ExecOutput> {
        eprintln!("{} {command}", "$".dimmed());
        process::run_command(command, options)
    }

    fn issue(&self, kind: IssueKind, message: &str) {
        let label = match kind {
            IssueKind::Warning => "warning:".yellow().bold(),
            IssueKind::Error => "error:".red().bold(),
        };
        eprintln!("{label} {message}");
    }

    fn debug(&self, message: &str) {
        log::debug!("{message}");
    }

    fn set_secret(&self, _value: &str) {
        log::trace!("Secret registered");
    }

    fn complete(&self, outcome: &TaskOutcome) {
        let label = match outcome {
            TaskOutcome::Succeeded(_) => "Succeeded".green().bold(),
            TaskOutcome::Failed(_) => "Failed".red().bold(),
            TaskOutcome::Skipped(_) => "Skipped".cyan().bold(),
        };
        println!("{label}: {}", outcome.message());
    }
}
