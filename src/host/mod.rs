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

//! The process that invokes a task.
//!
//! A [`TaskHost`] supplies task inputs and pipeline variables, runs external
//! commands and receives the final result. [`PipelineHost`] speaks the agent
//! logging-command protocol; [`DevHost`] reads plain environment variables
//! for local runs.

mod dev;
mod pipeline;

pub use dev::{DEV_MODE_ENV, DevHost};
pub use pipeline::PipelineHost;

use crate::error::{Result, TaskError};
use crate::platform::FileSystem;
use crate::platform::process::{CommandLine, ExecOptions, ExecOutput};
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IssueKind {
    Warning,
    Error,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::Warning => "warning",
            IssueKind::Error => "error",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TaskOutcome {
    Succeeded(String),
    Failed(String),
    Skipped(String),
}

impl TaskOutcome {
    pub fn result_name(&self) -> &'static str {
        match self {
            TaskOutcome::Succeeded(_) => "Succeeded",
            TaskOutcome::Failed(_) => "Failed",
            TaskOutcome::Skipped(_) => "Skipped",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            TaskOutcome::Succeeded(msg) | TaskOutcome::Failed(msg) | TaskOutcome::Skipped(msg) => {
                msg
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TaskOutcome::Failed(_))
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.result_name(), self.message())
    }
}

/// A variable defined on the pipeline or release.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PipelineVariable {
    pub name: String,
    pub value: String,
    pub secret: bool,
}

impl PipelineVariable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            secret: false,
        }
    }
}

pub trait TaskHost: FileSystem {
    /// Agent platform name (`win32`, `linux`, ...).
    fn platform_name(&self) -> String;

    fn is_elevated(&self) -> bool;

    /// Value of a task input. Unset and empty inputs both read as `None`.
    fn input(&self, name: &str) -> Option<String>;

    fn variables(&self) -> Vec<PipelineVariable>;

    fn exec(&self, command: &CommandLine, options: &ExecOptions) -> Result<ExecOutput>;

    fn issue(&self, kind: IssueKind, message: &str);

    fn debug(&self, message: &str);

    /// Ask the host to mask `value` in everything the task logs.
    fn set_secret(&self, value: &str);

    fn complete(&self, outcome: &TaskOutcome);

    fn required_input(&self, name: &str) -> Result<String> {
        self.input(name)
            .ok_or_else(|| TaskError::MissingInput(name.to_string()))
    }

    fn warn(&self, message: &str) {
        log::warn!("{message}");
        self.issue(IssueKind::Warning, message);
    }
}

/// Snapshot of the process environment taken when a host is created.
#[derive(Clone, Debug, Default)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub(crate) fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Non-empty, trimmed value of a variable.
    pub(crate) fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.vars.iter()
    }
}
