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

#![allow(dead_code)]

use chef_tasks::error::Result;
use chef_tasks::host::{IssueKind, PipelineVariable, TaskHost, TaskOutcome};
use chef_tasks::platform::process::{CommandLine, ExecOptions, ExecOutput};
use chef_tasks::platform::{FileMode, FileSystem, LocalFileSystem};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TEST_KEY: &str = include_str!("../fixtures/test_user.pem");

/// Task host for integration tests.
///
/// Files under the temporary task directory are real. Agent paths such as
/// `/usr/bin/sudo` only exist when registered with [`with_agent_path`], so
/// results do not depend on the machine running the tests. Commands are
/// recorded and answered from canned results instead of being run.
///
/// [`with_agent_path`]: RecordingHost::with_agent_path
pub struct RecordingHost {
    task_dir: TempDir,
    platform: String,
    elevated: bool,
    agent_paths: HashSet<PathBuf>,
    inputs: HashMap<String, String>,
    variables: Vec<PipelineVariable>,
    results: Vec<(String, ExecOutput)>,
    fs: LocalFileSystem,
    commands: RefCell<Vec<Vec<String>>>,
    rendered: RefCell<Vec<String>>,
    secrets: RefCell<Vec<String>>,
    issues: RefCell<Vec<(IssueKind, String)>>,
    outcome: RefCell<Option<TaskOutcome>>,
}

impl RecordingHost {
    pub fn new(platform: &str) -> Self {
        Self {
            task_dir: TempDir::new().expect("Failed to create task directory"),
            platform: platform.to_string(),
            elevated: false,
            agent_paths: HashSet::new(),
            inputs: HashMap::new(),
            variables: Vec::new(),
            results: Vec::new(),
            fs: LocalFileSystem,
            commands: RefCell::new(Vec::new()),
            rendered: RefCell::new(Vec::new()),
            secrets: RefCell::new(Vec::new()),
            issues: RefCell::new(Vec::new()),
            outcome: RefCell::new(None),
        }
    }

    pub fn task_dir(&self) -> &Path {
        self.task_dir.path()
    }

    pub fn elevated(mut self) -> Self {
        self.elevated = true;
        self
    }

    pub fn with_agent_path(mut self, path: &str) -> Self {
        self.agent_paths.insert(PathBuf::from(path));
        self
    }

    pub fn with_input(mut self, name: &str, value: &str) -> Self {
        self.inputs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_variable(mut self, name: &str, value: &str, secret: bool) -> Self {
        self.variables.push(PipelineVariable {
            name: name.to_string(),
            value: value.to_string(),
            secret,
        });
        self
    }

    /// Answer commands that start with `prefix`. Unmatched commands exit 0.
    pub fn on_exec(mut self, prefix: &str, code: i32, stdout: &str, stderr: &str) -> Self {
        self.results.push((
            prefix.to_string(),
            ExecOutput {
                code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        ));
        self
    }

    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.borrow().clone()
    }

    /// Commands as they would appear in the agent log.
    pub fn rendered(&self) -> Vec<String> {
        self.rendered.borrow().clone()
    }

    pub fn secrets(&self) -> Vec<String> {
        self.secrets.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.issues
            .borrow()
            .iter()
            .filter(|(kind, _)| *kind == IssueKind::Warning)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn outcome(&self) -> Option<TaskOutcome> {
        self.outcome.borrow().clone()
    }

    /// Where an agent path lives on this machine. Windows paths resolved on
    /// another OS are flattened into the task directory.
    fn local(&self, path: &Path) -> PathBuf {
        let raw = path.to_string_lossy();
        if cfg!(windows) || !raw.contains('\\') {
            return path.to_path_buf();
        }
        self.task_dir()
            .join(raw.replace(['\\', ':', '/'], "_").trim_start_matches('_'))
    }
}

impl FileSystem for RecordingHost {
    fn exists(&self, path: &Path) -> bool {
        let local = self.local(path);
        self.agent_paths.contains(path) || (local.starts_with(self.task_dir()) && local.exists())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.fs.read_to_string(&self.local(path))
    }

    fn write_file(&self, path: &Path, contents: &[u8], mode: FileMode) -> Result<()> {
        self.fs.write_file(&self.local(path), contents, mode)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.fs.remove_file(&self.local(path))
    }
}

impl TaskHost for RecordingHost {
    fn platform_name(&self) -> String {
        self.platform.clone()
    }

    fn is_elevated(&self) -> bool {
        self.elevated
    }

    fn input(&self, name: &str) -> Option<String> {
        self.inputs.get(name).filter(|v| !v.is_empty()).cloned()
    }

    fn variables(&self) -> Vec<PipelineVariable> {
        self.variables.clone()
    }

    fn exec(&self, command: &CommandLine, _options: &ExecOptions) -> Result<ExecOutput> {
        let rendered = command.tokens().join(" ");
        self.commands.borrow_mut().push(command.to_vec());
        self.rendered.borrow_mut().push(command.to_string());

        Ok(self
            .results
            .iter()
            .find(|(prefix, _)| rendered.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default())
    }

    fn issue(&self, kind: IssueKind, message: &str) {
        self.issues.borrow_mut().push((kind, message.to_string()));
    }

    fn debug(&self, _message: &str) {}

    fn set_secret(&self, value: &str) {
        self.secrets.borrow_mut().push(value.to_string());
    }

    fn complete(&self, outcome: &TaskOutcome) {
        *self.outcome.borrow_mut() = Some(outcome.clone());
    }
}
