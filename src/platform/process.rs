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

//! Command lines and process execution.

use crate::error::{Result, TaskError};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Rendered in place of a masked value.
pub const MASK: &str = "***";

/// An argv sequence. The first token is the program and no token is empty.
///
/// Values registered with [`mask`](CommandLine::mask) are passed to the
/// process unchanged but never appear in the [`Display`](fmt::Display)
/// rendering used for logs and error messages.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandLine {
    tokens: Vec<String>,
    masked: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        debug_assert!(!program.is_empty(), "command line needs a program");
        Self {
            tokens: vec![program],
            masked: Vec::new(),
        }
    }

    /// Start a command line behind a prefix such as `["sudo"]`.
    pub fn with_prefix(prefix: &[String], program: impl Into<String>) -> Self {
        let mut tokens: Vec<String> = prefix.iter().filter(|t| !t.is_empty()).cloned().collect();
        tokens.push(program.into());
        Self {
            tokens,
            masked: Vec::new(),
        }
    }

    /// Append one argument. Empty arguments are dropped.
    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        let arg = arg.into();
        if !arg.is_empty() {
            self.tokens.push(arg);
        }
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for arg in args {
            self.arg(arg);
        }
        self
    }

    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    pub fn arguments(&self) -> &[String] {
        &self.tokens[1..]
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.tokens.clone()
    }

    /// Hide `secret` wherever it occurs in the rendered command line.
    pub fn mask(&mut self, secret: impl Into<String>) -> &mut Self {
        let secret = secret.into();
        if !secret.trim().is_empty() && !self.masked.contains(&secret) {
            self.masked.push(secret);
        }
        self
    }

    fn redact(&self, token: &str) -> String {
        self.masked
            .iter()
            .fold(token.to_string(), |t, secret| t.replace(secret.as_str(), MASK))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .tokens
            .iter()
            .map(|t| self.redact(t))
            .map(|t| {
                if t.chars().any(char::is_whitespace) {
                    format!("\"{}\"", t.replace('"', "\\\""))
                } else {
                    t
                }
            })
            .collect();
        write!(f, "{}", rendered.join(" "))
    }
}

/// Split an argument string the way pipeline tool runners do: whitespace
/// separates arguments, double quotes group, and `\"` inside quotes is a
/// literal quote.
pub fn split_arguments(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in line.chars() {
        if c == '"' {
            if escaped {
                current.push(c);
                escaped = false;
            } else {
                in_quotes = !in_quotes;
            }
            continue;
        }

        if c == '\\' && in_quotes && !escaped {
            escaped = true;
            continue;
        }

        if escaped {
            current.push('\\');
            escaped = false;
        }

        if c.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(c);
    }

    if escaped {
        current.push('\\');
    }
    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// How a command should be run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExecOptions {
    pub cwd: Option<PathBuf>,
    /// Capture stdout/stderr instead of streaming them to the agent log.
    pub capture: bool,
}

impl ExecOptions {
    pub fn capture() -> Self {
        Self {
            cwd: None,
            capture: true,
        }
    }

    pub fn inherit() -> Self {
        Self::default()
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExecOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Run a command to completion.
pub fn run_command(command: &CommandLine, options: &ExecOptions) -> Result<ExecOutput> {
    let mut cmd = Command::new(command.program());
    cmd.args(command.arguments());
    if let Some(dir) = &options.cwd {
        cmd.current_dir(dir);
    }

    log::debug!("Running: {command}");

    if options.capture {
        let output = cmd
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(command.program(), options.cwd.as_deref(), e))?;
        Ok(ExecOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    } else {
        let status = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| spawn_error(command.program(), options.cwd.as_deref(), e))?;
        Ok(ExecOutput {
            code: status.code().unwrap_or(-1),
            ..Default::default()
        })
    }
}

fn spawn_error(program: &str, cwd: Option<&Path>, err: std::io::Error) -> TaskError {
    match err.kind() {
        ErrorKind::NotFound => match cwd {
            Some(dir) if !dir.exists() => TaskError::PathNotFound(dir.display().to_string()),
            _ => TaskError::ExecutableNotFound {
                name: program.to_string(),
                searched: Vec::new(),
            },
        },
        _ => TaskError::Io(err),
    }
}
