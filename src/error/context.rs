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

use crate::error::TaskError;
use std::fmt;

pub struct ErrorContext<'a> {
    pub error: &'a TaskError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(error: &'a TaskError) -> Self {
        let (suggestion, details) = match error {
            TaskError::UnsupportedPlatform(_) => (
                Some("Run this task on a Windows or Linux agent.".to_string()),
                None,
            ),
            TaskError::MissingInput(name) => (
                Some(format!(
                    "Set the '{name}' input on the task (or the {} environment variable in dev \
                     mode).",
                    name.to_uppercase()
                )),
                None,
            ),
            TaskError::UnknownComponent { expected, .. } => (
                Some(format!("Valid components are: {}.", expected.join(", "))),
                None,
            ),
            TaskError::ElevationRequired => (
                Some(
                    "Run the agent service as a member of the local Administrators group."
                        .to_string(),
                ),
                None,
            ),
            TaskError::SudoNotEnabled => (
                Some(
                    "Enable the 'Use Sudo' option on the task or run the agent as root."
                        .to_string(),
                ),
                None,
            ),
            TaskError::SudoNotInstalled => (
                Some("Install sudo on the agent or run the agent as root.".to_string()),
                None,
            ),
            TaskError::SudoPasswordRequired => (
                Some(
                    "Add a NOPASSWD rule for the agent account to /etc/sudoers, e.g.:\nvsts \
                     ALL=(ALL) NOPASSWD: ALL"
                        .to_string(),
                ),
                None,
            ),
            TaskError::InstallerNotFound(path) => (
                Some(
                    "Check that a previous step downloaded the package, or clear the target \
                     path to download it instead."
                        .to_string(),
                ),
                Some(format!("Looked for: {path}")),
            ),
            TaskError::ExecutableNotFound { name, searched } => {
                let suggestion = Some(format!(
                    "Install {name} first, e.g. by running the install task with \
                     component={name} in an earlier step."
                ));
                let details = if searched.is_empty() {
                    None
                } else {
                    Some(format!("Searched paths:\n{}", searched.join("\n")))
                };
                (suggestion, details)
            }
            TaskError::ApiStatus { status, .. } => {
                let suggestion = match status {
                    401 => Some(
                        "Check the username and private key of the Chef server endpoint, and \
                         that the agent clock is in sync."
                            .to_string(),
                    ),
                    403 => Some(
                        "The Chef user does not have permission for this resource.".to_string(),
                    ),
                    404 => Some(
                        "Check the organization in the server URL and the resource name."
                            .to_string(),
                    ),
                    _ => None,
                };
                (suggestion, None)
            }
            TaskError::KeyDecode(_) => (
                Some(
                    "The Chef user key must be a base64-encoded PEM RSA private key.".to_string(),
                ),
                None,
            ),
            TaskError::Http(e) => (
                Some(
                    "Check network connectivity to the Chef server. Disable SSL verification \
                     only for self-signed certificates."
                        .to_string(),
                ),
                Some(e.to_string()),
            ),
            _ => (None, None),
        };

        ErrorContext {
            error,
            suggestion,
            details,
        }
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    pub fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }
}

impl<'a> fmt::Display for ErrorContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\n\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}
