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

//! Decide whether commands need a `sudo` prefix, and make sure sudo will not
//! stop to ask for a password.

use crate::error::{Result, TaskError};
use crate::host::TaskHost;
use crate::platform::process::{CommandLine, ExecOptions};
use crate::platform::{FileSystem, PathKey, PlatformProfile};
use regex::Regex;
use std::sync::LazyLock;

static PASSWORD_REQUIRED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^sudo: a password is required").expect("valid regex")
});

pub fn sudo_installed<F: FileSystem + ?Sized>(fs: &F, profile: &PlatformProfile) -> bool {
    profile.path(PathKey::Sudo).is_some_and(|p| fs.exists(p))
}

pub struct SudoNegotiator;

impl SudoNegotiator {
    /// The prefix to put in front of privileged commands: empty, or `["sudo"]`.
    pub fn check<H: TaskHost + ?Sized>(
        host: &H,
        profile: &PlatformProfile,
        use_sudo: bool,
    ) -> Result<Vec<String>> {
        if !use_sudo || profile.kind().is_windows() || !sudo_installed(host, profile) {
            return Ok(Vec::new());
        }

        log::info!("Determine if Sudo requires a password");
        let mut cmd = CommandLine::new("sudo");
        cmd.args(["-n", "true"]);
        let output = host.exec(&cmd, &ExecOptions::capture())?;
        host.debug(&format!("Sudo check result: {}", output.stderr));

        if PASSWORD_REQUIRED.is_match(&output.stderr) {
            return Err(TaskError::SudoPasswordRequired);
        }

        log::info!("No password needed (NOPASSWD appears to be enabled for the agent account)");
        Ok(vec!["sudo".to_string()])
    }
}
