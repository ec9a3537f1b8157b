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

use crate::config::{CookbookConfig, required};
use crate::error::{Result, TaskError};
use crate::host::TaskOutcome;
use crate::platform::{FileMode, FileSystem};
use log::info;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// A `version` declaration at the start of a line. `chef_version` and
/// similar attributes do not match.
static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^([ \t]*)version\s+['"][^'"]*['"]"#).expect("valid regex")
});

/// Replace the first `version '...'` declaration in cookbook metadata,
/// keeping its indentation.
pub fn set_metadata_version(metadata: &str, version: &str) -> Option<String> {
    let found = VERSION_LINE.captures(metadata)?;
    let whole = found.get(0)?;
    let indent = found.get(1).map_or("", |m| m.as_str());

    let mut updated = String::with_capacity(metadata.len() + version.len());
    updated.push_str(&metadata[..whole.start()]);
    updated.push_str(&format!("{indent}version '{version}'"));
    updated.push_str(&metadata[whole.end()..]);
    Some(updated)
}

pub struct CookbookVersionCommand<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
}

impl<'a, F: FileSystem + ?Sized> CookbookVersionCommand<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self { fs }
    }

    pub fn execute(&self, cookbook: &CookbookConfig) -> Result<TaskOutcome> {
        let version = required(&cookbook.version, "chefCookbookVersion")?;
        let metadata = Path::new(required(&cookbook.metadata, "chefCookbookMetadata")?);
        info!("Attempting to set cookbook version: {version}");

        if !self.fs.exists(metadata) {
            return Err(TaskError::PathNotFound(metadata.display().to_string()));
        }

        let current = self.fs.read_to_string(metadata)?;
        let updated = set_metadata_version(&current, version).ok_or_else(|| {
            TaskError::InvalidConfig(format!(
                "no version declaration found in {}",
                metadata.display()
            ))
        })?;

        self.fs
            .write_file(metadata, updated.as_bytes(), FileMode::Regular)?;

        Ok(TaskOutcome::Succeeded(format!(
            "Cookbook version set to {version} in {}",
            metadata.display()
        )))
    }
}
