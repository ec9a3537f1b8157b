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

use crate::error::Result;
use crate::platform::{FileMode, FileSystem, PlatformKind, PlatformProfile};
use crate::security;
use std::path::Path;

pub const INSTALL_SH: &str = include_str!("scripts/install.sh");
pub const INSTALL_PS1: &str = include_str!("scripts/install.ps1");

pub fn script_for(kind: PlatformKind) -> &'static str {
    match kind {
        PlatformKind::Windows => INSTALL_PS1,
        PlatformKind::Linux => INSTALL_SH,
    }
}

/// Write the platform's install script to the profile's script path and
/// verify what landed on disk.
pub fn write_install_script<'a, F: FileSystem + ?Sized>(
    fs: &F,
    profile: &'a PlatformProfile,
) -> Result<&'a Path> {
    let path = profile.script_path();
    let script = script_for(profile.kind());
    let mode = match profile.kind() {
        PlatformKind::Windows => FileMode::Regular,
        PlatformKind::Linux => FileMode::Executable,
    };

    log::debug!("Writing out Chef install script: {}", path.display());
    fs.write_file(path, script.as_bytes(), mode)?;
    security::verify_written_file(fs, path, script.as_bytes())?;

    Ok(path)
}
