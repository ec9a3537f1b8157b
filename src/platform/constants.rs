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

//! Platform-specific constants and utility functions.

use super::PlatformKind;

/// Host platform name for Windows, as reported by pipeline agents
pub const WINDOWS_PLATFORM: &str = "win32";

/// Host platform name for Linux
pub const LINUX_PLATFORM: &str = "linux";

/// Path separator used when joining profile paths
pub fn path_separator(kind: PlatformKind) -> char {
    match kind {
        PlatformKind::Windows => '\\',
        PlatformKind::Linux => '/',
    }
}

/// Extension appended to every Chef tool name
pub fn tool_extension(kind: PlatformKind) -> &'static str {
    match kind {
        PlatformKind::Windows => ".bat",
        PlatformKind::Linux => "",
    }
}

/// Add the platform-specific tool extension to a file name
pub fn with_tool_extension(kind: PlatformKind, name: &str) -> String {
    format!("{}{}", name, tool_extension(kind))
}

/// File name of the install script written for the platform
pub fn install_script_name(kind: PlatformKind) -> &'static str {
    match kind {
        PlatformKind::Windows => "install.ps1",
        PlatformKind::Linux => "install.sh",
    }
}

/// Root that absolute profile paths are joined onto
pub(crate) fn root(kind: PlatformKind) -> &'static str {
    match kind {
        PlatformKind::Windows => "C:",
        PlatformKind::Linux => "",
    }
}

/// Name of the platform this binary was compiled for, in agent terms
pub fn host_platform_name() -> &'static str {
    match std::env::consts::OS {
        "windows" => WINDOWS_PLATFORM,
        "macos" => "darwin",
        other => other,
    }
}
