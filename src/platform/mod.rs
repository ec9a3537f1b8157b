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

//! Platform detection and the per-platform path table.
//!
//! The agent reports its platform by name (`win32`, `linux`). Everything that
//! depends on it, from tool locations to the install script flavour, is
//! resolved once into a [`PlatformProfile`] at the start of a run.

pub mod elevation;
pub mod filesystem;
pub mod permissions;
pub mod process;

mod constants;
mod profile;

pub use constants::{
    LINUX_PLATFORM, WINDOWS_PLATFORM, host_platform_name, install_script_name, path_separator,
    tool_extension, with_tool_extension,
};
pub use filesystem::{FileMode, FileSystem, LocalFileSystem};
pub use profile::{PathKey, PlatformKind, PlatformProfile};
