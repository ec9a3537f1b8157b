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

//! File system access used by the tasks.
//!
//! Everything that touches the disk goes through [`FileSystem`] so that the
//! install and execute logic can run against an in-memory implementation.

use super::permissions;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// How a written file should be protected
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileMode {
    Regular,
    Executable,
    /// Readable by the owner only (keys)
    Private,
}

pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    fn write_file(&self, path: &Path, contents: &[u8], mode: FileMode) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;
}

/// The real file system
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }

    fn write_file(&self, path: &Path, contents: &[u8], mode: FileMode) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;

        match mode {
            FileMode::Regular => {}
            FileMode::Executable => permissions::make_executable(path)?,
            FileMode::Private => permissions::set_owner_only(path)?,
        }

        log::trace!("Wrote {} bytes to {path:?} ({mode:?})", contents.len());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)?;
        Ok(())
    }
}
