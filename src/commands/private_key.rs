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
use crate::host::TaskHost;
use crate::platform::{FileMode, PathKey, PlatformProfile};
use std::path::{Path, PathBuf};

pub(crate) const KEEP_KEY_WARNING: &str = "Option to delete private key has not been enabled. \
     Please consider using this option so that your Chef private key is not left on the agent";

/// The Chef user key written to disk for the lifetime of a task.
pub(crate) struct PrivateKeyFile<'a, H: TaskHost + ?Sized> {
    host: &'a H,
    path: PathBuf,
    delete: bool,
}

impl<'a, H: TaskHost + ?Sized> PrivateKeyFile<'a, H> {
    pub(crate) fn write(
        host: &'a H,
        profile: &PlatformProfile,
        pem: &str,
        delete: bool,
    ) -> Result<Self> {
        let path = profile.require(PathKey::PrivateKey)?.to_path_buf();
        log::info!("Writing private key: {}", path.display());
        host.write_file(&path, pem.as_bytes(), FileMode::Private)?;
        Ok(Self { host, path, delete })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the key if asked to. Never fails the task.
    pub(crate) fn cleanup(self) {
        if !self.delete {
            self.host.warn(KEEP_KEY_WARNING);
            return;
        }

        if !self.host.exists(&self.path) {
            return;
        }

        log::info!("Removing private key: {}", self.path.display());
        if let Err(e) = self.host.remove_file(&self.path) {
            self.host.warn(&format!(
                "Unable to remove private key {}: {e}",
                self.path.display()
            ));
        }
    }
}
