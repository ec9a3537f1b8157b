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
use std::path::Path;

/// Restrict a file to its owner (private keys)
pub fn set_owner_only(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        set_owner_only_unix(path)
    }

    #[cfg(not(unix))]
    {
        log::debug!("Owner-only permissions are not applied on this platform: {path:?}");
        Ok(())
    }
}

/// Make a script executable
pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        make_executable_unix(path)
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        Ok(())
    }
}

#[cfg(unix)]
fn set_owner_only_unix(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)?;
    let mut permissions = metadata.permissions();

    // 600: owner read/write only
    permissions.set_mode(0o600);

    std::fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(unix)]
fn make_executable_unix(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)?;
    let mut permissions = metadata.permissions();

    let mode = permissions.mode() | 0o755;
    permissions.set_mode(mode);

    std::fs::set_permissions(path, permissions)?;
    Ok(())
}
