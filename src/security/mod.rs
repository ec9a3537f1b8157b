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

use crate::error::{Result, TaskError};
use crate::platform::FileSystem;
use sha2::{Digest, Sha256};
use std::path::Path;

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Check that the file at `path` holds exactly `expected`.
pub fn verify_written_file<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    expected: &[u8],
) -> Result<()> {
    let written = fs
        .read_to_string(path)
        .map_err(|e| TaskError::ScriptVerification(format!("{}: {e}", path.display())))?;

    let expected_checksum = sha256_hex(expected);
    let actual_checksum = sha256_hex(written.as_bytes());

    if actual_checksum != expected_checksum {
        return Err(TaskError::ScriptVerification(format!(
            "{}: expected sha256 {expected_checksum}, actual {actual_checksum}",
            path.display()
        )));
    }

    log::debug!("Checksum verified for {path:?}");
    Ok(())
}
