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

//! Privilege detection for the current process.

#[cfg(windows)]
use std::ptr;

#[cfg(windows)]
use winapi::um::handleapi::CloseHandle;

#[cfg(windows)]
use winapi::um::processthreadsapi::{GetCurrentProcess, OpenProcessToken};

#[cfg(windows)]
use winapi::um::securitybaseapi::GetTokenInformation;

#[cfg(windows)]
use winapi::um::winnt::{HANDLE, TOKEN_ELEVATION, TOKEN_QUERY, TokenElevation};

/// Whether the process runs as root
#[cfg(unix)]
pub fn is_elevated() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// Whether the process token is elevated (administrator)
#[cfg(windows)]
pub fn is_elevated() -> bool {
    unsafe {
        let mut token_handle: HANDLE = ptr::null_mut();
        if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token_handle) == 0 {
            log::debug!(
                "OpenProcessToken failed: {}",
                std::io::Error::last_os_error()
            );
            return false;
        }

        let mut elevation: TOKEN_ELEVATION = std::mem::zeroed();
        let mut size = std::mem::size_of::<TOKEN_ELEVATION>() as u32;
        let ok = GetTokenInformation(
            token_handle,
            TokenElevation,
            &mut elevation as *mut TOKEN_ELEVATION as *mut _,
            size,
            &mut size,
        );
        CloseHandle(token_handle);

        ok != 0 && elevation.TokenIsElevated != 0
    }
}

#[cfg(not(any(unix, windows)))]
pub fn is_elevated() -> bool {
    false
}
