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

use crate::error::TaskError;

pub fn get_exit_code(error: &TaskError) -> i32 {
    match error {
        TaskError::UnsupportedPlatform(_)
        | TaskError::MissingInput(_)
        | TaskError::InvalidConfig(_)
        | TaskError::UnknownComponent { .. }
        | TaskError::Config(_) => 2,

        TaskError::InstallerNotFound(_)
        | TaskError::PathNotFound(_)
        | TaskError::ExecutableNotFound { .. }
        | TaskError::ScriptVerification(_) => 3,

        TaskError::CommandFailed { .. } => 4,

        TaskError::Signing(_) | TaskError::KeyDecode(_) => 5,

        TaskError::ElevationRequired
        | TaskError::SudoNotEnabled
        | TaskError::SudoNotInstalled
        | TaskError::SudoPasswordRequired => 13,

        TaskError::ApiStatus { .. } | TaskError::Http(_) => 20,

        _ => 1,
    }
}
