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

use env_logger;

/// Environment variable the agent sets when a pipeline runs with `system.debug`.
const SYSTEM_DEBUG_ENV: &str = "SYSTEM_DEBUG";

/// Map a verbosity count to a filter for this crate
pub fn filter_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "chef_tasks=warn",
        1 => "chef_tasks=info",
        2 => "chef_tasks=debug",
        _ => "chef_tasks=trace",
    }
}

/// Initialize the logger with the specified verbosity level
///
/// # Arguments
/// * `verbose` - Verbosity level (0=warn, 1=info, 2=debug, 3+=trace)
///
/// A pipeline run with `system.debug=true` is treated as at least `-vv`.
pub fn setup_logger(verbose: u8) {
    let system_debug = std::env::var(SYSTEM_DEBUG_ENV)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let level = if system_debug { verbose.max(2) } else { verbose };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter_for(level)))
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();
}
