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

use crate::error::{ErrorContext, TaskError};
use colored::Colorize;

pub fn format_error_chain(error: &TaskError) -> String {
    let context = ErrorContext::new(error);
    context.to_string()
}

/// Format an error for an interactive terminal (dev mode)
pub fn format_error_with_color(error: &TaskError, use_color: bool) -> String {
    let context = ErrorContext::new(error);
    let mut output = String::new();

    let header = if use_color {
        "Error:".red().bold().to_string()
    } else {
        "Error:".to_string()
    };
    output.push_str(&format!("{header} {error}\n"));

    if let Some(details) = &context.details {
        output.push_str(&format!("\n{details}\n"));
    }

    if let Some(suggestion) = &context.suggestion {
        let title = if use_color {
            "Suggestions:".yellow().bold().to_string()
        } else {
            "Suggestions:".to_string()
        };
        output.push_str(&format!("\n{title}\n"));
        for line in suggestion.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let bullet = format!("• {line}");
            if use_color {
                output.push_str(&format!("{}\n", bullet.cyan()));
            } else {
                output.push_str(&format!("{bullet}\n"));
            }
        }
    }

    output
}
