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

use crate::error::format::format_error_with_color;
use crate::error::*;

#[test]
fn test_error_context_sudo_password_required() {
    let error = TaskError::SudoPasswordRequired;
    let context = ErrorContext::new(&error);

    assert!(context.suggestion.is_some());
    assert!(context.suggestion.unwrap().contains("NOPASSWD"));
    assert!(context.details.is_none());
}

#[test]
fn test_error_context_installer_not_found() {
    let error = TaskError::InstallerNotFound("/tmp/chef-workstation.deb".to_string());
    let context = ErrorContext::new(&error);

    assert!(context.details.unwrap().contains("/tmp/chef-workstation.deb"));
}

#[test]
fn test_error_context_executable_not_found_lists_paths() {
    let error = TaskError::ExecutableNotFound {
        name: "inspec".to_string(),
        searched: vec![
            "/usr/bin/inspec".to_string(),
            "/opt/chef-workstation/bin/inspec".to_string(),
        ],
    };
    let context = ErrorContext::new(&error);

    let details = context.details.unwrap();
    assert!(details.contains("/usr/bin/inspec"));
    assert!(details.contains("/opt/chef-workstation/bin/inspec"));
    assert!(context.suggestion.unwrap().contains("component=inspec"));
}

#[test]
fn test_error_context_api_unauthorized() {
    let error = TaskError::ApiStatus {
        method: "GET".to_string(),
        host: "chef.example.com".to_string(),
        path: "/organizations/acme/environments/prod".to_string(),
        status: 401,
    };
    let context = ErrorContext::new(&error);

    assert!(context.suggestion.unwrap().contains("private key"));
}

#[test]
fn test_api_status_message_embeds_request() {
    let error = TaskError::ApiStatus {
        method: "PUT".to_string(),
        host: "chef.example.com".to_string(),
        path: "/organizations/acme/environments/prod".to_string(),
        status: 409,
    };

    assert_eq!(
        error.to_string(),
        "PUT chef.example.com/organizations/acme/environments/prod: 409"
    );
}

#[test]
fn test_error_context_no_suggestion() {
    let error = TaskError::Signing("message too long".to_string());
    let context = ErrorContext::new(&error);

    assert!(context.suggestion.is_none());
    assert!(context.details.is_none());
}

#[test]
fn test_error_context_builders() {
    let error = TaskError::PathNotFound("/srv/profiles/base".to_string());
    let context = ErrorContext::new(&error)
        .with_suggestion("Check out the profile first".to_string())
        .with_details("Working directory missing".to_string());

    assert_eq!(
        context.to_string(),
        "Error: Path not found: /srv/profiles/base\n\nDetails: Working directory missing\n\n\
         Suggestion: Check out the profile first"
    );
}

#[test]
fn test_exit_codes() {
    assert_eq!(
        get_exit_code(&TaskError::UnsupportedPlatform("darwin".to_string())),
        2
    );
    assert_eq!(get_exit_code(&TaskError::MissingInput("gemName".into())), 2);
    assert_eq!(get_exit_code(&TaskError::InstallerNotFound("x".into())), 3);
    assert_eq!(
        get_exit_code(&TaskError::CommandFailed {
            command: "bash install.sh".to_string(),
            code: 1
        }),
        4
    );
    assert_eq!(get_exit_code(&TaskError::KeyDecode("bad".into())), 5);
    assert_eq!(get_exit_code(&TaskError::ElevationRequired), 13);
    assert_eq!(get_exit_code(&TaskError::SudoPasswordRequired), 13);
    assert_eq!(
        get_exit_code(&TaskError::ApiStatus {
            method: "GET".into(),
            host: "h".into(),
            path: "/p".into(),
            status: 500
        }),
        20
    );
    let io = std::io::Error::other("boom");
    assert_eq!(get_exit_code(&TaskError::Io(io)), 1);
}

#[test]
fn test_format_error_chain() {
    let error = TaskError::SudoNotInstalled;
    let formatted = format_error_chain(&error);

    assert!(formatted.starts_with("Error: The option to UseSudo has been set"));
    assert!(formatted.contains("Suggestion: Install sudo"));
}

#[test]
fn test_format_error_without_color() {
    let error = TaskError::ElevationRequired;
    let formatted = format_error_with_color(&error, false);

    assert!(formatted.starts_with("Error: Agent must be running with Elevated Privileges"));
    assert!(formatted.contains("Suggestions:"));
    assert!(formatted.contains("• Run the agent service"));
    assert!(!formatted.contains("\x1b["));
}
