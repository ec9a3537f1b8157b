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

use super::*;
use crate::error::TaskError;
use crate::signing::{Method, RequestSigner};
use chrono::{DateTime, Utc};
use mockall::Sequence;
use serde_json::{Value, json};

const TEST_KEY: &str = include_str!("../../tests/fixtures/test_user.pem");

fn signer() -> RequestSigner {
    RequestSigner::from_pem("pipeline", TEST_KEY).unwrap()
}

fn client(url: &str, transport: MockTransport) -> ChefApiClient<MockTransport> {
    ChefApiClient::new(url, signer(), transport).unwrap()
}

fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

fn ok(body: Value) -> crate::error::Result<HttpResponse> {
    Ok(HttpResponse {
        status: 200,
        body: body.to_string(),
    })
}

#[test]
fn test_api_path_joins_base_path() {
    let c = client(
        "https://chef.example.com/organizations/acme",
        MockTransport::new(),
    );
    assert_eq!(
        c.api_path("environments/production"),
        "/organizations/acme/environments/production"
    );

    let c = client(
        "https://chef.example.com/organizations/acme/",
        MockTransport::new(),
    );
    assert_eq!(c.api_path("/nodes"), "/organizations/acme/nodes");

    let c = client("https://chef.example.com", MockTransport::new());
    assert_eq!(c.api_path("environments/qa"), "/environments/qa");
}

#[test]
fn test_invalid_server_url() {
    let result = ChefApiClient::new("not a url", signer(), MockTransport::new());
    assert!(matches!(result, Err(TaskError::InvalidConfig(_))));
}

#[test]
fn test_get_sends_signed_request_without_body() {
    let mut transport = MockTransport::new();
    transport
        .expect_send()
        .withf(|req| {
            req.method == Method::Get
                && req.url == "https://chef.example.com/organizations/acme/environments/production"
                && req.body.is_none()
                && header(req, "X-Ops-Userid") == Some("pipeline")
                && header(req, "X-Ops-Content-Hash") == Some("2jmj7l5rSw0yVb/vlWAYkK/YBwk=")
                && header(req, "X-Ops-Authorization-1").is_some()
                && header(req, "Content-Type").is_none()
        })
        .times(1)
        .returning(|_| ok(json!({"name": "production"})));

    let c = client("https://chef.example.com/organizations/acme", transport);
    let value = c
        .call("environments/production", Method::Get, None)
        .unwrap();
    assert_eq!(value["name"], "production");
}

#[test]
fn test_signs_the_encoded_request_path() {
    let mut transport = MockTransport::new();
    transport
        .expect_send()
        .withf(|req| {
            let Some(timestamp) = header(req, "X-Ops-Timestamp") else {
                return false;
            };
            let timestamp = DateTime::parse_from_rfc3339(timestamp)
                .unwrap()
                .with_timezone(&Utc);
            let expected = signer()
                .sign_at(
                    Method::Get,
                    "/organizations/acme/environments/blue%20green",
                    None,
                    timestamp,
                )
                .unwrap();

            req.url == "https://chef.example.com/organizations/acme/environments/blue%20green"
                && header(req, "X-Ops-Authorization-1") == expected.get("X-Ops-Authorization-1")
                && header(req, "X-Ops-Authorization-2") == expected.get("X-Ops-Authorization-2")
        })
        .times(1)
        .returning(|_| ok(json!({"name": "blue green"})));

    let c = client("https://chef.example.com/organizations/acme", transport);
    c.call("environments/blue green", Method::Get, None).unwrap();
}

#[test]
fn test_put_sends_json_body() {
    let mut transport = MockTransport::new();
    transport
        .expect_send()
        .withf(|req| {
            req.method == Method::Put
                && header(req, "Content-Type") == Some("application/json")
                && req
                    .body
                    .as_deref()
                    .map(|b| serde_json::from_str::<Value>(b).unwrap())
                    == Some(json!({"name": "qa"}))
        })
        .times(1)
        .returning(|req| {
            Ok(HttpResponse {
                status: 200,
                body: req.body.clone().unwrap_or_default(),
            })
        });

    let c = client("https://chef.example.com", transport);
    let value = c
        .call("environments/qa", Method::Put, Some(&json!({"name": "qa"})))
        .unwrap();
    assert_eq!(value, json!({"name": "qa"}));
}

#[test]
fn test_non_200_is_api_status_error() {
    let mut transport = MockTransport::new();
    transport.expect_send().returning(|_| {
        Ok(HttpResponse {
            status: 409,
            body: "{\"error\":[\"conflict\"]}".to_string(),
        })
    });

    let c = client("https://chef.example.com:8443/organizations/acme", transport);
    let err = c
        .call("environments/prod", Method::Put, Some(&json!({})))
        .unwrap_err();

    match &err {
        TaskError::ApiStatus {
            method,
            host,
            path,
            status,
        } => {
            assert_eq!(method, "PUT");
            assert_eq!(host, "chef.example.com:8443");
            assert_eq!(path, "/organizations/acme/environments/prod");
            assert_eq!(*status, 409);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "PUT chef.example.com:8443/organizations/acme/environments/prod: 409"
    );
}

#[test]
fn test_201_is_not_success() {
    let mut transport = MockTransport::new();
    transport.expect_send().returning(|_| {
        Ok(HttpResponse {
            status: 201,
            body: "{}".to_string(),
        })
    });

    let c = client("https://chef.example.com", transport);
    assert!(matches!(
        c.call("environments", Method::Post, Some(&json!({}))),
        Err(TaskError::ApiStatus { status: 201, .. })
    ));
}

#[test]
fn test_transport_error_propagates() {
    let mut transport = MockTransport::new();
    transport.expect_send().returning(|_| {
        Err(TaskError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        )))
    });

    let c = client("https://chef.example.com", transport);
    assert!(matches!(
        c.call("environments/qa", Method::Get, None),
        Err(TaskError::Io(_))
    ));
}

#[test]
fn test_update_environment_get_then_put() {
    let mut seq = Sequence::new();
    let mut transport = MockTransport::new();

    transport
        .expect_send()
        .withf(|req| req.method == Method::Get)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| {
            ok(json!({
                "name": "production",
                "json_class": "Chef::Environment",
                "default_attributes": {"tier": "web"},
                "cookbook_versions": {"base": "= 2.0.0"},
                "override_attributes": {}
            }))
        });

    transport
        .expect_send()
        .withf(|req| {
            let Some(body) = req.body.as_deref() else {
                return false;
            };
            let body: Value = serde_json::from_str(body).unwrap();
            req.method == Method::Put
                && req.url.ends_with("/environments/production")
                && body["cookbook_versions"] == json!({"base": "= 2.0.0", "webapp": "1.4.2"})
                && body["json_class"] == "Chef::Environment"
                && body["default_attributes"] == json!({"tier": "web"})
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|req| {
            Ok(HttpResponse {
                status: 200,
                body: req.body.clone().unwrap_or_default(),
            })
        });

    let c = client("https://chef.example.com/organizations/acme", transport);
    let updated = c
        .update_environment("production", |env| {
            env.set_cookbook_version("webapp", "1.4.2")
        })
        .unwrap();

    assert_eq!(updated.cookbook_versions["webapp"], "1.4.2");
}

#[test]
fn test_update_environment_stops_after_failed_get() {
    let mut transport = MockTransport::new();
    transport
        .expect_send()
        .times(1)
        .returning(|_| {
            Ok(HttpResponse {
                status: 404,
                body: String::new(),
            })
        });

    let c = client("https://chef.example.com", transport);
    let mut mutated = false;
    let result = c.update_environment("missing", |_| mutated = true);

    assert!(matches!(result, Err(TaskError::ApiStatus { status: 404, .. })));
    assert!(!mutated);
}

#[test]
fn test_put_environment_uses_resource_name() {
    let mut transport = MockTransport::new();
    transport
        .expect_send()
        .withf(|req| req.url == "https://chef.example.com/environments/staging")
        .times(1)
        .returning(|req| {
            Ok(HttpResponse {
                status: 200,
                body: req.body.clone().unwrap_or_default(),
            })
        });

    let c = client("https://chef.example.com", transport);
    let env = Environment {
        name: "staging".to_string(),
        ..Default::default()
    };
    assert_eq!(c.put_environment(&env).unwrap().name, "staging");
}
