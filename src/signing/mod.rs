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

//! Chef API request signing (protocol version 1.0, SHA-1).
//!
//! Every request carries a content hash of the body, a timestamp and the
//! user id. Those values, together with the method and a hash of the path,
//! form a canonical string. The canonical string goes through a raw RSA
//! PKCS#1 v1.5 private-key operation (no DigestInfo prefix) and the base64
//! result is spread over `X-Ops-Authorization-N` headers of 60 characters.

use crate::error::{Result, TaskError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

pub const SIGN_DESCRIPTION: &str = "algorithm=sha1;version=1.0";
pub const CHEF_VERSION: &str = "12.0.2";
pub const SERVER_API_VERSION: &str = "1";
pub const AUTHORIZATION_CHUNK: usize = 60;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }

    /// PUT and POST send a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Put | Method::Post)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "PUT" => Ok(Method::Put),
            "POST" => Ok(Method::Post),
            "DELETE" => Ok(Method::Delete),
            _ => Err(TaskError::InvalidConfig(format!("unsupported HTTP method '{s}'"))),
        }
    }
}

/// Ordered request headers produced by [`RequestSigner`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SignedHeaders {
    headers: Vec<(String, String)>,
}

impl SignedHeaders {
    fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Reassemble the authorization value from its numbered chunks.
    pub fn authorization(&self) -> String {
        (1..)
            .map_while(|i| self.get(&format!("X-Ops-Authorization-{i}")))
            .collect()
    }
}

pub struct RequestSigner {
    user_id: String,
    key: RsaPrivateKey,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// Load a PKCS#1 (`BEGIN RSA PRIVATE KEY`) or PKCS#8 PEM key.
    pub fn from_pem(user_id: impl Into<String>, pem: &str) -> Result<Self> {
        let key = RsaPrivateKey::from_pkcs1_pem(pem).or_else(|pkcs1_err| {
            RsaPrivateKey::from_pkcs8_pem(pem).map_err(|pkcs8_err| {
                TaskError::KeyDecode(format!("PKCS#1: {pkcs1_err}; PKCS#8: {pkcs8_err}"))
            })
        })?;

        Ok(Self {
            user_id: user_id.into(),
            key,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn sign(&self, method: Method, path: &str, body: Option<&str>) -> Result<SignedHeaders> {
        self.sign_at(method, path, body, Utc::now())
    }

    /// Sign with an explicit timestamp.
    pub fn sign_at(
        &self,
        method: Method,
        path: &str,
        body: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<SignedHeaders> {
        let timestamp = format_timestamp(timestamp);
        let content_hash = content_hash(body);
        let canonical = canonical_string(
            method,
            &hashed_path(path),
            &content_hash,
            &timestamp,
            &self.user_id,
        );
        log::trace!("Canonical request:\n{canonical}");

        let signature = self
            .key
            .sign(Pkcs1v15Sign::new_unprefixed(), canonical.as_bytes())
            .map_err(|e| TaskError::Signing(e.to_string()))?;
        let authorization = STANDARD.encode(signature);

        let mut headers = SignedHeaders::default();
        headers.push("Accept", "application/json");
        headers.push("X-Ops-Sign", SIGN_DESCRIPTION);
        headers.push("X-Ops-Userid", self.user_id.as_str());
        headers.push("X-Ops-Timestamp", timestamp);
        headers.push("X-Ops-Content-Hash", content_hash);
        headers.push("X-Chef-Version", CHEF_VERSION);
        headers.push("X-Ops-Server-API-Version", SERVER_API_VERSION);
        if method.has_body() {
            headers.push("Content-Type", "application/json");
        }
        for (name, value) in split_authorization(&authorization) {
            headers.push(name, value);
        }

        Ok(headers)
    }
}

fn sha1_base64(data: &[u8]) -> String {
    STANDARD.encode(Sha1::digest(data))
}

/// Base64 SHA-1 of the request body. A missing body hashes as the empty string.
pub fn content_hash(body: Option<&str>) -> String {
    sha1_base64(body.unwrap_or("").as_bytes())
}

pub fn hashed_path(path: &str) -> String {
    sha1_base64(path.as_bytes())
}

pub fn canonical_string(
    method: Method,
    hashed_path: &str,
    content_hash: &str,
    timestamp: &str,
    user_id: &str,
) -> String {
    [
        format!("Method:{}", method.as_str()),
        format!("Hashed Path:{hashed_path}"),
        format!("X-Ops-Content-Hash:{content_hash}"),
        format!("X-Ops-Timestamp:{timestamp}"),
        format!("X-Ops-UserId:{user_id}"),
    ]
    .join("\n")
}

/// Split a base64 signature into `X-Ops-Authorization-1..n` headers.
pub fn split_authorization(authorization: &str) -> Vec<(String, String)> {
    authorization
        .as_bytes()
        .chunks(AUTHORIZATION_CHUNK)
        .enumerate()
        .map(|(i, chunk)| {
            (
                format!("X-Ops-Authorization-{}", i + 1),
                String::from_utf8_lossy(chunk).into_owned(),
            )
        })
        .collect()
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
