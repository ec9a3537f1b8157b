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
use crate::signing::Method;
use crate::user_agent;
use attohttpc::Session;
use attohttpc::header::HeaderName;
use log::{debug, trace, warn};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Sends a fully signed request. Non-2xx statuses are returned, not raised.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    session: Session,
}

impl HttpTransport {
    pub fn new(ssl_verify: bool) -> Self {
        let mut session = Session::new();
        session.header("User-Agent", user_agent::api_client());
        session.proxy_settings(attohttpc::ProxySettings::from_env());

        if !ssl_verify {
            warn!("SSL certificate verification is disabled for Chef server requests");
            session.danger_accept_invalid_certs(true);
        }

        Self { session }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.session.get(&request.url),
            Method::Put => self.session.put(&request.url),
            Method::Post => self.session.post(&request.url),
            Method::Delete => self.session.delete(&request.url),
        };

        for (name, value) in &request.headers {
            let header = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                TaskError::InvalidConfig(format!("invalid header name '{name}': {e}"))
            })?;
            builder = builder.try_header(header, value.as_str())?;
        }

        debug!("{} {}", request.method, request.url);
        let response = match &request.body {
            Some(body) => builder.text(body).send()?,
            None => builder.send()?,
        };

        let status = response.status().as_u16();
        let body = response.text()?;
        trace!("Response {status}: {body}");

        Ok(HttpResponse { status, body })
    }
}
