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

use crate::api::models::Environment;
use crate::api::transport::{HttpRequest, HttpTransport, Transport};
use crate::config::{ServerConfig, required};
use crate::error::{Result, TaskError};
use crate::signing::{Method, RequestSigner};
use log::{debug, info};
use serde_json::Value;
use url::Url;

pub struct ChefApiClient<T: Transport> {
    transport: T,
    signer: RequestSigner,
    base_url: Url,
    host: String,
}

impl ChefApiClient<HttpTransport> {
    /// Client for the configured Chef server over HTTPS.
    pub fn from_config(server: &ServerConfig) -> Result<Self> {
        let url = required(&server.url, "chefServerUrl")?;
        let username = required(&server.username, "chefUsername")?;
        let key = required(&server.user_key, "chefUserKey")?;

        let signer = RequestSigner::from_pem(username, key)?;
        Self::new(url, signer, HttpTransport::new(server.ssl_verify))
    }
}

impl<T: Transport> ChefApiClient<T> {
    pub fn new(server_url: &str, signer: RequestSigner, transport: T) -> Result<Self> {
        let base_url = Url::parse(server_url).map_err(|e| {
            TaskError::InvalidConfig(format!("invalid Chef server URL '{server_url}': {e}"))
        })?;

        let host = match (base_url.host_str(), base_url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(TaskError::InvalidConfig(format!(
                    "Chef server URL '{server_url}' has no host"
                )));
            }
        };

        Ok(Self {
            transport,
            signer,
            base_url,
            host,
        })
    }

    /// Server base path joined with a resource path:
    /// `https://chef/organizations/acme` + `environments/prod` ->
    /// `/organizations/acme/environments/prod`.
    pub fn api_path(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn call(&self, path: &str, method: Method, body: Option<&Value>) -> Result<Value> {
        let body = match body {
            Some(value) if method.has_body() => Some(serde_json::to_string(value)?),
            _ => None,
        };

        let mut url = self.base_url.clone();
        url.set_path(&self.api_path(path));
        url.set_query(None);

        // The server hashes the path it receives, so sign the encoded form
        let headers = self.signer.sign(method, url.path(), body.as_deref())?;

        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            body,
        };

        let response = self.transport.send(&request)?;
        info!("Got response: {}", response.status);

        if response.status != 200 {
            return Err(TaskError::ApiStatus {
                method: method.to_string(),
                host: self.host.clone(),
                path: url.path().to_string(),
                status: response.status,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }

    pub fn get_environment(&self, name: &str) -> Result<Environment> {
        let value = self.call(&environment_path(name), Method::Get, None)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn put_environment(&self, environment: &Environment) -> Result<Environment> {
        let body = serde_json::to_value(environment)?;
        let value = self.call(
            &environment_path(&environment.name),
            Method::Put,
            Some(&body),
        )?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch an environment, apply `mutate` locally and write the whole
    /// resource back with a single PUT.
    pub fn update_environment<F>(&self, name: &str, mutate: F) -> Result<Environment>
    where
        F: FnOnce(&mut Environment),
    {
        let mut environment = self.get_environment(name)?;
        debug!("Fetched environment '{name}'");

        mutate(&mut environment);

        // The PUT goes to the name that was fetched
        if environment.name.is_empty() {
            environment.name = name.to_string();
        }
        let body = serde_json::to_value(&environment)?;
        let value = self.call(&environment_path(name), Method::Put, Some(&body))?;
        Ok(serde_json::from_value(value)?)
    }
}

fn environment_path(name: &str) -> String {
    format!("environments/{name}")
}
