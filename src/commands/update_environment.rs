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

//! Pin a cookbook version in a Chef environment and optionally copy the
//! pipeline variables into its override attributes.

use crate::api::{ChefApiClient, Transport};
use crate::config::{TaskConfig, required};
use crate::error::Result;
use crate::host::{PipelineVariable, TaskHost, TaskOutcome};
use log::{debug, info};

/// Variables whose names start with one of these belong to the agent, not
/// to the release, and are never copied.
pub const EXCLUDED_VARIABLE_PREFIXES: &[&str] = &[
    "agent",
    "release",
    "system",
    "build",
    "task",
    "MSDEPLOY_HTTP_USER_AGENT",
    "AZURE_HTTP_USER_AGENT",
    "requestedForId",
];

/// Whether a pipeline variable may be written to the environment.
pub fn is_exported(variable: &PipelineVariable) -> bool {
    !variable.secret
        && !EXCLUDED_VARIABLE_PREFIXES
            .iter()
            .any(|prefix| variable.name.starts_with(prefix))
}

pub struct UpdateEnvironmentCommand<'a, H: TaskHost + ?Sized, T: Transport> {
    host: &'a H,
    client: &'a ChefApiClient<T>,
}

impl<'a, H: TaskHost + ?Sized, T: Transport> UpdateEnvironmentCommand<'a, H, T> {
    pub fn new(host: &'a H, client: &'a ChefApiClient<T>) -> Self {
        Self { host, client }
    }

    pub fn execute(&self, config: &TaskConfig) -> Result<TaskOutcome> {
        let env_name = required(&config.environment.name, "chefEnvName")?;
        let cookbook = required(&config.cookbook.name, "chefCookbookName")?;
        let version = required(&config.cookbook.version, "chefCookbookVersion")?;

        let attributes = if config.environment.add_attributes {
            let namespace = required(&config.environment.namespace, "chefEnvironmentNamespace")?;
            let variables: Vec<PipelineVariable> = self
                .host
                .variables()
                .into_iter()
                .filter(is_exported)
                .collect();
            debug!("{} pipeline variables to add", variables.len());
            Some((namespace, variables))
        } else {
            None
        };

        let updated = self.client.update_environment(env_name, |environment| {
            environment.set_cookbook_version(cookbook, version);

            if let Some((namespace, variables)) = &attributes {
                for variable in variables {
                    environment.set_override_attribute(namespace, &variable.name, &variable.value);
                    info!("Added variable to Chef environment: {}", variable.name);
                }
            }
        })?;

        let pinned = updated
            .cookbook_versions
            .get(cookbook)
            .map(String::as_str)
            .unwrap_or(version);
        info!("Environment Constraints Updated");
        info!("  Name: {}", updated.name);
        info!("  Cookbook: {cookbook}");
        info!("  Version: {pinned}");

        Ok(TaskOutcome::Succeeded(format!(
            "Environment '{}' updated: {cookbook} = {pinned}",
            updated.name
        )))
    }
}
