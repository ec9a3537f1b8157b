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

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A Chef environment. Fields this crate does not touch (`json_class`,
/// `default_attributes`, ...) are carried in `extra` and written back as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub cookbook_versions: BTreeMap<String, String>,

    #[serde(default)]
    pub override_attributes: Map<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Environment {
    pub fn set_cookbook_version(&mut self, cookbook: &str, version: &str) {
        self.cookbook_versions
            .insert(cookbook.to_string(), version.to_string());
    }

    /// Set `override_attributes[namespace][key] = value`, creating the
    /// namespace object when needed.
    pub fn set_override_attribute(&mut self, namespace: &str, key: &str, value: &str) {
        let entry = self
            .override_attributes
            .entry(namespace.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        if !entry.is_object() {
            log::warn!("Replacing non-object override attribute '{namespace}'");
            *entry = Value::Object(Map::new());
        }

        if let Value::Object(attributes) = entry {
            attributes.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
}
