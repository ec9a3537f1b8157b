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

//! Installing Chef components and gems on the agent.

pub mod command;
pub mod decision;
pub mod detect;
pub mod script;

pub use command::install_command;
pub use decision::{Decision, DecisionInputs, PrivilegeError, decide};
pub use detect::is_installed;

use crate::config::ComponentConfig;
use crate::error::{Result, TaskError};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Component {
    ChefWorkstation,
    /// The chef-client package
    Chef,
    Inspec,
    Gem,
}

impl Component {
    pub const ALL: [Component; 4] = [
        Component::ChefWorkstation,
        Component::Chef,
        Component::Inspec,
        Component::Gem,
    ];

    /// Input value, also the project name understood by the install scripts.
    pub fn name(&self) -> &'static str {
        match self {
            Component::ChefWorkstation => "chef-workstation",
            Component::Chef => "chef",
            Component::Inspec => "inspec",
            Component::Gem => "gem",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Component::ChefWorkstation => "Chef Workstation",
            Component::Chef => "Chef Infra Client",
            Component::Inspec => "InSpec",
            Component::Gem => "Gem",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Component {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        Component::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| TaskError::UnknownComponent {
                name: s.to_string(),
                expected: Component::ALL.iter().map(|c| c.name().to_string()).collect(),
            })
    }
}

/// What to install and how.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComponentSpec {
    pub component: Component,
    pub version: Option<String>,
    pub channel: Option<String>,
    pub target_path: Option<String>,
    pub gem_name: Option<String>,
    pub force_install: bool,
    pub use_sudo: bool,
}

impl ComponentSpec {
    pub fn new(component: Component) -> Self {
        Self {
            component,
            version: None,
            channel: None,
            target_path: None,
            gem_name: None,
            force_install: false,
            use_sudo: false,
        }
    }

    pub fn from_config(config: &ComponentConfig) -> Result<Self> {
        let name = crate::config::required(&config.name, "component")?;
        Ok(Self {
            component: name.parse()?,
            version: config.version.clone(),
            channel: config.channel.clone(),
            target_path: config.target_path.clone(),
            gem_name: config.gem_name.clone(),
            force_install: config.force_install,
            use_sudo: config.use_sudo,
        })
    }

    /// Name used in log and result messages.
    pub fn label(&self) -> String {
        match (&self.component, &self.gem_name) {
            (Component::Gem, Some(gem)) => format!("gem {gem}"),
            (component, _) => component.display_name().to_string(),
        }
    }
}
