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

use super::constants::{self, LINUX_PLATFORM, WINDOWS_PLATFORM};
use super::filesystem::FileSystem;
use crate::error::{Result, TaskError};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PlatformKind {
    Windows,
    Linux,
}

impl PlatformKind {
    /// Parse an agent platform name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            WINDOWS_PLATFORM => Ok(PlatformKind::Windows),
            LINUX_PLATFORM => Ok(PlatformKind::Linux),
            other => Err(TaskError::UnsupportedPlatform(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlatformKind::Windows => WINDOWS_PLATFORM,
            PlatformKind::Linux => LINUX_PLATFORM,
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, PlatformKind::Windows)
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named locations in the platform path table.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PathKey {
    WorkstationDir,
    Chef,
    ChefClient,
    ChefClientStandalone,
    Knife,
    Berks,
    Kitchen,
    Inspec,
    InspecEmbedded,
    Sudo,
    Script,
    PrivateKey,
    KnifeConfig,
    BerksConfig,
}

impl PathKey {
    pub fn name(&self) -> &'static str {
        match self {
            PathKey::WorkstationDir => "workstation_dir",
            PathKey::Chef => "chef",
            PathKey::ChefClient => "chef_client",
            PathKey::ChefClientStandalone => "chef_client_standalone",
            PathKey::Knife => "knife",
            PathKey::Berks => "berks",
            PathKey::Kitchen => "kitchen",
            PathKey::Inspec => "inspec",
            PathKey::InspecEmbedded => "inspec_embedded",
            PathKey::Sudo => "sudo",
            PathKey::Script => "script",
            PathKey::PrivateKey => "private_key",
            PathKey::KnifeConfig => "knife_config",
            PathKey::BerksConfig => "berks_config",
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything about the agent platform that the tasks depend on.
///
/// Paths are a pure function of the platform kind and the task directory, so
/// a Windows profile can be resolved (and tested) on a Linux machine.
#[derive(Clone, Debug)]
pub struct PlatformProfile {
    kind: PlatformKind,
    is_elevated: bool,
    paths: HashMap<PathKey, PathBuf>,
    script_path: PathBuf,
}

impl PlatformProfile {
    /// Resolve the profile from an agent platform name.
    pub fn resolve(platform_name: &str, task_dir: &Path, is_elevated: bool) -> Result<Self> {
        let kind = PlatformKind::from_name(platform_name)?;
        let profile = Self::new(kind, task_dir, is_elevated);
        log::debug!(
            "Resolved {} profile (elevated: {}, script: {})",
            profile.kind,
            profile.is_elevated,
            profile.script_path().display()
        );
        Ok(profile)
    }

    pub fn new(kind: PlatformKind, task_dir: &Path, is_elevated: bool) -> Self {
        let script_path = join(
            kind,
            &task_dir.to_string_lossy(),
            &[constants::install_script_name(kind)],
        );
        let mut paths = path_table(kind);
        paths.insert(PathKey::Script, script_path.clone());

        Self {
            kind,
            is_elevated,
            paths,
            script_path,
        }
    }

    pub fn kind(&self) -> PlatformKind {
        self.kind
    }

    pub fn is_elevated(&self) -> bool {
        self.is_elevated
    }

    pub fn path(&self, key: PathKey) -> Option<&Path> {
        self.paths.get(&key).map(PathBuf::as_path)
    }

    /// Like [`path`](Self::path), for entries a command cannot do without.
    pub fn require(&self, key: PathKey) -> Result<&Path> {
        self.path(key).ok_or_else(|| {
            TaskError::PathNotFound(format!("no {key} location on {}", self.kind))
        })
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    /// Standalone InSpec first, then the copy bundled with Chef Workstation.
    pub fn inspec_path<F: FileSystem + ?Sized>(&self, fs: &F) -> Option<PathBuf> {
        self.first_existing(fs, &[PathKey::Inspec, PathKey::InspecEmbedded])
    }

    /// Standalone chef-client first, then the copy bundled with Chef Workstation.
    pub fn chef_client_path<F: FileSystem + ?Sized>(&self, fs: &F) -> Option<PathBuf> {
        self.first_existing(fs, &[PathKey::ChefClientStandalone, PathKey::ChefClient])
    }

    fn first_existing<F: FileSystem + ?Sized>(&self, fs: &F, keys: &[PathKey]) -> Option<PathBuf> {
        keys.iter()
            .filter_map(|key| self.path(*key))
            .find(|path| {
                let found = fs.exists(path);
                log::trace!("Probing {path:?}: {}", if found { "found" } else { "missing" });
                found
            })
            .map(Path::to_path_buf)
    }
}

/// Join path segments with the platform separator, trimming any trailing
/// separators from the base first.
fn join(kind: PlatformKind, base: &str, parts: &[&str]) -> PathBuf {
    let sep = constants::path_separator(kind);
    let mut joined = base.trim_end_matches(['/', '\\']).to_string();
    for part in parts {
        joined.push(sep);
        joined.push_str(part);
    }
    PathBuf::from(joined)
}

fn path_table(kind: PlatformKind) -> HashMap<PathKey, PathBuf> {
    let root = constants::root(kind);
    let tool = |name: &str| constants::with_tool_extension(kind, name);

    let (workstation, client_standalone, inspec, temp) = match kind {
        PlatformKind::Windows => (
            join(kind, root, &["opscode", "chef-workstation"]),
            join(kind, root, &["opscode", "chef", "bin", &tool("chef-client")]),
            join(kind, root, &["opscode", "inspec", "bin", &tool("inspec")]),
            join(kind, root, &["Windows", "Temp"]),
        ),
        PlatformKind::Linux => (
            join(kind, root, &["opt", "chef-workstation"]),
            join(kind, root, &["usr", "bin", "chef-client"]),
            join(kind, root, &["usr", "bin", "inspec"]),
            join(kind, root, &["tmp"]),
        ),
    };

    let ws = workstation.to_string_lossy().into_owned();
    let tmp = temp.to_string_lossy().into_owned();
    let ws_tool = |name: &str| join(kind, &ws, &["bin", &tool(name)]);

    let mut paths = HashMap::new();
    paths.insert(PathKey::Chef, ws_tool("chef"));
    paths.insert(PathKey::ChefClient, ws_tool("chef-client"));
    paths.insert(PathKey::Knife, ws_tool("knife"));
    paths.insert(PathKey::Berks, ws_tool("berks"));
    paths.insert(PathKey::Kitchen, ws_tool("kitchen"));
    paths.insert(PathKey::InspecEmbedded, ws_tool("inspec"));
    paths.insert(PathKey::WorkstationDir, workstation);
    paths.insert(PathKey::ChefClientStandalone, client_standalone);
    paths.insert(PathKey::Inspec, inspec);
    paths.insert(PathKey::PrivateKey, join(kind, &tmp, &["chef-tasks.pem"]));
    paths.insert(PathKey::KnifeConfig, join(kind, &tmp, &["knife.rb"]));
    paths.insert(PathKey::BerksConfig, join(kind, &tmp, &["berks.config.json"]));

    if kind == PlatformKind::Linux {
        paths.insert(PathKey::Sudo, join(kind, root, &["usr", "bin", "sudo"]));
    }

    paths
}
