//! Deserializable representation of an installation catalog document.
//!
//! The types mirror the document fields (`items`, `os`, `roles`, `versions`,
//! `image`, `metadata`). Use `Catalog` for matching; use these structs when
//! the full record surface is required.

use crate::catalog::role::MachineRole;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Top-level document: the ordered record list.
pub struct RecordList {
    pub items: Vec<InstallationRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// One installable OS + role + version combination.
pub struct InstallationRecord {
    pub os: String,
    pub roles: Vec<MachineRole>,
    pub versions: Vec<VersionSpec>,
    /// Either a full project path to an image or family, or a bare image
    /// name. Not interpreted here.
    pub image: String,
    pub metadata: Metadata,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Deployment-time metadata attached to a record.
pub struct Metadata {
    #[serde(default)]
    pub startup_script: String,
}

/// Exact version combination a record supports.
///
/// Equality is field-wise; an empty `control_plane` only equals another empty
/// `control_plane`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSpec {
    pub kubelet: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub control_plane: String,
    pub container_runtime: ContainerRuntime,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerRuntime {
    pub name: String,
    pub version: String,
}

impl ContainerRuntime {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl VersionSpec {
    pub fn new(
        kubelet: impl Into<String>,
        control_plane: impl Into<String>,
        container_runtime: ContainerRuntime,
    ) -> Self {
        Self {
            kubelet: kubelet.into(),
            control_plane: control_plane.into(),
            container_runtime,
        }
    }

    /// Version combination for machines that run no control plane.
    pub fn worker(kubelet: impl Into<String>, container_runtime: ContainerRuntime) -> Self {
        Self::new(kubelet, String::new(), container_runtime)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{kubelet: {:?}, controlPlane: {:?}, containerRuntime: {{name: {:?}, version: {:?}}}}}",
            self.kubelet,
            self.control_plane,
            self.container_runtime.name,
            self.container_runtime.version
        )
    }
}

impl InstallationRecord {
    /// True when at least one version entry equals `version` exactly.
    pub fn supports_version(&self, version: &VersionSpec) -> bool {
        self.versions.iter().any(|candidate| candidate == version)
    }
}
