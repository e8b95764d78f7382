//! Parsed installation catalog and the record matcher.
//!
//! A `Catalog` is built once from document bytes and never mutated, so it can
//! be shared across threads freely. Lookups scan records in document order
//! and return the first record whose OS, roles and version all match.

use crate::catalog::model::{InstallationRecord, Metadata, RecordList, VersionSpec};
use crate::catalog::role::{MachineRole, roles_contained};
use crate::error::{CatalogError, Result};
use std::fmt;
use tracing::{debug, trace};

/// Selection criteria supplied by the provisioning side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParameters {
    pub os: String,
    /// Roles the record must support. The record may support more.
    pub roles: Vec<MachineRole>,
    /// Compared for exact equality against each of a record's versions.
    pub version: VersionSpec,
}

impl QueryParameters {
    pub fn new(os: impl Into<String>, roles: Vec<MachineRole>, version: VersionSpec) -> Self {
        Self {
            os: os.into(),
            roles,
            version,
        }
    }
}

impl fmt::Display for QueryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roles = self
            .roles
            .iter()
            .map(MachineRole::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "{{os: {:?}, roles: [{}], version: {}}}",
            self.os, roles, self.version
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Immutable, ordered set of installation records.
pub struct Catalog {
    records: RecordList,
}

impl Catalog {
    /// Wrap already-built records, keeping their order.
    pub fn from_records(items: Vec<InstallationRecord>) -> Self {
        Self {
            records: RecordList { items },
        }
    }

    /// Parse a catalog document. Malformed input never yields a catalog.
    pub fn from_yaml_slice(bytes: &[u8]) -> Result<Self> {
        let records: RecordList = serde_yaml_ng::from_slice(bytes).map_err(CatalogError::Parse)?;
        debug!(
            bytes = bytes.len(),
            records = records.items.len(),
            "parsed installation catalog"
        );
        Ok(Self { records })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Self::from_yaml_slice(text.as_bytes())
    }

    /// Render the catalog back into the document shape it was read from.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(&self.records).map_err(CatalogError::Serialize)
    }

    /// Image reference of the first matching record.
    pub fn image(&self, params: &QueryParameters) -> Result<&str> {
        self.find(params).map(|record| record.image.as_str())
    }

    /// Metadata of the first matching record.
    pub fn metadata(&self, params: &QueryParameters) -> Result<&Metadata> {
        self.find(params).map(|record| &record.metadata)
    }

    /// Resolve the first record matching OS, roles and exact version.
    ///
    /// Returns `CatalogError::NoMatch` carrying `params` when nothing matches.
    pub fn find(&self, params: &QueryParameters) -> Result<&InstallationRecord> {
        for (index, record) in self.records.items.iter().enumerate() {
            if record.os != params.os {
                trace!(index, os = %record.os, "skipping record: os differs");
                continue;
            }
            if !roles_contained(&params.roles, &record.roles) {
                trace!(index, "skipping record: required role missing");
                continue;
            }
            if !record.supports_version(&params.version) {
                trace!(index, "skipping record: no exact version match");
                continue;
            }
            debug!(index, os = %record.os, image = %record.image, "matched installation record");
            return Ok(record);
        }
        Err(CatalogError::NoMatch(params.clone()))
    }

    /// Records in document order.
    pub fn records(&self) -> impl Iterator<Item = &InstallationRecord> {
        self.records.items.iter()
    }

    pub fn record(&self, index: usize) -> Option<&InstallationRecord> {
        self.records.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::ContainerRuntime;

    fn docker() -> ContainerRuntime {
        ContainerRuntime::new("docker", "1.12.0")
    }

    fn record(
        roles: Vec<MachineRole>,
        versions: Vec<VersionSpec>,
        script: &str,
    ) -> InstallationRecord {
        InstallationRecord {
            os: "ubuntu-1710".to_string(),
            roles,
            versions,
            image: "projects/ubuntu-os-cloud/global/images/family/ubuntu-1710".to_string(),
            metadata: Metadata {
                startup_script: script.to_string(),
            },
        }
    }

    fn master_and_node() -> (InstallationRecord, InstallationRecord) {
        let master = record(
            vec![MachineRole::Master],
            vec![
                VersionSpec::new("1.9.3", "1.9.3", docker()),
                VersionSpec::new("1.9.4", "1.9.4", docker()),
            ],
            "Master startup script",
        );
        let node = record(
            vec![MachineRole::Node],
            vec![
                VersionSpec::worker("1.9.3", docker()),
                VersionSpec::worker("1.9.4", docker()),
            ],
            "Node startup script",
        );
        (master, node)
    }

    #[test]
    fn find_selects_record_by_role_and_version() {
        let (master, node) = master_and_node();
        let catalog = Catalog::from_records(vec![master.clone(), node.clone()]);

        let master_query = QueryParameters::new(
            "ubuntu-1710",
            vec![MachineRole::Master],
            VersionSpec::new("1.9.4", "1.9.4", docker()),
        );
        assert_eq!(catalog.find(&master_query).unwrap(), &master);

        let node_query = QueryParameters::new(
            "ubuntu-1710",
            vec![MachineRole::Node],
            VersionSpec::worker("1.9.4", docker()),
        );
        assert_eq!(catalog.find(&node_query).unwrap(), &node);
    }

    #[test]
    fn unknown_runtime_version_is_no_match() {
        let (master, node) = master_and_node();
        let catalog = Catalog::from_records(vec![master, node]);
        let params = QueryParameters::new(
            "ubuntu-1710",
            vec![MachineRole::Node],
            VersionSpec::new("1.9.4", "1.9.4", ContainerRuntime::new("docker", "1.13.0")),
        );

        let err = catalog.find(&params).unwrap_err();
        assert!(err.is_no_match());
        assert_eq!(err.query(), Some(&params));
        let message = err.to_string();
        assert!(message.contains("ubuntu-1710"));
        assert!(message.contains("1.13.0"));
        assert!(message.contains("Node"));
    }

    #[test]
    fn os_mismatch_skips_record() {
        let (master, _) = master_and_node();
        let catalog = Catalog::from_records(vec![master]);
        let params = QueryParameters::new(
            "cos-stable",
            vec![MachineRole::Master],
            VersionSpec::new("1.9.4", "1.9.4", docker()),
        );
        assert!(catalog.image(&params).unwrap_err().is_no_match());
    }

    #[test]
    fn worker_version_does_not_match_control_plane_entry() {
        let (master, _) = master_and_node();
        let catalog = Catalog::from_records(vec![master]);
        let params = QueryParameters::new(
            "ubuntu-1710",
            vec![MachineRole::Master],
            VersionSpec::worker("1.9.4", docker()),
        );
        assert!(catalog.find(&params).is_err());
    }

    #[test]
    fn first_matching_record_wins() {
        let (master, _) = master_and_node();
        let mut second = master.clone();
        second.image = "second-image".to_string();
        let catalog = Catalog::from_records(vec![master, second]);
        let params = QueryParameters::new(
            "ubuntu-1710",
            vec![MachineRole::Master],
            VersionSpec::new("1.9.3", "1.9.3", docker()),
        );
        assert_eq!(
            catalog.image(&params).unwrap(),
            "projects/ubuntu-os-cloud/global/images/family/ubuntu-1710"
        );
    }

    #[test]
    fn empty_catalog_never_matches() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.find(&QueryParameters::default()).is_err());
    }

    #[test]
    fn catalog_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalog>();
    }

    #[test]
    fn to_yaml_renders_every_record() {
        let (master, node) = master_and_node();
        let catalog = Catalog::from_records(vec![master, node]);
        let yaml = catalog.to_yaml().unwrap();
        assert!(yaml.contains("startupScript: Master startup script"));
        assert!(yaml.contains("startupScript: Node startup script"));

        let reparsed = Catalog::from_yaml_str(&yaml).unwrap();
        assert_eq!(reparsed, catalog);
    }
}
