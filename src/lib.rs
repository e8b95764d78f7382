//! Installation catalog for machine provisioning.
//!
//! The crate exposes the catalog document types, the matcher that picks one
//! installation record for an OS, a set of roles and an exact version
//! combination, and a loader that re-reads the document on demand. Public
//! functions here form the contract that provisioning code and the
//! `installation-lookup` helper depend on.

use std::env;
use std::path::PathBuf;

pub mod catalog;
pub mod error;

pub use catalog::{
    Catalog, CatalogWatch, ContainerRuntime, InstallationRecord, MachineRole, Metadata,
    QueryParameters, RecordList, VersionSpec, roles_contained,
};
pub use error::{CatalogError, Result};

/// Environment variable naming the default catalog document.
pub const CATALOG_PATH_ENV: &str = "INSTALLATION_CATALOG_PATH";
/// Environment variable holding the `tracing` filter for the helper binary.
pub const LOG_FILTER_ENV: &str = "INSTALLATION_CATALOG_LOG";

/// Catalog location configured through `INSTALLATION_CATALOG_PATH`.
///
/// Empty or whitespace-only values count as unset. Existence is not checked
/// here; `CatalogWatch::new` does that.
pub fn default_catalog_path() -> Option<PathBuf> {
    env::var(CATALOG_PATH_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Split comma- or whitespace-delimited role lists into role tags.
pub fn parse_roles(value: &str) -> Vec<MachineRole> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(MachineRole::from_tag)
        .collect()
}
