//! Installation catalog wiring.
//!
//! This module wraps the installation document so provisioning code can load
//! an immutable snapshot and pick the image and startup script for a machine.
//! Types here mirror the document fields; callers use `Catalog` for lookups
//! and `CatalogWatch` to (re)load a catalog from disk.

pub mod loader;
pub mod lookup;
pub mod model;
pub mod role;

pub use loader::CatalogWatch;
pub use lookup::{Catalog, QueryParameters};
pub use model::{ContainerRuntime, InstallationRecord, Metadata, RecordList, VersionSpec};
pub use role::{MachineRole, roles_contained};
