//! Error kinds surfaced by the catalog.
//!
//! Every failure is returned to the immediate caller; nothing here is logged
//! or retried.

use crate::catalog::QueryParameters;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// The configured location is missing or could not be read.
    #[error("installation catalog {} is not accessible: {source}", .path.display())]
    Location {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document does not have the expected record-list shape.
    #[error("installation catalog parse error: {0}")]
    Parse(#[source] serde_yaml_ng::Error),

    /// No record satisfied the OS, role and version predicates.
    #[error("could not find a matching installation config for params {0}")]
    NoMatch(QueryParameters),

    #[error("installation catalog serialization error: {0}")]
    Serialize(#[source] serde_yaml_ng::Error),
}

impl CatalogError {
    /// True for the recoverable "nothing matched" outcome.
    pub fn is_no_match(&self) -> bool {
        matches!(self, CatalogError::NoMatch(_))
    }

    /// The query that failed to match, when this is a `NoMatch`.
    pub fn query(&self) -> Option<&QueryParameters> {
        match self {
            CatalogError::NoMatch(params) => Some(params),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
