use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Function a machine plays in the cluster.
///
/// Known variants keep serialization consistent; `Other` preserves forward
/// compatibility with catalogs that introduce new role tags.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum MachineRole {
    Master,
    Node,
    Other(String),
}

impl Serialize for MachineRole {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MachineRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&value))
    }
}

impl MachineRole {
    pub fn as_str(&self) -> &str {
        match self {
            MachineRole::Master => "Master",
            MachineRole::Node => "Node",
            MachineRole::Other(value) => value.as_str(),
        }
    }

    /// Map a tag to a role. Tags are case-sensitive, as in the document.
    pub fn from_tag(value: &str) -> Self {
        match value {
            "Master" => MachineRole::Master,
            "Node" => MachineRole::Node,
            other => MachineRole::Other(other.to_string()),
        }
    }
}

impl fmt::Display for MachineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true when every role in `required` appears in `offered`.
///
/// Stops at the first missing role. Extra entries in `offered` are fine.
pub fn roles_contained(required: &[MachineRole], offered: &[MachineRole]) -> bool {
    required.iter().all(|role| offered.contains(role))
}
