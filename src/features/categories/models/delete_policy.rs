use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What happens to the children of a deleted category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Refuse to delete a category that still has children
    Restrict,
    /// Delete the category together with its whole subtree
    Cascade,
    /// Move the children to the deleted category's parent (or to root)
    #[default]
    Reparent,
}

impl DeletePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletePolicy::Restrict => "restrict",
            DeletePolicy::Cascade => "cascade",
            DeletePolicy::Reparent => "reparent",
        }
    }
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restrict" => Ok(DeletePolicy::Restrict),
            "cascade" => Ok(DeletePolicy::Cascade),
            "reparent" => Ok(DeletePolicy::Reparent),
            other => Err(format!(
                "unknown delete policy '{}', expected restrict, cascade or reparent",
                other
            )),
        }
    }
}
