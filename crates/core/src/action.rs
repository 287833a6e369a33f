//! Requested action and resource kind.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// What to do with the prefix filters named in the CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Remove site bindings only.
    DeleteBinding,
    /// Remove site bindings, then the prefix filter objects.
    DeletePrefix,
}

impl Action {
    pub const ALLOWED: [&'static str; 2] = ["delete_prefix", "delete_binding"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::DeleteBinding => "delete_binding",
            Action::DeletePrefix => "delete_prefix",
        }
    }

    /// Validate an optional action argument.
    pub fn parse_required(value: Option<&str>) -> Result<Self> {
        value.ok_or(Error::MissingAction)?.parse()
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "delete_binding" => Ok(Action::DeleteBinding),
            "delete_prefix" => Ok(Action::DeletePrefix),
            other => Err(Error::InvalidAction(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy family a local prefix belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resource {
    #[default]
    Security,
    Path,
    Qos,
    Nat,
}

impl Resource {
    pub const ALLOWED: [&'static str; 4] = ["security", "path", "qos", "nat"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Security => "security",
            Resource::Path => "path",
            Resource::Qos => "qos",
            Resource::Nat => "nat",
        }
    }

    /// Only security local prefixes can be reconciled.
    pub fn ensure_supported(self) -> Result<Self> {
        match self {
            Resource::Security => Ok(self),
            other => Err(Error::UnsupportedResource(other.as_str().to_string())),
        }
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "security" => Ok(Resource::Security),
            "path" => Ok(Resource::Path),
            "qos" => Ok(Resource::Qos),
            "nat" => Ok(Resource::Nat),
            other => Err(Error::InvalidResource(other.to_string())),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
