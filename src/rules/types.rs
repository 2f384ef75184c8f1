use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a rule's condition is tested against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// File extension, e.g. `.pdf`
    Extension,
    /// File size in megabytes, e.g. `> 10`
    Size,
    /// File age in days, e.g. `< 7`
    Date,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extension => "extension",
            Self::Size => "size",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RuleKind {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "extension" | "ext" => Ok(Self::Extension),
            "size" => Ok(Self::Size),
            "date" | "age" => Ok(Self::Date),
            _ => Err(RuleError::UnknownKind(s.to_string())),
        }
    }
}

/// A single classification rule: `(type, condition, destination)`
///
/// The serialized shape is the wire contract shared with rule files and any
/// front end: `{ "type": "size", "condition": "> 10", "destination": "Large" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub condition: String,
    pub destination: String,
}

impl Rule {
    /// Build a rule, rejecting destinations that could escape the output folder
    pub fn new(
        kind: RuleKind,
        condition: impl Into<String>,
        destination: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let rule = Self {
            kind,
            condition: condition.into(),
            destination: destination.into(),
        };
        rule.destination_path()?;
        Ok(rule)
    }

    /// Destination as a relative path below the output folder.
    ///
    /// Only normal components are allowed: no root, no drive prefix, no `.` or `..`.
    pub fn destination_path(&self) -> Result<PathBuf, RuleError> {
        let invalid = |reason: &'static str| RuleError::InvalidDestination {
            destination: self.destination.clone(),
            reason,
        };

        let trimmed = self.destination.trim();
        if trimmed.is_empty() {
            return Err(invalid("destination is empty"));
        }

        let mut path = PathBuf::new();
        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::ParentDir => return Err(invalid("destination may not contain '..'")),
                Component::CurDir => return Err(invalid("destination may not contain '.'")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("destination must be a relative folder name"));
                }
            }
        }

        Ok(path)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' -> {}", self.kind, self.condition, self.destination)
    }
}

/// Errors raised while turning a rule into something that can be evaluated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("invalid {kind} condition '{condition}': {reason}")]
    InvalidConditionFormat {
        kind: RuleKind,
        condition: String,
        reason: &'static str,
    },
    #[error("invalid destination '{destination}': {reason}")]
    InvalidDestination {
        destination: String,
        reason: &'static str,
    },
    #[error("unknown rule type '{0}' (expected extension, size or date)")]
    UnknownKind(String),
    #[error("invalid rule spec '{spec}': expected TYPE:CONDITION:DESTINATION")]
    InvalidSpec { spec: String },
}
