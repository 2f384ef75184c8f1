use std::fmt;

use globset::GlobSet;
use serde::{Deserialize, Serialize};

use super::error::ClassifyError;
use crate::rules::SkippedRule;
use crate::shared::glob::build_globset;

/// Treatment of folders found directly inside the input folder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryPolicy {
    /// Leave folders where they are
    #[default]
    Skip,
    /// Run the rules against folders like any other entry
    Classify,
}

/// Behaviour of an execute pass when a move fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Stop at the first failure; earlier moves are kept
    #[default]
    Abort,
    /// Record the failure and move on to the next file
    Continue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifyOptions {
    pub directories: DirectoryPolicy,
    pub on_error: OnError,
    /// Glob patterns matched against entry names
    pub exclude: Vec<String>,
}

impl ClassifyOptions {
    pub fn build_exclude(&self) -> Result<GlobSet, ClassifyError> {
        build_globset(&self.exclude)
    }
}

/// One file and the folder it is (or would be) moved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub file: String,
    /// Folder relative to the output folder
    pub destination: String,
}

/// Non-fatal problem met while classifying a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    /// 1-based position of the offending rule, when a rule is at fault
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<usize>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            Some(rule) => write!(f, "{}: rule {}: {}", self.file, rule, self.message),
            None => write!(f, "{}: {}", self.file, self.message),
        }
    }
}

impl Diagnostic {
    pub(crate) fn invalid_rule(file: &str, skipped: &SkippedRule) -> Self {
        Self {
            file: file.to_string(),
            rule: Some(skipped.index + 1),
            message: skipped.error.to_string(),
        }
    }

    pub(crate) fn unreadable(file: &str, error: &std::io::Error) -> Self {
        Self {
            file: file.to_string(),
            rule: None,
            message: format!("cannot read file metadata: {error}"),
        }
    }
}

/// A move that failed while running with [`OnError::Continue`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveFailure {
    pub file: String,
    pub destination: String,
    pub error: String,
}

/// Outcome of a preview or execute pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationReport {
    /// Matched files in name order; moved files for an execute pass
    pub results: Vec<ClassificationResult>,
    /// Files no rule matched; they stay where they are
    pub unmatched: Vec<String>,
    /// Entries skipped because they match an exclude pattern
    pub excluded: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub failures: Vec<MoveFailure>,
}

impl ClassificationReport {
    /// Destination recorded for `file`, if it matched
    pub fn destination_of(&self, file: &str) -> Option<&str> {
        self.results
            .iter()
            .find(|result| result.file == file)
            .map(|result| result.destination.as_str())
    }
}
