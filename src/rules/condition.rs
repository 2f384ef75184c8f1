//! Condition parsing
//!
//! Turns the textual condition of a rule into a [`Predicate`]. The grammar is
//! deliberately small:
//!
//! ```text
//! extension  := "." <chars>            e.g. ".pdf"   (case-insensitive)
//! size       := ("<" | ">") " " <mb>   e.g. "> 10"   (decimal megabytes)
//! date       := ("<" | ">") " " <days> e.g. "< 7"    (whole days of age)
//! ```
//!
//! Comparisons are strict. Date conditions compare the file's *age*: `"< 7"`
//! selects files created less than seven days ago, `"> 30"` files older than
//! thirty days.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

use super::types::{RuleError, RuleKind};
use crate::entry::FileEntry;

/// Comparison operator accepted by size and date conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessThan,
    GreaterThan,
}

impl Comparison {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "<" => Some(Self::LessThan),
            ">" => Some(Self::GreaterThan),
            _ => None,
        }
    }

    pub fn holds<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            Self::LessThan => lhs < rhs,
            Self::GreaterThan => lhs > rhs,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::GreaterThan => ">",
        }
    }
}

/// Evaluable form of a rule condition
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Lowercased extension with its leading dot
    Extension { extension: String },
    Size { comparison: Comparison, megabytes: f64 },
    /// `now` is the instant ages are measured from
    Age {
        comparison: Comparison,
        days: u32,
        now: DateTime<Utc>,
    },
}

impl Predicate {
    pub fn parse(kind: RuleKind, condition: &str, now: DateTime<Utc>) -> Result<Self, RuleError> {
        let invalid = |reason: &'static str| RuleError::InvalidConditionFormat {
            kind,
            condition: condition.to_string(),
            reason,
        };

        match kind {
            RuleKind::Extension => {
                let extension = condition.trim();
                if extension.is_empty() {
                    return Err(invalid("extension is empty"));
                }
                if !extension.starts_with('.') {
                    return Err(invalid("extension must start with '.'"));
                }
                Ok(Self::Extension {
                    extension: extension.to_lowercase(),
                })
            }
            RuleKind::Size => {
                let (comparison, operand) = split_comparison(condition).map_err(invalid)?;
                let megabytes: f64 = operand
                    .parse()
                    .map_err(|_| invalid("size must be a number of megabytes"))?;
                if !megabytes.is_finite() || megabytes < 0.0 {
                    return Err(invalid("size must be a finite, non-negative number"));
                }
                Ok(Self::Size {
                    comparison,
                    megabytes,
                })
            }
            RuleKind::Date => {
                let (comparison, operand) = split_comparison(condition).map_err(invalid)?;
                let days: u32 = operand
                    .parse()
                    .map_err(|_| invalid("age must be a whole, non-negative number of days"))?;
                Ok(Self::Age {
                    comparison,
                    days,
                    now,
                })
            }
        }
    }

    pub fn matches(&self, file: &FileEntry) -> bool {
        match self {
            Self::Extension { extension } => file.extension().as_deref() == Some(extension.as_str()),
            Self::Size {
                comparison,
                megabytes,
            } => comparison.holds(file.size_megabytes(), *megabytes),
            Self::Age {
                comparison,
                days,
                now,
            } => {
                let age = *now - file.created_at;
                comparison.holds(age, TimeDelta::days(i64::from(*days)))
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extension { extension } => write!(f, "extension is {extension}"),
            Self::Size {
                comparison,
                megabytes,
            } => write!(f, "size {} {megabytes} MB", comparison.symbol()),
            Self::Age {
                comparison, days, ..
            } => write!(f, "age {} {days} days", comparison.symbol()),
        }
    }
}

/// Split `"<op> <operand>"` into its two whitespace-separated tokens
fn split_comparison(condition: &str) -> Result<(Comparison, &str), &'static str> {
    let mut tokens = condition.split_whitespace();
    let (Some(operator), Some(operand), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err("expected '<operator> <value>'");
    };
    let comparison = Comparison::parse(operator).ok_or("operator must be '<' or '>'")?;
    Ok((comparison, operand))
}
