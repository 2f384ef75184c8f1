//! # filesorter - rule-based folder organizer
//!
//! Sorts the files directly inside a folder into destination subfolders using
//! an ordered list of rules. Each rule tests one property of a file:
//!
//! - **extension**: `.pdf`, matched case-insensitively
//! - **size**: `"> 10"`, in megabytes
//! - **date**: `"< 7"`, the file's age in days
//!
//! The first rule that holds decides where a file goes. A preview pass reports
//! the mapping without touching anything; an execute pass performs the moves.
//!
//! ## Quick Start
//!
//! ```bash
//! filesorter rules init
//! filesorter preview ~/Downloads --rules filesorter-rules.toml
//! filesorter organize ~/Downloads ~/Sorted --rules filesorter-rules.toml
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod entry;
pub mod rules;
pub mod shared;

pub use classify::{ClassificationReport, ClassificationResult, Classifier, ClassifyError, list_directory};
pub use cli::{Cli, Output};
pub use config::SorterConfig;
pub use entry::FileEntry;
pub use rules::{Rule, RuleError, RuleKind, match_rule};

/// Result type alias for filesorter operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
