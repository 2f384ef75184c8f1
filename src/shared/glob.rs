//! Glob pattern utilities
//!
//! Exclude patterns are matched against bare entry names, never full paths.

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::classify::ClassifyError;

/// Create a GlobSet from a list of patterns for efficient batch matching
pub fn build_globset(patterns: &[String]) -> Result<GlobSet, ClassifyError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ClassifyError::InvalidExclude {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }

    builder.build().map_err(|source| ClassifyError::InvalidExclude {
        pattern: patterns.join(", "),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_globset_matches_names() -> anyhow::Result<()> {
        let set = build_globset(&[".DS_Store".to_string(), "*.part".to_string()])?;
        assert!(set.is_match(".DS_Store"));
        assert!(set.is_match("movie.mkv.part"));
        assert!(!set.is_match("movie.mkv"));
        Ok(())
    }

    #[test]
    fn test_build_globset_empty() -> anyhow::Result<()> {
        let set = build_globset(&[])?;
        assert!(!set.is_match("anything"));
        Ok(())
    }

    #[test]
    fn test_build_globset_reports_bad_pattern() {
        let err = build_globset(&["ok".to_string(), "[bad".to_string()]).expect_err("unclosed class");
        match err {
            ClassifyError::InvalidExclude { pattern, .. } => assert_eq!(pattern, "[bad"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
