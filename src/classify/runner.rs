use std::path::{Path, PathBuf};

use chrono::Utc;
use globset::GlobSet;
use tokio::fs;
use tracing::{debug, info, warn};

use super::directory::read_sorted_names;
use super::error::ClassifyError;
use super::mover::{MoveMethod, ensure_directory, move_path};
use super::types::{
    ClassificationReport, ClassificationResult, ClassifyOptions, Diagnostic, DirectoryPolicy, MoveFailure, OnError,
};
use crate::entry::FileEntry;
use crate::rules::{Rule, RuleMatcher};

#[derive(Debug, Clone, Copy)]
enum RunMode<'p> {
    Preview { output: Option<&'p Path> },
    Execute { output: &'p Path },
}

impl<'p> RunMode<'p> {
    fn output(self) -> Option<&'p Path> {
        match self {
            Self::Preview { output } => output,
            Self::Execute { output } => Some(output),
        }
    }
}

/// Runs classification passes over a single input folder
#[derive(Debug, Clone)]
pub struct Classifier {
    options: ClassifyOptions,
    exclude: GlobSet,
}

impl Classifier {
    pub fn new(options: ClassifyOptions) -> Result<Self, ClassifyError> {
        let exclude = options.build_exclude()?;
        Ok(Self { options, exclude })
    }

    /// Report where each file in `input` would go, without touching anything
    pub async fn preview(&self, input: &Path, rules: &[Rule]) -> Result<ClassificationReport, ClassifyError> {
        self.run(input, rules, RunMode::Preview { output: None }).await
    }

    /// Preview of what [`Classifier::organize`] would do with the same `output`.
    ///
    /// Entries that are (or contain) the output folder are left out, as they
    /// would be by the execute pass.
    pub async fn preview_organize(
        &self,
        input: &Path,
        output: &Path,
        rules: &[Rule],
    ) -> Result<ClassificationReport, ClassifyError> {
        self.run(input, rules, RunMode::Preview { output: Some(output) }).await
    }

    /// Move every matching file in `input` to `output/<destination>/<name>`
    pub async fn organize(
        &self,
        input: &Path,
        output: &Path,
        rules: &[Rule],
    ) -> Result<ClassificationReport, ClassifyError> {
        self.run(input, rules, RunMode::Execute { output }).await
    }

    async fn run(&self, input: &Path, rules: &[Rule], mode: RunMode<'_>) -> Result<ClassificationReport, ClassifyError> {
        let matcher = RuleMatcher::compile(rules, Utc::now());
        let names = read_sorted_names(input).await?;
        let mut report = ClassificationReport::default();

        // Entry paths are compared against the output folder in canonical form
        let resolved_input = fs::canonicalize(input).await.unwrap_or_else(|_| input.to_path_buf());
        let resolved_output = match mode.output() {
            Some(output) => resolve_output(output).await,
            None => None,
        };

        debug!(input = %input.display(), entries = names.len(), rules = matcher.len(), ?mode, "Starting pass");

        for os_name in names {
            let name = os_name.to_string_lossy().into_owned();
            let path = input.join(&os_name);

            if self.exclude.is_match(&name) {
                debug!(file = %name, "Excluded");
                report.excluded.push(name);
                continue;
            }

            if let Some(output) = &resolved_output {
                if output.starts_with(resolved_input.join(&os_name)) {
                    debug!(file = %name, "Skipping the output folder");
                    continue;
                }
            }

            let metadata = match fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(file = %name, error = %e, "Cannot read metadata, leaving file in place");
                    report.diagnostics.push(Diagnostic::unreadable(&name, &e));
                    continue;
                }
            };

            if metadata.is_dir() && self.options.directories == DirectoryPolicy::Skip {
                debug!(file = %name, "Skipping directory");
                continue;
            }

            let entry = FileEntry::from_metadata(&path, &metadata);
            let outcome = matcher.match_file(&entry);

            for skipped in &outcome.skipped {
                warn!(file = %name, rule = skipped.index + 1, error = %skipped.error, "Rule skipped");
                report.diagnostics.push(Diagnostic::invalid_rule(&name, skipped));
            }

            let Some(found) = outcome.matched else {
                debug!(file = %name, "No rule matched");
                report.unmatched.push(name);
                continue;
            };

            let destination = found.destination.display().to_string();
            debug!(file = %name, rule = found.index + 1, %destination, "Matched");

            if let RunMode::Execute { output } = mode {
                let target_dir = output.join(&found.destination);
                let target = target_dir.join(&os_name);

                let moved = match ensure_directory(&target_dir).await {
                    Ok(()) => move_path(&path, &target, entry.is_dir).await,
                    Err(e) => Err(e),
                };

                match moved {
                    Ok(method) => {
                        if method == MoveMethod::CopyAndDelete {
                            warn!(file = %name, "Moved across filesystems by copying");
                        }
                        info!(file = %name, target = %target.display(), "Moved");
                    }
                    Err(step) => match self.options.on_error {
                        OnError::Abort => {
                            if !report.diagnostics.is_empty() {
                                warn!(
                                    diagnostics = report.diagnostics.len(),
                                    "Aborting pass with unresolved diagnostics"
                                );
                            }
                            return Err(ClassifyError::Move {
                                file: name,
                                target,
                                operation: step.operation,
                                moved: report.results.len(),
                                diagnostics: report.diagnostics,
                                source: step.source,
                            });
                        }
                        OnError::Continue => {
                            warn!(file = %name, operation = step.operation, error = %step.source, "Move failed, continuing");
                            report.failures.push(MoveFailure {
                                file: name,
                                destination,
                                error: format!("{} failed: {}", step.operation, step.source),
                            });
                            continue;
                        }
                    },
                }
            }

            report.results.push(ClassificationResult { file: name, destination });
        }

        info!(
            matched = report.results.len(),
            unmatched = report.unmatched.len(),
            excluded = report.excluded.len(),
            diagnostics = report.diagnostics.len(),
            failures = report.failures.len(),
            "Pass complete"
        );

        Ok(report)
    }
}

/// Canonical form of `output`, or of its nearest existing ancestor with the
/// missing components appended. `None` when nothing along the path exists.
async fn resolve_output(output: &Path) -> Option<PathBuf> {
    let mut missing = Vec::new();
    let mut current = output;
    loop {
        if let Ok(resolved) = fs::canonicalize(current).await {
            return Some(missing.iter().rev().fold(resolved, |path, part| path.join(part)));
        }
        missing.push(current.file_name()?.to_os_string());
        current = current.parent()?;
        if current.as_os_str().is_empty() {
            current = Path::new(".");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleKind;
    use std::fs as std_fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const MB: u64 = 1024 * 1024;

    fn rule(kind: RuleKind, condition: &str, destination: &str) -> Rule {
        Rule {
            kind,
            condition: condition.to_string(),
            destination: destination.to_string(),
        }
    }

    fn sized_file(dir: &Path, name: &str, len: u64) -> anyhow::Result<PathBuf> {
        let path = dir.join(name);
        let file = std_fs::File::create(&path)?;
        file.set_len(len)?;
        Ok(path)
    }

    /// a.txt (1 KB), b.pdf (2 MB), c.jpg (50 MB)
    fn scenario() -> anyhow::Result<(TempDir, Vec<Rule>)> {
        let temp_dir = TempDir::new()?;
        std_fs::create_dir(temp_dir.path().join("in"))?;
        let input = temp_dir.path().join("in");
        sized_file(&input, "a.txt", 1024)?;
        sized_file(&input, "b.pdf", 2 * MB)?;
        sized_file(&input, "c.jpg", 50 * MB)?;

        let rules = vec![
            rule(RuleKind::Extension, ".pdf", "Documents"),
            rule(RuleKind::Size, "> 10", "Large"),
        ];
        Ok((temp_dir, rules))
    }

    fn pairs(report: &ClassificationReport) -> Vec<(&str, &str)> {
        report
            .results
            .iter()
            .map(|r| (r.file.as_str(), r.destination.as_str()))
            .collect()
    }

    #[tokio::test]
    async fn test_preview_scenario() -> anyhow::Result<()> {
        let (temp_dir, rules) = scenario()?;
        let input = temp_dir.path().join("in");

        let report = Classifier::new(ClassifyOptions::default())?.preview(&input, &rules).await?;

        assert_eq!(pairs(&report), vec![("b.pdf", "Documents"), ("c.jpg", "Large")]);
        assert_eq!(report.unmatched, vec!["a.txt"]);
        assert!(report.diagnostics.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_preview_leaves_filesystem_alone() -> anyhow::Result<()> {
        let (temp_dir, rules) = scenario()?;
        let input = temp_dir.path().join("in");

        Classifier::new(ClassifyOptions::default())?.preview(&input, &rules).await?;

        let mut names: Vec<_> = std_fs::read_dir(&input)?
            .map(|e| e.map(|e| e.file_name()))
            .collect::<Result<_, _>>()?;
        names.sort();
        assert_eq!(names, vec!["a.txt", "b.pdf", "c.jpg"]);
        assert_eq!(std_fs::read_dir(temp_dir.path())?.count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_execute_moves_what_preview_promised() -> anyhow::Result<()> {
        let (temp_dir, rules) = scenario()?;
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        let classifier = Classifier::new(ClassifyOptions::default())?;

        let preview = classifier.preview(&input, &rules).await?;
        let executed = classifier.organize(&input, &output, &rules).await?;

        assert_eq!(preview.results, executed.results);
        for result in &executed.results {
            assert!(output.join(&result.destination).join(&result.file).is_file());
            assert!(!input.join(&result.file).exists());
        }
        assert!(input.join("a.txt").is_file());
        assert_eq!(std_fs::metadata(output.join("Large").join("c.jpg"))?.len(), 50 * MB);
        Ok(())
    }

    #[tokio::test]
    async fn test_second_execute_moves_nothing() -> anyhow::Result<()> {
        let (temp_dir, rules) = scenario()?;
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        let classifier = Classifier::new(ClassifyOptions::default())?;

        classifier.organize(&input, &output, &rules).await?;
        let second = classifier.organize(&input, &output, &rules).await?;

        assert!(second.results.is_empty());
        assert_eq!(second.unmatched, vec!["a.txt"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_nested_destination_is_created() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let output = temp_dir.path().join("out");
        std_fs::write(temp_dir.path().join("photo.PNG"), "png")?;

        let rules = vec![rule(RuleKind::Extension, ".png", "Media/Images")];
        let report = Classifier::new(ClassifyOptions::default())?
            .organize(temp_dir.path(), &output, &rules)
            .await?;

        assert_eq!(pairs(&report), vec![("photo.PNG", "Media/Images")]);
        assert!(output.join("Media").join("Images").join("photo.PNG").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn test_directories_skipped_by_default() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().join("in");
        std_fs::create_dir_all(input.join("backup.old"))?;
        std_fs::write(input.join("notes.old"), "n")?;

        let rules = vec![rule(RuleKind::Extension, ".old", "Old")];
        let report = Classifier::new(ClassifyOptions::default())?.preview(&input, &rules).await?;

        assert_eq!(pairs(&report), vec![("notes.old", "Old")]);
        assert!(report.unmatched.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_directories_classified_when_enabled() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        std_fs::create_dir_all(input.join("backup.old"))?;
        std_fs::write(input.join("backup.old").join("inner.txt"), "i")?;

        let options = ClassifyOptions {
            directories: DirectoryPolicy::Classify,
            ..Default::default()
        };
        let rules = vec![rule(RuleKind::Extension, ".old", "Old")];
        let report = Classifier::new(options)?.organize(&input, &output, &rules).await?;

        assert_eq!(pairs(&report), vec![("backup.old", "Old")]);
        assert!(output.join("Old").join("backup.old").join("inner.txt").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn test_excluded_entries_are_untouched() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        std_fs::create_dir(&input)?;
        std_fs::write(input.join("scratch.tmp"), "t")?;
        std_fs::write(input.join("keep.tmp.txt"), "k")?;

        let options = ClassifyOptions {
            exclude: vec!["*.tmp".to_string()],
            ..Default::default()
        };
        let rules = vec![
            rule(RuleKind::Extension, ".tmp", "Temp"),
            rule(RuleKind::Extension, ".txt", "Text"),
        ];
        let report = Classifier::new(options)?.organize(&input, &output, &rules).await?;

        assert_eq!(report.excluded, vec!["scratch.tmp"]);
        assert_eq!(pairs(&report), vec![("keep.tmp.txt", "Text")]);
        assert!(input.join("scratch.tmp").is_file());
        Ok(())
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let options = ClassifyOptions {
            exclude: vec!["[unclosed".to_string()],
            ..Default::default()
        };
        let err = Classifier::new(options).expect_err("bad glob");
        assert!(matches!(err, ClassifyError::InvalidExclude { .. }));
    }

    #[tokio::test]
    async fn test_malformed_rule_reported_per_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        std_fs::write(temp_dir.path().join("a.pdf"), "a")?;
        std_fs::write(temp_dir.path().join("b.txt"), "b")?;

        let rules = vec![
            rule(RuleKind::Size, "about 10", "Large"),
            rule(RuleKind::Extension, ".pdf", "Documents"),
        ];
        let report = Classifier::new(ClassifyOptions::default())?
            .preview(temp_dir.path(), &rules)
            .await?;

        assert_eq!(pairs(&report), vec![("a.pdf", "Documents")]);
        assert_eq!(report.unmatched, vec!["b.txt"]);
        assert_eq!(report.diagnostics.len(), 2);
        assert!(report.diagnostics.iter().all(|d| d.rule == Some(1)));
        assert_eq!(report.diagnostics[0].file, "a.pdf");
        Ok(())
    }

    #[tokio::test]
    async fn test_abort_reports_file_and_moved_count() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        std_fs::create_dir_all(&output)?;
        std_fs::create_dir(&input)?;
        std_fs::write(input.join("a.jpg"), "a")?;
        std_fs::write(input.join("b.pdf"), "b")?;
        std_fs::write(input.join("c.jpg"), "c")?;
        // A plain file where the Documents folder should go
        std_fs::write(output.join("Documents"), "blocker")?;

        let rules = vec![
            rule(RuleKind::Size, "about 10", "Large"),
            rule(RuleKind::Extension, ".pdf", "Documents"),
            rule(RuleKind::Extension, ".jpg", "Images"),
        ];
        let err = Classifier::new(ClassifyOptions::default())?
            .organize(&input, &output, &rules)
            .await
            .expect_err("blocked destination");

        match err {
            ClassifyError::Move {
                file,
                moved,
                operation,
                diagnostics,
                ..
            } => {
                assert_eq!(file, "b.pdf");
                assert_eq!(moved, 1);
                assert_eq!(operation, "create directory");
                let files: Vec<_> = diagnostics.iter().map(|d| d.file.as_str()).collect();
                assert_eq!(files, vec!["a.jpg", "b.pdf"]);
                assert!(diagnostics.iter().all(|d| d.rule == Some(1)));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(output.join("Images").join("a.jpg").is_file());
        assert!(input.join("b.pdf").is_file());
        assert!(input.join("c.jpg").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn test_continue_records_failures() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        std_fs::create_dir_all(&output)?;
        std_fs::create_dir(&input)?;
        std_fs::write(input.join("a.jpg"), "a")?;
        std_fs::write(input.join("b.pdf"), "b")?;
        std_fs::write(input.join("c.jpg"), "c")?;
        std_fs::write(output.join("Documents"), "blocker")?;

        let options = ClassifyOptions {
            on_error: OnError::Continue,
            ..Default::default()
        };
        let rules = vec![
            rule(RuleKind::Extension, ".pdf", "Documents"),
            rule(RuleKind::Extension, ".jpg", "Images"),
        ];
        let report = Classifier::new(options)?.organize(&input, &output, &rules).await?;

        assert_eq!(pairs(&report), vec![("a.jpg", "Images"), ("c.jpg", "Images")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file, "b.pdf");
        assert_eq!(report.failures[0].destination, "Documents");
        assert!(input.join("b.pdf").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_input_folder() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let err = Classifier::new(ClassifyOptions::default())?
            .preview(&temp_dir.path().join("nope"), &[])
            .await
            .expect_err("missing input");
        assert!(matches!(err, ClassifyError::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_output_inside_input_is_left_alone() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().to_path_buf();
        let output = input.join("sorted.d");
        std_fs::create_dir(&output)?;
        std_fs::write(input.join("x.d"), "x")?;

        let options = ClassifyOptions {
            directories: DirectoryPolicy::Classify,
            ..Default::default()
        };
        let rules = vec![rule(RuleKind::Extension, ".d", "D")];
        let report = Classifier::new(options)?.organize(&input, &output, &rules).await?;

        assert_eq!(pairs(&report), vec![("x.d", "D")]);
        assert!(output.join("D").join("x.d").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn test_output_spelled_differently_is_still_recognised() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().to_path_buf();
        std_fs::create_dir(input.join("sorted.d"))?;
        std_fs::create_dir(input.join("nested"))?;
        std_fs::write(input.join("x.d"), "x")?;
        let output = input.join("nested").join("..").join("sorted.d");

        let options = ClassifyOptions {
            directories: DirectoryPolicy::Classify,
            ..Default::default()
        };
        let rules = vec![rule(RuleKind::Extension, ".d", "D")];
        let report = Classifier::new(options)?.organize(&input, &output, &rules).await?;

        assert_eq!(pairs(&report), vec![("x.d", "D")]);
        assert!(input.join("sorted.d").join("D").join("x.d").is_file());
        assert!(input.join("nested").is_dir());
        Ok(())
    }

    #[tokio::test]
    async fn test_folder_holding_the_output_is_left_alone() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().to_path_buf();
        let output = input.join("archive.d").join("sorted");
        std_fs::create_dir(input.join("archive.d"))?;
        std_fs::write(input.join("x.d"), "x")?;

        let options = ClassifyOptions {
            directories: DirectoryPolicy::Classify,
            ..Default::default()
        };
        let rules = vec![rule(RuleKind::Extension, ".d", "D")];
        let report = Classifier::new(options)?.organize(&input, &output, &rules).await?;

        assert_eq!(pairs(&report), vec![("x.d", "D")]);
        assert!(output.join("D").join("x.d").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn test_preview_with_output_matches_execute() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let input = temp_dir.path().to_path_buf();
        let output = input.join("sorted.d");
        std_fs::create_dir(&output)?;
        std_fs::write(input.join("x.d"), "x")?;

        let options = ClassifyOptions {
            directories: DirectoryPolicy::Classify,
            ..Default::default()
        };
        let classifier = Classifier::new(options)?;
        let rules = vec![rule(RuleKind::Extension, ".d", "D")];

        let preview = classifier.preview_organize(&input, &output, &rules).await?;
        let executed = classifier.organize(&input, &output, &rules).await?;

        assert_eq!(preview.results, executed.results);
        assert_eq!(pairs(&preview), vec![("x.d", "D")]);
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_entry_becomes_diagnostic() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        std::os::unix::fs::symlink(temp_dir.path().join("missing"), temp_dir.path().join("dangling.pdf"))?;
        std_fs::write(temp_dir.path().join("real.pdf"), "r")?;

        let rules = vec![rule(RuleKind::Extension, ".pdf", "Documents")];
        let report = Classifier::new(ClassifyOptions::default())?
            .preview(temp_dir.path(), &rules)
            .await?;

        assert_eq!(pairs(&report), vec![("real.pdf", "Documents")]);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].file, "dangling.pdf");
        assert_eq!(report.diagnostics[0].rule, None);
        Ok(())
    }
}
