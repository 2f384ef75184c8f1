//! Classification passes over an input folder
//!
//! A pass lists the entries directly inside the input folder in name order,
//! reads their metadata and resolves each against the rule list. A preview
//! pass only reports; an execute pass also moves every match into
//! `output/<destination>/<name>`. Both share the same pass routine, so an
//! execute on an unchanged folder moves exactly what the preview reported.

mod directory;
mod error;
mod mover;
mod runner;
mod types;

pub use directory::list_directory;
pub use error::ClassifyError;
pub use runner::Classifier;
pub use types::{
    ClassificationReport, ClassificationResult, ClassifyOptions, Diagnostic, DirectoryPolicy, MoveFailure, OnError,
};

use std::path::Path;

use crate::rules::Rule;

/// Preview pass with default options
pub async fn preview_classification(
    input: impl AsRef<Path>,
    rules: &[Rule],
) -> Result<ClassificationReport, ClassifyError> {
    Classifier::new(ClassifyOptions::default())?
        .preview(input.as_ref(), rules)
        .await
}

/// Execute pass with default options
pub async fn execute_organization(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    rules: &[Rule],
) -> Result<ClassificationReport, ClassifyError> {
    Classifier::new(ClassifyOptions::default())?
        .organize(input.as_ref(), output.as_ref(), rules)
        .await
}
