use std::path::Path;
use figment::providers::{Format, Toml, Json, Yaml};

/// Smart configuration file loader that chooses the right format based on file extension
/// Returns a provider that can be directly used with figment.merge()
pub fn auto<P: AsRef<Path>>(path: P) -> impl figment::Provider {
    let path = path.as_ref();
    let extension = path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    match extension.to_lowercase().as_str() {
        "toml" => SmartProvider::Toml(Toml::file(path)),
        "json" => SmartProvider::Json(Json::file(path)),
        "yaml" | "yml" => SmartProvider::Yaml(Yaml::file(path)),
        _ => {
            // Unknown extension (e.g. a bare `.filesorterrc`): sniff the content
            let format = std::fs::read_to_string(path)
                .ok()
                .and_then(|content| detect_format_from_content(&content));

            match format {
                Some(Detected::Json) => SmartProvider::Json(Json::file(path)),
                Some(Detected::Yaml) => SmartProvider::Yaml(Yaml::file(path)),
                Some(Detected::Toml) => SmartProvider::Toml(Toml::file(path)),
                None => {
                    tracing::debug!(path = %path.display(), "Could not detect config format, assuming TOML");
                    SmartProvider::Toml(Toml::file(path))
                }
            }
        }
    }
}

/// Wrapper enum to handle different provider types
enum SmartProvider {
    Toml(figment::providers::Data<Toml>),
    Json(figment::providers::Data<Json>),
    Yaml(figment::providers::Data<Yaml>),
}

impl figment::Provider for SmartProvider {
    fn metadata(&self) -> figment::Metadata {
        match self {
            SmartProvider::Toml(p) => p.metadata(),
            SmartProvider::Json(p) => p.metadata(),
            SmartProvider::Yaml(p) => p.metadata(),
        }
    }

    fn data(&self) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, figment::Error> {
        match self {
            SmartProvider::Toml(p) => p.data(),
            SmartProvider::Json(p) => p.data(),
            SmartProvider::Yaml(p) => p.data(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Detected {
    Toml,
    Json,
    Yaml,
}

/// Attempt to detect configuration format from file content
fn detect_format_from_content(content: &str) -> Option<Detected> {
    let trimmed = content.trim();

    // JSON detection - starts with { or [
    if (trimmed.starts_with('{') && trimmed.ends_with('}')) ||
       (trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return Some(Detected::Json);
    }

    // TOML detection - [section] / [[array]] headers or key = value
    if trimmed.lines().any(|line| {
        let line = line.trim();
        (line.starts_with('[') && line.ends_with(']')) ||
        (line.contains('=') && !line.contains(':'))
    }) {
        return Some(Detected::Toml);
    }

    // YAML detection - document separator or key: value
    if trimmed.contains("---") || trimmed.lines().any(|line| line.trim().contains(':')) {
        return Some(Detected::Yaml);
    }

    None
}
