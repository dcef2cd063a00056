use serde::{Deserialize, Serialize};
use std::fs;

use crate::paths;

/// Root configuration structure for pyrename.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PyrenameConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via pyrename.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Base word list, one word per line. `~` is expanded.
    #[serde(default = "default_words_path")]
    pub words_path: String,

    /// Keywords that introduce a renameable definition (`def name`).
    #[serde(default = "default_definition_keywords")]
    pub definition_keywords: Vec<String>,

    /// Glob patterns (relative to the project root) of files to scan.
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Directory names skipped at any depth.
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// Upper bound on validate/scan/apply passes for a single file.
    #[serde(default = "default_max_passes_per_file")]
    pub max_passes_per_file: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            words_path: default_words_path(),
            definition_keywords: default_definition_keywords(),
            include: default_include(),
            skip_dirs: default_skip_dirs(),
            max_passes_per_file: default_max_passes_per_file(),
        }
    }
}

fn default_words_path() -> String {
    "words".to_string()
}

fn default_definition_keywords() -> Vec<String> {
    vec!["def".to_string()]
}

fn default_include() -> Vec<String> {
    vec!["**/*.py".to_string()]
}

fn default_skip_dirs() -> Vec<String> {
    [
        ".git",
        ".hg",
        ".svn",
        "node_modules",
        "__pycache__",
        ".venv",
        "venv",
        ".tox",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_passes_per_file() -> usize {
    crate::refactor::DEFAULT_MAX_PASSES_PER_FILE
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If pyrename.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full pyrename.json config, falling back to defaults on any error.
pub fn load_config() -> PyrenameConfig {
    load_config_from_file().unwrap_or_default()
}

/// Attempt to load config from pyrename.json file.
fn load_config_from_file() -> crate::Result<PyrenameConfig> {
    let path = paths::pyrename_json()?;
    if !path.exists() {
        return Ok(PyrenameConfig::default());
    }

    let content = fs::read_to_string(&path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    parse_config(&content)
}

fn parse_config(content: &str) -> crate::Result<PyrenameConfig> {
    serde_json::from_str(content).map_err(|e| {
        crate::Error::internal_json(e.to_string(), Some("parse pyrename.json".to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_builtin_values() {
        let config = parse_config(r#"{"defaults": {"definition_keywords": ["def", "class"]}}"#)
            .unwrap();

        assert_eq!(config.defaults.definition_keywords, vec!["def", "class"]);
        assert_eq!(config.defaults.words_path, "words");
        assert_eq!(config.defaults.include, vec!["**/*.py"]);
        assert_eq!(config.defaults.max_passes_per_file, 10_000);
    }

    #[test]
    fn empty_object_is_builtin_defaults() {
        let config = parse_config("{}").unwrap();
        assert!(config.defaults.skip_dirs.contains(&"__pycache__".to_string()));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = parse_config("{ nope").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.json_error");
    }
}
