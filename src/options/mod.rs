//! Quality-assessment options with TOML preset support.
//!
//! Options serialize to/from TOML so hosts can keep presets next to their
//! own view settings, and expose a JSON Schema for generated settings UIs.

mod labels;
mod themes;

use std::path::Path;

pub use labels::{LabelMarkup, LabelOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use themes::ThemeOptions;

use crate::error::QaError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[labels]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct QualityOptions {
    /// Metric selection for the color themes.
    pub themes: ThemeOptions,
    /// Hover label options.
    pub labels: LabelOptions,
    /// Build the metric index as soon as a model is loaded instead of on
    /// first use.
    #[schemars(title = "Auto Attach")]
    pub auto_attach: bool,
}

impl QualityOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(QualityOptions)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, QaError> {
        let content = std::fs::read_to_string(path)?;
        let options = toml::from_str(&content).map_err(|e| {
            log::error!("bad options file {}: {e}", path.display());
            QaError::OptionsParse(e.to_string())
        })?;
        log::info!("loaded quality options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), QaError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| QaError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        log::info!("saved quality options to {}", path.display());
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
