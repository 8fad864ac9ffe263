//! Configuration file support for dexaudit.
//!
//! Loads optional `.dexaudit/config.toml` from the working directory.
//! Command-line flags override anything set here.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::annotations::{AnnotationFormat, OrderKeying};
use crate::error::{AuditError, Result};

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub moves: MovesConfig,
    pub annotations: AnnotationsConfig,
}

/// Inputs of the move check
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MovesConfig {
    /// Document declaring `<move name="...">` entries.
    pub moves: PathBuf,
    /// Document listing species and their movesets.
    pub species: PathBuf,
}

impl Default for MovesConfig {
    fn default() -> Self {
        Self {
            moves: PathBuf::from("moves.xml"),
            species: PathBuf::from("species.xml"),
        }
    }
}

/// Inputs of the annotation scan
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnnotationsConfig {
    pub resource_dir: PathBuf,
    /// File name suffixes to scan, without the dot.
    pub extensions: Vec<String>,
    /// Format used when `--format` is not given.
    pub format: String,
    /// Extra formats, e.g.
    /// `{ name = "hazard", pattern = '@hazard (\S+), (\d+), (.*)', key_fields = 1 }`
    pub formats: Vec<FormatConfig>,
}

impl Default for AnnotationsConfig {
    fn default() -> Self {
        Self {
            resource_dir: PathBuf::from("../resources"),
            extensions: vec!["js".to_string(), "xml".to_string()],
            format: crate::annotations::format::POSITIONED.to_string(),
            formats: Vec::new(),
        }
    }
}

/// A user-declared annotation format.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatConfig {
    pub name: String,
    pub pattern: String,
    pub key_fields: usize,
    #[serde(default)]
    pub order: OrderKeying,
    #[serde(default)]
    pub separate_groups: bool,
}

impl AnnotationsConfig {
    /// Look up a format by name. Configured formats shadow built-ins.
    pub fn resolve_format(&self, name: &str) -> Result<AnnotationFormat> {
        if let Some(custom) = self.formats.iter().find(|f| f.name == name) {
            return AnnotationFormat::new(
                custom.name.clone(),
                &custom.pattern,
                custom.key_fields,
                custom.order,
            )
            .map(|f| f.with_group_separator(custom.separate_groups));
        }
        AnnotationFormat::builtin(name).ok_or_else(|| AuditError::UnknownFormat(name.to_string()))
    }
}

impl AuditConfig {
    /// Load config from `.dexaudit/config.toml` in the given root directory.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(".dexaudit").join("config.toml");
        Self::load_from_path(&config_path)
    }

    /// Load config from a specific path.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
