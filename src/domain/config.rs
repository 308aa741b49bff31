use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for an examination planning workspace.
///
/// This struct holds settings that control where the clause catalog comes
/// from and how unknown clauses are treated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Path to the clause catalog file.
    ///
    /// Relative paths are resolved against the `.exam` directory. When unset,
    /// `catalog.toml` in that directory is used. If the file does not exist,
    /// the built-in catalog applies.
    catalog: Option<PathBuf>,

    /// Whether selecting a clause that is not in the catalog is an error.
    ///
    /// When `false` (default), unknown clauses are reported as warnings and
    /// contribute nothing.
    pub strict_clauses: bool,
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the configured catalog path, if any.
    #[must_use]
    pub fn catalog(&self) -> Option<&Path> {
        self.catalog.as_deref()
    }

    /// Sets the catalog path.
    pub fn set_catalog(&mut self, path: Option<PathBuf>) {
        self.catalog = path;
    }

    /// Resolves the catalog path against the directory holding the config.
    #[must_use]
    pub fn catalog_path(&self, config_dir: &Path) -> PathBuf {
        self.catalog
            .as_deref()
            .map_or_else(|| config_dir.join(default_catalog()), |path| config_dir.join(path))
    }
}

fn default_catalog() -> &'static Path {
    Path::new("catalog.toml")
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        catalog: Option<PathBuf>,

        #[serde(default)]
        strict_clauses: bool,
    },
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                catalog,
                strict_clauses,
            } => Self {
                catalog,
                strict_clauses,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            catalog: config.catalog,
            strict_clauses: config.strict_clauses,
        }
    }
}
