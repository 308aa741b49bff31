//! A filesystem workspace holding the planner's settings.
//!
//! The [`Workspace`] resolves the `.exam` directory under a root, reads its
//! configuration and decides which clause catalog applies.

use std::{
    fmt, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, instrument};

use crate::{
    domain::{ClauseCatalog, Config, RequirementEngine},
    storage::catalog_file::{builtin_catalog, load_catalog, CatalogFileError, BUILTIN_CATALOG},
};

/// Name of the directory holding configuration under a workspace root.
const CONFIG_DIR: &str = ".exam";
const CONFIG_FILE: &str = "config.toml";

/// Where a workspace's clause catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A catalog file on disk.
    File(PathBuf),
    /// The catalog compiled into the crate.
    Builtin,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Builtin => f.write_str("built-in"),
        }
    }
}

/// Errors that can occur when opening or initialising a workspace.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// `init` found an existing configuration directory.
    #[error("workspace already initialized (found existing {})", .0.display())]
    AlreadyInitialized(PathBuf),
    /// A file or directory could not be read or written.
    #[error("failed to access {}", path.display())]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The configuration file is invalid.
    #[error("{0}")]
    Config(String),
}

/// A directory whose `.exam` subdirectory configures the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

impl Workspace {
    /// Opens the workspace at `root`.
    ///
    /// A root without a configuration file gets the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or parsed.
    pub fn new(root: PathBuf) -> Result<Self, WorkspaceError> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);
        let config = if config_path.exists() {
            Config::load(&config_path).map_err(WorkspaceError::Config)?
        } else {
            debug!(path = %config_path.display(), "no config file, using defaults");
            Config::default()
        };
        Ok(Self { root, config })
    }

    /// Creates the configuration directory under `root` with a default
    /// configuration and a copy of the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already exists or any file cannot be
    /// written.
    #[instrument(level = "debug")]
    pub fn init(root: PathBuf) -> Result<Self, WorkspaceError> {
        let config_dir = root.join(CONFIG_DIR);
        if config_dir.exists() {
            return Err(WorkspaceError::AlreadyInitialized(config_dir));
        }

        std::fs::create_dir_all(&config_dir).map_err(|source| WorkspaceError::Io {
            path: config_dir.clone(),
            source,
        })?;

        let config = Config::default();
        config
            .save(&config_dir.join(CONFIG_FILE))
            .map_err(WorkspaceError::Config)?;

        let catalog_path = config.catalog_path(&config_dir);
        std::fs::write(&catalog_path, BUILTIN_CATALOG).map_err(|source| WorkspaceError::Io {
            path: catalog_path,
            source,
        })?;

        Ok(Self { root, config })
    }

    /// The workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory holding the configuration.
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR)
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Decides which catalog applies.
    ///
    /// An explicitly configured catalog is always used. Otherwise the default
    /// catalog file is used if it exists, and the built-in catalog if not.
    #[must_use]
    pub fn catalog_source(&self) -> CatalogSource {
        let path = self.config.catalog_path(&self.config_dir());
        if self.config.catalog().is_some() || path.exists() {
            CatalogSource::File(path)
        } else {
            CatalogSource::Builtin
        }
    }

    /// Loads the catalog that applies to this workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be read or is invalid.
    pub fn load_catalog(&self) -> Result<ClauseCatalog, CatalogFileError> {
        match self.catalog_source() {
            CatalogSource::File(path) => {
                debug!(path = %path.display(), "loading catalog file");
                load_catalog(&path)
            }
            CatalogSource::Builtin => {
                debug!("using built-in catalog");
                Ok(builtin_catalog())
            }
        }
    }

    /// Builds a requirement engine over this workspace's catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn engine(&self) -> Result<RequirementEngine, CatalogFileError> {
        Ok(RequirementEngine::new(Arc::new(self.load_catalog()?)))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn new_without_config_uses_defaults_and_builtin_catalog() {
        let tmp = tempdir().unwrap();

        let workspace = Workspace::new(tmp.path().to_path_buf()).unwrap();

        assert_eq!(workspace.config(), &Config::default());
        assert_eq!(workspace.catalog_source(), CatalogSource::Builtin);
        assert_eq!(workspace.load_catalog().unwrap(), builtin_catalog());
    }

    #[test]
    fn init_creates_config_and_catalog() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        Workspace::init(root.clone()).unwrap();

        assert!(root.join(".exam/config.toml").exists());
        let workspace = Workspace::new(root.clone()).unwrap();
        assert_eq!(
            workspace.catalog_source(),
            CatalogSource::File(root.join(".exam/catalog.toml"))
        );
        assert_eq!(workspace.load_catalog().unwrap(), builtin_catalog());
    }

    #[test]
    fn init_twice_fails() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        Workspace::init(root.clone()).unwrap();
        let error = Workspace::init(root).unwrap_err();

        assert!(matches!(error, WorkspaceError::AlreadyInitialized(_)));
    }

    #[test]
    fn configured_catalog_must_exist() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        std::fs::create_dir_all(root.join(".exam")).unwrap();
        let mut config = Config::default();
        config.set_catalog(Some(PathBuf::from("missing.toml")));
        config.save(&root.join(".exam/config.toml")).unwrap();

        let workspace = Workspace::new(root).unwrap();

        assert!(matches!(
            workspace.load_catalog(),
            Err(CatalogFileError::Io { .. })
        ));
    }

    #[test]
    fn custom_catalog_is_used_by_engine() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        std::fs::create_dir_all(root.join(".exam")).unwrap();
        std::fs::write(
            root.join(".exam/catalog.toml"),
            "_version = \"1\"\n[[clause]]\nid = \"Пункт X\"\ndoctors = [\"Дерматовенеролог\"]\n",
        )
        .unwrap();

        let engine = Workspace::new(root).unwrap().engine().unwrap();

        assert_eq!(engine.catalog().len(), 1);
        assert!(engine.catalog().contains("Пункт X"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        std::fs::create_dir_all(root.join(".exam")).unwrap();
        std::fs::write(root.join(".exam/config.toml"), "not toml at all [").unwrap();

        assert!(matches!(
            Workspace::new(root),
            Err(WorkspaceError::Config(_))
        ));
    }
}
