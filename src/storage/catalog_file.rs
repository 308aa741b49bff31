use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::domain::{CatalogError, ClauseCatalog, ClauseEntry, ClauseId};

/// The catalog shipped with the crate, in catalog file format.
pub const BUILTIN_CATALOG: &str = include_str!("../../catalog/default.toml");

/// Errors that can occur when loading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogFileError {
    /// The file could not be read.
    #[error("failed to read catalog file {}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The TOML content is invalid.
    #[error("failed to parse catalog file")]
    Parse(#[from] toml::de::Error),
    /// The clauses do not form a valid catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Loads a catalog from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a valid catalog file,
/// or defines the same clause twice.
pub fn load_catalog(path: &Path) -> Result<ClauseCatalog, CatalogFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&content)
}

/// Parses a catalog from TOML text.
///
/// # Errors
///
/// Returns an error if the text is not a valid catalog file or defines the
/// same clause twice.
pub fn parse_catalog(content: &str) -> Result<ClauseCatalog, CatalogFileError> {
    let file: CatalogFile = toml::from_str(content)?;
    let CatalogFile::V1 { clauses } = file;
    let catalog = ClauseCatalog::new(clauses.into_iter().map(ClauseEntry::from))?;
    Ok(catalog)
}

/// The catalog compiled into the crate.
///
/// # Panics
///
/// Panics if the embedded catalog is malformed, which the test suite rules
/// out.
#[must_use]
pub fn builtin_catalog() -> ClauseCatalog {
    parse_catalog(BUILTIN_CATALOG).expect("built-in catalog is valid")
}

/// The serialized versions of the catalog file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum CatalogFile {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, rename = "clause")]
        clauses: Vec<ClauseRecord>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct ClauseRecord {
    id: ClauseId,
    #[serde(default)]
    doctors: Vec<String>,
    #[serde(default)]
    tests: Vec<String>,
}

impl From<ClauseRecord> for ClauseEntry {
    fn from(record: ClauseRecord) -> Self {
        Self::new(record.id, record.doctors, record.tests)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = builtin_catalog();

        assert!(!catalog.is_empty());
        let heights = catalog
            .lookup("6. Работы на высоте")
            .expect("built-in catalog should list work at height");
        assert_eq!(heights.doctors(), ["Офтальмолог", "Оториноларинголог"]);
    }

    #[test]
    fn parse_reads_clauses_in_order() {
        let catalog = parse_catalog(
            r#"
_version = "1"

[[clause]]
id = "Пункт X"
doctors = ["Дерматовенеролог"]

[[clause]]
id = "Пункт Y"
tests = ["Спирометрия"]
"#,
        )
        .unwrap();

        let ids: Vec<&str> = catalog.iter().map(|entry| entry.id().as_str()).collect();
        assert_eq!(ids, ["Пункт X", "Пункт Y"]);
        assert!(catalog.lookup("Пункт X").unwrap().tests().is_empty());
        assert_eq!(catalog.lookup("Пункт Y").unwrap().tests(), ["Спирометрия"]);
    }

    #[test]
    fn parse_without_clauses_is_empty() {
        let catalog = parse_catalog(r#"_version = "1""#).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn parse_rejects_duplicate_clause() {
        let error = parse_catalog(
            r#"
_version = "1"

[[clause]]
id = "Пункт X"

[[clause]]
id = "Пункт X"
"#,
        )
        .unwrap_err();

        assert!(matches!(
            error,
            CatalogFileError::Catalog(CatalogError::DuplicateClause(_))
        ));
    }

    #[test]
    fn parse_rejects_blank_identifier() {
        let error = parse_catalog("_version = \"1\"\n[[clause]]\nid = \"  \"\n").unwrap_err();
        assert!(matches!(error, CatalogFileError::Parse(_)));
    }

    #[test]
    fn parse_rejects_unknown_version() {
        let error = parse_catalog("_version = \"2\"\n").unwrap_err();
        assert!(matches!(error, CatalogFileError::Parse(_)));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BUILTIN_CATALOG.as_bytes()).unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog, builtin_catalog());
    }

    #[test]
    fn load_missing_file_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("catalog.toml");

        let error = load_catalog(&missing).unwrap_err();
        assert!(matches!(error, CatalogFileError::Io { ref path, .. } if path == &missing));
    }
}
