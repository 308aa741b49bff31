use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::domain::{AnalysisColumn, ClauseCatalog, ClauseId};

/// A population analysis: the columns to aggregate.
///
/// ```yaml
/// columns:
///   - name: Цех 1
///     clauses: ["4.1. Шум"]
///     male_under_40: 10
///     female_40_or_over: 2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Columns in display order.
    #[serde(default)]
    pub columns: Vec<AnalysisColumn>,
}

/// Errors that can occur when loading an analysis file.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisFileError {
    /// The file could not be read.
    #[error("failed to read analysis file {}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The YAML content is invalid.
    #[error("failed to parse analysis file")]
    Yaml(#[from] serde_yaml::Error),
}

impl Analysis {
    /// Loads an analysis from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, AnalysisFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| AnalysisFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses an analysis from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid analysis.
    pub fn parse(content: &str) -> Result<Self, AnalysisFileError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Total number of people across all columns, saturating at `u64::MAX`.
    #[must_use]
    pub fn population(&self) -> u64 {
        self.columns
            .iter()
            .fold(0_u64, |total, column| total.saturating_add(column.population()))
    }

    /// Clauses referenced by some column but absent from `catalog`, each
    /// listed once.
    #[must_use]
    pub fn unknown_clauses<'a>(&'a self, catalog: &ClauseCatalog) -> Vec<&'a ClauseId> {
        let mut unknown: Vec<&ClauseId> = Vec::new();
        for clause in self.columns.iter().flat_map(|column| &column.clauses) {
            if !catalog.contains(clause) && !unknown.contains(&clause) {
                unknown.push(clause);
            }
        }
        unknown
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::BucketKind;

    #[test]
    fn parse_reads_columns_with_default_headcounts() {
        let analysis = Analysis::parse(
            r#"
columns:
  - name: Цех 1
    clauses: ["4.1. Шум", "6. Работы на высоте"]
    male_under_40: 10
    female_40_or_over: 2
  - name: Офис
"#,
        )
        .unwrap();

        assert_eq!(analysis.columns.len(), 2);
        let first = &analysis.columns[0];
        assert_eq!(first.name, "Цех 1");
        assert_eq!(first.clauses.len(), 2);
        assert_eq!(first.headcount(BucketKind::MaleUnder40), 10);
        assert_eq!(first.headcount(BucketKind::MaleFortyOrOver), 0);
        assert_eq!(first.headcount(BucketKind::FemaleFortyOrOver), 2);
        assert!(analysis.columns[1].clauses.is_empty());
        assert_eq!(analysis.population(), 12);
    }

    #[test]
    fn parse_rejects_negative_headcount() {
        let result = Analysis::parse("columns:\n  - name: X\n    male_under_40: -1\n");
        assert!(matches!(result, Err(AnalysisFileError::Yaml(_))));
    }

    #[test]
    fn parse_rejects_blank_clause() {
        let result = Analysis::parse("columns:\n  - name: X\n    clauses: [\" \"]\n");
        assert!(result.is_err());
    }

    #[test]
    fn population_saturates_across_columns() {
        let analysis = Analysis::parse(&format!(
            "columns:\n  - name: A\n    male_under_40: {}\n  - name: B\n    female_under_40: 1\n",
            u64::MAX
        ))
        .unwrap();

        assert_eq!(analysis.columns[0].male_under_40, u64::MAX);
        assert_eq!(analysis.population(), u64::MAX);
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("columns:\n  - name: Склад\n    male_40_or_over: 3\n".as_bytes())
            .unwrap();

        let analysis = Analysis::load(file.path()).unwrap();
        assert_eq!(analysis.columns[0].male_40_or_over, 3);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = Analysis::load(&tmp.path().join("missing.yaml"));
        assert!(matches!(result, Err(AnalysisFileError::Io { .. })));
    }

    #[test]
    fn unknown_clauses_are_listed_once() {
        let catalog = crate::storage::builtin_catalog();
        let analysis = Analysis::parse(
            r#"
columns:
  - name: A
    clauses: ["4.1. Шум", "Пункт Z"]
  - name: B
    clauses: ["Пункт Z", "Пункт W"]
"#,
        )
        .unwrap();

        let unknown: Vec<&str> = analysis
            .unknown_clauses(&catalog)
            .into_iter()
            .map(ClauseId::as_str)
            .collect();
        assert_eq!(unknown, ["Пункт Z", "Пункт W"]);
    }
}
