/// Reading an analysis definition from YAML.
pub mod analysis_file;
/// Clause catalog files and the built-in catalog.
pub mod catalog_file;
mod workspace;

pub use analysis_file::{Analysis, AnalysisFileError};
pub use catalog_file::{builtin_catalog, CatalogFileError, BUILTIN_CATALOG};
pub use workspace::{CatalogSource, Workspace, WorkspaceError};
