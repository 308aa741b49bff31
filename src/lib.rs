//! Occupational Health Examination Planning
//!
//! Derives the mandatory medical tests and specialist visits for a person
//! from the regulatory order clauses selected for them, and tallies those
//! requirements across whole populations.

pub mod domain;
pub use domain::{
    aggregate, aggregate_columns, aggregate_columns_per_individual, aggregate_per_individual,
    AgeGroup, AggregateTally, AnalysisColumn, BucketKind, ClauseCatalog, ClauseEntry, ClauseId,
    Config, DoctorLookup, PersonProfile, PopulationBucket, RequirementEngine, RequirementResult,
    Sex, Tally,
};

/// Filesystem storage for catalogs, analysis inputs and workspace settings.
pub mod storage;
pub use storage::{Analysis, Workspace};
