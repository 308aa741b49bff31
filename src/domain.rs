//! Domain models for examination planning.
//!
//! This module contains the clause catalog, the requirement engine that turns
//! a person's clause selection into doctors and tests, and the population
//! aggregator built on top of it.

/// Regulatory clause identifiers and entries.
pub mod clause;
pub use clause::{ClauseEntry, ClauseId, EmptyClauseIdError};

/// The immutable clause reference table.
pub mod catalog;
pub use catalog::{CatalogError, ClauseCatalog, DoctorLookup};

mod config;
pub use config::Config;

mod ordered_set;
pub use ordered_set::OrderedSet;

/// Demographic attributes of an examined person.
pub mod profile;
pub use profile::{age_on, AgeGroup, PersonProfile, Sex};

/// Doctor and test derivation.
pub mod engine;
pub use engine::{RequirementEngine, RequirementResult};

/// Bulk aggregation over demographic buckets.
pub mod population;
pub use population::{
    aggregate, aggregate_columns, aggregate_columns_per_individual, aggregate_per_individual,
    AggregateTally, AnalysisColumn, BucketKind, PopulationBucket, Tally,
};
