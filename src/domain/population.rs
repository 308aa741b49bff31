//! Population analysis.
//!
//! An analysis is made of columns. Each column selects one set of clauses and
//! gives a headcount for each of the four demographic buckets. Everyone in a
//! bucket shares sex, age group and clause selection, so they all receive the
//! same [`RequirementResult`]; the aggregator computes it once per bucket and
//! scales by the headcount.

use std::collections::HashMap;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize, ser::SerializeMap};
use tracing::{debug, instrument};

use crate::domain::{AgeGroup, ClauseId, RequirementEngine, RequirementResult, Sex};

/// A demographic bucket: sex crossed with age group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BucketKind {
    /// Men under 40.
    #[serde(rename = "male_under_40")]
    MaleUnder40,
    /// Men aged 40 or over.
    #[serde(rename = "male_40_or_over")]
    MaleFortyOrOver,
    /// Women under 40.
    #[serde(rename = "female_under_40")]
    FemaleUnder40,
    /// Women aged 40 or over.
    #[serde(rename = "female_40_or_over")]
    FemaleFortyOrOver,
}

impl BucketKind {
    /// Every bucket, in reporting order.
    pub const ALL: [Self; 4] = [
        Self::MaleUnder40,
        Self::MaleFortyOrOver,
        Self::FemaleUnder40,
        Self::FemaleFortyOrOver,
    ];

    /// The bucket holding people of this sex and age group.
    #[must_use]
    pub const fn new(sex: Sex, age_group: AgeGroup) -> Self {
        match (sex, age_group) {
            (Sex::Male, AgeGroup::Under40) => Self::MaleUnder40,
            (Sex::Male, AgeGroup::FortyOrOver) => Self::MaleFortyOrOver,
            (Sex::Female, AgeGroup::Under40) => Self::FemaleUnder40,
            (Sex::Female, AgeGroup::FortyOrOver) => Self::FemaleFortyOrOver,
        }
    }

    /// Sex of the people in this bucket.
    #[must_use]
    pub const fn sex(self) -> Sex {
        match self {
            Self::MaleUnder40 | Self::MaleFortyOrOver => Sex::Male,
            Self::FemaleUnder40 | Self::FemaleFortyOrOver => Sex::Female,
        }
    }

    /// Age group of the people in this bucket.
    #[must_use]
    pub const fn age_group(self) -> AgeGroup {
        match self {
            Self::MaleUnder40 | Self::FemaleUnder40 => AgeGroup::Under40,
            Self::MaleFortyOrOver | Self::FemaleFortyOrOver => AgeGroup::FortyOrOver,
        }
    }
}

/// A number of identical people: same bucket, same clause selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationBucket<'a> {
    /// Demographic bucket.
    pub kind: BucketKind,
    /// How many people are in it.
    pub headcount: u64,
    /// Clauses selected for every one of them.
    pub clauses: &'a [ClauseId],
}

impl PopulationBucket<'_> {
    /// The requirements of any single person in this bucket.
    #[must_use]
    pub fn requirements(&self, engine: &RequirementEngine) -> RequirementResult {
        RequirementResult {
            doctors: engine.compute_doctors(self.clauses, self.kind.sex(), self.kind.age_group()),
            tests: engine.compute_tests(self.kind.age_group(), self.kind.sex(), self.clauses),
        }
    }
}

/// One column of an analysis: a clause selection shared by all four buckets,
/// and a headcount per bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisColumn {
    /// Label shown for the column, such as a workshop or job title.
    pub name: String,
    /// Clauses that apply to everyone in the column.
    #[serde(default)]
    pub clauses: Vec<ClauseId>,
    /// Men under 40.
    #[serde(default)]
    pub male_under_40: u64,
    /// Men aged 40 or over.
    #[serde(default)]
    pub male_40_or_over: u64,
    /// Women under 40.
    #[serde(default)]
    pub female_under_40: u64,
    /// Women aged 40 or over.
    #[serde(default)]
    pub female_40_or_over: u64,
}

impl AnalysisColumn {
    /// Headcount of one bucket.
    #[must_use]
    pub const fn headcount(&self, kind: BucketKind) -> u64 {
        match kind {
            BucketKind::MaleUnder40 => self.male_under_40,
            BucketKind::MaleFortyOrOver => self.male_40_or_over,
            BucketKind::FemaleUnder40 => self.female_under_40,
            BucketKind::FemaleFortyOrOver => self.female_40_or_over,
        }
    }

    /// Sets the headcount of one bucket.
    pub const fn set_headcount(&mut self, kind: BucketKind, headcount: u64) {
        match kind {
            BucketKind::MaleUnder40 => self.male_under_40 = headcount,
            BucketKind::MaleFortyOrOver => self.male_40_or_over = headcount,
            BucketKind::FemaleUnder40 => self.female_under_40 = headcount,
            BucketKind::FemaleFortyOrOver => self.female_40_or_over = headcount,
        }
    }

    /// Total number of people in the column, saturating at `u64::MAX`.
    #[must_use]
    pub fn population(&self) -> u64 {
        BucketKind::ALL
            .iter()
            .fold(0_u64, |total, &kind| total.saturating_add(self.headcount(kind)))
    }

    /// The four buckets of this column.
    pub fn buckets(&self) -> impl Iterator<Item = PopulationBucket<'_>> {
        BucketKind::ALL.into_iter().map(|kind| PopulationBucket {
            kind,
            headcount: self.headcount(kind),
            clauses: &self.clauses,
        })
    }
}

/// Visit counts by name, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl Tally {
    /// Adds `count` visits for `name`. Adding zero records nothing.
    ///
    /// Counts saturate at `u64::MAX`.
    pub fn add(&mut self, name: &str, count: u64) {
        if count == 0 {
            return;
        }
        if let Some(&position) = self.index.get(name) {
            let total = &mut self.counts[position].1;
            *total = total.saturating_add(count);
        } else {
            self.index.insert(name.to_string(), self.counts.len());
            self.counts.push((name.to_string(), count));
        }
    }

    /// Visits counted for `name` (zero if never seen).
    #[must_use]
    pub fn get(&self, name: &str) -> u64 {
        self.index
            .get(name)
            .map_or(0, |&position| self.counts[position].1)
    }

    /// Iterates `(name, count)` pairs in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, saturating at `u64::MAX`.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts
            .iter()
            .fold(0_u64, |total, (_, count)| total.saturating_add(*count))
    }

    /// Adds every count from `other`. Names new to `self` are appended in
    /// `other`'s order.
    pub fn merge(&mut self, other: &Self) {
        for (name, count) in other.iter() {
            self.add(name, count);
        }
    }
}

impl Serialize for Tally {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (name, count) in &self.counts {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

/// Test and doctor visit counts across a population.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateTally {
    /// Visits per test.
    pub tests: Tally,
    /// Visits per doctor.
    pub doctors: Tally,
}

impl AggregateTally {
    /// Counts `people` visits for every doctor and test in `result`.
    pub fn record(&mut self, result: &RequirementResult, people: u64) {
        for doctor in &result.doctors {
            self.doctors.add(doctor, people);
        }
        for test in &result.tests {
            self.tests.add(test, people);
        }
    }

    /// Adds every count from `other`.
    pub fn merge(&mut self, other: &Self) {
        self.tests.merge(&other.tests);
        self.doctors.merge(&other.doctors);
    }
}

/// Tallies requirements over `buckets`, computing each bucket once and
/// scaling by its headcount.
///
/// Buckets with no people contribute nothing.
pub fn aggregate<'a>(
    engine: &RequirementEngine,
    buckets: impl IntoIterator<Item = PopulationBucket<'a>>,
) -> AggregateTally {
    let mut tally = AggregateTally::default();
    for bucket in buckets {
        if bucket.headcount == 0 {
            continue;
        }
        debug!(kind = ?bucket.kind, headcount = bucket.headcount, "aggregating bucket");
        tally.record(&bucket.requirements(engine), bucket.headcount);
    }
    tally
}

/// Tallies requirements over `buckets` one person at a time.
///
/// Produces the same result as [`aggregate`], at a cost proportional to the
/// total headcount.
pub fn aggregate_per_individual<'a>(
    engine: &RequirementEngine,
    buckets: impl IntoIterator<Item = PopulationBucket<'a>>,
) -> AggregateTally {
    let mut tally = AggregateTally::default();
    for bucket in buckets {
        for _ in 0..bucket.headcount {
            tally.record(&bucket.requirements(engine), 1);
        }
    }
    tally
}

/// Tallies every column of an analysis and merges the results.
///
/// Columns are aggregated in parallel and merged in column order.
#[instrument(level = "debug", skip_all, fields(columns = columns.len()))]
pub fn aggregate_columns(engine: &RequirementEngine, columns: &[AnalysisColumn]) -> AggregateTally {
    merge_columns(columns, |column| aggregate(engine, column.buckets()))
}

/// As [`aggregate_columns`], but counting one person at a time.
#[instrument(level = "debug", skip_all, fields(columns = columns.len()))]
pub fn aggregate_columns_per_individual(
    engine: &RequirementEngine,
    columns: &[AnalysisColumn],
) -> AggregateTally {
    merge_columns(columns, |column| {
        aggregate_per_individual(engine, column.buckets())
    })
}

fn merge_columns<F>(columns: &[AnalysisColumn], per_column: F) -> AggregateTally
where
    F: Fn(&AnalysisColumn) -> AggregateTally + Send + Sync,
{
    columns
        .par_iter()
        .map(per_column)
        .reduce(AggregateTally::default, |mut left, right| {
            left.merge(&right);
            left
        })
}
