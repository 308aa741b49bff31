//! The requirement engine derives, for one person, the specialists who must
//! examine them and the tests they must undergo.
//!
//! Both lists start with a fixed mandatory block, gain the demographic
//! additions, and finally absorb whatever the selected clauses ask for. Lists
//! never contain the same name twice: the first occurrence of a name fixes its
//! position.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{AgeGroup, ClauseCatalog, ClauseId, OrderedSet, PersonProfile, Sex};

/// Doctors every examined person must see, in order.
pub const MANDATORY_DOCTORS: [&str; 4] = ["Терапевт", "Невролог", "Психиатр", "Нарколог"];

/// Added for women.
pub const GYNECOLOGIST: &str = "Акушер-гинеколог";

/// Always closes the doctor list.
pub const OCCUPATIONAL_PATHOLOGIST: &str = "Профпатолог";

/// Cardiovascular risk test for people aged 40 or over.
pub const ABSOLUTE_RISK_TEST: &str = "Определение абсолютного сердечно-сосудистого риска";

/// Cardiovascular risk test for people under 40.
pub const RELATIVE_RISK_TEST: &str = "Определение относительного сердечно-сосудистого риска";

/// Position of the risk test within the mandatory tests.
const RISK_TEST_POSITION: usize = 4;

/// The mandatory tests, with the age-dependent risk test left out.
const MANDATORY_TESTS: [&str; 8] = [
    "Расчет на основании антропометрии (измерение роста, массы тела, окружности талии) индекса массы тела",
    "Электрокардиография в покое",
    "Измерение артериального давления на периферических артериях",
    "Флюорография или рентгенография легких в двух проекциях (прямая и правая боковая)",
    "Общий анализ крови",
    "Общий анализ мочи",
    "Определение уровня общего холестерина в крови",
    "Исследование уровня глюкозы в крови натощак",
];

/// Added for people aged 40 or over.
pub const INTRAOCULAR_PRESSURE_TEST: &str = "Измерение внутриглазного давления";

/// Added for women.
pub const FEMALE_TESTS: [&str; 2] = [
    "Бактериологическое (на флору) и цитологическое (на атипичные клетки) исследование",
    "Ультразвуковое исследование органов малого таза",
];

/// Added for women aged 40 or over.
pub const MAMMOGRAPHY: &str = "Маммография обеих молочных желез в двух проекциях";

/// The doctors and tests required for one person.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequirementResult {
    /// Required specialists, in order, without repeats.
    pub doctors: Vec<String>,
    /// Required tests, in order, without repeats.
    pub tests: Vec<String>,
}

/// Computes examination requirements against a clause catalog.
///
/// The engine is cheap to clone and holds no mutable state, so separate
/// computations may run concurrently.
#[derive(Debug, Clone)]
pub struct RequirementEngine {
    catalog: Arc<ClauseCatalog>,
}

impl RequirementEngine {
    /// Creates an engine reading from `catalog`.
    #[must_use]
    pub const fn new(catalog: Arc<ClauseCatalog>) -> Self {
        Self { catalog }
    }

    /// The catalog the engine reads from.
    #[must_use]
    pub fn catalog(&self) -> &ClauseCatalog {
        &self.catalog
    }

    /// Computes both lists for `profile`.
    #[must_use]
    pub fn compute(&self, profile: &PersonProfile) -> RequirementResult {
        let clauses: Vec<&ClauseId> = profile.clauses().collect();
        RequirementResult {
            doctors: self.compute_doctors(
                clauses.iter().copied(),
                profile.sex(),
                profile.age_group(),
            ),
            tests: self.compute_tests(profile.age_group(), profile.sex(), clauses.iter().copied()),
        }
    }

    /// The specialists a person must see.
    ///
    /// The mandatory doctors come first, then the doctors of each clause in
    /// selection order. Women additionally see a gynecologist, and the
    /// occupational pathologist is appended last unless a clause already
    /// brought them in. The age group does not change the list.
    ///
    /// Clauses missing from the catalog are skipped.
    pub fn compute_doctors<'a>(
        &self,
        clauses: impl IntoIterator<Item = &'a ClauseId>,
        sex: Sex,
        _age_group: AgeGroup,
    ) -> Vec<String> {
        let mut doctors: OrderedSet<String> =
            MANDATORY_DOCTORS.iter().map(ToString::to_string).collect();

        for clause in clauses {
            let Some(entry) = self.catalog.lookup(clause.as_str()) else {
                debug!(clause = %clause, "unknown clause skipped");
                continue;
            };
            doctors.extend(entry.doctors().iter().cloned());
        }

        if sex.is_female() {
            doctors.insert(GYNECOLOGIST.to_string());
        }
        doctors.insert(OCCUPATIONAL_PATHOLOGIST.to_string());

        doctors.into_vec()
    }

    /// The tests a person must undergo.
    ///
    /// The mandatory block (with the age-appropriate cardiovascular risk test
    /// and the age and sex additions) is followed by the tests of each clause
    /// in selection order.
    ///
    /// Clauses missing from the catalog are skipped.
    pub fn compute_tests<'a>(
        &self,
        age_group: AgeGroup,
        sex: Sex,
        clauses: impl IntoIterator<Item = &'a ClauseId>,
    ) -> Vec<String> {
        let mut tests = mandatory_tests(age_group, sex);

        for clause in clauses {
            let Some(entry) = self.catalog.lookup(clause.as_str()) else {
                debug!(clause = %clause, "unknown clause skipped");
                continue;
            };
            tests.extend(entry.tests().iter().cloned());
        }

        tests.into_vec()
    }
}

fn mandatory_tests(age_group: AgeGroup, sex: Sex) -> OrderedSet<String> {
    let over_40 = age_group.is_forty_or_over();
    let risk_test = if over_40 {
        ABSOLUTE_RISK_TEST
    } else {
        RELATIVE_RISK_TEST
    };

    let mut tests = OrderedSet::with_capacity(MANDATORY_TESTS.len() + 5);
    let (before, after) = MANDATORY_TESTS.split_at(RISK_TEST_POSITION);
    tests.extend(before.iter().map(ToString::to_string));
    tests.insert(risk_test.to_string());
    tests.extend(after.iter().map(ToString::to_string));

    if over_40 {
        tests.insert(INTRAOCULAR_PRESSURE_TEST.to_string());
    }
    if sex.is_female() {
        tests.extend(FEMALE_TESTS.iter().map(ToString::to_string));
        if over_40 {
            tests.insert(MAMMOGRAPHY.to_string());
        }
    }
    tests
}
