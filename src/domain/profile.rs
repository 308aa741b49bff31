use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{ClauseId, OrderedSet};

/// Age from which the extended examination applies.
pub const AGE_THRESHOLD: u32 = 40;

/// Sex of the examined person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Sex {
    /// Whether this is [`Sex::Female`].
    #[must_use]
    pub const fn is_female(self) -> bool {
        matches!(self, Self::Female)
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("male"),
            Self::Female => f.write_str("female"),
        }
    }
}

/// Age bracket used by the examination rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    /// Younger than [`AGE_THRESHOLD`].
    Under40,
    /// [`AGE_THRESHOLD`] or older.
    FortyOrOver,
}

impl AgeGroup {
    /// Classifies an age in whole years.
    #[must_use]
    pub const fn from_age(age: u32) -> Self {
        if age >= AGE_THRESHOLD {
            Self::FortyOrOver
        } else {
            Self::Under40
        }
    }

    /// Classifies a person by date of birth as of `on`.
    ///
    /// Returns `None` if `birth_date` is after `on`.
    #[must_use]
    pub fn from_birth_date(birth_date: NaiveDate, on: NaiveDate) -> Option<Self> {
        age_on(birth_date, on).map(Self::from_age)
    }

    /// Whether this is [`AgeGroup::FortyOrOver`].
    #[must_use]
    pub const fn is_forty_or_over(self) -> bool {
        matches!(self, Self::FortyOrOver)
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Under40 => write!(f, "under {AGE_THRESHOLD}"),
            Self::FortyOrOver => write!(f, "{AGE_THRESHOLD} or over"),
        }
    }
}

/// Age in completed years on the date `on`.
///
/// The calendar-year difference, less one if the birthday has not yet come
/// round in `on`'s year. A person born on 29 February has their birthday on
/// 1 March in non-leap years.
///
/// Returns `None` if `birth_date` is after `on`.
#[must_use]
pub fn age_on(birth_date: NaiveDate, on: NaiveDate) -> Option<u32> {
    if birth_date > on {
        return None;
    }
    let years = u32::try_from(on.year() - birth_date.year()).ok()?;
    let had_birthday = (on.month(), on.day()) >= (birth_date.month(), birth_date.day());
    Some(if had_birthday { years } else { years - 1 })
}

/// The inputs the examination rules need about one person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonProfile {
    clauses: OrderedSet<ClauseId>,
    sex: Sex,
    age_group: AgeGroup,
}

impl PersonProfile {
    /// Creates a profile with no clauses selected.
    #[must_use]
    pub fn new(sex: Sex, age_group: AgeGroup) -> Self {
        Self {
            clauses: OrderedSet::new(),
            sex,
            age_group,
        }
    }

    /// Adds clauses to the selection. Repeated clauses are ignored.
    #[must_use]
    pub fn with_clauses(mut self, clauses: impl IntoIterator<Item = ClauseId>) -> Self {
        self.clauses.extend(clauses);
        self
    }

    /// Selects a clause. Returns `false` if it was already selected.
    pub fn select(&mut self, clause: ClauseId) -> bool {
        self.clauses.insert(clause)
    }

    /// The selected clauses, in selection order.
    pub fn clauses(&self) -> impl Iterator<Item = &ClauseId> {
        self.clauses.iter()
    }

    /// The person's sex.
    #[must_use]
    pub const fn sex(&self) -> Sex {
        self.sex
    }

    /// The person's age bracket.
    #[must_use]
    pub const fn age_group(&self) -> AgeGroup {
        self.age_group
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test_case("1980-06-15", "2020-06-14", 39; "day before birthday")]
    #[test_case("1980-06-15", "2020-06-15", 40; "on birthday")]
    #[test_case("1980-06-15", "2020-12-31", 40; "after birthday")]
    #[test_case("1980-12-31", "2021-01-01", 40; "birthday at year end")]
    #[test_case("2000-02-29", "2021-02-28", 20; "leap day before march")]
    #[test_case("2000-02-29", "2021-03-01", 21; "leap day in march")]
    #[test_case("2020-05-05", "2020-05-05", 0; "born today")]
    fn age_on_adjusts_for_birthday(birth: &str, on: &str, expected: u32) {
        assert_eq!(age_on(date(birth), date(on)), Some(expected));
    }

    #[test]
    fn age_on_future_birth_date_is_none() {
        assert_eq!(age_on(date("2030-01-01"), date("2020-01-01")), None);
        assert_eq!(
            AgeGroup::from_birth_date(date("2030-01-01"), date("2020-01-01")),
            None
        );
    }

    #[test_case(0, AgeGroup::Under40)]
    #[test_case(39, AgeGroup::Under40)]
    #[test_case(40, AgeGroup::FortyOrOver)]
    #[test_case(75, AgeGroup::FortyOrOver)]
    fn from_age_uses_inclusive_threshold(age: u32, expected: AgeGroup) {
        assert_eq!(AgeGroup::from_age(age), expected);
    }

    #[test]
    fn from_birth_date_classifies_around_fortieth_birthday() {
        let birth = date("1984-03-10");
        assert_eq!(
            AgeGroup::from_birth_date(birth, date("2024-03-09")),
            Some(AgeGroup::Under40)
        );
        assert_eq!(
            AgeGroup::from_birth_date(birth, date("2024-03-10")),
            Some(AgeGroup::FortyOrOver)
        );
    }

    #[test]
    fn profile_keeps_first_selection_order() {
        let x = ClauseId::new("Пункт X").unwrap();
        let y = ClauseId::new("Пункт Y").unwrap();

        let mut profile = PersonProfile::new(Sex::Female, AgeGroup::Under40)
            .with_clauses([y.clone(), x.clone()]);
        assert!(!profile.select(y.clone()));

        let clauses: Vec<&ClauseId> = profile.clauses().collect();
        assert_eq!(clauses, [&y, &x]);
        assert!(profile.sex().is_female());
        assert!(!profile.age_group().is_forty_or_over());
    }
}
