//! Table records and the two derived record kinds.
//!
//! Input records mirror the three tables the host supplies (grades,
//! enrollments, seats). `Candidacy` is ephemeral — created fresh for every
//! (student, non-empty preference) pair on each run, never mutated, never
//! persisted. `Placement` is one row of the output table.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{Discipline, Registration, StudentName};

/// One row of the grade table: per-discipline grades plus the overall average.
///
/// Invariant (enforced by validation upstream): exactly one record per
/// student referenced by an enrollment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GradeRecord {
    pub student: StudentName,
    pub overall_average: f64,
    /// Grade per discipline column; a blank cell in the source table means
    /// the student has no grade in that discipline (no map entry).
    pub grades: BTreeMap<Discipline, f64>,
}

impl GradeRecord {
    /// Grade in `discipline`, if the student has one.
    #[inline]
    pub fn grade_in(&self, discipline: &Discipline) -> Option<f64> {
        self.grades.get(discipline).copied()
    }
}

/// One row of the enrollment table: up to three preference slots.
///
/// Slots are positional: a later slot may be present while an earlier one is
/// absent, and absence is never compacted away.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnrollmentRecord {
    pub student: StudentName,
    pub registration: Registration,
    pub choices: [Option<Discipline>; 3],
}

impl EnrollmentRecord {
    /// Non-empty slots in positional order, tagged with their rank.
    pub fn ranked_choices(&self) -> impl Iterator<Item = (PreferenceRank, &Discipline)> {
        self.choices
            .iter()
            .zip(PreferenceRank::ALL)
            .filter_map(|(slot, rank)| slot.as_ref().map(|d| (rank, d)))
    }
}

/// One row of the seat table. Capacity is non-negative by construction;
/// the loader rejects negative or non-integer values before any allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeatRecord {
    pub discipline: Discipline,
    pub seats: u32,
}

/// Which preference slot produced a candidacy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PreferenceRank {
    First,
    Second,
    Third,
}

impl PreferenceRank {
    /// Slot order as laid out in the enrollment table.
    pub const ALL: [PreferenceRank; 3] =
        [PreferenceRank::First, PreferenceRank::Second, PreferenceRank::Third];

    /// Human-readable label used in the output table.
    pub fn label(self) -> &'static str {
        match self {
            PreferenceRank::First => "1st choice",
            PreferenceRank::Second => "2nd choice",
            PreferenceRank::Third => "3rd choice",
        }
    }
}

/// One (student, non-empty preference) pair with its computed merit score.
///
/// Merit is kept at full precision here; rounding happens only when a
/// placement row is formatted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidacy {
    pub student: StudentName,
    pub registration: Registration,
    pub discipline: Discipline,
    pub preference: PreferenceRank,
    pub merit: f64,
    pub discipline_grade: f64,
    pub overall_average: f64,
}

/// One row of the final output table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    pub discipline: Discipline,
    /// 1-based position within the discipline after the final merit sort.
    pub rank: u32,
    pub student: StudentName,
    pub registration: Registration,
    /// Merit rounded to 4 decimals at the formatting boundary.
    pub merit: f64,
    pub preference: PreferenceRank,
    pub discipline_grade: f64,
    pub overall_average: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(s: &str) -> Discipline {
        s.parse().unwrap()
    }

    #[test]
    fn ranked_choices_skip_empty_slots_positionally() {
        let rec = EnrollmentRecord {
            student: "Ana".parse().unwrap(),
            registration: "R1".parse().unwrap(),
            choices: [None, Some(disc("Cálculo I")), Some(disc("Física I"))],
        };
        let got: Vec<_> = rec.ranked_choices().collect();
        assert_eq!(
            got,
            vec![
                (PreferenceRank::Second, &disc("Cálculo I")),
                (PreferenceRank::Third, &disc("Física I")),
            ]
        );
    }

    #[test]
    fn preference_labels() {
        assert_eq!(PreferenceRank::First.label(), "1st choice");
        assert_eq!(PreferenceRank::Second.label(), "2nd choice");
        assert_eq!(PreferenceRank::Third.label(), "3rd choice");
    }
}
