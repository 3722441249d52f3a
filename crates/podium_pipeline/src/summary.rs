//! Run summary: engine identity, input fingerprints, and fill counts.
//!
//! Written beside the result table so a run can be audited later: which
//! engine produced it, over exactly which input bytes, and how full each
//! discipline ended up. Everything except `finished_utc` is a pure
//! function of the inputs.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use podium_core::{Candidacy, Discipline, Placement};
use podium_io::{InputDigests, LoadedTables};

use crate::EngineMeta;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub engine: EngineMeta,
    /// RFC3339 UTC, second precision.
    pub finished_utc: String,
    pub inputs: InputDigests,
    pub totals: RunTotals,
    /// Seat table row order, one entry per discipline.
    pub disciplines: Vec<DisciplineCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunTotals {
    pub students: usize,
    pub enrollments: usize,
    pub candidacies: usize,
    pub placements: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisciplineCount {
    pub discipline: Discipline,
    pub seats: u32,
    pub filled: u32,
}

/// Assemble the summary for a finished run.
pub fn build_run_summary(
    engine: EngineMeta,
    tables: &LoadedTables,
    candidacies: &[Candidacy],
    placements: &[Placement],
    finished: DateTime<Utc>,
) -> RunSummary {
    let disciplines = tables
        .seats
        .iter()
        .map(|seat| DisciplineCount {
            discipline: seat.discipline.clone(),
            seats: seat.seats,
            filled: placements
                .iter()
                .filter(|p| p.discipline == seat.discipline)
                .count() as u32,
        })
        .collect();

    RunSummary {
        engine,
        finished_utc: finished.to_rfc3339_opts(SecondsFormat::Secs, true),
        inputs: tables.digests.clone(),
        totals: RunTotals {
            students: tables.grades.len(),
            enrollments: tables.enrollments.len(),
            candidacies: candidacies.len(),
            placements: placements.len(),
        },
        disciplines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use podium_core::{PreferenceRank, SeatRecord};

    #[test]
    fn counts_and_timestamp_format() {
        let tables = LoadedTables {
            grades: vec![],
            enrollments: vec![],
            seats: vec![
                SeatRecord { discipline: "B".parse().unwrap(), seats: 2 },
                SeatRecord { discipline: "A".parse().unwrap(), seats: 1 },
            ],
            digests: InputDigests {
                grades_sha256: "a".repeat(64),
                enrollments_sha256: "b".repeat(64),
                seats_sha256: "c".repeat(64),
            },
            expect: None,
        };
        let placements = vec![Placement {
            discipline: "B".parse().unwrap(),
            rank: 1,
            student: "Ana".parse().unwrap(),
            registration: "R".parse().unwrap(),
            merit: 8.0,
            preference: PreferenceRank::First,
            discipline_grade: 8.0,
            overall_average: 8.0,
        }];

        let finished = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let summary = build_run_summary(
            crate::engine_identifiers(),
            &tables,
            &[],
            &placements,
            finished,
        );

        assert_eq!(summary.finished_utc, "2026-03-02T12:00:00Z");
        assert_eq!(summary.totals.placements, 1);
        // Seat table row order is preserved, not alphabetical.
        assert_eq!(summary.disciplines[0].discipline.as_str(), "B");
        assert_eq!(summary.disciplines[0].filled, 1);
        assert_eq!(summary.disciplines[1].filled, 0);
    }
}
