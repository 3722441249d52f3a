//! Three-phase seat allocation over the seat table.
//!
//! Run-local state: one flat seated-student set shared by every discipline
//! and phase, per-discipline remaining-seat counters, and per-discipline
//! accepted lists (append-only while phases run). Each invocation starts
//! from an empty seated set; nothing is reused across runs.
//!
//! Phase order is strict. Within a phase, disciplines are visited in seat
//! table row order. Per discipline the ranking of unseated candidacies is
//! recomputed, the top `remaining_seats` slice is cut, and only entries
//! whose preference rank the phase accepts are admitted. A top-slice entry
//! with an unacceptable rank is skipped without reserving its seat; it is
//! only reconsidered when a later phase re-ranks the discipline. A seat can
//! therefore go to a lower-merit later-phase candidate than one skipped
//! earlier on preference rank alone; that is inherent to the phase design
//! and preserved exactly.

use std::collections::{BTreeMap, BTreeSet};

use podium_core::{Candidacy, Discipline, PreferenceRank, SeatRecord, StudentName};

use crate::ranking::ranking_for;
use crate::EngineError;

/// Preference strictness of one allocation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// First-choice candidacies only.
    FirstOnly,
    /// First- or second-choice candidacies.
    FirstOrSecond,
    /// Any candidacy; guarantees every fillable seat is filled.
    Any,
}

impl Phase {
    /// The three passes, in run order.
    pub const ALL: [Phase; 3] = [Phase::FirstOnly, Phase::FirstOrSecond, Phase::Any];

    /// Whether this pass admits a candidacy of the given preference rank.
    #[inline]
    pub fn admits(self, rank: PreferenceRank) -> bool {
        match self {
            Phase::FirstOnly => rank == PreferenceRank::First,
            Phase::FirstOrSecond => {
                matches!(rank, PreferenceRank::First | PreferenceRank::Second)
            }
            Phase::Any => true,
        }
    }
}

/// Accepted candidacies per discipline, in admission order.
///
/// Every seat-table discipline has an entry, possibly empty. Lists are not
/// in final output order; the result formatter re-sorts them.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub accepted: BTreeMap<Discipline, Vec<Candidacy>>,
}

impl Allocation {
    /// Total number of seated students.
    pub fn placed_count(&self) -> usize {
        self.accepted.values().map(Vec::len).sum()
    }
}

/// Run the three phases and return the accepted lists.
///
/// Fails on seat-table duplicates and on candidacies whose discipline is
/// absent from the seat table; both are data-integrity errors the caller
/// must surface, not conditions to paper over.
pub fn allocate(
    candidacies: &[Candidacy],
    seats: &[SeatRecord],
) -> Result<Allocation, EngineError> {
    let mut remaining: BTreeMap<&Discipline, u32> = BTreeMap::new();
    let mut accepted: BTreeMap<Discipline, Vec<Candidacy>> = BTreeMap::new();
    for seat in seats {
        if remaining.insert(&seat.discipline, seat.seats).is_some() {
            return Err(EngineError::DuplicateDiscipline {
                discipline: seat.discipline.clone(),
            });
        }
        accepted.insert(seat.discipline.clone(), Vec::new());
    }

    for candidacy in candidacies {
        if !remaining.contains_key(&candidacy.discipline) {
            return Err(EngineError::UnknownDiscipline {
                student: candidacy.student.clone(),
                discipline: candidacy.discipline.clone(),
            });
        }
    }

    let mut seated: BTreeSet<StudentName> = BTreeSet::new();

    for phase in Phase::ALL {
        // Seat table row order, not alphabetical: disciplines earlier in the
        // table get first claim on students eligible for several of them.
        for seat in seats {
            let open = remaining[&seat.discipline];
            if open == 0 {
                continue;
            }
            let ranking = ranking_for(candidacies, &seat.discipline, &seated);
            // The slice is cut once per (discipline, phase); admissions below
            // shrink the counter but never widen the slice.
            for candidacy in ranking.into_iter().take(open as usize) {
                if !phase.admits(candidacy.preference) {
                    continue;
                }
                // A student listing the same discipline in two slots would
                // otherwise be admitted twice from one slice.
                if !seated.insert(candidacy.student.clone()) {
                    continue;
                }
                accepted
                    .get_mut(&seat.discipline)
                    .expect("accepted entry exists for every seat discipline")
                    .push(candidacy.clone());
                *remaining
                    .get_mut(&seat.discipline)
                    .expect("remaining entry exists for every seat discipline") -= 1;
            }
        }
    }

    Ok(Allocation { accepted })
}
