//! podium_algo — the allocation engine.
//!
//! Pure and deterministic: given the same grade records, enrollment records,
//! and seat counts, every function here returns the same value. No I/O, no
//! clocks, no RNG. Ties are broken by stable-sort emission order only.
//!
//! Stages, leaves first:
//! - `candidacy`: expand enrollments into merit-scored candidacies
//! - `ranking`: per-discipline merit ranking of unseated candidacies
//! - `phases`: the three-pass allocator over the seat table

#![forbid(unsafe_code)]

use core::fmt;

use podium_core::{Discipline, StudentName};

pub mod candidacy;
pub mod phases;
pub mod ranking;

pub use candidacy::build_candidacies;
pub use phases::{allocate, Allocation, Phase};
pub use ranking::ranking_for;

/// Fatal data-integrity errors raised by the engine.
///
/// Each variant carries enough context to fix the source data. The engine
/// never skips a broken reference silently and never produces a partial
/// result: the first error aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An enrollment references a student with no grade record.
    MissingGradeRecord { student: StudentName },
    /// A preference names a discipline the student has no grade in.
    MissingDisciplineGrade {
        student: StudentName,
        discipline: Discipline,
    },
    /// A preference names a discipline absent from the seat table.
    UnknownDiscipline {
        student: StudentName,
        discipline: Discipline,
    },
    /// The seat table lists the same discipline twice.
    DuplicateDiscipline { discipline: Discipline },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::MissingGradeRecord { student } => {
                write!(f, "no grade record for enrolled student '{student}'")
            }
            EngineError::MissingDisciplineGrade { student, discipline } => {
                write!(f, "student '{student}' has no grade in discipline '{discipline}'")
            }
            EngineError::UnknownDiscipline { student, discipline } => {
                write!(
                    f,
                    "preference of student '{student}' names discipline '{discipline}' absent from the seat table"
                )
            }
            EngineError::DuplicateDiscipline { discipline } => {
                write!(f, "seat table lists discipline '{discipline}' more than once")
            }
        }
    }
}

impl std::error::Error for EngineError {}
