//! podium_core — Core types, merit scoring, and deterministic ordering.
//!
//! This crate is **I/O-free**. It defines the stable types and pure helpers
//! used across the engine (`podium_io`, `podium_algo`, `podium_pipeline`,
//! `podium_report`, `podium_cli`):
//!
//! - Identifier newtypes: `StudentName`, `Registration`, `Discipline`
//! - Table records: grades, enrollments, seat counts
//! - Derived records: `Candidacy` (ephemeral) and `Placement` (output)
//! - Merit scoring and the output-boundary rounding rule
//! - Stable ordering helpers for merit rankings
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod ids;
pub mod merit;
pub mod ordering;
pub mod records;

pub use ids::{Discipline, IdError, Registration, StudentName};
pub use merit::{merit_score, round_merit};
pub use records::{
    Candidacy, EnrollmentRecord, GradeRecord, Placement, PreferenceRank, SeatRecord,
};
