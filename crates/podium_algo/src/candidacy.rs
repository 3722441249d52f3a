//! Candidacy Builder: expand enrollments into merit-scored candidacies.
//!
//! Emission order is load-bearing: candidacies come out in enrollment row
//! order, slots in positional order within a row. Every later stable sort
//! falls back to this order on merit ties.

use std::collections::BTreeMap;

use podium_core::{merit_score, Candidacy, EnrollmentRecord, GradeRecord, StudentName};

use crate::EngineError;

/// Build the full candidacy set for one run.
///
/// For each enrollment, each non-empty preference slot (first, second,
/// third) yields exactly one candidacy; empty slots are skipped without
/// blocking later slots. A student with no grade record, or with no grade
/// in a named discipline, aborts the run with a reported error.
pub fn build_candidacies(
    grades: &[GradeRecord],
    enrollments: &[EnrollmentRecord],
) -> Result<Vec<Candidacy>, EngineError> {
    // First record wins on duplicates; validation flags those upstream.
    let by_student: BTreeMap<&StudentName, &GradeRecord> =
        grades.iter().rev().map(|g| (&g.student, g)).collect();

    let mut out = Vec::new();
    for enrollment in enrollments {
        let record =
            by_student
                .get(&enrollment.student)
                .copied()
                .ok_or_else(|| EngineError::MissingGradeRecord {
                    student: enrollment.student.clone(),
                })?;

        for (rank, discipline) in enrollment.ranked_choices() {
            let discipline_grade =
                record
                    .grade_in(discipline)
                    .ok_or_else(|| EngineError::MissingDisciplineGrade {
                        student: enrollment.student.clone(),
                        discipline: discipline.clone(),
                    })?;

            out.push(Candidacy {
                student: enrollment.student.clone(),
                registration: enrollment.registration.clone(),
                discipline: discipline.clone(),
                preference: rank,
                merit: merit_score(discipline_grade, record.overall_average),
                discipline_grade,
                overall_average: record.overall_average,
            });
        }
    }
    Ok(out)
}
