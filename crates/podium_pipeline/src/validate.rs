//! Cross-reference validation before any computation.
//!
//! Deterministic findings in input order; the run proceeds only when no
//! Error-severity issue exists. The engine re-checks the fatal references
//! itself, so a caller skipping validation still cannot produce a silently
//! wrong table — it just gets a less helpful error.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use podium_core::{Discipline, StudentName};
use podium_io::LoadedTables;

/// Issue severity. Warnings never block a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Where the issue occurred.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityRef {
    Student(StudentName),
    Discipline(Discipline),
    StudentDiscipline(StudentName, Discipline),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Student(s) => write!(f, "student '{s}'"),
            EntityRef::Discipline(d) => write!(f, "discipline '{d}'"),
            EntityRef::StudentDiscipline(s, d) => write!(f, "student '{s}', discipline '{d}'"),
        }
    }
}

/// One validation finding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub where_: EntityRef,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.where_)
    }
}

/// Deterministic report: `pass` iff no Error; issue order is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    /// One line joining every Error finding, for error surfaces.
    pub fn summarize_errors(&self) -> String {
        let msgs: Vec<String> = self.errors().map(ValidationIssue::to_string).collect();
        if msgs.is_empty() {
            "no errors".to_string()
        } else {
            msgs.join("; ")
        }
    }
}

/// Top-level entry point.
pub fn validate(tables: &LoadedTables) -> ValidationReport {
    let mut issues: Vec<ValidationIssue> = Vec::new();

    check_grade_uniqueness(tables, &mut issues);
    check_seat_uniqueness(tables, &mut issues);
    check_enrollments(tables, &mut issues);

    let pass = !issues.iter().any(|i| i.severity == Severity::Error);
    ValidationReport { pass, issues }
}

fn check_grade_uniqueness(tables: &LoadedTables, issues: &mut Vec<ValidationIssue>) {
    let mut seen: BTreeSet<&StudentName> = BTreeSet::new();
    for record in &tables.grades {
        if !seen.insert(&record.student) {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                code: "grades.duplicate_student",
                message: "grade table has more than one row for this student".to_string(),
                where_: EntityRef::Student(record.student.clone()),
            });
        }
    }
}

fn check_seat_uniqueness(tables: &LoadedTables, issues: &mut Vec<ValidationIssue>) {
    let mut seen: BTreeSet<&Discipline> = BTreeSet::new();
    for seat in &tables.seats {
        if !seen.insert(&seat.discipline) {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                code: "seats.duplicate_discipline",
                message: "seat table lists this discipline more than once".to_string(),
                where_: EntityRef::Discipline(seat.discipline.clone()),
            });
        }
    }
}

fn check_enrollments(tables: &LoadedTables, issues: &mut Vec<ValidationIssue>) {
    let grades: BTreeMap<&StudentName, &podium_core::GradeRecord> =
        tables.grades.iter().map(|g| (&g.student, g)).collect();
    let seat_disciplines: BTreeSet<&Discipline> =
        tables.seats.iter().map(|s| &s.discipline).collect();

    let mut enrolled: BTreeSet<&StudentName> = BTreeSet::new();
    for enrollment in &tables.enrollments {
        if !enrolled.insert(&enrollment.student) {
            issues.push(ValidationIssue {
                severity: Severity::Warning,
                code: "enrollments.duplicate_student",
                message: "student enrolled more than once; all rows are processed".to_string(),
                where_: EntityRef::Student(enrollment.student.clone()),
            });
        }

        if enrollment.ranked_choices().next().is_none() {
            issues.push(ValidationIssue {
                severity: Severity::Warning,
                code: "enrollments.no_choices",
                message: "enrollment has no preference slots filled".to_string(),
                where_: EntityRef::Student(enrollment.student.clone()),
            });
        }

        let record = match grades.get(&enrollment.student) {
            Some(r) => *r,
            None => {
                issues.push(ValidationIssue {
                    severity: Severity::Error,
                    code: "enrollments.missing_grade_record",
                    message: "enrolled student has no grade record".to_string(),
                    where_: EntityRef::Student(enrollment.student.clone()),
                });
                continue;
            }
        };

        for (_, discipline) in enrollment.ranked_choices() {
            if !seat_disciplines.contains(discipline) {
                issues.push(ValidationIssue {
                    severity: Severity::Error,
                    code: "enrollments.unknown_discipline",
                    message: "preference names a discipline absent from the seat table"
                        .to_string(),
                    where_: EntityRef::StudentDiscipline(
                        enrollment.student.clone(),
                        discipline.clone(),
                    ),
                });
            }
            if record.grade_in(discipline).is_none() {
                issues.push(ValidationIssue {
                    severity: Severity::Error,
                    code: "enrollments.missing_discipline_grade",
                    message: "student has no grade in a discipline they applied to".to_string(),
                    where_: EntityRef::StudentDiscipline(
                        enrollment.student.clone(),
                        discipline.clone(),
                    ),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podium_core::{EnrollmentRecord, GradeRecord, SeatRecord};
    use podium_io::InputDigests;

    fn tables(
        grades: Vec<GradeRecord>,
        enrollments: Vec<EnrollmentRecord>,
        seats: Vec<SeatRecord>,
    ) -> LoadedTables {
        LoadedTables {
            grades,
            enrollments,
            seats,
            digests: InputDigests {
                grades_sha256: "0".repeat(64),
                enrollments_sha256: "0".repeat(64),
                seats_sha256: "0".repeat(64),
            },
            expect: None,
        }
    }

    fn grade(student: &str, disciplines: &[&str]) -> GradeRecord {
        GradeRecord {
            student: student.parse().unwrap(),
            overall_average: 8.0,
            grades: disciplines.iter().map(|d| (d.parse().unwrap(), 7.0)).collect(),
        }
    }

    fn enrollment(student: &str, first: Option<&str>) -> EnrollmentRecord {
        EnrollmentRecord {
            student: student.parse().unwrap(),
            registration: "R".parse().unwrap(),
            choices: [first.map(|d| d.parse().unwrap()), None, None],
        }
    }

    fn seat(discipline: &str) -> SeatRecord {
        SeatRecord { discipline: discipline.parse().unwrap(), seats: 1 }
    }

    #[test]
    fn clean_tables_pass() {
        let t = tables(
            vec![grade("Ana", &["A"])],
            vec![enrollment("Ana", Some("A"))],
            vec![seat("A")],
        );
        let report = validate(&t);
        assert!(report.pass);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn missing_grade_record_is_an_error() {
        let t = tables(vec![], vec![enrollment("Ana", Some("A"))], vec![seat("A")]);
        let report = validate(&t);
        assert!(!report.pass);
        assert!(report
            .errors()
            .any(|i| i.code == "enrollments.missing_grade_record"));
    }

    #[test]
    fn unknown_discipline_and_missing_grade_both_reported() {
        let t = tables(
            vec![grade("Ana", &["A"])],
            vec![enrollment("Ana", Some("B"))],
            vec![seat("A")],
        );
        let report = validate(&t);
        let codes: Vec<_> = report.errors().map(|i| i.code).collect();
        assert!(codes.contains(&"enrollments.unknown_discipline"));
        assert!(codes.contains(&"enrollments.missing_discipline_grade"));
    }

    #[test]
    fn warnings_do_not_block() {
        let t = tables(
            vec![grade("Ana", &["A"])],
            vec![enrollment("Ana", None), enrollment("Ana", Some("A"))],
            vec![seat("A")],
        );
        let report = validate(&t);
        assert!(report.pass);
        assert_eq!(report.issues.len(), 2); // no_choices + duplicate_student
    }

    #[test]
    fn duplicate_rows_in_key_tables_are_errors() {
        let t = tables(
            vec![grade("Ana", &["A"]), grade("Ana", &["A"])],
            vec![],
            vec![seat("A"), seat("A")],
        );
        let report = validate(&t);
        let codes: Vec<_> = report.errors().map(|i| i.code).collect();
        assert_eq!(codes, vec!["grades.duplicate_student", "seats.duplicate_discipline"]);
    }

    #[test]
    fn empty_inputs_pass() {
        let report = validate(&tables(vec![], vec![], vec![]));
        assert!(report.pass);
    }
}
