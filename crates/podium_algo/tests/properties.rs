//! Property tests for the allocator over small randomized cohorts.
//!
//! Grade values, seat counts, and preference slots are generated; every
//! student gets a grade in every discipline so candidacy building cannot
//! fail, and the properties are checked on the allocation output alone.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use podium_algo::{allocate, build_candidacies};
use podium_core::{Discipline, EnrollmentRecord, GradeRecord, SeatRecord, StudentName};

const DISCIPLINES: [&str; 4] = ["Algebra", "Biology", "Calculus", "Dynamics"];

#[derive(Debug, Clone)]
struct Cohort {
    grades: Vec<GradeRecord>,
    enrollments: Vec<EnrollmentRecord>,
    seats: Vec<SeatRecord>,
}

fn grade() -> impl Strategy<Value = f64> {
    // Plain school-scale grades; two decimals so score ties actually occur.
    (0u32..=1000).prop_map(|n| n as f64 / 100.0)
}

fn choice_slot() -> impl Strategy<Value = Option<usize>> {
    prop_oneof![Just(None), (0usize..DISCIPLINES.len()).prop_map(Some)]
}

fn cohort() -> impl Strategy<Value = Cohort> {
    let student = (
        proptest::collection::vec(grade(), DISCIPLINES.len()),
        grade(),
        proptest::array::uniform3(choice_slot()),
    );
    let seats = proptest::collection::vec(0u32..4, DISCIPLINES.len());

    (proptest::collection::vec(student, 0..12), seats).prop_map(|(students, seat_counts)| {
        let mut grades = Vec::new();
        let mut enrollments = Vec::new();
        for (i, (per_disc, average, slots)) in students.into_iter().enumerate() {
            let name: StudentName = format!("student-{i}").parse().unwrap();
            grades.push(GradeRecord {
                student: name.clone(),
                overall_average: average,
                grades: DISCIPLINES
                    .iter()
                    .zip(&per_disc)
                    .map(|(d, g)| (d.parse().unwrap(), *g))
                    .collect(),
            });
            enrollments.push(EnrollmentRecord {
                student: name,
                registration: format!("reg-{i}").parse().unwrap(),
                choices: slots.map(|s| s.map(|ix| DISCIPLINES[ix].parse().unwrap())),
            });
        }
        let seats = DISCIPLINES
            .iter()
            .zip(seat_counts)
            .map(|(d, n)| SeatRecord { discipline: d.parse().unwrap(), seats: n })
            .collect();
        Cohort { grades, enrollments, seats }
    })
}

proptest! {
    #[test]
    fn no_student_is_placed_twice(cohort in cohort()) {
        let cands = build_candidacies(&cohort.grades, &cohort.enrollments).unwrap();
        let alloc = allocate(&cands, &cohort.seats).unwrap();

        let mut seen = BTreeSet::new();
        for c in alloc.accepted.values().flatten() {
            prop_assert!(seen.insert(c.student.clone()), "{} placed twice", c.student);
        }
    }

    #[test]
    fn capacity_is_respected(cohort in cohort()) {
        let cands = build_candidacies(&cohort.grades, &cohort.enrollments).unwrap();
        let alloc = allocate(&cands, &cohort.seats).unwrap();

        let caps: BTreeMap<&Discipline, u32> =
            cohort.seats.iter().map(|s| (&s.discipline, s.seats)).collect();
        for (discipline, accepted) in &alloc.accepted {
            prop_assert!(accepted.len() as u32 <= caps[discipline]);
        }
    }

    #[test]
    fn open_seats_imply_no_eligible_candidate_remains(cohort in cohort()) {
        // If a discipline ends under capacity, every candidacy it did not
        // take must belong to a student seated somewhere else.
        let cands = build_candidacies(&cohort.grades, &cohort.enrollments).unwrap();
        let alloc = allocate(&cands, &cohort.seats).unwrap();

        let seated: BTreeSet<&StudentName> = alloc
            .accepted
            .values()
            .flatten()
            .map(|c| &c.student)
            .collect();

        for seat in &cohort.seats {
            let filled = alloc.accepted[&seat.discipline].len() as u32;
            if filled < seat.seats {
                for c in cands.iter().filter(|c| c.discipline == seat.discipline) {
                    prop_assert!(
                        seated.contains(&c.student),
                        "open seat in {} while {} is unseated",
                        seat.discipline,
                        c.student
                    );
                }
            }
        }
    }

    #[test]
    fn allocation_is_deterministic(cohort in cohort()) {
        let cands = build_candidacies(&cohort.grades, &cohort.enrollments).unwrap();
        let first = allocate(&cands, &cohort.seats).unwrap();
        let second = allocate(&cands, &cohort.seats).unwrap();
        prop_assert_eq!(first, second);
    }
}
