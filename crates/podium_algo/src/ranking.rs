//! Per-discipline merit ranking of unseated candidacies.
//!
//! Rankings are recomputed fresh for every (discipline, phase) pair; a
//! ranking taken before the seated set or seat counters changed is invalid
//! and must never be reused.

use std::collections::BTreeSet;

use podium_core::ordering::cmp_merit_desc;
use podium_core::{Candidacy, Discipline, StudentName};

/// All candidacies for `discipline` whose student is not yet seated,
/// sorted by merit descending.
///
/// The sort is stable: equal scores keep builder emission order.
pub fn ranking_for<'a>(
    candidacies: &'a [Candidacy],
    discipline: &Discipline,
    seated: &BTreeSet<StudentName>,
) -> Vec<&'a Candidacy> {
    let mut ranked: Vec<&Candidacy> = candidacies
        .iter()
        .filter(|c| c.discipline == *discipline && !seated.contains(&c.student))
        .collect();
    ranked.sort_by(|a, b| cmp_merit_desc(a.merit, b.merit));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use podium_core::PreferenceRank;

    fn cand(student: &str, discipline: &str, merit: f64) -> Candidacy {
        Candidacy {
            student: student.parse().unwrap(),
            registration: "R".parse().unwrap(),
            discipline: discipline.parse().unwrap(),
            preference: PreferenceRank::First,
            merit,
            discipline_grade: merit,
            overall_average: merit,
        }
    }

    #[test]
    fn filters_discipline_and_seated_then_sorts() {
        let cands = vec![
            cand("Ana", "A", 7.0),
            cand("Bia", "B", 9.9),
            cand("Caio", "A", 9.0),
            cand("Davi", "A", 8.0),
        ];
        let seated: BTreeSet<StudentName> = ["Davi".parse().unwrap()].into();

        let ranked = ranking_for(&cands, &"A".parse().unwrap(), &seated);
        let names: Vec<_> = ranked.iter().map(|c| c.student.as_str()).collect();
        assert_eq!(names, vec!["Caio", "Ana"]);
    }

    #[test]
    fn equal_scores_keep_emission_order() {
        let cands = vec![
            cand("Ana", "A", 8.0),
            cand("Bia", "A", 8.0),
            cand("Caio", "A", 8.0),
        ];
        let ranked = ranking_for(&cands, &"A".parse().unwrap(), &BTreeSet::new());
        let names: Vec<_> = ranked.iter().map(|c| c.student.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bia", "Caio"]);
    }
}
