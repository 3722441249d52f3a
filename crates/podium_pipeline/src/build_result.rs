//! Result formatting: accepted candidacies → the final placement table.
//!
//! Phases interleave across disciplines, so accepted lists are not in final
//! order; each discipline is re-sorted (stable, merit descending) before
//! ranks are assigned. Merit is rounded here and nowhere earlier.

use podium_core::ordering::cmp_merit_desc;
use podium_core::{round_merit, Candidacy, Placement};

use podium_algo::Allocation;

/// Build the output table, ordered by (discipline, rank) ascending.
pub fn build_result(allocation: &Allocation) -> Vec<Placement> {
    let mut rows = Vec::with_capacity(allocation.placed_count());

    // BTreeMap iteration yields disciplines in ascending order, which is
    // exactly the outer sort key of the output table.
    for (discipline, accepted) in &allocation.accepted {
        let mut ordered: Vec<&Candidacy> = accepted.iter().collect();
        ordered.sort_by(|a, b| cmp_merit_desc(a.merit, b.merit));

        for (ix, candidacy) in ordered.iter().enumerate() {
            rows.push(Placement {
                discipline: discipline.clone(),
                rank: ix as u32 + 1,
                student: candidacy.student.clone(),
                registration: candidacy.registration.clone(),
                merit: round_merit(candidacy.merit),
                preference: candidacy.preference,
                discipline_grade: candidacy.discipline_grade,
                overall_average: candidacy.overall_average,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use podium_core::PreferenceRank;
    use std::collections::BTreeMap;

    fn cand(student: &str, discipline: &str, rank: PreferenceRank, merit: f64) -> Candidacy {
        Candidacy {
            student: student.parse().unwrap(),
            registration: "R".parse().unwrap(),
            discipline: discipline.parse().unwrap(),
            preference: rank,
            merit,
            discipline_grade: 9.0,
            overall_average: 8.0,
        }
    }

    fn allocation(lists: Vec<(&str, Vec<Candidacy>)>) -> Allocation {
        let accepted: BTreeMap<_, _> = lists
            .into_iter()
            .map(|(d, v)| (d.parse().unwrap(), v))
            .collect();
        Allocation { accepted }
    }

    #[test]
    fn reorders_within_discipline_and_assigns_ranks() {
        // Admission order from interleaved phases; merit order differs.
        let alloc = allocation(vec![(
            "A",
            vec![
                cand("Low", "A", PreferenceRank::First, 6.0),
                cand("High", "A", PreferenceRank::Second, 9.0),
            ],
        )]);
        let rows = build_result(&alloc);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].student.as_str(), rows[0].rank), ("High", 1));
        assert_eq!((rows[1].student.as_str(), rows[1].rank), ("Low", 2));
    }

    #[test]
    fn table_is_ordered_by_discipline_then_rank() {
        let alloc = allocation(vec![
            ("B", vec![cand("Bia", "B", PreferenceRank::First, 7.0)]),
            (
                "A",
                vec![
                    cand("Ana", "A", PreferenceRank::First, 8.0),
                    cand("Caio", "A", PreferenceRank::Third, 7.5),
                ],
            ),
        ]);
        let rows = build_result(&alloc);
        let keys: Vec<_> = rows.iter().map(|r| (r.discipline.as_str(), r.rank)).collect();
        assert_eq!(keys, vec![("A", 1), ("A", 2), ("B", 1)]);
    }

    #[test]
    fn merit_is_rounded_to_four_decimals_here_only() {
        let merit = (2.0 * 9.0 + 8.0) / 3.0; // 8.666...
        let alloc = allocation(vec![("A", vec![cand("Ana", "A", PreferenceRank::First, merit)])]);
        let rows = build_result(&alloc);
        assert_eq!(rows[0].merit, 8.6667);
    }

    #[test]
    fn ties_keep_admission_order() {
        let alloc = allocation(vec![(
            "A",
            vec![
                cand("First-in", "A", PreferenceRank::First, 8.0),
                cand("Second-in", "A", PreferenceRank::First, 8.0),
            ],
        )]);
        let rows = build_result(&alloc);
        assert_eq!(rows[0].student.as_str(), "First-in");
        assert_eq!(rows[1].student.as_str(), "Second-in");
    }

    #[test]
    fn empty_disciplines_produce_no_rows() {
        let alloc = allocation(vec![("A", vec![])]);
        assert!(build_result(&alloc).is_empty());
    }
}
