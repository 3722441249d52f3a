//! podium_report — pure offline report model + renderers (JSON/HTML).
//!
//! Determinism rules:
//! - No I/O here. Callers supply finished pipeline outputs in memory.
//! - Stable section order and field names.
//! - No recomputation of allocation results: the model is assembled from
//!   the placement table and the candidacy set as given.
//!
//! Beyond the placement table itself, each discipline section carries the
//! complete merit-ordered candidate ranking (independent of allocation),
//! with students placed in a *different* discipline flagged — the
//! reviewer's view of who competed and where they ended up.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use podium_core::ordering::cmp_merit_desc;
use podium_core::{round_merit, Candidacy, Discipline, StudentName};
use podium_pipeline::PipelineOutputs;

// ===== Errors =====

#[derive(Debug)]
pub enum ReportError {
    Serialize(String),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Serialize(msg) => write!(f, "report serialization: {msg}"),
        }
    }
}

impl std::error::Error for ReportError {}

// ===== Model =====

#[derive(Debug, Clone, Serialize)]
pub struct ReportModel {
    pub title: String,
    pub generated_utc: String,
    pub totals: TotalsSection,
    pub disciplines: Vec<DisciplineSection>,
    pub integrity: IntegritySection,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsSection {
    pub students: usize,
    pub enrollments: usize,
    pub candidacies: usize,
    pub placements: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisciplineSection {
    pub discipline: Discipline,
    pub seats: u32,
    pub filled: u32,
    pub candidates: usize,
    pub placements: Vec<PlacementRow>,
    /// Every candidacy for the discipline, merit descending, regardless of
    /// allocation outcome.
    pub ranking: Vec<CandidateRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacementRow {
    pub rank: u32,
    pub student: StudentName,
    pub registration: String,
    pub merit: f64,
    pub preference: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateRow {
    pub student: StudentName,
    pub merit: f64,
    pub preference: &'static str,
    /// Set when the student was seated in a different discipline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placed_in: Option<Discipline>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegritySection {
    pub engine_vendor: String,
    pub engine_name: String,
    pub engine_version: String,
    pub engine_build: String,
    pub grades_sha256: String,
    pub enrollments_sha256: String,
    pub seats_sha256: String,
}

// ===== API =====

/// Build the report model from finished pipeline outputs (pure, offline).
pub fn build_model(outputs: &PipelineOutputs) -> ReportModel {
    let summary = &outputs.summary;

    // Where each placed student ended up, for the cross-discipline flag.
    let placed_in: BTreeMap<&StudentName, &Discipline> = outputs
        .placements
        .iter()
        .map(|p| (&p.student, &p.discipline))
        .collect();

    let disciplines = summary
        .disciplines
        .iter()
        .map(|count| {
            let placements: Vec<PlacementRow> = outputs
                .placements
                .iter()
                .filter(|p| p.discipline == count.discipline)
                .map(|p| PlacementRow {
                    rank: p.rank,
                    student: p.student.clone(),
                    registration: p.registration.to_string(),
                    merit: p.merit,
                    preference: p.preference.label(),
                })
                .collect();

            let mut entrants: Vec<&Candidacy> = outputs
                .candidacies
                .iter()
                .filter(|c| c.discipline == count.discipline)
                .collect();
            entrants.sort_by(|a, b| cmp_merit_desc(a.merit, b.merit));

            let ranking = entrants
                .iter()
                .map(|c| CandidateRow {
                    student: c.student.clone(),
                    merit: round_merit(c.merit),
                    preference: c.preference.label(),
                    placed_in: placed_in
                        .get(&c.student)
                        .filter(|d| ***d != count.discipline)
                        .map(|d| (*d).clone()),
                })
                .collect::<Vec<_>>();

            DisciplineSection {
                discipline: count.discipline.clone(),
                seats: count.seats,
                filled: count.filled,
                candidates: ranking.len(),
                placements,
                ranking,
            }
        })
        .collect();

    ReportModel {
        title: "Monitoria Placement Report".to_string(),
        generated_utc: summary.finished_utc.clone(),
        totals: TotalsSection {
            students: summary.totals.students,
            enrollments: summary.totals.enrollments,
            candidacies: summary.totals.candidacies,
            placements: summary.totals.placements,
        },
        disciplines,
        integrity: IntegritySection {
            engine_vendor: summary.engine.vendor.clone(),
            engine_name: summary.engine.name.clone(),
            engine_version: summary.engine.version.clone(),
            engine_build: summary.engine.build.clone(),
            grades_sha256: summary.inputs.grades_sha256.clone(),
            enrollments_sha256: summary.inputs.enrollments_sha256.clone(),
            seats_sha256: summary.inputs.seats_sha256.clone(),
        },
    }
}

// ===== Renderers =====

/// Serialize the model as JSON (deterministic field order via struct layout).
pub fn render_json(model: &ReportModel) -> Result<String, ReportError> {
    serde_json::to_string_pretty(model).map_err(|e| ReportError::Serialize(e.to_string()))
}

/// Render a compact, asset-free HTML summary.
pub fn render_html(model: &ReportModel) -> String {
    let mut html = String::new();

    let _ = writeln!(
        html,
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body>",
        esc(&model.title)
    );
    let _ = writeln!(html, "<h1>{}</h1>", esc(&model.title));
    let _ = writeln!(
        html,
        "<p>Students: {} | Enrollments: {} | Candidacies: {} | Placements: {}</p>",
        model.totals.students,
        model.totals.enrollments,
        model.totals.candidacies,
        model.totals.placements
    );

    for section in &model.disciplines {
        let _ = writeln!(
            html,
            "<h2>{}</h2><p>Seats: {} | Filled: {} | Candidates: {}</p>",
            esc(section.discipline.as_str()),
            section.seats,
            section.filled,
            section.candidates
        );

        if !section.placements.is_empty() {
            let _ = writeln!(html, "<h3>Placed</h3><ol>");
            for row in &section.placements {
                let _ = writeln!(
                    html,
                    "<li>{} ({}) — {:.4} — {}</li>",
                    esc(row.student.as_str()),
                    esc(&row.registration),
                    row.merit,
                    row.preference
                );
            }
            let _ = writeln!(html, "</ol>");
        }

        let _ = writeln!(html, "<h3>Full ranking</h3><ol>");
        for row in &section.ranking {
            let note = match &row.placed_in {
                Some(d) => format!(" — placed in {}", esc(d.as_str())),
                None => String::new(),
            };
            let _ = writeln!(
                html,
                "<li>{} — {:.4} — {}{}</li>",
                esc(row.student.as_str()),
                row.merit,
                row.preference,
                note
            );
        }
        let _ = writeln!(html, "</ol>");
    }

    let integ = &model.integrity;
    let _ = writeln!(
        html,
        "<h2>Integrity</h2><p>Engine: {}/{} v{} ({})</p>",
        esc(&integ.engine_vendor),
        esc(&integ.engine_name),
        esc(&integ.engine_version),
        esc(&integ.engine_build)
    );
    let _ = writeln!(
        html,
        "<p>Inputs: grades {} | enrollments {} | seats {}</p>",
        esc(&integ.grades_sha256),
        esc(&integ.enrollments_sha256),
        esc(&integ.seats_sha256)
    );
    let _ = writeln!(html, "<p>Generated: {}</p>", esc(&model.generated_utc));
    let _ = writeln!(html, "</body></html>");
    html
}

fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use podium_core::{EnrollmentRecord, GradeRecord, SeatRecord};
    use podium_io::{InputDigests, LoadedTables};
    use podium_pipeline::{engine_identifiers, run_with_ctx, PipelineCtx};

    fn outputs() -> PipelineOutputs {
        // Ana tops both disciplines; seated in A, flagged in B's ranking.
        let grades = vec![
            GradeRecord {
                student: "Ana".parse().unwrap(),
                overall_average: 9.0,
                grades: [("A".parse().unwrap(), 9.0), ("B".parse().unwrap(), 9.0)].into(),
            },
            GradeRecord {
                student: "Bia".parse().unwrap(),
                overall_average: 7.0,
                grades: [("B".parse().unwrap(), 7.0)].into(),
            },
        ];
        let enrollments = vec![
            EnrollmentRecord {
                student: "Ana".parse().unwrap(),
                registration: "R1".parse().unwrap(),
                choices: [Some("A".parse().unwrap()), Some("B".parse().unwrap()), None],
            },
            EnrollmentRecord {
                student: "Bia".parse().unwrap(),
                registration: "R2".parse().unwrap(),
                choices: [Some("B".parse().unwrap()), None, None],
            },
        ];
        let seats = vec![
            SeatRecord { discipline: "A".parse().unwrap(), seats: 1 },
            SeatRecord { discipline: "B".parse().unwrap(), seats: 1 },
        ];
        let tables = LoadedTables {
            grades,
            enrollments,
            seats,
            digests: InputDigests {
                grades_sha256: "a".repeat(64),
                enrollments_sha256: "b".repeat(64),
                seats_sha256: "c".repeat(64),
            },
            expect: None,
        };
        run_with_ctx(PipelineCtx { tables, engine_meta: engine_identifiers() }).unwrap()
    }

    #[test]
    fn rankings_flag_students_placed_elsewhere() {
        let model = build_model(&outputs());
        let section_b = model
            .disciplines
            .iter()
            .find(|s| s.discipline.as_str() == "B")
            .unwrap();

        // Full ranking lists both candidates even though only Bia is placed.
        assert_eq!(section_b.candidates, 2);
        assert_eq!(section_b.filled, 1);
        let ana = section_b
            .ranking
            .iter()
            .find(|r| r.student.as_str() == "Ana")
            .unwrap();
        assert_eq!(ana.placed_in.as_ref().unwrap().as_str(), "A");
        let bia = section_b
            .ranking
            .iter()
            .find(|r| r.student.as_str() == "Bia")
            .unwrap();
        assert!(bia.placed_in.is_none());
    }

    #[test]
    fn json_and_html_render() {
        let model = build_model(&outputs());
        let json = render_json(&model).unwrap();
        assert!(json.contains("\"Monitoria Placement Report\""));

        let html = render_html(&model);
        assert!(html.contains("<h2>A</h2>"));
        assert!(html.contains("placed in A"));
    }
}
