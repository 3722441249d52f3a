//! Artifact writers: the result table as CSV, summaries as JSON.
//!
//! Output is deterministic: fixed column order, merit printed with exactly
//! four decimals, rows in the order the formatter produced them. Callers
//! only write after the whole run has succeeded; there is no partial
//! output.

use std::fs;
use std::path::Path;

use serde::Serialize;

use podium_core::Placement;

use crate::{display_path, IoError, IoResult};

const RESULT_HEADER: [&str; 8] = [
    "discipline",
    "rank",
    "student",
    "registration",
    "merit",
    "preference",
    "discipline_grade",
    "overall_average",
];

/// Write the placement table to `path`.
pub fn write_result_csv(path: &Path, placements: &[Placement]) -> IoResult<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| IoError::Csv {
        path: display_path(path),
        msg: e.to_string(),
    })?;

    let write_err = |e: csv::Error| IoError::Csv {
        path: display_path(path),
        msg: e.to_string(),
    };

    writer.write_record(RESULT_HEADER).map_err(write_err)?;
    for p in placements {
        let rank = p.rank.to_string();
        let merit = format!("{:.4}", p.merit);
        let discipline_grade = p.discipline_grade.to_string();
        let overall_average = p.overall_average.to_string();
        let row: [&str; 8] = [
            p.discipline.as_str(),
            &rank,
            p.student.as_str(),
            p.registration.as_str(),
            &merit,
            p.preference.label(),
            &discipline_grade,
            &overall_average,
        ];
        writer.write_record(row).map_err(write_err)?;
    }
    writer.flush().map_err(|source| IoError::Write {
        path: display_path(path),
        source,
    })
}

/// Write any serializable artifact as pretty-printed JSON.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> IoResult<()> {
    let mut bytes = serde_json::to_vec_pretty(value).map_err(|e| IoError::Json {
        path: display_path(path),
        msg: e.to_string(),
    })?;
    bytes.push(b'\n');
    fs::write(path, bytes).map_err(|source| IoError::Write {
        path: display_path(path),
        source,
    })
}
