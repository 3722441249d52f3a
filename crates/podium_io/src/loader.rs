//! CSV loaders: three headered tables → typed records.
//!
//! Column conventions:
//! - grades: `student`, `overall_average`, then one column per discipline;
//!   a blank grade cell means "no grade in that discipline"
//! - enrollments: `student`, `registration`, `first_choice`,
//!   `second_choice`, `third_choice` (choices may be blank)
//! - seats: `discipline`, `seats`
//!
//! Row order of the seat table is preserved: the allocator visits
//! disciplines in that order. Every cell error carries (path, row, column)
//! so broken source data can be fixed without guesswork.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use podium_core::{
    Discipline, EnrollmentRecord, GradeRecord, IdError, Registration, SeatRecord, StudentName,
};

use crate::manifest::{self, Expectations};
use crate::{display_path, hasher, IoError, IoResult};

/// All three tables, loaded and typed, plus input fingerprints.
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub grades: Vec<GradeRecord>,
    pub enrollments: Vec<EnrollmentRecord>,
    pub seats: Vec<SeatRecord>,
    pub digests: InputDigests,
    /// Present only when loading went through a manifest that carried
    /// expectations; enforced by the caller.
    pub expect: Option<Expectations>,
}

/// Raw-byte fingerprints of the three inputs (echoed into the run summary).
#[derive(Debug, Clone, Serialize)]
pub struct InputDigests {
    pub grades_sha256: String,
    pub enrollments_sha256: String,
    pub seats_sha256: String,
}

// ----------------------------- Orchestration -----------------------------

/// Load everything from a manifest file: resolve paths, fingerprint,
/// verify expected digests, then parse the three tables.
pub fn load_all_from_manifest(path: &Path) -> IoResult<LoadedTables> {
    let m = manifest::load_manifest(path)?;
    let resolved = manifest::resolve_paths(path, &m)?;

    let digests = fingerprint(
        &resolved.grades_path,
        &resolved.enrollments_path,
        &resolved.seats_path,
    )?;

    if let Some(expected) = &resolved.digests {
        if let Some(d) = &expected.grades {
            hasher::verify_digest("grades", d, &digests.grades_sha256)?;
        }
        if let Some(d) = &expected.enrollments {
            hasher::verify_digest("enrollments", d, &digests.enrollments_sha256)?;
        }
        if let Some(d) = &expected.seats {
            hasher::verify_digest("seats", d, &digests.seats_sha256)?;
        }
    }

    Ok(LoadedTables {
        grades: load_grades(&resolved.grades_path)?,
        enrollments: load_enrollments(&resolved.enrollments_path)?,
        seats: load_seats(&resolved.seats_path)?,
        digests,
        expect: resolved.expect,
    })
}

/// Load everything from three explicit paths (no digest expectations).
pub fn load_all_from_paths(
    grades_path: &Path,
    enrollments_path: &Path,
    seats_path: &Path,
) -> IoResult<LoadedTables> {
    Ok(LoadedTables {
        grades: load_grades(grades_path)?,
        enrollments: load_enrollments(enrollments_path)?,
        seats: load_seats(seats_path)?,
        digests: fingerprint(grades_path, enrollments_path, seats_path)?,
        expect: None,
    })
}

fn fingerprint(grades: &Path, enrollments: &Path, seats: &Path) -> IoResult<InputDigests> {
    Ok(InputDigests {
        grades_sha256: hasher::sha256_file(grades)?,
        enrollments_sha256: hasher::sha256_file(enrollments)?,
        seats_sha256: hasher::sha256_file(seats)?,
    })
}

// ----------------------------- Targeted loaders -----------------------------

/// Grade table. Discipline columns are whatever headers remain after
/// `student` and `overall_average`; duplicates are rejected.
pub fn load_grades(path: &Path) -> IoResult<Vec<GradeRecord>> {
    let mut reader = csv_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, &e))?
        .clone();

    let student_ix = find_column(path, &headers, "student")?;
    let average_ix = find_column(path, &headers, "overall_average")?;

    let mut discipline_cols: Vec<(usize, Discipline)> = Vec::new();
    for (ix, header) in headers.iter().enumerate() {
        if ix == student_ix || ix == average_ix {
            continue;
        }
        let discipline: Discipline = header.parse().map_err(|e: IdError| IoError::BadHeader {
            path: display_path(path),
            header: header.to_owned(),
            msg: e.to_string(),
        })?;
        if discipline_cols.iter().any(|(_, d)| *d == discipline) {
            return Err(IoError::BadHeader {
                path: display_path(path),
                header: header.to_owned(),
                msg: "duplicate discipline column".to_owned(),
            });
        }
        discipline_cols.push((ix, discipline));
    }

    let mut out = Vec::new();
    for (row_ix, record) in reader.records().enumerate() {
        let row = row_ix as u64 + 2; // header is line 1
        let record = record.map_err(|e| csv_error(path, &e))?;

        let student: StudentName =
            parse_name(path, row, "student", record.get(student_ix).unwrap_or(""))?;
        let overall_average =
            parse_grade(path, row, "overall_average", record.get(average_ix).unwrap_or(""))?;

        let mut grades = BTreeMap::new();
        for (ix, discipline) in &discipline_cols {
            let cell = record.get(*ix).unwrap_or("");
            if cell.is_empty() {
                continue; // no grade in this discipline
            }
            let grade = parse_grade(path, row, discipline.as_str(), cell)?;
            grades.insert(discipline.clone(), grade);
        }

        out.push(GradeRecord { student, overall_average, grades });
    }
    Ok(out)
}

/// Enrollment table. Blank choice cells deserialize to `None`; slots stay
/// positional (a blank first choice never promotes the second).
pub fn load_enrollments(path: &Path) -> IoResult<Vec<EnrollmentRecord>> {
    #[derive(Debug, Deserialize)]
    struct Raw {
        student: String,
        registration: String,
        #[serde(default)]
        first_choice: Option<String>,
        #[serde(default)]
        second_choice: Option<String>,
        #[serde(default)]
        third_choice: Option<String>,
    }

    let mut reader = csv_reader(path)?;
    let mut out = Vec::new();
    for (row_ix, result) in reader.deserialize::<Raw>().enumerate() {
        let row = row_ix as u64 + 2;
        let raw = result.map_err(|e| csv_error(path, &e))?;

        let choices = [
            parse_choice(path, row, "first_choice", raw.first_choice)?,
            parse_choice(path, row, "second_choice", raw.second_choice)?,
            parse_choice(path, row, "third_choice", raw.third_choice)?,
        ];

        out.push(EnrollmentRecord {
            student: parse_name(path, row, "student", &raw.student)?,
            registration: parse_name::<Registration>(path, row, "registration", &raw.registration)?,
            choices,
        });
    }
    Ok(out)
}

/// Seat table, in file row order. Capacities must be non-negative
/// integers; anything else is rejected before allocation begins.
pub fn load_seats(path: &Path) -> IoResult<Vec<SeatRecord>> {
    #[derive(Debug, Deserialize)]
    struct Raw {
        discipline: String,
        seats: String,
    }

    let mut reader = csv_reader(path)?;
    let mut out = Vec::new();
    for (row_ix, result) in reader.deserialize::<Raw>().enumerate() {
        let row = row_ix as u64 + 2;
        let raw = result.map_err(|e| csv_error(path, &e))?;

        let seats: u32 = raw
            .seats
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 0)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| IoError::BadCapacity {
                path: display_path(path),
                row,
                value: raw.seats.clone(),
            })?;

        out.push(SeatRecord {
            discipline: parse_name(path, row, "discipline", &raw.discipline)?,
            seats,
        });
    }
    Ok(out)
}

// ----------------------------- Cell helpers -----------------------------

fn csv_reader(path: &Path) -> IoResult<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(path, &e))
}

fn csv_error(path: &Path, e: &csv::Error) -> IoError {
    IoError::Csv {
        path: display_path(path),
        msg: e.to_string(),
    }
}

fn find_column(path: &Path, headers: &csv::StringRecord, name: &'static str) -> IoResult<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(IoError::MissingColumn {
            path: display_path(path),
            column: name,
        })
}

fn parse_name<T>(path: &Path, row: u64, column: &str, value: &str) -> IoResult<T>
where
    T: FromStr<Err = IdError>,
{
    value.parse().map_err(|e: IdError| IoError::BadCell {
        path: display_path(path),
        row,
        column: column.to_owned(),
        value: value.to_owned(),
        msg: e.to_string(),
    })
}

fn parse_choice(
    path: &Path,
    row: u64,
    column: &str,
    value: Option<String>,
) -> IoResult<Option<Discipline>> {
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(v) => parse_name(path, row, column, v).map(Some),
    }
}

fn parse_grade(path: &Path, row: u64, column: &str, value: &str) -> IoResult<f64> {
    let bad = |msg: &str| IoError::BadCell {
        path: display_path(path),
        row,
        column: column.to_owned(),
        value: value.to_owned(),
        msg: msg.to_owned(),
    };
    let grade: f64 = value.parse().map_err(|_| bad("not a number"))?;
    if !grade.is_finite() {
        return Err(bad("grade must be finite"));
    }
    Ok(grade)
}

// ----------------------------- Tests -----------------------------
