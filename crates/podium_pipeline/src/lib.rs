//! podium_pipeline — deterministic pipeline surface
//! (load → validate → candidacies → allocate → build result → summary).
//!
//! This crate stays free of terminal concerns: it delegates file parsing to
//! `podium_io`, math to `podium_core`/`podium_algo`, and rendering to
//! `podium_report`. One blocking call per run, no suspension points, no
//! partial results: a run either returns the whole output set or an error.

#![forbid(unsafe_code)]

use std::fmt;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use podium_algo::EngineError;
use podium_core::{Candidacy, Placement};
use podium_io::{IoError, LoadedTables};

pub mod build_result;
pub mod summary;
pub mod validate;

pub use summary::{DisciplineCount, RunSummary, RunTotals};
pub use validate::{EntityRef, Severity, ValidationIssue, ValidationReport};

/// Engine identifiers echoed into the run summary (baked by the build
/// system in packaged deployments).
#[derive(Debug, Clone, Serialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub build: String,
}

/// Default identifiers for ad-hoc invocations; the CLI overrides these
/// from its own environment.
pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        vendor: "podium".to_string(),
        name: "podium_engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: "dev".to_string(),
    }
}

/// Pipeline context: tables already loaded by `podium_io`.
#[derive(Debug)]
pub struct PipelineCtx {
    pub tables: LoadedTables,
    pub engine_meta: EngineMeta,
}

/// Everything a run produces.
#[derive(Debug)]
pub struct PipelineOutputs {
    /// The final placement table, ordered by (discipline, rank).
    pub placements: Vec<Placement>,
    /// The full candidacy set the allocator consumed (report input).
    pub candidacies: Vec<Candidacy>,
    pub summary: RunSummary,
}

/// Single error surface for pipeline orchestration.
#[derive(Debug)]
pub enum PipelineError {
    Io(IoError),
    /// Cross-reference validation failed; the report lists every finding.
    Validate(ValidationReport),
    Engine(EngineError),
    /// A manifest expectation (e.g. pinned engine version) was not met.
    Expectation(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(e) => write!(f, "{e}"),
            PipelineError::Validate(report) => {
                write!(f, "validation failed: {}", report.summarize_errors())
            }
            PipelineError::Engine(e) => write!(f, "{e}"),
            PipelineError::Expectation(msg) => write!(f, "expectation: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io(e) => Some(e),
            PipelineError::Engine(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IoError> for PipelineError {
    fn from(e: IoError) -> Self {
        PipelineError::Io(e)
    }
}

impl From<EngineError> for PipelineError {
    fn from(e: EngineError) -> Self {
        PipelineError::Engine(e)
    }
}

// -------------------------------- Public API --------------------------------

/// Run the whole pipeline on an already-loaded context.
pub fn run_with_ctx(ctx: PipelineCtx) -> Result<PipelineOutputs, PipelineError> {
    let tables = &ctx.tables;

    if let Some(expect) = &tables.expect {
        if let Some(wanted) = &expect.engine_version {
            if *wanted != ctx.engine_meta.version {
                return Err(PipelineError::Expectation(format!(
                    "manifest expects engine version {wanted}, this is {}",
                    ctx.engine_meta.version
                )));
            }
        }
    }

    tracing::info!(
        students = tables.grades.len(),
        enrollments = tables.enrollments.len(),
        disciplines = tables.seats.len(),
        "tables loaded"
    );

    let report = validate::validate(tables);
    for issue in &report.issues {
        match issue.severity {
            Severity::Error => tracing::error!(code = issue.code, "{issue}"),
            Severity::Warning => tracing::warn!(code = issue.code, "{issue}"),
        }
    }
    if !report.pass {
        return Err(PipelineError::Validate(report));
    }

    let candidacies = podium_algo::build_candidacies(&tables.grades, &tables.enrollments)?;
    tracing::info!(candidacies = candidacies.len(), "candidacies built");

    let allocation = podium_algo::allocate(&candidacies, &tables.seats)?;
    tracing::info!(placed = allocation.placed_count(), "allocation complete");

    let placements = build_result::build_result(&allocation);

    let summary = summary::build_run_summary(
        ctx.engine_meta,
        tables,
        &candidacies,
        &placements,
        Utc::now(),
    );

    Ok(PipelineOutputs { placements, candidacies, summary })
}

/// Convenience entry: load the three tables via a manifest, then run.
pub fn run_from_manifest_path(
    path: &Path,
    engine_meta: EngineMeta,
) -> Result<PipelineOutputs, PipelineError> {
    let tables = podium_io::load_all_from_manifest(path)?;
    run_with_ctx(PipelineCtx { tables, engine_meta })
}

/// Convenience entry: load the three tables from explicit paths, then run.
pub fn run_from_paths(
    grades: &Path,
    enrollments: &Path,
    seats: &Path,
    engine_meta: EngineMeta,
) -> Result<PipelineOutputs, PipelineError> {
    let tables = podium_io::load_all_from_paths(grades, enrollments, seats)?;
    run_with_ctx(PipelineCtx { tables, engine_meta })
}
