//! podium — offline, deterministic CLI for the monitoria placement engine.
//!
//! Wires up exit codes, typed error mapping, tracing setup, the
//! validate-only short-circuit, and the full run path
//! (engine meta → load → pipeline → artifacts → optional rendering).

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    /// Argument, manifest, or cross-reference validation failures.
    pub const VALIDATION: i32 = 2;
    /// Filesystem read/write failures.
    pub const IO: i32 = 4;
    /// Data-integrity failures inside the engine.
    pub const ENGINE: i32 = 5;
}

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use args::{parse_and_validate as parse_cli, Args};
use podium_io::{loader, writer, IoError};
use podium_pipeline::{
    run_from_manifest_path, run_from_paths, validate, EngineMeta, PipelineError, PipelineOutputs,
};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Io(String),
    Engine(String),
    Render(String),
}

fn main() -> ExitCode {
    let cli = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("podium: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };

    init_tracing(&cli);
    tracing::debug!(?cli, "parsed arguments");

    let rc = if cli.validate_only {
        match validate_only(&cli) {
            Ok(()) => exitcodes::OK,
            Err(e) => report(&e),
        }
    } else {
        match run_once(&cli) {
            Ok(()) => exitcodes::OK,
            Err(e) => report(&e),
        }
    };

    ExitCode::from(rc as u8)
}

fn init_tracing(cli: &Args) {
    let default = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Engine identifiers (overridable by the build system).
fn engine_meta() -> EngineMeta {
    EngineMeta {
        vendor: option_env!("PODIUM_ENGINE_VENDOR").unwrap_or("podium").to_string(),
        name: option_env!("PODIUM_ENGINE_NAME")
            .unwrap_or(env!("CARGO_PKG_NAME"))
            .to_string(),
        version: option_env!("PODIUM_ENGINE_VERSION")
            .unwrap_or(env!("CARGO_PKG_VERSION"))
            .to_string(),
        build: option_env!("PODIUM_ENGINE_BUILD").unwrap_or("dev").to_string(),
    }
}

/// Validate-only path: load the tables and run cross-reference checks,
/// but never the allocator. Prints findings to stderr.
fn validate_only(cli: &Args) -> Result<(), MainError> {
    let tables = load_tables(cli)?;
    let report = validate::validate(&tables);
    for issue in &report.issues {
        eprintln!("podium: {:?}: {issue}", issue.severity);
    }
    if !report.pass {
        return Err(MainError::Validation(report.summarize_errors()));
    }
    if !cli.quiet {
        eprintln!("validate-only: inputs OK");
    }
    Ok(())
}

fn run_once(cli: &Args) -> Result<(), MainError> {
    let outs = if let Some(manifest) = &cli.manifest {
        run_from_manifest_path(manifest, engine_meta()).map_err(map_pipeline_err)?
    } else {
        run_from_paths(
            cli.grades.as_ref().expect("args validated: --grades"),
            cli.enrollments.as_ref().expect("args validated: --enrollments"),
            cli.seats.as_ref().expect("args validated: --seats"),
            engine_meta(),
        )
        .map_err(map_pipeline_err)?
    };

    write_artifacts(&cli.out, &outs)?;
    maybe_render_reports(cli, &outs)?;

    if !cli.quiet {
        eprintln!("run: artifacts written to {}", cli.out.display());
    }
    Ok(())
}

fn load_tables(cli: &Args) -> Result<podium_io::LoadedTables, MainError> {
    let loaded = if let Some(manifest) = &cli.manifest {
        loader::load_all_from_manifest(manifest)
    } else {
        loader::load_all_from_paths(
            cli.grades.as_ref().expect("args validated: --grades"),
            cli.enrollments.as_ref().expect("args validated: --enrollments"),
            cli.seats.as_ref().expect("args validated: --seats"),
        )
    };
    loaded.map_err(map_io_err)
}

fn write_artifacts(out_dir: &Path, outs: &PipelineOutputs) -> Result<(), MainError> {
    fs::create_dir_all(out_dir)
        .map_err(|e| MainError::Io(format!("mkdir {}: {e}", out_dir.display())))?;

    writer::write_result_csv(&out_dir.join("result.csv"), &outs.placements)
        .map_err(map_io_err)?;
    writer::write_json_file(&out_dir.join("run_summary.json"), &outs.summary)
        .map_err(map_io_err)?;
    Ok(())
}

fn maybe_render_reports(cli: &Args, outs: &PipelineOutputs) -> Result<(), MainError> {
    if cli.render.is_empty() {
        return Ok(());
    }

    let model = podium_report::build_model(outs);
    for fmt in &cli.render {
        match fmt.as_str() {
            "json" => {
                let json = podium_report::render_json(&model)
                    .map_err(|e| MainError::Render(e.to_string()))?;
                fs::write(cli.out.join("report.json"), json)
                    .map_err(|e| MainError::Io(format!("write report.json: {e}")))?;
            }
            "html" => {
                let html = podium_report::render_html(&model);
                fs::write(cli.out.join("report.html"), html)
                    .map_err(|e| MainError::Io(format!("write report.html: {e}")))?;
            }
            other => return Err(MainError::Render(format!("unknown renderer: {other}"))),
        }
    }
    Ok(())
}

/// Map our typed errors onto the exit-code table, logging the message.
fn report(e: &MainError) -> i32 {
    use exitcodes::*;
    let (code, msg) = match e {
        MainError::Validation(m) => (VALIDATION, m),
        MainError::Io(m) => (IO, m),
        MainError::Engine(m) => (ENGINE, m),
        MainError::Render(m) => (IO, m),
    };
    eprintln!("podium: error: {msg}");
    code
}

fn map_io_err(e: IoError) -> MainError {
    use IoError::*;
    match e {
        // Shape/reference problems in the inputs.
        Csv { .. } | MissingColumn { .. } | BadHeader { .. } | BadCell { .. }
        | BadCapacity { .. } | Manifest(_) | Json { .. } | DigestShape { .. }
        | DigestMismatch { .. } | UrlPath(_) => MainError::Validation(e.to_string()),
        // Filesystem problems.
        Read { .. } | Write { .. } => MainError::Io(e.to_string()),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Io(io) => map_io_err(io),
        PipelineError::Validate(report) => MainError::Validation(report.summarize_errors()),
        PipelineError::Engine(err) => MainError::Engine(err.to_string()),
        PipelineError::Expectation(msg) => MainError::Validation(msg),
    }
}
