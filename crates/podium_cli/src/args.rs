//! Deterministic, offline CLI argument surface.
//!
//! Rules:
//! - No networked paths: any scheme-looking argument (`http://`, `file://`)
//!   is rejected before the filesystem is touched.
//! - Exactly one of: `--manifest` XOR (`--grades` + `--enrollments` +
//!   `--seats`).
//! - `--validate-only` loads and cross-checks the tables without running
//!   the allocator or writing artifacts.

use std::{
    env, fs,
    io::Read,
    path::{Path, PathBuf},
};

use clap::Parser;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "podium",
    disable_help_subcommand = true,
    about = "Offline, deterministic monitoria placement engine"
)]
pub struct Args {
    // --- Mode selection ---
    /// Path to a JSON run manifest naming the three input tables
    /// (mutually exclusive with the explicit table flags).
    #[arg(long, conflicts_with_all = ["grades", "enrollments", "seats"])]
    pub manifest: Option<PathBuf>,

    // --- Explicit mode (when --manifest is not used) ---
    /// Grade table CSV path.
    #[arg(long)]
    pub grades: Option<PathBuf>,
    /// Enrollment table CSV path.
    #[arg(long)]
    pub enrollments: Option<PathBuf>,
    /// Seat table CSV path.
    #[arg(long)]
    pub seats: Option<PathBuf>,

    // --- Output & rendering ---
    /// Output directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// Report renderer(s) to emit alongside the result table.
    #[arg(long, value_parser = ["json", "html"], num_args = 0..=2)]
    pub render: Vec<String>,

    // --- Control ---
    /// Load and validate inputs only; do not allocate or write artifacts.
    #[arg(long)]
    pub validate_only: bool,

    /// Suppress non-essential stderr output.
    #[arg(long)]
    pub quiet: bool,

    /// Verbose stage logging.
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,
}

/// Errors surfaced by argument validation.
/// Messages are short and stable (handy for scripts and tests).
#[derive(Debug)]
pub enum CliError {
    Missing(&'static str),
    NonLocalPath(String),
    NotFound(String),
    ManifestQuick(&'static str),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            Missing(s) => write!(f, "missing required flag: {s}"),
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
            ManifestQuick(s) => write!(f, "manifest quick-check failed: {s}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Entry point used by main.rs.
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Split from `parse_and_validate` so tests can drive it without a process.
pub fn validate(mut args: Args) -> Result<Args, CliError> {
    for p in iter_all_paths(&args) {
        ensure_local_path(p)?;
    }

    if args.manifest.is_some() {
        validate_manifest_mode(&args)?;
        args.manifest = args.manifest.take().map(|p| normalize_path(&p));
    } else {
        validate_explicit_mode(&args)?;
        args.grades = args.grades.take().map(|p| normalize_path(&p));
        args.enrollments = args.enrollments.take().map(|p| normalize_path(&p));
        args.seats = args.seats.take().map(|p| normalize_path(&p));
    }

    // Normalize output directory even if it doesn't exist yet.
    args.out = normalize_path(&args.out);
    Ok(args)
}

/// Manifest mode: require a local file and quick-check the minimal shape.
fn validate_manifest_mode(a: &Args) -> Result<(), CliError> {
    let path = a.manifest.as_ref().ok_or(CliError::Missing("--manifest"))?;
    ensure_local_exists(path, "--manifest")?;

    // Bounded read for the quick-check (no JSON parse here).
    const MAX_BYTES: usize = 4 * 1024 * 1024;
    let mut f = fs::File::open(path)
        .map_err(|_| CliError::NotFound(format!("--manifest {}", path.display())))?;
    let mut buf = Vec::new();
    f.take(MAX_BYTES as u64)
        .read_to_end(&mut buf)
        .map_err(|_| CliError::ManifestQuick("unable to read manifest file"))?;

    quick_check_manifest_bytes(&buf)
}

/// Explicit mode: all three table flags, each a local existing file.
fn validate_explicit_mode(a: &Args) -> Result<(), CliError> {
    let grades = a.grades.as_ref().ok_or(CliError::Missing("--grades"))?;
    let enrollments = a.enrollments.as_ref().ok_or(CliError::Missing("--enrollments"))?;
    let seats = a.seats.as_ref().ok_or(CliError::Missing("--seats"))?;

    ensure_local_exists(grades, "--grades")?;
    ensure_local_exists(enrollments, "--enrollments")?;
    ensure_local_exists(seats, "--seats")?;
    Ok(())
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://")
        || lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    ensure_local_path(p)?;
    let meta =
        fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

fn iter_all_paths(args: &Args) -> impl Iterator<Item = &Path> {
    [
        args.manifest.as_deref(),
        args.grades.as_deref(),
        args.enrollments.as_deref(),
        args.seats.as_deref(),
        Some(args.out.as_path()),
    ]
    .into_iter()
    .flatten()
}

/// Best-effort normalization to an absolute path.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}

/// Lightweight manifest quick-check (no JSON parsing):
/// - the three `*_path` keys must be present
/// - reject any `http://`, `https://`, or `file://` substring (offline only)
pub fn quick_check_manifest_bytes(bytes: &[u8]) -> Result<(), CliError> {
    let text =
        std::str::from_utf8(bytes).map_err(|_| CliError::ManifestQuick("manifest must be UTF-8"))?;

    for key in ["\"grades_path\"", "\"enrollments_path\"", "\"seats_path\""] {
        if !text.contains(key) {
            return Err(CliError::ManifestQuick("missing one of grades_path/enrollments_path/seats_path"));
        }
    }
    if text.contains("http://") || text.contains("https://") || text.contains("file://") {
        return Err(CliError::ManifestQuick("URLs are not allowed (offline only)"));
    }
    Ok(())
}
