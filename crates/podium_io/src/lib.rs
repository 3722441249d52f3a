//! podium_io — file I/O for the podium engine.
//!
//! Strictly offline: local files only, URL-like paths are rejected at the
//! manifest layer. Reading is split per concern:
//!
//! - `manifest`: JSON run manifest naming the three input tables
//! - `loader`: CSV → typed table records, with row/column error context
//! - `hasher`: SHA-256 digests of input bytes (echoed into the run summary)
//! - `writer`: result table (CSV) and JSON artifacts
//!
//! All loaders fail on the first malformed cell; there is no partial load.

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod hasher;
pub mod loader;
pub mod manifest;
pub mod writer;

pub use loader::{load_all_from_manifest, load_all_from_paths, InputDigests, LoadedTables};

/// Unified error for podium_io.
///
/// Paths are carried as display strings so messages stay printable as-is.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv {path}: {msg}")]
    Csv { path: String, msg: String },

    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: String, column: &'static str },

    #[error("{path}: invalid header '{header}': {msg}")]
    BadHeader { path: String, header: String, msg: String },

    #[error("{path} row {row}, column '{column}': invalid value '{value}': {msg}")]
    BadCell {
        path: String,
        row: u64,
        column: String,
        value: String,
        msg: String,
    },

    #[error("{path} row {row}: seat capacity must be a non-negative integer, got '{value}'")]
    BadCapacity { path: String, row: u64, value: String },

    #[error("manifest: {0}")]
    Manifest(String),

    #[error("json {path}: {msg}")]
    Json { path: String, msg: String },

    #[error("digest for {label} is not 64 lowercase hex characters")]
    DigestShape { label: &'static str },

    #[error("digest mismatch for {label}: manifest says {expected}, computed {actual}")]
    DigestMismatch {
        label: &'static str,
        expected: String,
        actual: String,
    },

    #[error("path must be a local file (no scheme): {0}")]
    UrlPath(String),
}

pub type IoResult<T> = Result<T, IoError>;

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url(s: &str) -> bool {
    s.trim().contains("://")
}

/// Render a path for error messages.
#[inline]
pub(crate) fn display_path(path: &std::path::Path) -> String {
    path.display().to_string()
}
