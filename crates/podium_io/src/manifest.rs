//! JSON run manifest: one file naming the three input tables.
//!
//! Plays the role of the original single-workbook input: callers can pass
//! one manifest instead of three separate paths. Offline posture applies —
//! any path containing a scheme is rejected before touching the
//! filesystem. Optional per-table digests are verified against the raw
//! file bytes, and `expect.engine_version` lets a packaged deployment pin
//! the engine it was prepared for.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{display_path, looks_like_url, IoError, IoResult};

/// External manifest accepted by the loader.
///
/// `id` is optional and non-normative; it is echoed in logs only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub id: Option<String>,

    /// Input table paths, commonly relative to the manifest's directory.
    pub grades_path: String,
    pub enrollments_path: String,
    pub seats_path: String,

    /// Optional sha256 digests (lowercase 64-hex) of the raw input files.
    #[serde(default)]
    pub inputs_sha256: Option<ManifestDigests>,

    /// Optional expectations, enforced before the run starts.
    #[serde(default)]
    pub expect: Option<Expectations>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestDigests {
    #[serde(default)]
    pub grades: Option<String>,
    #[serde(default)]
    pub enrollments: Option<String>,
    #[serde(default)]
    pub seats: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expectations {
    /// Expected engine version string (exact match).
    #[serde(default)]
    pub engine_version: Option<String>,
}

/// Manifest paths resolved against the manifest's directory.
#[derive(Debug, Clone)]
pub struct ResolvedManifest {
    pub grades_path: PathBuf,
    pub enrollments_path: PathBuf,
    pub seats_path: PathBuf,
    pub digests: Option<ManifestDigests>,
    pub expect: Option<Expectations>,
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> IoResult<Manifest> {
    let bytes = fs::read(path).map_err(|source| IoError::Read {
        path: display_path(path),
        source,
    })?;
    let manifest: Manifest = serde_json::from_slice(&bytes).map_err(|e| IoError::Json {
        path: display_path(path),
        msg: e.to_string(),
    })?;
    validate_shape(&manifest)?;
    Ok(manifest)
}

/// Shape and offline-policy checks that serde cannot express.
fn validate_shape(m: &Manifest) -> IoResult<()> {
    for (field, value) in [
        ("grades_path", &m.grades_path),
        ("enrollments_path", &m.enrollments_path),
        ("seats_path", &m.seats_path),
    ] {
        if value.trim().is_empty() {
            return Err(IoError::Manifest(format!("field must not be empty: {field}")));
        }
        if looks_like_url(value) {
            return Err(IoError::UrlPath(value.clone()));
        }
    }
    Ok(())
}

/// Resolve manifest-relative paths and require each input to be a file.
pub fn resolve_paths(manifest_path: &Path, m: &Manifest) -> IoResult<ResolvedManifest> {
    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let resolve = |rel: &str| -> IoResult<PathBuf> {
        let p = base.join(rel);
        let meta = fs::metadata(&p).map_err(|source| IoError::Read {
            path: display_path(&p),
            source,
        })?;
        if !meta.is_file() {
            return Err(IoError::Manifest(format!("not a file: {}", p.display())));
        }
        Ok(p)
    };

    Ok(ResolvedManifest {
        grades_path: resolve(&m.grades_path)?,
        enrollments_path: resolve(&m.enrollments_path)?,
        seats_path: resolve(&m.seats_path)?,
        digests: m.inputs_sha256.clone(),
        expect: m.expect.clone(),
    })
}
