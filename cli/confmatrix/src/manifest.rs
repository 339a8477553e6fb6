//! `confmatrix.toml` discovery and loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use confmatrix_targets::matrix::{parse_matrix_toml, MATRIX_FILE_NAME};
use confmatrix_targets::MatrixFile;
use tracing::debug;

/// Where the active matrix came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixSource {
    /// A matrix file on disk.
    File(PathBuf),
    /// No file found; the built-in default targets are used.
    Builtin,
}

impl std::fmt::Display for MatrixSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixSource::File(path) => write!(f, "{}", path.display()),
            MatrixSource::Builtin => f.write_str("built-in defaults"),
        }
    }
}

/// Search upward from `start_dir` for a `confmatrix.toml`, parse it, and
/// return it along with the file's path.
pub fn find_and_load(start_dir: &Path) -> Result<Option<(MatrixFile, PathBuf)>> {
    let mut dir = start_dir.to_path_buf();
    loop {
        let candidate = dir.join(MATRIX_FILE_NAME);
        if candidate.is_file() {
            let matrix = load(&candidate)?;
            return Ok(Some((matrix, candidate)));
        }
        if !dir.pop() {
            break;
        }
    }
    Ok(None)
}

fn load(path: &Path) -> Result<MatrixFile> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_matrix_toml(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Resolve the matrix to operate on.
///
/// An explicit path must exist. Otherwise the nearest `confmatrix.toml` is
/// used, falling back to the built-in defaults.
pub fn resolve(cwd: &Path, explicit: Option<&Path>) -> Result<(MatrixFile, MatrixSource)> {
    if let Some(path) = explicit {
        let path = cwd.join(path);
        if !path.is_file() {
            anyhow::bail!("matrix file not found: {}", path.display());
        }
        let matrix = load(&path)?;
        return Ok((matrix, MatrixSource::File(path)));
    }
    match find_and_load(cwd)? {
        Some((matrix, path)) => Ok((matrix, MatrixSource::File(path))),
        None => {
            debug!(cwd = %cwd.display(), "no {MATRIX_FILE_NAME} found, using built-in defaults");
            Ok((MatrixFile::default_matrix(), MatrixSource::Builtin))
        }
    }
}
