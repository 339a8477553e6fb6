//! `confmatrix init` — write a starter matrix file.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use confmatrix_targets::matrix::{generate_template, MATRIX_FILE_NAME};

/// Write `confmatrix.toml` into `dir`, with one group called `group`.
pub fn run(dir: &Path, group: &str) -> Result<()> {
    let path = dir.join(MATRIX_FILE_NAME);
    if path.exists() {
        bail!("'{}' already exists", path.display());
    }

    let content = generate_template(group).context("generating matrix template")?;
    fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}
