//! `confmatrix validate` — structural checks on the active matrix.

use anyhow::{bail, Result};
use confmatrix_targets::matrix::validate_matrix;
use confmatrix_targets::MatrixFile;
use crate::manifest::MatrixSource;

/// Validate the matrix, printing every issue. Fails only on errors.
pub fn run(matrix: &MatrixFile, source: &MatrixSource) -> Result<()> {
    let issues = match validate_matrix(matrix) {
        Ok(()) => {
            let count = matrix.targets()?.len();
            println!("{source}: ok ({count} targets)");
            return Ok(());
        }
        Err(issues) => issues,
    };

    let mut errors = 0;
    for issue in &issues {
        if issue.severity == "error" {
            errors += 1;
        }
        println!("  {}: {}", issue.severity, issue.message);
    }

    if errors > 0 {
        bail!("{source}: {errors} error(s) found");
    }
    println!("{source}: ok with {} warning(s)", issues.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use confmatrix_targets::{Blob, TargetOverrides, Variant, VariantScope};

    #[test]
    fn default_matrix_is_valid() {
        assert!(run(&MatrixFile::default_matrix(), &MatrixSource::Builtin).is_ok());
    }

    #[test]
    fn errors_fail_the_command() {
        let matrix = MatrixFile::default();
        let err = run(&matrix, &MatrixSource::Builtin).unwrap_err();
        assert!(err.to_string().contains("1 error(s)"));
    }

    #[test]
    fn warnings_pass() {
        let mut matrix = MatrixFile::default_matrix();
        matrix.groups[0].variants = vec![Variant::new(
            VariantScope::Lead,
            TargetOverrides::new().blob(Blob::NoBlob),
        )];
        assert!(run(&matrix, &MatrixSource::Builtin).is_ok());

        // A matrix that validates must also list and describe.
        let rendered = crate::commands::target::render_list(
            &crate::commands::target::resolve_targets(&matrix).unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(rendered.lines().count(), 4);
        assert!(crate::commands::target::list(&matrix, &MatrixSource::Builtin, None).is_ok());
        assert!(crate::commands::target::describe(&matrix, "win64_MSVC_Debug_MSBuild").is_ok());
    }
}
