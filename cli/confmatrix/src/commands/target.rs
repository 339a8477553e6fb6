//! `confmatrix list` / `confmatrix describe` — target listing and description.

use anyhow::{bail, Context, Result};
use confmatrix_targets::matrix::ensure_valid;
use confmatrix_targets::{plan_configurations, plan_to_json, MatrixFile, Target};

use crate::manifest::MatrixSource;

/// Resolve a matrix into its flat, validated target list.
pub(crate) fn resolve_targets(matrix: &MatrixFile) -> Result<Vec<Target>> {
    ensure_valid(matrix)?;
    let targets = matrix.targets().context("expanding target matrix")?;
    Ok(targets)
}

/// Render the target list, either as a table or as generator rows in JSON.
pub(crate) fn render_list(targets: &[Target], format: Option<&str>) -> Result<String> {
    let rows = plan_configurations(targets)?;
    match format.unwrap_or("text") {
        "json" => Ok(plan_to_json(&rows)?),
        "text" => {
            let mut out = String::new();
            for row in &rows {
                out.push_str(&format!(
                    "  {:<20} {:<36} {}\n",
                    row.name, row.directory, row.solution_platform
                ));
            }
            Ok(out)
        }
        other => bail!("unknown format '{other}' (expected text or json)"),
    }
}

/// List every target of the active matrix.
pub fn list(matrix: &MatrixFile, source: &MatrixSource, format: Option<&str>) -> Result<()> {
    let targets = resolve_targets(matrix)?;
    let rendered = render_list(&targets, format)?;
    if format == Some("json") {
        println!("{rendered}");
        return Ok(());
    }
    println!("Targets from {source}:");
    println!();
    print!("{rendered}");
    println!();
    println!("{} target(s). Use 'confmatrix describe <directory>' for details.", targets.len());
    Ok(())
}

/// Find a target by its directory name.
pub(crate) fn find_target(targets: &[Target], directory: &str) -> Option<Target> {
    targets
        .iter()
        .copied()
        .find(|t| t.directory_name() == directory)
}

/// Describe one target in detail.
pub fn describe(matrix: &MatrixFile, directory: &str) -> Result<()> {
    let targets = resolve_targets(matrix)?;
    let Some(target) = find_target(&targets, directory) else {
        bail!("unknown target: '{directory}'. Use 'confmatrix list' to see available targets.");
    };

    println!("=== Target: {target} ===");
    println!();
    println!("--- Dimensions ---");
    println!("  Platform:     {}", target.platform);
    println!("  Compiler:     {}", target.compiler);
    println!("  Dev env:      {}", target.dev_env);
    println!("  Optimization: {}", target.optimization);
    println!("  Blob:         {}", target.blob);
    println!("  Build system: {}", target.build_system);
    println!();
    println!("--- Generator ---");
    println!("  Name:              {}", target.display_name());
    println!("  Directory:         {}", target.directory_name());
    println!("  Solution platform: {}", target.solution_platform_name());
    println!("  Optimization kind: {:?}", target.canonical_optimization());
    Ok(())
}
