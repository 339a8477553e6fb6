//! TOML parsing, serialization, and validation for matrix files.
//!
//! A matrix file lists target groups. Each group is a template plus optional
//! variants derived from it by override. The CLI reads the project's
//! `confmatrix.toml`; the library only deals with strings and paths.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::defaults;
use crate::dimension::{
    Blob, BuildSystem, Compiler, DevEnv, DimensionSet, Optimization, Platform,
};
use crate::error::{Result, TargetError};
use crate::target::{Target, TargetOverrides};
use crate::template::TargetTemplate;

/// Conventional file name of a project's matrix file.
pub const MATRIX_FILE_NAME: &str = "confmatrix.toml";

/// A whole matrix file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MatrixFile {
    #[serde(default)]
    pub settings: MatrixSettings,
    /// Target groups, expanded in order.
    #[serde(default)]
    pub groups: Vec<TargetGroup>,
}

/// File-wide settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MatrixSettings {
    /// Development environment used by groups that do not name one.
    #[serde(default)]
    pub dev_env: DevEnv,
}

/// One template and the variants derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetGroup {
    pub name: String,
    pub platform: DimensionSet<Platform>,
    pub compiler: DimensionSet<Compiler>,
    /// Falls back to `settings.dev-env` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_env: Option<DimensionSet<DevEnv>>,
    pub optimization: DimensionSet<Optimization>,
    pub blob: DimensionSet<Blob>,
    pub build_system: DimensionSet<BuildSystem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Variant>,
}

/// Which base targets a variant is derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantScope {
    /// One variant, derived from the group's lead target.
    #[default]
    Lead,
    /// One variant per base target.
    Each,
}

/// A variant of a group, derived by override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Variant {
    #[serde(default)]
    pub scope: VariantScope,
    #[serde(flatten)]
    pub overrides: TargetOverrides,
    /// Keys that name no dimension, usually misspellings. Reported by
    /// [`validate_matrix`].
    #[serde(flatten)]
    pub unknown: BTreeMap<String, toml::Value>,
}

impl Variant {
    /// A variant with the given scope and overrides.
    pub fn new(scope: VariantScope, overrides: TargetOverrides) -> Self {
        Self {
            scope,
            overrides,
            unknown: BTreeMap::new(),
        }
    }
}

/// A validation issue found in a matrix file.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl TargetGroup {
    /// The group's base template, resolving the dev-env fallback.
    pub fn template(&self, settings: &MatrixSettings) -> TargetTemplate {
        TargetTemplate {
            platform: self.platform,
            compiler: self.compiler,
            dev_env: self
                .dev_env
                .unwrap_or_else(|| DimensionSet::single(settings.dev_env)),
            optimization: self.optimization,
            blob: self.blob,
            build_system: self.build_system,
        }
    }

    /// Base targets followed by every variant, in declaration order.
    /// Repeated targets are kept.
    pub fn expand(&self, settings: &MatrixSettings) -> Result<Vec<Target>> {
        let template = self.template(settings);
        let base = template.expand()?;
        let mut targets = base.clone();
        for variant in &self.variants {
            match variant.scope {
                VariantScope::Lead => {
                    targets.push(template.lead()?.with_overrides(&variant.overrides));
                }
                VariantScope::Each => {
                    targets.extend(base.iter().map(|t| t.with_overrides(&variant.overrides)));
                }
            }
        }
        debug!(group = %self.name, targets = targets.len(), "resolved target group");
        Ok(targets)
    }

    /// Like [`TargetGroup::expand`], keeping only the first occurrence of
    /// each target.
    pub fn targets(&self, settings: &MatrixSettings) -> Result<Vec<Target>> {
        Ok(first_occurrences(self.expand(settings)?))
    }
}

fn first_occurrences(targets: Vec<Target>) -> Vec<Target> {
    let mut seen = HashSet::with_capacity(targets.len());
    targets.into_iter().filter(|t| seen.insert(*t)).collect()
}

impl MatrixFile {
    /// The matrix equivalent of [`defaults::default_targets`].
    pub fn default_matrix() -> Self {
        let settings = MatrixSettings::default();
        let template = defaults::win64_template(settings.dev_env);
        Self {
            settings,
            groups: vec![TargetGroup {
                name: "win64".into(),
                platform: template.platform,
                compiler: template.compiler,
                dev_env: None,
                optimization: template.optimization,
                blob: template.blob,
                build_system: template.build_system,
                variants: vec![Variant::new(
                    VariantScope::Lead,
                    defaults::fastbuild_overrides(),
                )],
            }],
        }
    }

    /// Expand every group, in order, into one flat list. Repeated targets
    /// are kept.
    pub fn expand(&self) -> Result<Vec<Target>> {
        let mut targets = Vec::new();
        for group in &self.groups {
            targets.extend(group.expand(&self.settings)?);
        }
        Ok(targets)
    }

    /// The flat target list handed to the generator: every group in order,
    /// each target once, at its first position.
    pub fn targets(&self) -> Result<Vec<Target>> {
        Ok(first_occurrences(self.expand()?))
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&TargetGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

/// Load a matrix from a TOML file.
pub fn load_matrix_toml(path: &Path) -> Result<MatrixFile> {
    if !path.exists() {
        return Err(TargetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), "loading matrix file");
    parse_matrix_toml(&content)
}

/// Parse a matrix from a TOML string.
pub fn parse_matrix_toml(toml_str: &str) -> Result<MatrixFile> {
    let matrix: MatrixFile = toml::from_str(toml_str)?;
    Ok(matrix)
}

/// Serialize a matrix to pretty TOML.
pub fn matrix_to_toml(matrix: &MatrixFile) -> Result<String> {
    let toml_str = toml::to_string_pretty(matrix)?;
    Ok(toml_str)
}

/// Validate a matrix for structural correctness.
///
/// Returns `Ok(())` if valid, or `Err(issues)` with a list of problems.
/// Warnings alone still count as issues.
pub fn validate_matrix(matrix: &MatrixFile) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if matrix.groups.is_empty() {
        issues.push(ValidationIssue {
            severity: "error",
            message: "matrix declares no target groups".into(),
        });
    }

    let mut names = HashSet::new();
    for group in &matrix.groups {
        if group.name.trim().is_empty() {
            issues.push(ValidationIssue {
                severity: "error",
                message: "target group has an empty name".into(),
            });
        } else if !names.insert(group.name.as_str()) {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("target group '{}' is declared more than once", group.name),
            });
        }

        if let Some(dimension) = group.template(&matrix.settings).empty_dimension() {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("target group '{}' has an empty {dimension} dimension", group.name),
            });
        }

        for (i, variant) in group.variants.iter().enumerate() {
            if variant.overrides.is_empty() {
                issues.push(ValidationIssue {
                    severity: "error",
                    message: format!(
                        "variant {} of target group '{}' overrides no dimension",
                        i + 1,
                        group.name
                    ),
                });
            }
            for key in variant.unknown.keys() {
                issues.push(ValidationIssue {
                    severity: "warning",
                    message: format!(
                        "variant {} of target group '{}' has unknown key '{key}'",
                        i + 1,
                        group.name
                    ),
                });
            }
        }
    }

    // Expansion only makes sense once every group is well-formed.
    if !issues.iter().any(|i| i.severity == "error") {
        match matrix.expand() {
            Ok(targets) => check_targets(&targets, &mut issues),
            Err(e) => issues.push(ValidationIssue {
                severity: "error",
                message: e.to_string(),
            }),
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

fn check_targets(targets: &[Target], issues: &mut Vec<ValidationIssue>) {
    let mut seen_targets = HashSet::new();
    let mut seen_dirs = HashSet::new();
    for target in targets {
        if !seen_targets.insert(*target) {
            issues.push(ValidationIssue {
                severity: "warning",
                message: format!("target '{target}' is produced more than once; later copies are dropped"),
            });
            continue;
        }
        let dir = target.directory_name();
        if !seen_dirs.insert(dir.clone()) {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("directory '{dir}' is shared by more than one target ('{target}')"),
            });
        }
    }
}

/// Validate and fail on the first batch of errors. Warnings pass.
pub fn ensure_valid(matrix: &MatrixFile) -> Result<()> {
    let Err(issues) = validate_matrix(matrix) else {
        return Ok(());
    };
    let errors: Vec<String> = issues
        .into_iter()
        .filter(|i| i.severity == "error")
        .map(|i| i.message)
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(TargetError::Validation {
            detail: errors.join("; "),
        })
    }
}

/// Generate a starter matrix file with one group called `name`.
///
/// Seeds from the default matrix.
pub fn generate_template(name: &str) -> Result<String> {
    let mut matrix = MatrixFile::default_matrix();
    if let Some(group) = matrix.groups.first_mut() {
        group.name = name.into();
    }
    matrix_to_toml(&matrix)
}
