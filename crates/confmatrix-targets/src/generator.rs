//! The surface seen by the project generator.
//!
//! The generator never inspects targets directly. It asks for a platform, a
//! canonical optimization kind, and the derived names through
//! [`GeneratorTarget`], and works from the flat [`ConfigurationRow`] list
//! produced by [`plan_configurations`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dimension::{Dimension, Optimization, Platform};
use crate::error::{Result, TargetError};
use crate::target::Target;

/// Optimization kinds understood by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CanonicalOptimization {
    Debug,
    Release,
    /// Final shipping build. No local optimization level maps here yet.
    Retail,
}

impl CanonicalOptimization {
    /// Checked mapping from a raw local optimization bit.
    ///
    /// Anything outside the closed [`Optimization`] set, including zero and
    /// combined bits, fails with [`TargetError::UnsupportedValue`].
    pub fn from_optimization_bits(bits: u32) -> Result<Self> {
        Ok(match Optimization::from_bit(bits)? {
            Optimization::Debug => Self::Debug,
            Optimization::Release => Self::Release,
        })
    }
}

/// Anything that can describe itself to the project generator.
pub trait GeneratorTarget {
    /// Architecture the configuration builds for.
    fn platform(&self) -> Platform;

    /// Optimization level in the generator's own vocabulary.
    fn optimization(&self) -> CanonicalOptimization;

    /// Configuration name.
    fn name(&self) -> String;

    /// Directory name for intermediate and output files.
    fn directory_name(&self) -> String;

    /// Platform column the configuration appears under in the solution.
    fn solution_platform_name(&self) -> String;
}

impl GeneratorTarget for Target {
    fn platform(&self) -> Platform {
        Target::platform(self)
    }

    fn optimization(&self) -> CanonicalOptimization {
        self.canonical_optimization()
    }

    fn name(&self) -> String {
        self.display_name()
    }

    fn directory_name(&self) -> String {
        Target::directory_name(self)
    }

    fn solution_platform_name(&self) -> String {
        Target::solution_platform_name(self)
    }
}

/// One configuration as handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigurationRow {
    pub name: String,
    pub directory: String,
    pub solution_platform: String,
    pub platform: Platform,
    pub optimization: CanonicalOptimization,
}

/// Project a target list into generator rows, preserving order.
///
/// Fails with [`TargetError::DirectoryCollision`] if two targets would share
/// an intermediate directory.
pub fn plan_configurations<T: GeneratorTarget>(targets: &[T]) -> Result<Vec<ConfigurationRow>> {
    let mut seen = HashSet::with_capacity(targets.len());
    let mut rows = Vec::with_capacity(targets.len());
    for target in targets {
        let directory = target.directory_name();
        if !seen.insert(directory.clone()) {
            return Err(TargetError::DirectoryCollision { directory });
        }
        rows.push(ConfigurationRow {
            name: target.name(),
            directory,
            solution_platform: target.solution_platform_name(),
            platform: target.platform(),
            optimization: target.optimization(),
        });
    }
    debug!(configurations = rows.len(), "planned generator configurations");
    Ok(rows)
}

/// Render generator rows as pretty JSON.
pub fn plan_to_json(rows: &[ConfigurationRow]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}
