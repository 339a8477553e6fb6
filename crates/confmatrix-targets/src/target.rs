//! Concrete targets.
//!
//! A [`Target`] is one fully resolved point of the matrix: exactly one value
//! per dimension. Names and paths handed to the project generator are derived
//! from it on demand and never stored.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dimension::{Blob, BuildSystem, Compiler, DevEnv, Optimization, Platform};
use crate::generator::CanonicalOptimization;

/// A concrete, buildable point of the target matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Target {
    /// Target CPU architecture.
    pub platform: Platform,
    /// Toolchain front end.
    pub compiler: Compiler,
    /// Development environment the generated project files are written for.
    pub dev_env: DevEnv,
    /// Optimization level; maps onto [`CanonicalOptimization`].
    pub optimization: Optimization,
    /// Unity (blob) build mode.
    pub blob: Blob,
    /// Tool that drives the build of the generated project.
    pub build_system: BuildSystem,
}

impl Target {
    /// Build a target from one value per dimension.
    pub fn new(
        platform: Platform,
        compiler: Compiler,
        dev_env: DevEnv,
        optimization: Optimization,
        blob: Blob,
        build_system: BuildSystem,
    ) -> Self {
        Self {
            platform,
            compiler,
            dev_env,
            optimization,
            blob,
            build_system,
        }
    }

    /// Configuration name shown in the IDE, e.g. `"MSVC Debug"`.
    pub fn display_name(&self) -> String {
        [self.compiler.to_string(), self.optimization.to_string()].join(" ")
    }

    /// Name usable as a directory, e.g. for intermediate outputs.
    ///
    /// Distinct for every distinct (platform, compiler, optimization,
    /// build system) tuple.
    pub fn directory_name(&self) -> String {
        [
            self.platform.to_string(),
            self.compiler.to_string(),
            self.optimization.to_string(),
            self.build_system.to_string(),
        ]
        .join("_")
    }

    /// Solution platform name. FastBuild targets without unity files get a
    /// `_NoBlob` suffix so they do not share a solution platform with the
    /// unity variant.
    pub fn solution_platform_name(&self) -> String {
        let mut parts = vec![self.build_system.to_string()];
        if self.build_system == BuildSystem::FastBuild && self.blob == Blob::NoBlob {
            parts.push(self.blob.to_string());
        }
        parts.join("_")
    }

    /// Map the local optimization level onto the generator's kind.
    pub fn canonical_optimization(&self) -> CanonicalOptimization {
        match self.optimization {
            Optimization::Debug => CanonicalOptimization::Debug,
            Optimization::Release => CanonicalOptimization::Release,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Derive a variant target. Dimensions named in `overrides` are replaced;
    /// the rest are copied from `self`.
    #[must_use]
    pub fn with_overrides(&self, overrides: &TargetOverrides) -> Self {
        Self {
            platform: overrides.platform.unwrap_or(self.platform),
            compiler: overrides.compiler.unwrap_or(self.compiler),
            dev_env: overrides.dev_env.unwrap_or(self.dev_env),
            optimization: overrides.optimization.unwrap_or(self.optimization),
            blob: overrides.blob.unwrap_or(self.blob),
            build_system: overrides.build_system.unwrap_or(self.build_system),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{} {}", self.platform, self.dev_env, self.display_name())
    }
}

/// Partial set of dimension values used to derive a variant.
///
/// Every field left as `None` keeps the base value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<Compiler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_env: Option<DevEnv>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization: Option<Optimization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<Blob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_system: Option<BuildSystem>,
}

impl TargetOverrides {
    /// An override record that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    #[must_use]
    pub fn compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = Some(compiler);
        self
    }

    #[must_use]
    pub fn dev_env(mut self, dev_env: DevEnv) -> Self {
        self.dev_env = Some(dev_env);
        self
    }

    #[must_use]
    pub fn optimization(mut self, optimization: Optimization) -> Self {
        self.optimization = Some(optimization);
        self
    }

    #[must_use]
    pub fn blob(mut self, blob: Blob) -> Self {
        self.blob = Some(blob);
        self
    }

    #[must_use]
    pub fn build_system(mut self, build_system: BuildSystem) -> Self {
        self.build_system = Some(build_system);
        self
    }

    /// True when no dimension is overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
