//! Target templates and cross-product expansion.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dimension::{
    Blob, BuildSystem, Compiler, DevEnv, Dimension, DimensionSet, Optimization, Platform,
};
use crate::error::{Result, TargetError};
use crate::target::{Target, TargetOverrides};

/// A target specification where each dimension may hold several values.
///
/// Expansion yields one [`Target`] per element of the Cartesian product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetTemplate {
    pub platform: DimensionSet<Platform>,
    pub compiler: DimensionSet<Compiler>,
    pub dev_env: DimensionSet<DevEnv>,
    pub optimization: DimensionSet<Optimization>,
    pub blob: DimensionSet<Blob>,
    pub build_system: DimensionSet<BuildSystem>,
}

impl TargetTemplate {
    /// Build a template. No validation happens here; empty dimensions are
    /// reported by [`TargetTemplate::expand`].
    pub fn new(
        platform: impl Into<DimensionSet<Platform>>,
        compiler: impl Into<DimensionSet<Compiler>>,
        dev_env: impl Into<DimensionSet<DevEnv>>,
        optimization: impl Into<DimensionSet<Optimization>>,
        blob: impl Into<DimensionSet<Blob>>,
        build_system: impl Into<DimensionSet<BuildSystem>>,
    ) -> Self {
        Self {
            platform: platform.into(),
            compiler: compiler.into(),
            dev_env: dev_env.into(),
            optimization: optimization.into(),
            blob: blob.into(),
            build_system: build_system.into(),
        }
    }

    /// Number of targets the template expands to.
    pub fn len(&self) -> usize {
        self.platform.len()
            * self.compiler.len()
            * self.dev_env.len()
            * self.optimization.len()
            * self.blob.len()
            * self.build_system.len()
    }

    /// True when at least one dimension is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the first empty dimension, in declared order.
    pub fn empty_dimension(&self) -> Option<&'static str> {
        fn check<D: Dimension>(set: DimensionSet<D>) -> Option<&'static str> {
            set.is_empty().then_some(D::NAME)
        }
        check(self.platform)
            .or_else(|| check(self.compiler))
            .or_else(|| check(self.dev_env))
            .or_else(|| check(self.optimization))
            .or_else(|| check(self.blob))
            .or_else(|| check(self.build_system))
    }

    /// Expand into concrete targets.
    ///
    /// Platform varies slowest and build system fastest; within a dimension
    /// values ascend by bit. An empty dimension is an error rather than an
    /// empty result.
    pub fn expand(&self) -> Result<Vec<Target>> {
        if let Some(dimension) = self.empty_dimension() {
            return Err(TargetError::EmptyDimension { dimension });
        }

        let mut targets = Vec::with_capacity(self.len());
        for platform in self.platform.iter() {
            for compiler in self.compiler.iter() {
                for dev_env in self.dev_env.iter() {
                    for optimization in self.optimization.iter() {
                        for blob in self.blob.iter() {
                            for build_system in self.build_system.iter() {
                                targets.push(Target::new(
                                    platform,
                                    compiler,
                                    dev_env,
                                    optimization,
                                    blob,
                                    build_system,
                                ));
                            }
                        }
                    }
                }
            }
        }
        debug!(template = %self, targets = targets.len(), "expanded template");
        Ok(targets)
    }

    /// The first target of the expansion: the lowest value of every dimension.
    pub fn lead(&self) -> Result<Target> {
        match (
            self.platform.first(),
            self.compiler.first(),
            self.dev_env.first(),
            self.optimization.first(),
            self.blob.first(),
            self.build_system.first(),
        ) {
            (
                Some(platform),
                Some(compiler),
                Some(dev_env),
                Some(optimization),
                Some(blob),
                Some(build_system),
            ) => Ok(Target::new(
                platform,
                compiler,
                dev_env,
                optimization,
                blob,
                build_system,
            )),
            _ => Err(TargetError::EmptyDimension {
                dimension: self.empty_dimension().unwrap_or("unknown"),
            }),
        }
    }

    /// Set-level clone with override: each overridden dimension becomes a
    /// single-value set, the rest keep their full sets.
    #[must_use]
    pub fn with_overrides(&self, overrides: &TargetOverrides) -> Self {
        Self {
            platform: overrides.platform.map_or(self.platform, DimensionSet::single),
            compiler: overrides.compiler.map_or(self.compiler, DimensionSet::single),
            dev_env: overrides.dev_env.map_or(self.dev_env, DimensionSet::single),
            optimization: overrides
                .optimization
                .map_or(self.optimization, DimensionSet::single),
            blob: overrides.blob.map_or(self.blob, DimensionSet::single),
            build_system: overrides
                .build_system
                .map_or(self.build_system, DimensionSet::single),
        }
    }
}

impl From<Target> for TargetTemplate {
    fn from(target: Target) -> Self {
        Self::new(
            target.platform,
            target.compiler,
            target.dev_env,
            target.optimization,
            target.blob,
            target.build_system,
        )
    }
}

impl std::fmt::Display for TargetTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} x {} x {} x {} x {} x {}",
            self.platform,
            self.compiler,
            self.dev_env,
            self.optimization,
            self.blob,
            self.build_system
        )
    }
}
