//! Build-configuration target matrix.
//!
//! A target is one point in a matrix of build variations:
//! platform x compiler x dev-env x optimization x blob mode x build system.
//!
//! - **Dimensions:** closed, bit-valued enums plus [`DimensionSet`] for subsets
//! - **Targets:** concrete points with derived display, directory, and
//!   solution-platform names
//! - **Templates:** multi-valued specifications expanded by cross product
//! - **Matrix files:** TOML groups of templates and override-derived variants
//!
//! The project generator consumes the flat target list through
//! [`GeneratorTarget`].

pub mod defaults;
pub mod dimension;
pub mod error;
pub mod generator;
pub mod matrix;
pub mod target;
pub mod template;

pub use defaults::{default_targets, default_targets_for, win64_targets};
pub use dimension::{
    Blob, BuildSystem, Compiler, DevEnv, Dimension, DimensionSet, Optimization, Platform,
};
pub use error::{Result, TargetError};
pub use generator::{
    plan_configurations, plan_to_json, CanonicalOptimization, ConfigurationRow, GeneratorTarget,
};
pub use matrix::{MatrixFile, TargetGroup, ValidationIssue, Variant, VariantScope};
pub use target::{Target, TargetOverrides};
pub use template::TargetTemplate;
