//! Integration tests for the target matrix.

use std::collections::HashSet;

use confmatrix_targets::matrix::{load_matrix_toml, validate_matrix, MATRIX_FILE_NAME};
use confmatrix_targets::{
    default_targets, plan_configurations, Blob, BuildSystem, CanonicalOptimization, Compiler,
    DevEnv, Dimension, DimensionSet, GeneratorTarget, MatrixFile, Optimization, Platform, Target,
    TargetError, TargetOverrides, TargetTemplate,
};

#[test]
fn default_targets_end_to_end() {
    let targets = default_targets().expect("default targets");
    assert_eq!(targets.len(), 5, "expected 2x2 base plus one variant, got {}", targets.len());

    let rows = plan_configurations(&targets).expect("plan");
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["MSVC Debug", "MSVC Release", "ClangCl Debug", "ClangCl Release", "MSVC Debug"]
    );
    let dirs: Vec<&str> = rows.iter().map(|r| r.directory.as_str()).collect();
    assert_eq!(
        dirs,
        vec![
            "win64_MSVC_Debug_MSBuild",
            "win64_MSVC_Release_MSBuild",
            "win64_ClangCl_Debug_MSBuild",
            "win64_ClangCl_Release_MSBuild",
            "win64_MSVC_Debug_FastBuild",
        ]
    );
    let platforms: HashSet<&str> = rows.iter().map(|r| r.solution_platform.as_str()).collect();
    assert_eq!(platforms, HashSet::from(["MSBuild", "FastBuild"]));
}

#[test]
fn every_point_of_the_full_matrix_is_reachable() {
    let template = TargetTemplate::new(
        DimensionSet::all(),
        DimensionSet::all(),
        DimensionSet::single(DevEnv::Vs2022),
        DimensionSet::all(),
        DimensionSet::single(Blob::NoBlob),
        DimensionSet::all(),
    );
    let targets = template.expand().expect("expand");
    assert_eq!(
        targets.len(),
        Platform::ALL.len() * Compiler::ALL.len() * Optimization::ALL.len() * BuildSystem::ALL.len()
    );
    // One directory per (platform, compiler, optimization, build system).
    let rows = plan_configurations(&targets).expect("directories are unique");
    assert_eq!(rows.len(), targets.len());
}

#[test]
fn generator_sees_only_the_capability() {
    fn describe(target: &dyn GeneratorTarget) -> (Platform, CanonicalOptimization, String) {
        (target.platform(), target.optimization(), target.name())
    }

    let target = Target::new(
        Platform::Win32,
        Compiler::ClangCl,
        DevEnv::Vs2017,
        Optimization::Release,
        Blob::Blob,
        BuildSystem::FastBuild,
    );
    assert_eq!(
        describe(&target),
        (Platform::Win32, CanonicalOptimization::Release, "ClangCl Release".to_string())
    );
}

#[test]
fn variant_from_expanded_target_leaves_base_intact() {
    let targets = default_targets().expect("default targets");
    let base = targets[3];
    let variant = base.with_overrides(&TargetOverrides::new().build_system(BuildSystem::FastBuild));
    assert_eq!(targets[3], base);
    assert_eq!(variant.solution_platform_name(), "FastBuild_NoBlob");
    assert_eq!(variant.directory_name(), "win64_ClangCl_Release_FastBuild");
}

#[test]
fn empty_template_dimension_is_an_error() {
    let template = TargetTemplate::new(
        Platform::Win64,
        DimensionSet::<Compiler>::empty(),
        DevEnv::Vs2022,
        Optimization::Debug,
        Blob::NoBlob,
        BuildSystem::MsBuild,
    );
    assert!(matches!(
        template.expand(),
        Err(TargetError::EmptyDimension { dimension: "compiler" })
    ));
}

#[test]
fn matrix_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(MATRIX_FILE_NAME);
    let content = confmatrix_targets::matrix::generate_template("win64").unwrap();
    std::fs::write(&path, content).unwrap();

    let matrix = load_matrix_toml(&path).expect("load");
    assert!(validate_matrix(&matrix).is_ok());
    assert_eq!(matrix, MatrixFile::default_matrix());
    assert_eq!(matrix.targets().unwrap(), default_targets().unwrap());
}
