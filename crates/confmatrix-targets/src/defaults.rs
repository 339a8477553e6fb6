//! Built-in target lists.

use crate::dimension::{Blob, BuildSystem, Compiler, DevEnv, Optimization, Platform};
use crate::error::Result;
use crate::target::{Target, TargetOverrides};
use crate::template::TargetTemplate;

/// Base Win64 template: every compiler and optimization level, built with
/// MSBuild and no unity files.
pub fn win64_template(dev_env: DevEnv) -> TargetTemplate {
    TargetTemplate::new(
        Platform::Win64,
        Compiler::Msvc | Compiler::ClangCl,
        dev_env,
        Optimization::Debug | Optimization::Release,
        Blob::NoBlob,
        BuildSystem::MsBuild,
    )
}

/// Overrides that turn an MSBuild target into its FastBuild unity variant.
pub fn fastbuild_overrides() -> TargetOverrides {
    TargetOverrides::new()
        .blob(Blob::FastBuildUnitys)
        .build_system(BuildSystem::FastBuild)
}

/// Win64 targets: the expanded base template followed by a single FastBuild
/// variant derived from the template's lead target.
///
/// The variant is appended, not folded into the template, so adding a build
/// system grows the list by one instead of doubling it.
pub fn win64_targets(dev_env: DevEnv) -> Result<Vec<Target>> {
    let template = win64_template(dev_env);
    let mut targets = template.expand()?;
    targets.push(template.lead()?.with_overrides(&fastbuild_overrides()));
    Ok(targets)
}

/// Default targets for a given development environment.
pub fn default_targets_for(dev_env: DevEnv) -> Result<Vec<Target>> {
    let mut targets = Vec::new();
    targets.extend(win64_targets(dev_env)?);
    Ok(targets)
}

/// Default targets for the default development environment.
pub fn default_targets() -> Result<Vec<Target>> {
    default_targets_for(DevEnv::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::plan_configurations;

    #[test]
    fn default_list_is_base_plus_one_variant() {
        let targets = default_targets().unwrap();
        let summary: Vec<(Compiler, Optimization, BuildSystem, Blob)> = targets
            .iter()
            .map(|t| (t.compiler, t.optimization, t.build_system, t.blob))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Compiler::Msvc, Optimization::Debug, BuildSystem::MsBuild, Blob::NoBlob),
                (Compiler::Msvc, Optimization::Release, BuildSystem::MsBuild, Blob::NoBlob),
                (Compiler::ClangCl, Optimization::Debug, BuildSystem::MsBuild, Blob::NoBlob),
                (Compiler::ClangCl, Optimization::Release, BuildSystem::MsBuild, Blob::NoBlob),
                (Compiler::Msvc, Optimization::Debug, BuildSystem::FastBuild, Blob::FastBuildUnitys),
            ]
        );
        assert!(targets.iter().all(|t| t.platform == Platform::Win64));
        assert!(targets.iter().all(|t| t.dev_env == DevEnv::Vs2022));
    }

    #[test]
    fn dev_env_is_passed_through() {
        let targets = default_targets_for(DevEnv::Vs2019).unwrap();
        assert_eq!(targets.len(), 5);
        assert!(targets.iter().all(|t| t.dev_env == DevEnv::Vs2019));
    }

    #[test]
    fn default_targets_have_distinct_directories() {
        let rows = plan_configurations(&default_targets().unwrap()).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[4].directory, "win64_MSVC_Debug_FastBuild");
        assert_eq!(rows[4].solution_platform, "FastBuild");
        assert_eq!(rows[4].name, "MSVC Debug");
    }
}
