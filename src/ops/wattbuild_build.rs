//! Implementation of a wattbuild run.
//!
//! synthesize → `cargo update` → `cargo metadata` → `cargo build` → collect.
//! Each step waits for the previous one; any failure ends the run.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::builder::toolchain::detect_cargo;
use crate::core::artifact::WASM_TARGET;
use crate::core::dependency::BuildDependency;
use crate::core::manifest::SynthesizedManifest;
use crate::ops::collect::{collect_broad, collect_precise};
use crate::util::config::{CollectPolicy, Config};
use crate::util::errors::WattbuildError;
use crate::util::workdir::Workdir;

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// `name:version` of each root dependency that was compiled.
    pub packages: Vec<String>,

    /// Artifacts in the destination directory.
    pub artifacts: Vec<PathBuf>,
}

/// Compile `dependencies` to WebAssembly and copy the artifacts to `config.out_dir`.
pub fn build(config: &Config, dependencies: &[BuildDependency]) -> Result<BuildResult> {
    if dependencies.is_empty() {
        return Err(WattbuildError::NoDependencies.into());
    }

    let cargo = detect_cargo(config)?;

    let workdir = Workdir::acquire(&config.scratch)?;
    let dir = workdir.path();
    tracing::debug!("Working directory: {}", dir.display());

    let manifest = SynthesizedManifest::new(dependencies.to_vec(), config.proc_macro2_rev.clone());
    manifest
        .write_to(dir)
        .context("failed to write the synthesized package")?;

    tracing::info!("Resolving {} build dependencies", dependencies.len());
    cargo.update(dir)?;

    let metadata = cargo.metadata(dir)?;
    let roots = metadata.root_dependencies().map_err(WattbuildError::from)?;
    let packages: Vec<String> = roots.iter().map(|p| p.spec()).collect();

    tracing::info!("Compiling {} for {}", packages.join(", "), WASM_TARGET);
    cargo.build_release(dir, &roots, WASM_TARGET)?;

    let release_dir = metadata.release_dir(WASM_TARGET);
    let artifacts = match config.collect {
        CollectPolicy::Precise => collect_precise(&roots, &release_dir, &config.out_dir)?,
        CollectPolicy::Broad => collect_broad(&release_dir, &config.out_dir)?,
    };

    for artifact in &artifacts {
        tracing::info!("Copied {}", artifact.display());
    }

    Ok(BuildResult {
        packages,
        artifacts,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::metadata::tests::metadata_json;
    use crate::util::config::ScratchDir;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    /// A fake cargo that answers `metadata` with `metadata`, writes `wasm`
    /// into the release directory on `build`, and logs its arguments.
    fn fake_cargo(dir: &Path, metadata: &serde_json::Value, wasm: &[&str]) -> PathBuf {
        let release = Path::new(metadata["target_directory"].as_str().unwrap())
            .join("wasm32-unknown-unknown/release");
        let touch: String = wasm
            .iter()
            .map(|name| format!("  printf 'wasm' > '{}'\n", release.join(name).display()))
            .collect();

        let metadata_path = dir.join("metadata.json");
        fs::write(&metadata_path, metadata.to_string()).unwrap();

        let script = format!(
            "#!/bin/sh\n\
             echo \"$@\" >> '{log}'\n\
             case \"$1\" in\n\
             metadata) cat '{metadata}' ;;\n\
             build)\n  mkdir -p '{release}'\n{touch}  ;;\n\
             esac\n",
            log = dir.join("cargo.log").display(),
            metadata = metadata_path.display(),
            release = release.display(),
        );

        let path = dir.join("cargo");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn metadata_in(tmp: &Path, roots: &[(&str, &str, &str, &str)], transitive: &[(&str, &str, &str, &str)]) -> serde_json::Value {
        let mut value = metadata_json(roots, transitive);
        value["target_directory"] = tmp.join("target").to_string_lossy().into_owned().into();
        value
    }

    fn config(tmp: &Path, cargo: PathBuf) -> Config {
        Config::new(tmp.join("out"), ScratchDir::Persistent(tmp.join("work"))).with_cargo(Some(cargo))
    }

    #[test]
    fn test_build_serde() {
        let tmp = TempDir::new().unwrap();
        let metadata = metadata_in(tmp.path(), &[("serde", "1.0.200", "cdylib", "serde")], &[]);
        let cargo = fake_cargo(tmp.path(), &metadata, &["serde.wasm"]);

        let result = build(&config(tmp.path(), cargo), &[BuildDependency::new(r#"serde = "1""#)]).unwrap();

        assert_eq!(result.packages, ["serde:1.0.200"]);
        assert_eq!(result.artifacts, [tmp.path().join("out/serde.wasm")]);

        let manifest = fs::read_to_string(tmp.path().join("work/Cargo.toml")).unwrap();
        assert!(!manifest.contains("rev ="));
        assert!(tmp.path().join("work/src/lib.rs").exists());

        let log = fs::read_to_string(tmp.path().join("cargo.log")).unwrap();
        let calls: Vec<_> = log.lines().collect();
        assert_eq!(
            calls,
            [
                "update",
                "metadata --format-version 1",
                "build --release -p serde:1.0.200 --target wasm32-unknown-unknown",
            ]
        );
    }

    #[test]
    fn test_build_two_dependencies_ignores_transitive() {
        let tmp = TempDir::new().unwrap();
        let metadata = metadata_in(
            tmp.path(),
            &[
                ("watt-demo", "0.0.0", "cdylib", "watt-demo"),
                ("my-crate", "0.1.0", "cdylib", "my_crate"),
            ],
            &[("syn", "2.0.60", "lib", "syn"), ("quote", "1.0.36", "lib", "quote")],
        );
        let cargo = fake_cargo(
            tmp.path(),
            &metadata,
            &["watt_demo.wasm", "my_crate.wasm", "syn.wasm"],
        );

        let deps = [
            BuildDependency::new(r#"{ package = "watt-demo", git = "https://github.com/dtolnay/watt" }"#),
            BuildDependency::new(r#"my-crate = "0.1""#),
        ];
        let result = build(&config(tmp.path(), cargo), &deps).unwrap();

        assert_eq!(
            result.artifacts,
            [tmp.path().join("out/my_crate.wasm"), tmp.path().join("out/watt_demo.wasm")]
        );
        let copied = fs::read_dir(tmp.path().join("out")).unwrap().count();
        assert_eq!(copied, 2);
    }

    #[test]
    fn test_build_fails_without_cdylib() {
        let tmp = TempDir::new().unwrap();
        let metadata = metadata_in(tmp.path(), &[("plain-lib", "0.3.0", "lib", "plain_lib")], &[]);
        let cargo = fake_cargo(tmp.path(), &metadata, &[]);

        let err = build(&config(tmp.path(), cargo), &[BuildDependency::new(r#"plain-lib = "0.3""#)])
            .unwrap_err();

        let err = err.downcast_ref::<WattbuildError>().unwrap();
        assert!(matches!(err, WattbuildError::MissingLibTarget { .. }));
        assert!(err.to_string().contains("plain-lib@0.3.0"));
    }

    #[test]
    fn test_build_rejects_empty_input() {
        let tmp = TempDir::new().unwrap();
        let config = config(tmp.path(), PathBuf::from("/nonexistent/cargo"));

        let err = build(&config, &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WattbuildError>(),
            Some(WattbuildError::NoDependencies)
        ));
    }
}
