//! Conversions against the real npm registry.
//!
//! These need npm on PATH and network access, so they only run when
//! `RUN_REAL_PACKAGE_TESTS` is set.

use npm2rez::config::Npm2RezConfig;
use npm2rez::constants::REAL_PACKAGE_TESTS_ENV;
use npm2rez::core::PackageRequest;
use npm2rez::exec::{ExecutableLocator, SystemRunner};
use npm2rez::installer::InstallOutcome;
use npm2rez::package::Pipeline;
use npm2rez::test_utils::init_test_logging;
use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn enabled() -> bool {
    std::env::var_os(REAL_PACKAGE_TESTS_ENV).is_some()
}

fn system_pipeline() -> Pipeline<SystemRunner> {
    init_test_logging(None);
    let config = Npm2RezConfig {
        show_progress: false,
        ..Npm2RezConfig::default()
    };
    let locator = ExecutableLocator::new(None).unwrap();
    Pipeline::new(SystemRunner::new(Some(Duration::from_secs(300))), locator, config)
}

#[tokio::test]
#[serial]
async fn test_create_typescript() {
    if !enabled() {
        return;
    }
    let output = TempDir::new().unwrap();
    let request = PackageRequest::builder("typescript", "4.9.5")
        .bin_name(Some("tsc"))
        .output_root(output.path())
        .build()
        .unwrap();

    let created = system_pipeline().create_package(&request).await.unwrap();

    assert_eq!(created.outcome, InstallOutcome::Installed);
    let root = output.path().join("typescript/4.9.5");
    assert!(root.join("node_modules/typescript/package.json").exists());
    assert!(root.join("bin/tsc").exists());

    let manifest = fs::read_to_string(root.join("package.py")).unwrap();
    assert!(manifest.contains("env.PATH.append(\"{root}/bin\")"));
    assert!(manifest.contains("env.TYPESCRIPT_ROOT = \"{root}\""));
}

#[tokio::test]
#[serial]
async fn test_extract_eslint() {
    if !enabled() {
        return;
    }
    let output = TempDir::new().unwrap();
    let request = PackageRequest::builder("eslint", "8.40.0").build().unwrap();

    let ok = system_pipeline().extract_package(&request, output.path()).await.unwrap();

    assert!(ok);
    assert!(output.path().join("node_modules/eslint/package.json").exists());
    assert!(output.path().join("bin/eslint").exists());
}

#[tokio::test]
#[serial]
async fn test_extract_unknown_version_fails() {
    if !enabled() {
        return;
    }
    let output = TempDir::new().unwrap();
    let request = PackageRequest::builder("typescript", "0.0.0-does-not-exist").build().unwrap();

    let ok = system_pipeline().extract_package(&request, output.path()).await.unwrap();
    assert!(!ok);
}
