use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use crate::common::{isolated_config, npm2rez};

struct Workspace {
    dir: TempDir,
    config: std::path::PathBuf,
}

impl Workspace {
    /// A working directory whose config points the executable search at an empty directory.
    fn without_tools() -> Self {
        let dir = TempDir::new().unwrap();
        let tools = dir.path().join("tools");
        fs::create_dir_all(&tools).unwrap();
        let config = isolated_config(dir.path(), &tools);
        Self {
            dir,
            config,
        }
    }

    fn tools(&self) -> std::path::PathBuf {
        self.dir.path().join("tools")
    }

    fn cmd(&self) -> Command {
        npm2rez(self.dir.path(), &self.config)
    }
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("npm2rez")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("extract"));
}

#[test]
fn test_subcommand_help() {
    for sub in ["create", "extract"] {
        Command::cargo_bin("npm2rez")
            .unwrap()
            .args([sub, "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--name"))
            .stdout(predicate::str::contains("--version"))
            .stdout(predicate::str::contains("--output"));
    }
}

#[test]
fn test_create_missing_required_option() {
    let ws = Workspace::without_tools();
    ws.cmd()
        .args(["create", "--version", "4.9.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--name"));
}

#[test]
fn test_create_without_npm_builds_skeleton() {
    let ws = Workspace::without_tools();

    ws.cmd()
        .args(["create", "--name", "@types/node", "--version", "18.11.9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created package at"))
        .stdout(predicate::str::contains("types_node"))
        .stderr(predicate::str::contains("npm command not found"));

    let root = ws.dir.path().join("rez-packages/types_node/18.11.9");
    let manifest = fs::read_to_string(root.join("package.py")).unwrap();
    assert!(manifest.contains("name = \"types_node\""));
    assert!(manifest.contains("version = \"18.11.9\""));
    assert!(manifest.contains("description = \"Rez package for @types/node Node.js package\""));
    assert!(manifest.contains("\"nodejs-16+\""));
    assert!(!manifest.contains("env.PATH"));
    assert!(root.join("bin").is_dir());
    assert!(root.join("node_modules").is_dir());
}

#[test]
fn test_create_with_bin_name_and_output() {
    let ws = Workspace::without_tools();
    let output = ws.dir.path().join("out");

    ws.cmd()
        .args(["create", "--name", "typescript", "--version", "4.9.5", "--bin-name", "tsc"])
        .args(["--node-version", "18", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created package at"));

    let manifest = fs::read_to_string(output.join("typescript/4.9.5/package.py")).unwrap();
    assert!(manifest.contains("env.PATH.append(\"{root}/bin\")"));
    assert!(manifest.contains("\"nodejs-18+\""));
}

#[test]
fn test_create_github_without_repo_reports_error() {
    let ws = Workspace::without_tools();

    ws.cmd()
        .args(["create", "--name", "typescript", "--version", "main", "--source", "github"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("When using github source, --repo is required"));

    assert!(!ws.dir.path().join("rez-packages").exists());
}

#[test]
fn test_create_github_without_npm_builds_skeleton() {
    let ws = Workspace::without_tools();

    ws.cmd()
        .args(["create", "--name", "acme-tool", "--version", "1.2.0"])
        .args(["--source", "github", "--repo", "acme/tool"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created package at"))
        .stderr(predicate::str::contains("npm command not found"))
        .stderr(predicate::str::contains("is not installed").not());

    let root = ws.dir.path().join("rez-packages/acme_tool/1.2.0");
    assert!(root.join("package.py").exists());
    assert!(root.join("bin").is_dir());
    assert!(root.join("node_modules").is_dir());
}

#[test]
fn test_create_rejects_name_with_dot() {
    let ws = Workspace::without_tools();

    ws.cmd()
        .args(["create", "--name", "lodash.merge", "--version", "4.6.2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created package at").not())
        .stderr(predicate::str::contains("Invalid package name 'lodash.merge'"));

    assert!(!ws.dir.path().join("rez-packages").exists());
}

#[test]
fn test_create_name_collision_reports_error() {
    let ws = Workspace::without_tools();

    ws.cmd().args(["create", "--name", "a_b", "--version", "1.0.0"]).assert().success();
    ws.cmd()
        .args(["create", "--name", "a-b", "--version", "2.0.0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("collides with existing package"));

    assert!(!ws.dir.path().join("rez-packages/a_b/2.0.0").exists());
}

#[test]
fn test_missing_config_file_reports_error() {
    let ws = Workspace::without_tools();

    Command::cargo_bin("npm2rez")
        .unwrap()
        .current_dir(ws.dir.path())
        .env("NPM2REZ_CONFIG", ws.dir.path().join("nope.toml"))
        .args(["create", "--name", "x", "--version", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_extract_without_npm_succeeds() {
    let ws = Workspace::without_tools();
    let target = ws.dir.path().join("vendor");

    ws.cmd()
        .args(["extract", "--name", "eslint", "--version", "8.40.0", "--output"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully extracted eslint@8.40.0"));

    assert!(target.join("node_modules").is_dir());
    assert!(!target.join("package.py").exists());
}

#[cfg(unix)]
mod with_scripted_npm {
    use super::*;
    use crate::common::scripted_npm;

    #[test]
    fn test_create_installs_and_links_executables() {
        let ws = Workspace::without_tools();
        scripted_npm(&ws.tools(), false);

        ws.cmd()
            .args(["create", "--name", "typescript", "--version", "4.9.5", "--bin-name", "typescript"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created package at"));

        let root = ws.dir.path().join("rez-packages/typescript/4.9.5");
        assert!(root.join("package.py").exists());
        assert!(root.join("package.json").exists());
        assert!(root.join("node_modules/typescript/index.js").exists());
        let link = root.join("bin/typescript");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    }

    #[test]
    fn test_create_reports_npm_failure() {
        let ws = Workspace::without_tools();
        scripted_npm(&ws.tools(), true);

        ws.cmd()
            .args(["create", "--name", "no-such-package", "--version", "0.0.1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created package at").not())
            .stderr(predicate::str::contains("npm install failed"))
            .stderr(predicate::str::contains("npm ERR! 404 Not Found"));
    }

    #[test]
    fn test_extract_reports_failure() {
        let ws = Workspace::without_tools();
        scripted_npm(&ws.tools(), true);

        ws.cmd()
            .args(["extract", "--name", "typescript", "--version", "4.9.5"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Failed to extract typescript@4.9.5"));
    }

    #[test]
    fn test_extract_installs_into_directory() {
        let ws = Workspace::without_tools();
        scripted_npm(&ws.tools(), false);

        ws.cmd()
            .args(["extract", "--name", "eslint", "--version", "8.40.0", "--output", "vendor"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Successfully extracted eslint@8.40.0"));

        let target = ws.dir.path().join("vendor");
        assert!(target.join("node_modules/eslint/index.js").exists());
        assert!(target.join("bin/eslint").exists());
    }
}
