use npm2rez::config::Npm2RezConfig;
use npm2rez::core::{Npm2RezError, PackageRequest, SourceKind};
use npm2rez::exec::ExecutableLocator;
use npm2rez::installer::InstallOutcome;
use npm2rez::package::Pipeline;
use npm2rez::test_utils::{RecordingRunner, fake_executable};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct TestEnv {
    _tools: TempDir,
    output: TempDir,
    pipeline: Pipeline<RecordingRunner>,
}

impl TestEnv {
    fn new(runner: RecordingRunner) -> Self {
        Self::with_tools(runner, &["npm", "git"])
    }

    /// Only the named executables are on the search path.
    fn with_tools(runner: RecordingRunner, names: &[&str]) -> Self {
        let tools = TempDir::new().unwrap();
        for name in names {
            fake_executable(tools.path(), name);
        }
        let locator = ExecutableLocator::with_cwd(Some(tools.path().into()), tools.path());
        let config = Npm2RezConfig {
            show_progress: false,
            ..Npm2RezConfig::default()
        };

        Self {
            _tools: tools,
            output: TempDir::new().unwrap(),
            pipeline: Pipeline::new(runner, locator, config),
        }
    }

    fn output(&self) -> &Path {
        self.output.path()
    }

    fn github_request(&self, name: &str, version: &str, repo: &str) -> PackageRequest {
        PackageRequest::builder(name, version)
            .source(SourceKind::Github)
            .repo(Some(repo))
            .output_root(self.output())
            .build()
            .unwrap()
    }

    fn leftover_clones(&self, family: &str) -> Vec<String> {
        fs::read_dir(self.output().join(family))
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with("temp_repo"))
            .collect()
    }
}

#[tokio::test]
async fn test_scoped_registry_package() {
    let env = TestEnv::new(RecordingRunner::new().with_registry_install(&[]));
    let request = PackageRequest::builder("@types/node", "18.11.9")
        .runtime_version("18")
        .output_root(env.output())
        .build()
        .unwrap();

    let created = env.pipeline.create_package(&request).await.unwrap();

    assert_eq!(created.outcome, InstallOutcome::Installed);
    let root = env.output().join("types_node").join("18.11.9");
    assert_eq!(created.layout.root(), root);

    let manifest = fs::read_to_string(root.join("package.py")).unwrap();
    let expected_lines = [
        "name = \"types_node\"",
        "version = \"18.11.9\"",
        "description = \"Rez package for @types/node Node.js package\"",
        "    \"nodejs-18+\",",
        "    env.TYPES_NODE_ROOT = \"{root}\"",
        "        env.NODE_PATH = \"{root}/node_modules\"",
        "        env.NODE_PATH.append(\"{root}/node_modules\")",
    ];
    for line in expected_lines {
        assert!(manifest.lines().any(|l| l == line), "missing line {line:?} in:\n{manifest}");
    }
    assert!(!manifest.contains("env.PATH"));

    assert!(root.join("node_modules/@types/node/index.js").exists());

    let commands = env.pipeline.runner().commands();
    let install = commands.iter().find(|c| c.operation() == "install").unwrap();
    assert_eq!(install.arguments(), ["install", "@types/node@18.11.9", "--save", "--save-exact"]);
    assert_eq!(install.working_dir(), Some(root.as_path()));
}

#[tokio::test]
async fn test_github_release_is_cloned_built_and_copied() {
    let env = TestEnv::new(RecordingRunner::new().with_clone_contents());
    let request = env.github_request("typescript", "4.9.5", "microsoft/TypeScript");

    let created = env.pipeline.create_package(&request).await.unwrap();
    let root = created.layout.root();

    assert!(root.join("package.py").exists());
    assert!(root.join("package.json").exists());
    assert!(root.join("src/index.ts").exists());
    assert!(root.join("bin/cli.js").exists());
    assert!(env.leftover_clones("typescript").is_empty());

    let commands = env.pipeline.runner().commands();
    let clone = commands.iter().find(|c| c.operation() == "clone").unwrap();
    let args = clone.arguments();
    assert_eq!(args[..5], ["clone", "--depth", "1", "--branch", "v4.9.5"]);
    assert_eq!(args[5], "https://github.com/microsoft/TypeScript.git");
    assert!(Path::new(&args[6]).starts_with(env.output().join("typescript")));

    // npm runs inside the clone, not the package directory
    let build = commands.iter().find(|c| c.operation() == "run build").unwrap();
    assert_eq!(build.working_dir(), Some(Path::new(&args[6])));
}

#[tokio::test]
async fn test_github_build_failure_removes_clone() {
    let runner = RecordingRunner::new().with_clone_contents().fail_on("run build", "tsc: error TS2304");
    let env = TestEnv::new(runner);
    let request = env.github_request("acme-tool", "1.0.0", "acme/tool");

    let err = env.pipeline.create_package(&request).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<Npm2RezError>(),
        Some(Npm2RezError::CommandFailed { operation, stderr, .. })
            if operation == "run build" && stderr.contains("TS2304")
    ));
    assert!(env.leftover_clones("acme_tool").is_empty());
    assert!(!env.output().join("acme_tool/1.0.0/src").exists());
}

#[tokio::test]
async fn test_github_missing_tag_skips_build() {
    let runner = RecordingRunner::new()
        .fail_on("clone", "fatal: Remote branch v9.9.9 not found in upstream origin");
    let env = TestEnv::new(runner);
    let request = env.github_request("acme-tool", "9.9.9", "acme/tool");

    let err = env.pipeline.create_package(&request).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<Npm2RezError>(),
        Some(Npm2RezError::CloneFailed { url, .. }) if url == "https://github.com/acme/tool.git"
    ));
    assert_eq!(env.pipeline.runner().operations(), ["--version", "clone"]);
    assert!(env.leftover_clones("acme_tool").is_empty());
}

#[tokio::test]
async fn test_versions_of_one_package_live_side_by_side() {
    let env = TestEnv::new(RecordingRunner::new().with_registry_install(&["tsc"]));

    for version in ["4.9.5", "5.0.2"] {
        let request = PackageRequest::builder("typescript", version)
            .bin_name(Some("tsc"))
            .output_root(env.output())
            .build()
            .unwrap();
        env.pipeline.create_package(&request).await.unwrap();
    }

    for version in ["4.9.5", "5.0.2"] {
        let root = env.output().join("typescript").join(version);
        let manifest = fs::read_to_string(root.join("package.py")).unwrap();
        assert!(manifest.contains(&format!("version = \"{version}\"")));
        assert!(root.join("bin/tsc").exists());
    }
}

#[tokio::test]
async fn test_github_release_without_npm_is_degraded() {
    let env = TestEnv::with_tools(RecordingRunner::new().with_clone_contents(), &["git"]);
    let request = env.github_request("acme-tool", "1.2.0", "acme/tool");

    let created = env.pipeline.create_package(&request).await.unwrap();

    assert_eq!(created.outcome, InstallOutcome::Degraded);
    let root = env.output().join("acme_tool/1.2.0");
    assert!(root.join("package.py").exists());
    assert!(root.join("bin").is_dir());
    assert!(root.join("node_modules").is_dir());
    assert!(!root.join("src").exists());
    assert!(env.pipeline.runner().commands().is_empty());
    assert!(env.leftover_clones("acme_tool").is_empty());
}
