//! Shared helpers for the integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// Write a config file whose executable search path is `search_path`, so the binary
/// never picks up the npm or git installed on the machine running the tests.
pub fn isolated_config(dir: &Path, search_path: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(
        &path,
        format!("search_path = '{}'\nshow_progress = false\n", search_path.display()),
    )
    .unwrap();
    path
}

/// `npm2rez --no-progress --config <config>` run from `cwd`.
pub fn npm2rez(cwd: &Path, config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("npm2rez").unwrap();
    cmd.current_dir(cwd)
        .env_remove("RUST_LOG")
        .env_remove("NPM2REZ_CONFIG")
        .arg("--no-progress")
        .arg("--config")
        .arg(config);
    cmd
}

/// Install a shell script named `npm` in `dir` that imitates npm.
///
/// `npm install <spec>` creates `node_modules/<name>/index.js` and an executable
/// `node_modules/.bin/<name>`; with `fail_install` it prints an npm-style error and exits 1.
#[cfg(unix)]
pub fn scripted_npm(dir: &Path, fail_install: bool) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let install = if fail_install {
        "echo 'npm ERR! 404 Not Found' >&2; exit 1".to_string()
    } else {
        [
            "spec=\"$2\"",
            "name=\"${spec%@*}\"",
            "mkdir -p \"node_modules/$name\" node_modules/.bin",
            "echo 'module.exports = {};' > \"node_modules/$name/index.js\"",
            "printf '#!/bin/sh\\necho hi\\n' > \"node_modules/.bin/$name\"",
            "chmod +x \"node_modules/.bin/$name\"",
        ]
        .join("\n    ")
    };

    let script = format!(
        "#!/bin/sh\ncase \"$1\" in\n  --version)\n    echo 10.2.4\n    ;;\n  install)\n    {install}\n    ;;\n  *)\n    exit 1\n    ;;\nesac\n"
    );

    let path = dir.join("npm");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
