//! On-disk fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::MANIFEST_FILE_NAME;

/// Create an executable file called `name` in `dir` and return its path.
///
/// On Windows the file gets a `.cmd` extension so `which` finds it through `PATHEXT`,
/// mirroring how npm itself is installed there.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn fake_executable(dir: &Path, name: &str) -> PathBuf {
    #[cfg(windows)]
    let path = dir.join(format!("{name}.cmd"));
    #[cfg(not(windows))]
    let path = dir.join(name);

    fs::write(&path, "#!/bin/sh\necho 10.2.4\n").expect("write fake executable");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("make fake executable runnable");
    }

    path
}

/// Write a minimal `package.py` for `original_name` at `<root>/<normalized>/<version>/`,
/// as an earlier npm2rez run would have left it.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_manifest_fixture(
    root: &Path,
    normalized: &str,
    version: &str,
    original_name: &str,
) -> PathBuf {
    let dir = root.join(normalized).join(version);
    fs::create_dir_all(&dir).expect("create package directory");
    let path = dir.join(MANIFEST_FILE_NAME);
    let content = format!(
        "name = \"{normalized}\"\nversion = \"{version}\"\n\n\
         description = \"Rez package for {original_name} Node.js package\"\n"
    );
    fs::write(&path, content).expect("write manifest fixture");
    path
}
