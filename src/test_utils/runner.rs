//! A command runner that never starts a process.

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::constants::{NODE_MODULES_BIN_DIR, NODE_MODULES_DIR};
use crate::exec::{CommandOutput, CommandRunner, ToolCommand};

type Hook = Arc<dyn Fn(&ToolCommand) -> Result<()> + Send + Sync>;

/// Records every command and answers it without running anything.
///
/// Behaviour is configured per operation (as returned by [`ToolCommand::operation`], e.g.
/// `install`, `run build`, `clone`, `--version`):
///
/// - [`RecordingRunner::fail_on`] makes the operation exit non-zero with the given output
/// - [`RecordingRunner::on`] runs a hook, typically to create the files the real tool
///   would have created
///
/// Clones share their record, so a clone handed to the pipeline can still be inspected.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    commands: Arc<Mutex<Vec<ToolCommand>>>,
    failures: Vec<(String, String)>,
    hooks: Vec<(String, Hook)>,
}

impl RecordingRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `operation` fail with `output` as its error output.
    #[must_use]
    pub fn fail_on(mut self, operation: &str, output: &str) -> Self {
        self.failures.push((operation.to_string(), output.to_string()));
        self
    }

    /// Run `hook` whenever `operation` succeeds.
    #[must_use]
    pub fn on<F>(mut self, operation: &str, hook: F) -> Self
    where
        F: Fn(&ToolCommand) -> Result<()> + Send + Sync + 'static,
    {
        self.hooks.push((operation.to_string(), Arc::new(hook)));
        self
    }

    /// Simulate `npm install <spec>`: create `node_modules/<package>/index.js` and one
    /// `node_modules/.bin` entry per name in `executables`.
    #[must_use]
    pub fn with_registry_install(self, executables: &[&str]) -> Self {
        let executables: Vec<String> = executables.iter().map(|s| (*s).to_string()).collect();
        self.on("install", move |command| {
            let Some(dir) = command.working_dir() else {
                return Ok(());
            };
            let modules = dir.join(NODE_MODULES_DIR);
            let package = command
                .arguments()
                .get(1)
                .and_then(|spec| spec.rsplit_once('@'))
                .map_or("package", |(name, _)| name);
            let package_dir = modules.join(package);
            fs::create_dir_all(&package_dir)?;
            fs::write(package_dir.join("index.js"), "module.exports = {};\n")?;

            let bin_dir = modules.join(NODE_MODULES_BIN_DIR);
            fs::create_dir_all(&bin_dir)?;
            for exe in &executables {
                fs::write(bin_dir.join(exe), "#!/usr/bin/env node\n")?;
            }
            Ok(())
        })
    }

    /// Simulate `git clone` of a repository containing `package.json`, `src/index.ts` and
    /// a `bin/cli.js`.
    #[must_use]
    pub fn with_clone_contents(self) -> Self {
        self.on("clone", |command| {
            let Some(target) = command.arguments().last() else {
                return Ok(());
            };
            let target = Path::new(target);
            fs::create_dir_all(target.join("src"))?;
            fs::create_dir_all(target.join("bin"))?;
            fs::write(target.join("package.json"), "{\"name\": \"cloned\"}\n")?;
            fs::write(target.join("src/index.ts"), "export {};\n")?;
            fs::write(target.join("bin/cli.js"), "#!/usr/bin/env node\n")?;
            Ok(())
        })
    }

    /// Every command run so far, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<ToolCommand> {
        self.commands.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// The operations run so far, e.g. `["--version", "install"]`.
    #[must_use]
    pub fn operations(&self) -> Vec<String> {
        self.commands().iter().map(ToolCommand::operation).collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, command: ToolCommand) -> Result<CommandOutput> {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command.clone());
        }

        let operation = command.operation();

        if let Some((_, output)) = self.failures.iter().find(|(op, _)| *op == operation) {
            return Err(command.failure("", output).into());
        }

        for (_, hook) in self.hooks.iter().filter(|(op, _)| *op == operation) {
            hook(&command)?;
        }

        let stdout = if operation == "--version" {
            "10.2.4\n".to_string()
        } else {
            String::new()
        };

        Ok(CommandOutput {
            stdout,
            stderr: String::new(),
        })
    }
}
