//! `npm2rez extract`

use anyhow::Result;
use clap::Args;

use crate::core::{PackageRequest, SourceKind};
use crate::exec::CommandRunner;
use crate::package::Pipeline;
use crate::utils::platform::resolve_path;

/// Install an npm package into a directory.
///
/// No `package.py` and no `<name>/<version>` layout are created; the directory receives
/// `package.json`, `node_modules/` and `bin/` directly. GitHub sources are installed
/// from the registry.
#[derive(Args, Debug, Clone)]
pub struct ExtractCommand {
    /// npm package name
    #[arg(long)]
    name: String,

    /// Package version
    #[arg(long = "version", id = "package_version", value_name = "VERSION")]
    package_version: String,

    /// Directory to install into
    #[arg(long, default_value = ".")]
    output: String,

    /// Where to get the package from
    #[arg(long, value_enum, default_value_t = SourceKind::Npm)]
    source: SourceKind,

    /// GitHub repository as `owner/name`
    #[arg(long)]
    repo: Option<String>,
}

impl ExtractCommand {
    pub async fn execute<R: CommandRunner>(self, pipeline: &Pipeline<R>) -> Result<()> {
        let target = resolve_path(&self.output)?;
        let request = PackageRequest::builder(&self.name, &self.package_version)
            .source(self.source)
            .repo(self.repo.as_deref())
            .output_root(&target)
            .build()?;

        if pipeline.extract_package(&request, &target).await? {
            println!(
                "Successfully extracted {}@{} to {}",
                self.name,
                self.package_version,
                target.display()
            );
        } else {
            println!("Failed to extract {}@{}", self.name, self.package_version);
        }
        Ok(())
    }
}
