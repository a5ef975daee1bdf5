//! `npm2rez create`

use anyhow::Result;
use clap::Args;

use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_RUNTIME_VERSION};
use crate::core::{PackageRequest, SourceKind};
use crate::exec::CommandRunner;
use crate::package::Pipeline;
use crate::utils::platform::resolve_path;

/// Create a rez package.
///
/// The package is written to `<output>/<name>/<version>/`, where `<name>` is the npm
/// name with `-` and `/` replaced by `_` and `@` removed.
#[derive(Args, Debug, Clone)]
pub struct CreateCommand {
    /// npm package name, e.g. `typescript` or `@types/node`
    #[arg(long)]
    name: String,

    /// Package version (for GitHub sources the tag `v<version>` is cloned)
    #[arg(long = "version", id = "package_version", value_name = "VERSION")]
    package_version: String,

    /// Root directory of the rez packages
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output: String,

    /// Where to get the package from
    #[arg(long, value_enum, default_value_t = SourceKind::Npm)]
    source: SourceKind,

    /// GitHub repository as `owner/name`, required with `--source github`
    #[arg(long)]
    repo: Option<String>,

    /// Minimum Node.js version required by the package
    #[arg(long, default_value = DEFAULT_RUNTIME_VERSION)]
    node_version: String,

    /// Executable provided by the package; adds `{root}/bin` to PATH
    #[arg(long)]
    bin_name: Option<String>,
}

impl CreateCommand {
    pub(crate) fn request(&self) -> Result<PackageRequest> {
        let output = resolve_path(&self.output)?;
        PackageRequest::builder(&self.name, &self.package_version)
            .source(self.source)
            .repo(self.repo.as_deref())
            .runtime_version(&self.node_version)
            .bin_name(self.bin_name.as_deref())
            .output_root(output)
            .build()
    }

    pub async fn execute<R: CommandRunner>(self, pipeline: &Pipeline<R>) -> Result<()> {
        let request = self.request()?;
        let created = pipeline.create_package(&request).await?;
        println!("Created package at {}", created.layout.root().display());
        Ok(())
    }
}
