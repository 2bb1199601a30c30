// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use mspgen::cli::Cli;
use mspgen::tools::{ensure_executable, PatchSigner, UuidGuidSource};
use mspgen::{create_patch, default_patch_name, AssemblyRequest, BuildMetadata, Collaborators, ToolConfig};
use std::path::PathBuf;
use tracing::info;

/// Bundled control file template, relative to the executable
const BUNDLED_PCP: &str = "pcp/libreoffice.pcp";

fn bundled_pcp() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Cannot locate the mspgen executable")?;
    let dir = exe
        .parent()
        .context("Executable path has no parent directory")?;
    Ok(dir.join(BUNDLED_PCP))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; --log turns on debug output
    let default_level = if cli.log { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => ToolConfig::load(path)?,
        None => ToolConfig::default(),
    };

    let metadata = BuildMetadata::from_env()?;
    info!(
        "Building {} patch {} for {}",
        metadata.classification, metadata.product_version, metadata.product_name
    );

    info!("Checking that all needed executables are in the PATH");
    for program in config.required_programs(cli.sign) {
        ensure_executable(&program)?;
    }

    let control_template = match cli.pcp {
        Some(path) => path,
        None => bundled_pcp()?,
    };
    let output = match cli.output {
        Some(path) => path,
        None => std::env::current_dir()
            .context("Cannot determine the current directory")?
            .join(default_patch_name(&metadata)),
    };

    let request = AssemblyRequest {
        old_package: cli.old,
        new_package: cli.new,
        control_template,
        output,
        sign: cli.sign,
        keep_staging: cli.keep_staging,
        properties_policy: config.tables.properties_policy,
    };

    let installer = config.installer();
    let table_tool = config.table_tool();
    let builder = config.patch_builder();
    let paths = config.platform_paths();
    let signer = config.signer();
    let tools = Collaborators {
        installer: &installer,
        table_tool: &table_tool,
        guid_source: &UuidGuidSource,
        builder: &builder,
        paths: &paths,
        signer: cli.sign.then_some(&signer as &dyn PatchSigner),
    };

    let report = create_patch(&request, metadata, &tools)?;
    println!("Created {} (PatchGUID {})", report.patch.display(), report.patch_guid);
    if let Some(dir) = report.staging_dir {
        println!("Staging directory kept at {}", dir.display());
    }
    Ok(())
}
