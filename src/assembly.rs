// src/assembly.rs

//! Patch assembly: staging, external tools, and the table pipeline
//!
//! A run installs both product images, copies the control-file template
//! into a fresh staging directory, extracts its tables, edits the six patch
//! tables, re-inserts them and builds the patch. Every step is synchronous
//! and the first failure ends the run. The staging directory is unique per
//! run, so concurrent runs on one host do not interfere.

use crate::context::{normalize_guid, BuildMetadata, PatchContext, PropertiesPolicy, ResolvedPaths};
use crate::error::{Error, Result};
use crate::naming::prepare_short_names;
use crate::table::{backup_tables, verify_tables_present, TableName};
use crate::tools::{GuidSource, PatchBuilder, PatchSigner, PathConverter, ProductInstaller, TableTool};
use crate::transform::run_pipeline;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Prefix of the per-run staging directory
pub const STAGING_PREFIX: &str = "msp_libreoffice";
/// Name of the control file inside the staging directory
pub const CONTROL_FILE_NAME: &str = "libreoffice.pcp";
const OLD_IMAGE_DIR: &str = "old_image";
const NEW_IMAGE_DIR: &str = "new_image";

/// The external tools a run drives
pub struct Collaborators<'a> {
    pub installer: &'a dyn ProductInstaller,
    pub table_tool: &'a dyn TableTool,
    pub guid_source: &'a dyn GuidSource,
    pub builder: &'a dyn PatchBuilder,
    pub paths: &'a dyn PathConverter,
    /// Required when the request asks for signing
    pub signer: Option<&'a dyn PatchSigner>,
}

/// Inputs of one patch run
#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    pub old_package: PathBuf,
    pub new_package: PathBuf,
    pub control_template: PathBuf,
    pub output: PathBuf,
    pub sign: bool,
    pub keep_staging: bool,
    pub properties_policy: PropertiesPolicy,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    pub patch: PathBuf,
    pub patch_guid: String,
    /// Staging directory, when it was kept
    pub staging_dir: Option<PathBuf>,
}

/// Default patch file name: `<Product>_<version>_<classification>.msp`
pub fn default_patch_name(metadata: &BuildMetadata) -> String {
    format!(
        "{}_{}_{}.msp",
        metadata.product_name.split_whitespace().collect::<Vec<_>>().join("_"),
        metadata.product_version,
        metadata.classification
    )
}

/// Build a patch between two product packages
pub fn create_patch(
    request: &AssemblyRequest,
    metadata: BuildMetadata,
    tools: &Collaborators<'_>,
) -> Result<AssemblyReport> {
    info!("*************************");
    info!("... creating msp file ...");
    info!("*************************");

    if request.sign && tools.signer.is_none() {
        return Err(Error::config("signing was requested but no signer is configured"));
    }
    if !request.control_template.is_file() {
        return Err(Error::config(format!(
            "control file template {} does not exist",
            request.control_template.display()
        )));
    }

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .keep(request.keep_staging)
        .tempdir()?;
    let dir = staging.path();
    info!("Created MSP directory at {}", dir.display());

    let result = assemble(request, metadata, tools, dir);
    if request.keep_staging {
        info!("Keeping staging directory {}", dir.display());
    }

    let (patch_guid, patch) = result?;
    info!("Successfully created the msp file {}", patch.display());
    Ok(AssemblyReport {
        patch,
        patch_guid,
        staging_dir: request.keep_staging.then(|| dir.to_path_buf()),
    })
}

fn assemble(
    request: &AssemblyRequest,
    metadata: BuildMetadata,
    tools: &Collaborators<'_>,
    dir: &Path,
) -> Result<(String, PathBuf)> {
    let old_image = tools
        .installer
        .install(&request.old_package, &dir.join(OLD_IMAGE_DIR))?;
    let new_image = tools
        .installer
        .install(&request.new_package, &dir.join(NEW_IMAGE_DIR))?;

    let control_file = dir.join(CONTROL_FILE_NAME);
    fs::copy(&request.control_template, &control_file)?;

    tools.table_tool.extract_all(&control_file, dir)?;
    verify_tables_present(dir, &TableName::ALL)?;
    backup_tables(dir, &TableName::ALL)?;

    let patch_guid = normalize_guid(&tools.guid_source.generate()?)?;
    info!("Patch GUID: {}", patch_guid);

    let paths = ResolvedPaths {
        old_image: tools.paths.to_platform(&old_image)?,
        new_image: tools.paths.to_platform(&new_image)?,
        output_patch: tools.paths.to_platform(&request.output)?,
    };
    let ctx = PatchContext::new(metadata, paths, patch_guid.clone())
        .with_properties_policy(request.properties_policy);

    run_pipeline(dir, &ctx)?;

    prepare_short_names(dir, &TableName::ALL)?;
    for name in TableName::ALL {
        tools.table_tool.insert(&control_file, dir, name)?;
    }

    let output_existed = request.output.exists();
    if let Err(e) = build_and_sign(request, tools, &control_file, dir) {
        if !output_existed {
            discard_partial_patch(&request.output);
        }
        return Err(e);
    }

    Ok((patch_guid, request.output.clone()))
}

fn build_and_sign(
    request: &AssemblyRequest,
    tools: &Collaborators<'_>,
    control_file: &Path,
    dir: &Path,
) -> Result<()> {
    tools.builder.build(control_file, &request.output, dir)?;

    if request.sign {
        info!("Signing the msp file");
        if let Some(signer) = tools.signer {
            signer.sign(&request.output)?;
        }
    }
    Ok(())
}

fn discard_partial_patch(output: &Path) {
    if output.exists() {
        if let Err(e) = fs::remove_file(output) {
            warn!("Could not remove partial patch {}: {}", output.display(), e);
        }
    }
}
