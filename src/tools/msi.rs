// src/tools/msi.rs

//! Windows Installer SDK tools: msiexec, msidb, msimsp and signtool

use super::{run_tool, PatchBuilder, PatchSigner, PathConverter, PlatformPaths, ProductInstaller, TableTool};
use crate::error::{Error, Result};
use crate::table::TableName;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Administrative installs through `msiexec /a`
///
/// An administrative install unpacks the full product image into
/// `TARGETDIR` without registering it on the machine.
#[derive(Debug, Clone)]
pub struct Msiexec {
    program: String,
    paths: PlatformPaths,
}

impl Msiexec {
    pub fn new(program: impl Into<String>, paths: PlatformPaths) -> Self {
        Self {
            program: program.into(),
            paths,
        }
    }
}

impl ProductInstaller for Msiexec {
    fn install(&self, package: &Path, target_dir: &Path) -> Result<PathBuf> {
        info!("Installing {} into {}", package.display(), target_dir.display());
        if !package.is_file() {
            return Err(Error::tool(
                format!("{} /a {}", self.program, package.display()),
                "package file does not exist",
            ));
        }
        fs::create_dir_all(target_dir)?;

        let args = [
            "/a".to_string(),
            self.paths.to_platform(package)?,
            "/qn".to_string(),
            format!("TARGETDIR={}", self.paths.to_platform(target_dir)?),
        ];
        run_tool(&self.program, &args)?;
        Ok(target_dir.to_path_buf())
    }
}

/// Table export/import through `msidb`
#[derive(Debug, Clone)]
pub struct Msidb {
    program: String,
    paths: PlatformPaths,
}

impl Msidb {
    pub fn new(program: impl Into<String>, paths: PlatformPaths) -> Self {
        Self {
            program: program.into(),
            paths,
        }
    }
}

impl TableTool for Msidb {
    fn extract_all(&self, control_file: &Path, dir: &Path) -> Result<()> {
        info!("Extracting tables from {}", control_file.display());
        let args = [
            "-d".to_string(),
            self.paths.to_platform(control_file)?,
            "-f".to_string(),
            self.paths.to_platform(dir)?,
            "-e".to_string(),
            "*".to_string(),
        ];
        run_tool(&self.program, &args)?;
        Ok(())
    }

    fn insert(&self, control_file: &Path, dir: &Path, table: TableName) -> Result<()> {
        info!("Inserting {} into {}", table, control_file.display());
        let args = [
            "-d".to_string(),
            self.paths.to_platform(control_file)?,
            "-f".to_string(),
            self.paths.to_platform(dir)?,
            "-i".to_string(),
            table.file_name(),
        ];
        run_tool(&self.program, &args)?;
        Ok(())
    }
}

/// Patch creation through `msimsp`
#[derive(Debug, Clone)]
pub struct Msimsp {
    program: String,
    paths: PlatformPaths,
}

impl Msimsp {
    /// Log file written into the work directory
    pub const LOG_FILE: &'static str = "msimsp.log";
    /// Scratch directory handed to msimsp inside the work directory
    pub const TEMP_DIR: &'static str = "msimsp_temp";

    pub fn new(program: impl Into<String>, paths: PlatformPaths) -> Self {
        Self {
            program: program.into(),
            paths,
        }
    }
}

impl PatchBuilder for Msimsp {
    fn build(&self, control_file: &Path, output: &Path, work_dir: &Path) -> Result<()> {
        info!("Building {} from {}", output.display(), control_file.display());
        let temp_dir = work_dir.join(Self::TEMP_DIR);
        fs::create_dir_all(&temp_dir)?;
        let log = work_dir.join(Self::LOG_FILE);

        let args = [
            "-s".to_string(),
            self.paths.to_platform(control_file)?,
            "-p".to_string(),
            self.paths.to_platform(output)?,
            "-l".to_string(),
            self.paths.to_platform(&log)?,
            "-f".to_string(),
            self.paths.to_platform(&temp_dir)?,
        ];
        run_tool(&self.program, &args).map_err(|e| match e {
            Error::ExternalTool { command, reason } => Error::ExternalTool {
                command,
                reason: format!("{} (see {})", reason, log.display()),
            },
            other => other,
        })?;

        if !output.is_file() {
            return Err(Error::tool(
                self.program.clone(),
                format!("reported success but {} was not created", output.display()),
            ));
        }
        Ok(())
    }
}

/// Authenticode signing through `signtool sign /a`
#[derive(Debug, Clone)]
pub struct SignTool {
    program: String,
    paths: PlatformPaths,
}

impl SignTool {
    pub fn new(program: impl Into<String>, paths: PlatformPaths) -> Self {
        Self {
            program: program.into(),
            paths,
        }
    }
}

impl PatchSigner for SignTool {
    fn sign(&self, patch: &Path) -> Result<()> {
        info!("Signing {}", patch.display());
        let args = ["sign".to_string(), "/a".to_string(), self.paths.to_platform(patch)?];
        run_tool(&self.program, &args)?;
        Ok(())
    }
}
