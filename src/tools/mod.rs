// src/tools/mod.rs

//! External collaborators of a patch assembly run
//!
//! Each tool the orchestrator drives sits behind a narrow trait so the
//! pipeline can run against in-memory substitutes. The process-backed
//! implementations shell out synchronously with no timeout: a hung tool
//! hangs the run.

mod msi;
mod paths;

use crate::context::format_guid;
use crate::error::{Error, Result};
use crate::table::TableName;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::debug;
use uuid::Uuid;

pub use msi::{Msidb, Msiexec, Msimsp, SignTool};
pub use paths::PlatformPaths;

/// Installs a product package into a directory
pub trait ProductInstaller {
    /// Install `package` below `target_dir` and return the image root
    fn install(&self, package: &Path, target_dir: &Path) -> Result<PathBuf>;
}

/// Moves tables between a control file and a directory of dumps
pub trait TableTool {
    /// Export every table of `control_file` into `dir`
    fn extract_all(&self, control_file: &Path, dir: &Path) -> Result<()>;

    /// Import one edited dump from `dir` back into `control_file`
    fn insert(&self, control_file: &Path, dir: &Path, table: TableName) -> Result<()>;
}

/// Source of fresh globally-unique identifiers
pub trait GuidSource {
    fn generate(&self) -> Result<String>;
}

/// Builds the binary patch from an edited control file
pub trait PatchBuilder {
    fn build(&self, control_file: &Path, output: &Path, work_dir: &Path) -> Result<()>;
}

/// Converts local paths into the form embedded into tables
pub trait PathConverter {
    fn to_platform(&self, path: &Path) -> Result<String>;
}

/// Signs a finished patch
pub trait PatchSigner {
    fn sign(&self, patch: &Path) -> Result<()>;
}

/// Random (v4) GUIDs from the `uuid` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGuidSource;

impl GuidSource for UuidGuidSource {
    fn generate(&self) -> Result<String> {
        Ok(format_guid(&Uuid::new_v4()))
    }
}

/// Check that an executable can be found on PATH
pub fn ensure_executable(program: &str) -> Result<PathBuf> {
    debug!("Checking for {}", program);
    which::which(program).map_err(|e| {
        Error::tool(
            program,
            format!("not found in PATH ({}); make sure the Windows Installer SDK tools are installed", e),
        )
    })
}

/// Render a command line for logs and errors
pub(crate) fn render_command<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.as_ref().to_string_lossy());
    }
    rendered
}

/// Run a tool to completion, failing on a non-zero exit
pub(crate) fn run_tool<S: AsRef<OsStr>>(program: &str, args: &[S]) -> Result<Output> {
    let rendered = render_command(program, args);
    debug!("Running {}", rendered);

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| Error::tool(&rendered, format!("failed to start: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = if stderr.trim().is_empty() { stdout } else { stderr };
        return Err(Error::tool(
            rendered,
            format!("{}: {}", output.status, detail.trim()),
        ));
    }

    Ok(output)
}
