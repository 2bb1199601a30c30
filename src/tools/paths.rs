// src/tools/paths.rs

//! Path conversion for the Windows Installer tools

use super::{run_tool, PathConverter};
use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How local paths are turned into the form the MSI tools expect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformPaths {
    /// Use absolute local paths as-is
    Native,
    /// Convert through `cygpath -w` (Cygwin builds)
    Cygpath(String),
}

impl PlatformPaths {
    /// `Native` for an empty program name, `Cygpath` otherwise
    pub fn from_program(program: &str) -> Self {
        if program.trim().is_empty() {
            Self::Native
        } else {
            Self::Cygpath(program.to_string())
        }
    }

    /// The converter executable, if any
    pub fn program(&self) -> Option<&str> {
        match self {
            Self::Native => None,
            Self::Cygpath(program) => Some(program),
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

impl PathConverter for PlatformPaths {
    fn to_platform(&self, path: &Path) -> Result<String> {
        let path = absolute(path)?;
        match self {
            Self::Native => Ok(path.to_string_lossy().into_owned()),
            Self::Cygpath(program) => {
                let output = run_tool(program, &[OsStr::new("-w"), path.as_os_str()])?;
                let converted = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if converted.is_empty() {
                    return Err(Error::tool(
                        format!("{} -w {}", program, path.display()),
                        "produced no output",
                    ));
                }
                debug!("Converted {} to Windows path {}", path.display(), converted);
                Ok(converted)
            }
        }
    }
}
