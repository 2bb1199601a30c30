// src/config.rs

//! Tool configuration file
//!
//! Everything here is optional; an absent file means the defaults below.
//!
//! ```toml
//! [tools]
//! msidb = "msidb.exe"
//! msimsp = "msimsp.exe"
//! msiexec = "msiexec.exe"
//! # Empty disables path conversion
//! cygpath = "cygpath"
//! signtool = "signtool.exe"
//!
//! [tables]
//! properties_policy = "substitute-only"   # or "upsert"
//! ```

use crate::context::PropertiesPolicy;
use crate::error::{Error, Result};
use crate::tools::{Msidb, Msiexec, Msimsp, PlatformPaths, SignTool};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    #[serde(default)]
    pub tools: ToolPaths,

    #[serde(default)]
    pub tables: TableSettings,
}

/// Executables of the external tools
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ToolPaths {
    pub msidb: String,
    pub msimsp: String,
    pub msiexec: String,
    pub cygpath: String,
    pub signtool: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            msidb: "msidb.exe".to_string(),
            msimsp: "msimsp.exe".to_string(),
            msiexec: "msiexec.exe".to_string(),
            cygpath: "cygpath".to_string(),
            signtool: "signtool.exe".to_string(),
        }
    }
}

/// Table edit settings
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TableSettings {
    pub properties_policy: PropertiesPolicy,
}

impl ToolConfig {
    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("invalid tool configuration: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn platform_paths(&self) -> PlatformPaths {
        PlatformPaths::from_program(&self.tools.cygpath)
    }

    pub fn installer(&self) -> Msiexec {
        Msiexec::new(&self.tools.msiexec, self.platform_paths())
    }

    pub fn table_tool(&self) -> Msidb {
        Msidb::new(&self.tools.msidb, self.platform_paths())
    }

    pub fn patch_builder(&self) -> Msimsp {
        Msimsp::new(&self.tools.msimsp, self.platform_paths())
    }

    pub fn signer(&self) -> SignTool {
        SignTool::new(&self.tools.signtool, self.platform_paths())
    }

    /// Executables that must be on PATH before a run starts
    pub fn required_programs(&self, sign: bool) -> Vec<String> {
        let mut programs = vec![
            self.tools.msidb.clone(),
            self.tools.msimsp.clone(),
            self.tools.msiexec.clone(),
        ];
        if let Some(converter) = self.platform_paths().program() {
            programs.push(converter.to_string());
        }
        if sign {
            programs.push(self.tools.signtool.clone());
        }
        programs
    }
}
