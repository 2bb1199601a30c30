// src/lib.rs

//! mspgen - Windows Installer patch assembly
//!
//! Builds an MSP patch between two MSI packages by editing the tables of a
//! patch control file (`.pcp`) and handing it to the patch-build tool.
//!
//! # Architecture
//!
//! - Table store: tab-delimited dumps with an opaque three-line header
//! - Context: build metadata resolved once per run, read-only afterwards
//! - Transforms: one edit per table, run in a fixed order
//! - Tools: every external program behind a narrow trait

pub mod assembly;
pub mod cli;
pub mod config;
pub mod context;
mod error;
pub mod metadata;
pub mod naming;
pub mod table;
pub mod tools;
pub mod transform;

pub use assembly::{create_patch, default_patch_name, AssemblyReport, AssemblyRequest, Collaborators};
pub use config::ToolConfig;
pub use context::{BuildMetadata, Classification, PatchContext, PropertiesPolicy};
pub use error::{Error, Result};
pub use metadata::MetadataEntry;
pub use table::{Table, TableName};
