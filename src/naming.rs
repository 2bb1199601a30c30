// src/naming.rs

//! 8.3 file names for table re-insertion
//!
//! The table tool can require 8.3 file names when importing on some
//! filesystems. Before re-insertion every dump whose table name is longer
//! than eight characters is duplicated under its first eight characters;
//! the original stays in place.

use crate::error::Result;
use crate::table::{table_path, TableName};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Longest table name usable as an 8.3 file stem
pub const MAX_STEM_LEN: usize = 8;

/// Truncated alias for a table name, `None` when it already fits
pub fn short_name(name: &str) -> Option<&str> {
    let (cut, _) = name.char_indices().nth(MAX_STEM_LEN)?;
    Some(&name[..cut])
}

/// Duplicate long-named dumps under their short names
///
/// Returns the paths of the copies created.
pub fn prepare_short_names(dir: &Path, names: &[TableName]) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for name in names {
        let Some(short) = short_name(name.as_str()) else {
            continue;
        };
        let source = table_path(dir, *name);
        let alias = dir.join(format!("{}.idt", short));
        fs::copy(&source, &alias)?;
        debug!("Copied {} to {}", source.display(), alias.display());
        created.push(alias);
    }
    Ok(created)
}
