// src/table/staging.rs

//! Reading and writing table dumps in a staging directory

use super::{Table, TableName};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix of the backup copy made before a table is edited
pub const BACKUP_SUFFIX: &str = "sav";

/// Path of a table dump inside the staging directory
pub fn table_path(dir: &Path, name: TableName) -> PathBuf {
    dir.join(name.file_name())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".");
    os.push(BACKUP_SUFFIX);
    PathBuf::from(os)
}

/// Check that every listed table was extracted
///
/// Runs over the whole list before anything is copied or edited so a
/// missing dump aborts the run with the staging directory untouched.
pub fn verify_tables_present(dir: &Path, names: &[TableName]) -> Result<()> {
    for name in names {
        let path = table_path(dir, *name);
        if !path.is_file() {
            return Err(Error::MissingTable { path });
        }
    }
    Ok(())
}

/// Copy each table to `<Table>.idt.sav`
///
/// The copies are for manual recovery only; nothing restores from them.
pub fn backup_tables(dir: &Path, names: &[TableName]) -> Result<()> {
    for name in names {
        let path = table_path(dir, *name);
        if !path.is_file() {
            return Err(Error::MissingTable { path });
        }
        let backup = backup_path(&path);
        fs::copy(&path, &backup)?;
        debug!("Saved {} to {}", path.display(), backup.display());
    }
    Ok(())
}

/// Load and parse one table from the staging directory
pub fn load_table(dir: &Path, name: TableName) -> Result<Table> {
    let path = table_path(dir, name);
    if !path.is_file() {
        return Err(Error::MissingTable { path });
    }

    let bytes = fs::read(&path)?;
    let raw = String::from_utf8(bytes).map_err(|e| Error::Format {
        table: name.to_string(),
        reason: format!("{} is not valid UTF-8: {}", path.display(), e),
    })?;
    Table::parse(name, &raw)
}

/// Serialize a table back over its dump
pub fn store_table(dir: &Path, table: &Table) -> Result<PathBuf> {
    let path = table_path(dir, table.name());
    fs::write(&path, table.serialize())?;
    debug!("Wrote {} ({} rows)", path.display(), table.rows().len());
    Ok(path)
}
