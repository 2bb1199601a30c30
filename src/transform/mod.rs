// src/transform/mod.rs

//! Table edits that turn the template control file into one for this patch
//!
//! Six edits run strictly in [`TableName::ALL`] order. Each one loads its
//! dump from the staging directory, rewrites it from the [`PatchContext`]
//! alone, and writes it back before the next begins; no edit reads another
//! table. A missing dump aborts the run, and tables already rewritten stay
//! rewritten (the `.sav` copies exist for manual recovery).

mod images;
mod patch;
mod properties;

use crate::context::PatchContext;
use crate::error::Result;
use crate::table::{self, Table, TableName};
use std::path::Path;
use tracing::{info, warn};

pub use images::{edit_image_families, edit_target_images, edit_upgraded_images};
pub use patch::{edit_patch_metadata, edit_patch_sequence, metadata_values};
pub use properties::{edit_properties, PATCH_GUID_PROPERTY, PATCH_OUTPUT_PATH_PROPERTY};

/// Apply the edit belonging to `table`
pub fn apply(table: &mut Table, ctx: &PatchContext) {
    match table.name() {
        TableName::Properties => edit_properties(table, ctx),
        TableName::TargetImages => edit_target_images(table, ctx),
        TableName::UpgradedImages => edit_upgraded_images(table, ctx),
        TableName::ImageFamilies => edit_image_families(table, ctx),
        TableName::PatchMetadata => edit_patch_metadata(table, ctx),
        TableName::PatchSequence => edit_patch_sequence(table, ctx),
    }
}

/// Load, edit and store one table
pub fn edit_table(dir: &Path, name: TableName, ctx: &PatchContext) -> Result<()> {
    let mut table = table::load_table(dir, name)?;
    apply(&mut table, ctx);
    table::store_table(dir, &table)?;
    Ok(())
}

/// Run every edit in pipeline order
pub fn run_pipeline(dir: &Path, ctx: &PatchContext) -> Result<()> {
    for name in TableName::ALL {
        info!("Editing table {}", name);
        edit_table(dir, name, ctx)?;
    }
    Ok(())
}

/// Replace all data rows with a single row
///
/// Earlier rows are dropped rather than merged; multi-image tables are not
/// supported, so a warning records what was lost.
fn replace_with_single_row(table: &mut Table, row: Vec<String>) {
    let dropped = table.truncate_to_header_only();
    if dropped > 0 {
        warn!(
            "Discarding {} existing row(s) from {}; only one image is supported",
            dropped,
            table.name()
        );
    }
    table.append_row(row);
}
