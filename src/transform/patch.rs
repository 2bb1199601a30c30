// src/transform/patch.rs

//! PatchMetadata and PatchSequence

use crate::context::PatchContext;
use crate::metadata::{self, MetadataEntry};
use crate::table::{escape_value, Table};
use tracing::debug;

/// Build-time PatchMetadata properties, in the order they are written
pub fn metadata_values(ctx: &PatchContext) -> Vec<(&'static str, String)> {
    let meta = ctx.metadata();
    let display = meta.display_text();
    vec![
        ("Classification", meta.classification.as_str().to_string()),
        ("AllowRemoval", meta.allow_removal.clone()),
        ("CreationTimeUTC", ctx.creation_time_utc()),
        ("TargetProductName", meta.product_name.clone()),
        ("ManufacturerName", meta.vendor.clone()),
        ("DisplayName", display.clone()),
        ("Description", display),
    ]
    .into_iter()
    .map(|(key, value)| (key, escape_value(&value)))
    .collect()
}

/// Merge build metadata into PatchMetadata, keeping companies and unknown rows
pub fn edit_patch_metadata(table: &mut Table, ctx: &PatchContext) {
    let desired = metadata_values(ctx);
    let merged = metadata::merge(&desired, table.rows());
    debug!(
        "PatchMetadata: {} existing rows merged into {}",
        table.rows().len(),
        merged.len()
    );
    table.replace_rows(merged.into_iter().map(MetadataEntry::into_row).collect());
}

/// Write the single PatchSequence row
///
/// Columns: PatchFamily, Target, Sequence, Supersede. The family and target
/// of the first existing row are carried forward.
pub fn edit_patch_sequence(table: &mut Table, ctx: &PatchContext) {
    let (family, target) = match table.rows().first() {
        Some(row) => (
            row.first().cloned().unwrap_or_default(),
            row.get(1).cloned().unwrap_or_default(),
        ),
        None => (ctx.layout().default_patch_family.clone(), String::new()),
    };

    let meta = ctx.metadata();
    table.truncate_to_header_only();
    table.append_row([
        family,
        target,
        escape_value(meta.patch_sequence()),
        meta.supersede_flag().to_string(),
    ]);
}
