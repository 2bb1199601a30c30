// src/transform/images.rs

//! TargetImages, UpgradedImages and ImageFamilies
//!
//! Each of these tables ends up with exactly one row describing the single
//! old/new image pair of this patch.

use super::replace_with_single_row;
use crate::context::PatchContext;
use crate::table::{escape_value, Table};

/// One baseline image `T1` at the old install, validated against `U1`
///
/// Columns: Target, MsiPath, SymbolPaths, Upgraded, Order,
/// ProductValidateFlags, IgnoreMissingSrcFiles.
pub fn edit_target_images(table: &mut Table, ctx: &PatchContext) {
    let layout = ctx.layout();
    replace_with_single_row(
        table,
        vec![
            layout.target_key.clone(),
            escape_value(&ctx.paths().old_image),
            layout.symbol_paths.clone(),
            layout.upgraded_key.clone(),
            layout.target_order.clone(),
            layout.product_validate_flags.clone(),
            layout.ignore_missing_src_files.clone(),
        ],
    );
}

/// One upgraded image `U1` at the new install
///
/// Columns: Upgraded, MsiPath, PatchMsiPath, SymbolPaths, Family.
pub fn edit_upgraded_images(table: &mut Table, ctx: &PatchContext) {
    let layout = ctx.layout();
    replace_with_single_row(
        table,
        vec![
            layout.upgraded_key.clone(),
            escape_value(&ctx.paths().new_image),
            layout.patch_msi_path.clone(),
            layout.symbol_paths.clone(),
            layout.family.clone(),
        ],
    );
}

/// The image family referenced by `U1`
///
/// Columns: Family, MediaSrcPropName, MediaDiskId, FileSequenceStart,
/// DiskPrompt, VolumeLabel.
pub fn edit_image_families(table: &mut Table, ctx: &PatchContext) {
    let layout = ctx.layout();
    replace_with_single_row(
        table,
        vec![
            layout.family.clone(),
            layout.media_src_prop_name.clone(),
            layout.media_disk_id.clone(),
            layout.file_sequence_start.clone(),
            String::new(),
            String::new(),
        ],
    );
}
