// src/context/layout.rs

//! Fixed values written into the image tables
//!
//! Several of these stand in for values that should eventually be computed
//! from the images themselves (file sequence start, symbol paths, the
//! patch-package path). They live here so wiring them up later does not
//! touch the transforms.

/// TargetImages key of the baseline image
pub const TARGET_KEY: &str = "T1";
/// UpgradedImages key of the new image
pub const UPGRADED_KEY: &str = "U1";
/// ImageFamilies key shared by UpgradedImages
pub const IMAGE_FAMILY: &str = "22334455";
pub const MEDIA_SRC_PROP_NAME: &str = "MNPSrcPropName";
pub const MEDIA_DISK_ID: &str = "2";
/// Placeholder: not derived from the upgraded image's File table
pub const FILE_SEQUENCE_START: &str = "0";
/// Placeholder: no symbol paths are supplied
pub const SYMBOL_PATHS: &str = "";
/// Placeholder: no patch-package path is supplied
pub const PATCH_MSI_PATH: &str = "";
pub const TARGET_ORDER: &str = "1";
/// Validate product code, version comparison on baseline
pub const PRODUCT_VALIDATE_FLAGS: &str = "0x00000922";
pub const IGNORE_MISSING_SRC_FILES: &str = "1";
/// PatchSequence family used when the table carries none
pub const DEFAULT_PATCH_FAMILY: &str = "SO";

/// Column values for TargetImages, UpgradedImages and ImageFamilies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLayout {
    pub target_key: String,
    pub upgraded_key: String,
    pub family: String,
    pub media_src_prop_name: String,
    pub media_disk_id: String,
    pub file_sequence_start: String,
    pub symbol_paths: String,
    pub patch_msi_path: String,
    pub target_order: String,
    pub product_validate_flags: String,
    pub ignore_missing_src_files: String,
    pub default_patch_family: String,
}

impl Default for ImageLayout {
    fn default() -> Self {
        Self {
            target_key: TARGET_KEY.to_string(),
            upgraded_key: UPGRADED_KEY.to_string(),
            family: IMAGE_FAMILY.to_string(),
            media_src_prop_name: MEDIA_SRC_PROP_NAME.to_string(),
            media_disk_id: MEDIA_DISK_ID.to_string(),
            file_sequence_start: FILE_SEQUENCE_START.to_string(),
            symbol_paths: SYMBOL_PATHS.to_string(),
            patch_msi_path: PATCH_MSI_PATH.to_string(),
            target_order: TARGET_ORDER.to_string(),
            product_validate_flags: PRODUCT_VALIDATE_FLAGS.to_string(),
            ignore_missing_src_files: IGNORE_MISSING_SRC_FILES.to_string(),
            default_patch_family: DEFAULT_PATCH_FAMILY.to_string(),
        }
    }
}
