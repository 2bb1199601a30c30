// src/context/mod.rs

//! Build metadata and the per-run patch context
//!
//! [`BuildMetadata`] is resolved once from the environment at the start of a
//! run. The orchestrator then combines it with the installed image paths,
//! the output path, and a fresh patch GUID into a [`PatchContext`], which
//! every table transform reads and none can modify.

pub mod layout;

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::LazyLock;
use uuid::Uuid;

pub use layout::ImageLayout;

/// Product version, `major.minor.micro.patch` (required)
pub const ENV_PRODUCT_VERSION: &str = "MSP_PRODUCT_VERSION";
/// `Hotfix` or `ServicePack`
pub const ENV_CLASSIFICATION: &str = "MSP_CLASSIFICATION";
pub const ENV_ALLOW_REMOVAL: &str = "MSP_ALLOW_REMOVAL";
pub const ENV_VENDOR: &str = "MSP_VENDOR";
pub const ENV_PRODUCT_NAME: &str = "MSP_PRODUCT_NAME";
pub const ENV_BUILD_ID: &str = "MSP_BUILD_ID";
/// Service pack number, only shown for service packs
pub const ENV_PATCH_LEVEL: &str = "MSP_PATCH_LEVEL";
/// Free text shown after "Hotfix" in the display name
pub const ENV_DISPLAY_ADDON: &str = "MSP_DISPLAY_ADDON";

const DEFAULT_ALLOW_REMOVAL: &str = "1";
const DEFAULT_VENDOR: &str = "LibreOffice";
const DEFAULT_PRODUCT_NAME: &str = "LibreOffice";
const DEFAULT_BUILD_ID: &str = "123";
const DEFAULT_PATCH_LEVEL: &str = "0";

/// Format of `CreationTimeUTC` in PatchMetadata
pub const CREATION_TIME_FORMAT: &str = "%m/%d/%Y %H:%M";

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)\.([0-9]+)$").expect("static regex is valid"));

/// Kind of patch being built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Hotfix,
    ServicePack,
}

impl Classification {
    /// Parse an exact classification name
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "Hotfix" => Ok(Self::Hotfix),
            "ServicePack" => Ok(Self::ServicePack),
            other => Err(Error::config(format!(
                "{} must be Hotfix or ServicePack, got '{}'",
                ENV_CLASSIFICATION, other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hotfix => "Hotfix",
            Self::ServicePack => "ServicePack",
        }
    }

    /// PatchSequence `Supersede` value: service packs supersede earlier patches
    pub fn supersede_flag(&self) -> &'static str {
        match self {
            Self::Hotfix => "0",
            Self::ServicePack => "1",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated four-part product version
///
/// The original text is kept as given since it doubles as the patch sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductVersion {
    raw: String,
}

impl ProductVersion {
    /// Parse `major.minor.micro.patch`, each a non-negative integer
    pub fn parse(s: &str) -> Result<Self> {
        if !VERSION_PATTERN.is_match(s) {
            return Err(Error::config(format!(
                "{} must look like major.minor.micro.patch, got '{}'",
                ENV_PRODUCT_VERSION, s
            )));
        }

        Ok(Self { raw: s.to_string() })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Build metadata supplied by the build environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMetadata {
    pub product_version: ProductVersion,
    pub classification: Classification,
    pub allow_removal: String,
    pub vendor: String,
    pub product_name: String,
    pub build_id: String,
    pub patch_level: String,
    pub display_addon: String,
}

impl BuildMetadata {
    /// Resolve metadata from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve metadata through an arbitrary variable lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let version = get(ENV_PRODUCT_VERSION)
            .ok_or_else(|| Error::config(format!("{} is not set", ENV_PRODUCT_VERSION)))?;
        let product_version = ProductVersion::parse(version.trim())?;

        let classification = match get(ENV_CLASSIFICATION) {
            Some(value) => Classification::parse(&value)?,
            None => Classification::Hotfix,
        };

        Ok(Self {
            product_version,
            classification,
            allow_removal: get_or(ENV_ALLOW_REMOVAL, DEFAULT_ALLOW_REMOVAL),
            vendor: get_or(ENV_VENDOR, DEFAULT_VENDOR),
            product_name: get_or(ENV_PRODUCT_NAME, DEFAULT_PRODUCT_NAME),
            build_id: get_or(ENV_BUILD_ID, DEFAULT_BUILD_ID),
            patch_level: get_or(ENV_PATCH_LEVEL, DEFAULT_PATCH_LEVEL),
            display_addon: get(ENV_DISPLAY_ADDON).unwrap_or_default(),
        })
    }

    /// Patch sequence written to PatchSequence (the product version)
    pub fn patch_sequence(&self) -> &str {
        self.product_version.as_str()
    }

    pub fn supersede_flag(&self) -> &'static str {
        self.classification.supersede_flag()
    }

    /// Display name and description of the patch
    ///
    /// `<product> <version> <kind> <addon|level> <sequence> Build: <id>` with
    /// runs of whitespace collapsed.
    pub fn display_text(&self) -> String {
        let detail = match self.classification {
            Classification::Hotfix => self.display_addon.as_str(),
            Classification::ServicePack => self.patch_level.as_str(),
        };
        let text = format!(
            "{} {} {} {} {} Build: {}",
            self.product_name,
            self.product_version,
            self.classification,
            detail,
            self.patch_sequence(),
            self.build_id
        );
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Format a GUID the way Windows Installer tables expect it
pub fn format_guid(uuid: &Uuid) -> String {
    format!("{{{}}}", uuid.hyphenated()).to_uppercase()
}

/// Validate a GUID from an identifier source and bring it to `{XXXXXXXX-...}` form
pub fn normalize_guid(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_start_matches('{').trim_end_matches('}');
    let uuid = Uuid::parse_str(trimmed)
        .map_err(|e| Error::tool("guid source", format!("invalid GUID '{}': {}", raw.trim(), e)))?;
    Ok(format_guid(&uuid))
}

/// How the Properties transform treats a property missing from the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertiesPolicy {
    /// Replace existing lines only; a missing property stays missing
    #[default]
    SubstituteOnly,
    /// Replace existing lines and append missing properties
    Upsert,
}

/// Paths of the run, already in the form embedded into tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub old_image: String,
    pub new_image: String,
    pub output_patch: String,
}

/// Everything the table transforms read, fixed for the whole run
#[derive(Debug, Clone)]
pub struct PatchContext {
    metadata: BuildMetadata,
    paths: ResolvedPaths,
    patch_guid: String,
    created_at: DateTime<Utc>,
    layout: ImageLayout,
    properties_policy: PropertiesPolicy,
}

impl PatchContext {
    pub fn new(metadata: BuildMetadata, paths: ResolvedPaths, patch_guid: String) -> Self {
        Self {
            metadata,
            paths,
            patch_guid,
            created_at: Utc::now(),
            layout: ImageLayout::default(),
            properties_policy: PropertiesPolicy::default(),
        }
    }

    /// Pin the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_layout(mut self, layout: ImageLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_properties_policy(mut self, policy: PropertiesPolicy) -> Self {
        self.properties_policy = policy;
        self
    }

    pub fn metadata(&self) -> &BuildMetadata {
        &self.metadata
    }

    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    pub fn patch_guid(&self) -> &str {
        &self.patch_guid
    }

    pub fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    pub fn properties_policy(&self) -> PropertiesPolicy {
        self.properties_policy
    }

    /// `CreationTimeUTC` value, `MM/DD/YYYY HH:MM`
    pub fn creation_time_utc(&self) -> String {
        self.created_at.format(CREATION_TIME_FORMAT).to_string()
    }
}
