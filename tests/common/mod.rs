// tests/common/mod.rs

//! Shared fixtures and in-memory collaborators for integration tests.

#![allow(dead_code)]

use mspgen::tools::{GuidSource, PatchBuilder, PatchSigner, PathConverter, ProductInstaller, TableTool};
use mspgen::{BuildMetadata, Error, Result, TableName};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const GUID: &str = "{3F2504E0-4F89-11D3-9A0C-0305E82C3301}";

pub const PROPERTIES: &str = "Name\tValue\n\
                              s72\tl0\n\
                              Properties\tName\n\
                              AutoSequence\t1\n\
                              PatchGUID\t{00000000-0000-0000-0000-000000000000}\n\
                              PatchOutputPath\tplaceholder.msp\n";

pub const TARGET_IMAGES: &str = "Target\tMsiPath\tSymbolPaths\tUpgraded\tOrder\tProductValidateFlags\tIgnoreMissingSrcFiles\n\
                                 s13\ts255\tS255\ts13\ti2\tS16\ti2\n\
                                 TargetImages\tTarget\n\
                                 T0\tC:\\template\\old\t\tU0\t1\t0x00000922\t1\n";

pub const UPGRADED_IMAGES: &str = "Upgraded\tMsiPath\tPatchMsiPath\tSymbolPaths\tFamily\n\
                                   s13\ts255\tS255\tS255\ts8\n\
                                   UpgradedImages\tUpgraded\n\
                                   U0\tC:\\template\\new\t\t\t11111111\n\
                                   U9\tC:\\template\\other\t\t\t11111111\n";

pub const IMAGE_FAMILIES: &str = "Family\tMediaSrcPropName\tMediaDiskId\tFileSequenceStart\tDiskPrompt\tVolumeLabel\n\
                                  s8\tS72\tI2\tI4\tS128\tS32\n\
                                  ImageFamilies\tFamily\n";

pub const PATCH_METADATA: &str = "Company\tProperty\tValue\n\
                                  S72\ts72\tl0\n\
                                  PatchMetadata\tCompany\tProperty\n\
                                  \tMoreInfoURL\thttps://www.libreoffice.org\n";

pub const PATCH_SEQUENCE: &str = "PatchFamily\tTarget\tSequence\tSupersede\n\
                                  s72\tS72\tS72\tI4\n\
                                  PatchSequence\tPatchFamily\tTarget\n";

/// Template dumps keyed by table
pub fn fixture(name: TableName) -> &'static str {
    match name {
        TableName::Properties => PROPERTIES,
        TableName::TargetImages => TARGET_IMAGES,
        TableName::UpgradedImages => UPGRADED_IMAGES,
        TableName::ImageFamilies => IMAGE_FAMILIES,
        TableName::PatchMetadata => PATCH_METADATA,
        TableName::PatchSequence => PATCH_SEQUENCE,
    }
}

/// Metadata from an explicit variable list, version 7.1.2.3 unless given
pub fn metadata(vars: &[(&str, &str)]) -> BuildMetadata {
    BuildMetadata::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .or_else(|| (key == "MSP_PRODUCT_VERSION").then(|| "7.1.2.3".to_string()))
    })
    .unwrap()
}

/// Installer that only creates the target directory, or fails every install
#[derive(Default)]
pub struct FakeInstaller {
    pub fail: bool,
    pub installs: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl ProductInstaller for FakeInstaller {
    fn install(&self, package: &Path, target_dir: &Path) -> Result<PathBuf> {
        if self.fail {
            return Err(Error::tool(
                format!("msiexec.exe /a {} /qn", package.display()),
                "exit status: 1603",
            ));
        }
        fs::create_dir_all(target_dir)?;
        self.installs
            .borrow_mut()
            .push((package.to_path_buf(), target_dir.to_path_buf()));
        Ok(target_dir.to_path_buf())
    }
}

/// Table tool that writes fixture dumps and captures what is re-inserted
pub struct FakeTableTool {
    pub tables: Vec<TableName>,
    /// Table whose insertion exits non-zero
    pub fail_insert: Option<TableName>,
    pub extracted_into: RefCell<Option<PathBuf>>,
    /// Inserted table, its dump, and whether the 8.3 copy existed
    pub inserted: RefCell<Vec<(TableName, String, bool)>>,
}

impl FakeTableTool {
    pub fn with_tables(tables: &[TableName]) -> Self {
        Self {
            tables: tables.to_vec(),
            fail_insert: None,
            extracted_into: RefCell::new(None),
            inserted: RefCell::new(Vec::new()),
        }
    }

    pub fn inserted_dump(&self, name: TableName) -> String {
        self.inserted
            .borrow()
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|(_, dump, _)| dump.clone())
            .unwrap_or_default()
    }
}

impl Default for FakeTableTool {
    fn default() -> Self {
        Self::with_tables(&TableName::ALL)
    }
}

impl TableTool for FakeTableTool {
    fn extract_all(&self, control_file: &Path, dir: &Path) -> Result<()> {
        assert!(control_file.is_file(), "control file was not staged");
        for name in &self.tables {
            fs::write(dir.join(name.file_name()), fixture(*name))?;
        }
        *self.extracted_into.borrow_mut() = Some(dir.to_path_buf());
        Ok(())
    }

    fn insert(&self, _control_file: &Path, dir: &Path, table: TableName) -> Result<()> {
        if self.fail_insert == Some(table) {
            return Err(Error::tool(
                format!("msidb.exe -i {}", table.file_name()),
                "exit status: 1",
            ));
        }
        let dump = fs::read_to_string(dir.join(table.file_name()))?;
        let short: String = table.as_str().chars().take(8).collect();
        let has_short = dir.join(format!("{short}.idt")).is_file();
        self.inserted.borrow_mut().push((table, dump, has_short));
        Ok(())
    }
}

pub struct FixedGuid(pub &'static str);

impl GuidSource for FixedGuid {
    fn generate(&self) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// GUID source that is unavailable
pub struct FailingGuid;

impl GuidSource for FailingGuid {
    fn generate(&self) -> Result<String> {
        Err(Error::tool("uuidgen", "no unique identifier available"))
    }
}

/// Converts `/a/b` into `W:\a\b`
pub struct FakeWindowsPaths;

impl PathConverter for FakeWindowsPaths {
    fn to_platform(&self, path: &Path) -> Result<String> {
        Ok(format!("W:{}", path.display()).replace('/', "\\"))
    }
}

/// Builder that writes a stub patch, or a partial one and then fails
#[derive(Default)]
pub struct FakeBuilder {
    pub fail: bool,
    pub builds: RefCell<u32>,
}

impl PatchBuilder for FakeBuilder {
    fn build(&self, _control_file: &Path, output: &Path, _work_dir: &Path) -> Result<()> {
        *self.builds.borrow_mut() += 1;
        fs::write(output, b"MSP")?;
        if self.fail {
            return Err(Error::tool("msimsp.exe -s libreoffice.pcp", "exit status: 1"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSigner {
    pub signed: RefCell<Vec<PathBuf>>,
}

impl PatchSigner for FakeSigner {
    fn sign(&self, patch: &Path) -> Result<()> {
        self.signed.borrow_mut().push(patch.to_path_buf());
        Ok(())
    }
}

/// Data rows of a dump, skipping the header
pub fn data_rows(dump: &str) -> Vec<Vec<String>> {
    dump.lines()
        .skip(3)
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

/// PatchMetadata rows keyed by property
pub fn metadata_rows(dump: &str) -> HashMap<String, Vec<String>> {
    data_rows(dump)
        .into_iter()
        .map(|row| (row[1].clone(), row))
        .collect()
}
