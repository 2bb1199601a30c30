// src/table/mod.rs

//! Table dumps extracted from a patch control file
//!
//! The table tool exports each database table as a tab-delimited text
//! file (`<Table>.idt`):
//!
//! ```text
//! Company<TAB>Property<TAB>Value        <- column names
//! S72<TAB>s72<TAB>l0                   <- column types
//! PatchMetadata<TAB>Company<TAB>Property  <- table name and primary keys
//! <TAB>Classification<TAB>Hotfix       <- data rows
//! ```
//!
//! The three header lines are carried as an opaque [`Header`]; nothing in
//! this crate interprets the schema. Rows are plain ordered fields and the
//! transforms that build them are responsible for the column count.

pub mod staging;

use crate::error::{Error, Result};
use std::fmt;

pub use staging::{backup_tables, load_table, store_table, table_path, verify_tables_present};

/// Number of schema lines at the top of every dump
pub const HEADER_LINES: usize = 3;

/// The tables the patch pipeline edits, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    Properties,
    TargetImages,
    UpgradedImages,
    ImageFamilies,
    PatchMetadata,
    PatchSequence,
}

impl TableName {
    /// Every edited table, in the fixed order used for editing and re-insertion
    pub const ALL: [TableName; 6] = [
        TableName::Properties,
        TableName::TargetImages,
        TableName::UpgradedImages,
        TableName::ImageFamilies,
        TableName::PatchMetadata,
        TableName::PatchSequence,
    ];

    /// Database table name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Properties => "Properties",
            Self::TargetImages => "TargetImages",
            Self::UpgradedImages => "UpgradedImages",
            Self::ImageFamilies => "ImageFamilies",
            Self::PatchMetadata => "PatchMetadata",
            Self::PatchSequence => "PatchSequence",
        }
    }

    /// File name of the dump inside a staging directory
    pub fn file_name(&self) -> String {
        format!("{}.idt", self.as_str())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three schema lines of a dump, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    lines: [String; HEADER_LINES],
}

impl Header {
    /// Raw header lines (column names, column types, key spec)
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// One data row: ordered tab-separated fields
pub type Row = Vec<String>;

/// Line terminator a dump was read with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Taken from the first header line only; a CR inside a row is content
    fn detect(raw: &str) -> Self {
        match raw.split_once('\n') {
            Some((first, _)) if first.ends_with('\r') => Self::CrLf,
            _ => Self::Lf,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// A parsed table dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: TableName,
    header: Header,
    rows: Vec<Row>,
    line_ending: LineEnding,
}

impl Table {
    /// Parse a dump
    ///
    /// Fails with [`Error::Format`] when fewer than three lines are present.
    /// Fields are split on tab with no quoting or escaping interpreted.
    pub fn parse(name: TableName, raw: &str) -> Result<Self> {
        let line_ending = LineEnding::detect(raw);
        let body = raw
            .strip_suffix(line_ending.as_str())
            .or_else(|| raw.strip_suffix('\n'))
            .unwrap_or(raw);

        let mut lines = body.split('\n').map(|line| match line_ending {
            LineEnding::CrLf => line.strip_suffix('\r').unwrap_or(line),
            LineEnding::Lf => line,
        });

        let mut header: [String; HEADER_LINES] = Default::default();
        for (index, slot) in header.iter_mut().enumerate() {
            match lines.next() {
                Some(line) if !(index == 0 && body.is_empty()) => *slot = line.to_string(),
                _ => {
                    return Err(Error::Format {
                        table: name.to_string(),
                        reason: format!(
                            "expected at least {} header lines, found {}",
                            HEADER_LINES, index
                        ),
                    });
                }
            }
        }

        let rows = lines
            .map(|line| line.split('\t').map(str::to_string).collect())
            .collect();

        Ok(Self {
            name,
            header: Header { lines: header },
            rows,
            line_ending,
        })
    }

    /// Render the dump: header lines, then one line per row, trailing newline
    pub fn serialize(&self) -> String {
        let eol = self.line_ending.as_str();
        let mut out = String::new();
        for line in self.header.lines() {
            out.push_str(line);
            out.push_str(eol);
        }
        for row in &self.rows {
            out.push_str(&row.join("\t"));
            out.push_str(eol);
        }
        out
    }

    /// Append a row without checking it against the header
    pub fn append_row<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(fields.into_iter().map(Into::into).collect());
    }

    /// Drop every data row, keeping the header
    ///
    /// Returns the number of rows discarded.
    pub fn truncate_to_header_only(&mut self) -> usize {
        let dropped = self.rows.len();
        self.rows.clear();
        dropped
    }

    /// Replace all data rows
    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    pub fn name(&self) -> TableName {
        self.name
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }
}

/// Escape a value this crate places into a row
///
/// Tabs and line breaks become two-character backslash sequences so the value
/// cannot be read back as a field or row separator.
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}
