// src/metadata.rs

//! Merging build metadata into the PatchMetadata table
//!
//! PatchMetadata rows are `(Company, Property, Value)` triples. Build-time
//! values replace the `Value` of matching properties, but the company
//! qualifier of an existing row is never touched, and properties this crate
//! does not know about are carried through verbatim.

use crate::table::Row;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::warn;

/// Three tab-separated groups with surrounding blanks trimmed
///
/// `[^\S\t]` is whitespace other than tab, so an empty leading owner field
/// is not swallowed by the trim.
static ROW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\S\t]*([^\t]*)\t([^\t]*)\t([^\t]*?)[^\S\t]*$").expect("static regex is valid")
});

/// One keyed metadata row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    /// Company qualifier, empty for rows introduced by this crate
    pub owner: String,
    pub key: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(owner: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse a data row, `None` when it is not a three-field triple
    pub fn from_row(row: &Row) -> Option<Self> {
        let line = row.join("\t");
        let caps = ROW_PATTERN.captures(&line)?;
        Some(Self::new(&caps[1], &caps[2], &caps[3]))
    }

    pub fn into_row(self) -> Row {
        vec![self.owner, self.key, self.value]
    }
}

/// Reconcile desired `(key, value)` pairs with existing rows
///
/// Desired keys come first in declaration order, each taking the owner of
/// the first existing row with the same key (empty when new). Existing keys
/// not in the desired set follow in their original order, unchanged. Rows
/// that are not three-field triples are skipped with a warning.
pub fn merge(desired: &[(&str, String)], existing: &[Row]) -> Vec<MetadataEntry> {
    let mut merged: IndexMap<String, MetadataEntry> = desired
        .iter()
        .map(|(key, value)| ((*key).to_string(), MetadataEntry::new("", *key, value.clone())))
        .collect();
    let desired_keys: HashSet<&str> = desired.iter().map(|(key, _)| *key).collect();
    let mut owner_taken: HashSet<String> = HashSet::new();

    for row in existing {
        let Some(found) = MetadataEntry::from_row(row) else {
            warn!("Skipping malformed PatchMetadata row: {:?}", row.join("\t"));
            continue;
        };

        match merged.get_mut(&found.key) {
            Some(entry) if desired_keys.contains(found.key.as_str()) => {
                if owner_taken.insert(found.key) {
                    entry.owner = found.owner;
                }
            }
            Some(_) => {}
            None => {
                merged.insert(found.key.clone(), found);
            }
        }
    }

    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    fn rows_of(entries: Vec<MetadataEntry>) -> Vec<Row> {
        entries.into_iter().map(MetadataEntry::into_row).collect()
    }

    #[test]
    fn test_unknown_keys_survive() {
        let existing = vec![row(&["co", "Foo", "1"])];
        let merged = merge(&[("Bar", "2".to_string())], &existing);

        assert_eq!(
            merged,
            vec![MetadataEntry::new("", "Bar", "2"), MetadataEntry::new("co", "Foo", "1")]
        );
    }

    #[test]
    fn test_owner_is_never_overwritten() {
        let existing = vec![row(&["Acme", "Classification", "Hotfix"])];
        let merged = merge(&[("Classification", "ServicePack".to_string())], &existing);

        assert_eq!(merged, vec![MetadataEntry::new("Acme", "Classification", "ServicePack")]);
    }

    #[test]
    fn test_desired_order_then_carried_keys() {
        let existing = vec![
            row(&["", "Zeta", "z"]),
            row(&["Acme", "DisplayName", "old"]),
            row(&["", "Alpha", "a"]),
        ];
        let desired = [
            ("Classification", "Hotfix".to_string()),
            ("DisplayName", "new".to_string()),
        ];
        let keys: Vec<String> = merge(&desired, &existing).into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["Classification", "DisplayName", "Zeta", "Alpha"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let existing = vec![
            row(&["Acme", "Classification", "Hotfix"]),
            row(&["", "Custom", "keep me"]),
        ];
        let desired = [
            ("Classification", "ServicePack".to_string()),
            ("AllowRemoval", "1".to_string()),
        ];

        let first = rows_of(merge(&desired, &existing));
        let second = rows_of(merge(&desired, &first));
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let existing = vec![
            row(&["only-one-field"]),
            row(&["a", "b", "c", "d"]),
            row(&["", "Good", "yes"]),
        ];
        let merged = merge(&[], &existing);
        assert_eq!(merged, vec![MetadataEntry::new("", "Good", "yes")]);
    }

    #[test]
    fn test_surrounding_blanks_are_trimmed() {
        let entry = MetadataEntry::from_row(&row(&["  Acme", "Key", "value  "])).unwrap();
        assert_eq!(entry, MetadataEntry::new("Acme", "Key", "value"));

        let entry = MetadataEntry::from_row(&row(&["", "Key", "v\r"])).unwrap();
        assert_eq!(entry, MetadataEntry::new("", "Key", "v"));
    }

    #[test]
    fn test_duplicate_existing_keys_emit_once() {
        let existing = vec![
            row(&["First", "Classification", "Hotfix"]),
            row(&["Second", "Classification", "Hotfix"]),
            row(&["", "Extra", "1"]),
            row(&["", "Extra", "2"]),
        ];
        let merged = merge(&[("Classification", "ServicePack".to_string())], &existing);
        assert_eq!(
            merged,
            vec![
                MetadataEntry::new("First", "Classification", "ServicePack"),
                MetadataEntry::new("", "Extra", "1"),
            ]
        );
    }

    #[test]
    fn test_many_duplicate_owners_first_wins() {
        let existing: Vec<Row> = (0..5000)
            .map(|i| row(&[&format!("Owner{i}"), "DisplayName", "old"]))
            .collect();
        let merged = merge(&[("DisplayName", "new".to_string())], &existing);
        assert_eq!(merged, vec![MetadataEntry::new("Owner0", "DisplayName", "new")]);
    }
}
