// src/transform/properties.rs

//! Properties: patch GUID and output path

use crate::context::{PatchContext, PropertiesPolicy};
use crate::table::{escape_value, Table};
use tracing::{debug, warn};

pub const PATCH_GUID_PROPERTY: &str = "PatchGUID";
pub const PATCH_OUTPUT_PATH_PROPERTY: &str = "PatchOutputPath";

/// Set `PatchGUID` and `PatchOutputPath`
///
/// Every row whose first field names the property is replaced whole. What
/// happens when the property has no row depends on the context's
/// [`PropertiesPolicy`].
pub fn edit_properties(table: &mut Table, ctx: &PatchContext) {
    let policy = ctx.properties_policy();
    set_property(table, PATCH_GUID_PROPERTY, ctx.patch_guid(), policy);
    set_property(
        table,
        PATCH_OUTPUT_PATH_PROPERTY,
        &ctx.paths().output_patch,
        policy,
    );
}

fn set_property(table: &mut Table, name: &str, value: &str, policy: PropertiesPolicy) {
    let value = escape_value(value);
    let mut replaced = 0;
    for row in table.rows_mut().iter_mut() {
        let matches = row.first().is_some_and(|field| field.trim_start() == name);
        if matches {
            *row = vec![name.to_string(), value.clone()];
            replaced += 1;
        }
    }

    if replaced > 0 {
        debug!("Set {} = {}", name, value);
        return;
    }

    match policy {
        PropertiesPolicy::SubstituteOnly => {
            warn!("Properties has no {} row; leaving it unset", name);
        }
        PropertiesPolicy::Upsert => {
            debug!("Adding {} = {}", name, value);
            table.append_row([name.to_string(), value]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableName;
    use crate::transform::test_support::{context, GUID};

    const PROPERTIES: &str = "Name\tValue\n\
                              s72\tl0\n\
                              Properties\tName\n\
                              AutoSequence\t1\n\
                              PatchGUID\t{00000000-0000-0000-0000-000000000000}\n\
                              PatchOutputPath\told.msp\n\
                              PatchGUIDExtra\tkeep\n";

    #[test]
    fn test_substitutes_existing_lines() {
        let mut table = Table::parse(TableName::Properties, PROPERTIES).unwrap();
        edit_properties(&mut table, &context());

        assert_eq!(
            table.rows(),
            &[
                vec!["AutoSequence", "1"],
                vec!["PatchGUID", GUID],
                vec!["PatchOutputPath", "C:\\out\\LibreOffice_7.1.2.3_Hotfix.msp"],
                vec!["PatchGUIDExtra", "keep"],
            ]
        );
    }

    #[test]
    fn test_missing_property_is_not_added_by_default() {
        let raw = "Name\tValue\ns72\tl0\nProperties\tName\nAutoSequence\t1\n";
        let mut table = Table::parse(TableName::Properties, raw).unwrap();
        edit_properties(&mut table, &context());
        assert_eq!(table.serialize(), raw);
    }

    #[test]
    fn test_upsert_appends_missing_property() {
        let raw = "Name\tValue\ns72\tl0\nProperties\tName\nPatchGUID\t\n";
        let mut table = Table::parse(TableName::Properties, raw).unwrap();
        let ctx = context().with_properties_policy(PropertiesPolicy::Upsert);
        edit_properties(&mut table, &ctx);

        assert_eq!(
            table.rows(),
            &[
                vec!["PatchGUID", GUID],
                vec!["PatchOutputPath", "C:\\out\\LibreOffice_7.1.2.3_Hotfix.msp"],
            ]
        );
    }

    #[test]
    fn test_header_lines_are_not_substituted() {
        let raw = "PatchGUID\tValue\ns72\tl0\nProperties\tName\n";
        let mut table = Table::parse(TableName::Properties, raw).unwrap();
        edit_properties(&mut table, &context());
        assert_eq!(table.header().lines()[0], "PatchGUID\tValue");
        assert!(table.rows().is_empty());
    }
}
