//! CSV/JSON export
//!
//! CSV flattens the tree pre-order (parent before children) into one row
//! per item, canonical columns first and extras after, with string fields
//! quoted. JSON is the inverse of the import normalization: the nested
//! `_children` representation, pretty-printed. Engine bookkeeping never
//! reaches either format because it never lives on the items.

use std::fs;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};

use super::error::ExportError;
use super::item::{FieldValue, LineItem};
use super::tree::BomTree;

/// Fixed output file names
pub const CSV_EXPORT_NAME: &str = "panel_data_export.csv";
pub const JSON_EXPORT_NAME: &str = "panel_data_export.json";

/// Canonical CSV column order; extras columns follow these
const CSV_COLUMNS: &[&str] = &[
    "id",
    "name",
    "type",
    "voltage",
    "manufacturer",
    "cost",
    "quantity",
    "total",
    "ampRating",
    "rating",
    "isHeader",
];

/// Render the whole tree as CSV text
pub fn to_csv(tree: &BomTree) -> Result<String, ExportError> {
    let flat = flatten(tree);

    // Extras columns in first-seen traversal order
    let mut extra_columns: Vec<&str> = Vec::new();
    for item in &flat {
        for key in item.extras.keys() {
            if !extra_columns.contains(&key.as_str()) {
                extra_columns.push(key);
            }
        }
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(Vec::new());

    let header: Vec<&str> = CSV_COLUMNS
        .iter()
        .copied()
        .chain(extra_columns.iter().copied())
        .collect();
    writer.write_record(&header)?;

    for item in &flat {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        for column in CSV_COLUMNS {
            record.push(canonical_cell(item, column));
        }
        for column in &extra_columns {
            record.push(
                item.extras
                    .get(*column)
                    .map(FieldValue::to_string)
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Render the whole tree as pretty-printed nested JSON
pub fn to_json(tree: &BomTree) -> Result<String, ExportError> {
    let mut text = serde_json::to_string_pretty(tree.roots())?;
    text.push('\n');
    Ok(text)
}

/// Write CSV text to a file (defaults to [`CSV_EXPORT_NAME`])
pub fn write_csv(tree: &BomTree, path: &Path) -> Result<(), ExportError> {
    let text = to_csv(tree)?;
    fs::write(path, text).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write JSON text to a file (defaults to [`JSON_EXPORT_NAME`])
pub fn write_json(tree: &BomTree, path: &Path) -> Result<(), ExportError> {
    let text = to_json(tree)?;
    fs::write(path, text).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Pre-order flatten: every item, parent before children
fn flatten(tree: &BomTree) -> Vec<&LineItem> {
    fn visit<'a>(item: &'a LineItem, out: &mut Vec<&'a LineItem>) {
        out.push(item);
        for child in &item.children {
            visit(child, out);
        }
    }
    let mut flat = Vec::new();
    for root in tree.roots() {
        visit(root, &mut flat);
    }
    flat
}

fn canonical_cell(item: &LineItem, column: &str) -> String {
    match column {
        "id" => item.id.clone(),
        "name" => item.name.clone(),
        "type" => item.kind.as_str().to_string(),
        "voltage" => item.voltage.clone(),
        "manufacturer" => item.manufacturer.clone().unwrap_or_default(),
        "cost" => FieldValue::Number(item.cost).to_string(),
        "quantity" => item.quantity.to_string(),
        "total" => FieldValue::Number(item.total).to_string(),
        "ampRating" => item
            .amp_rating
            .map(|a| a.to_string())
            .unwrap_or_default(),
        "rating" => item.rating.clone().unwrap_or_default(),
        "isHeader" => {
            if item.is_header {
                "true".to_string()
            } else {
                String::new()
            }
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::import;
    use crate::bom::item::ItemType;

    fn small_tree() -> BomTree {
        BomTree::new(vec![LineItem::new("H1", "Main Panel", ItemType::Panel, "480V")
            .header()
            .with_manufacturer("Siemens")
            .with_cost(1200.0)
            .with_children(vec![LineItem::new(
                "H1-101",
                "Main Breaker",
                ItemType::Breaker,
                "480V",
            )
            .with_manufacturer("Siemens")
            .with_amp_rating(400)
            .with_cost(350.0)])])
    }

    #[test]
    fn test_csv_flattens_parent_before_children() {
        let csv = to_csv(&small_tree()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("\"H1\""));
        assert!(lines[2].starts_with("\"H1-101\""));
    }

    #[test]
    fn test_csv_quotes_strings_not_numbers() {
        let csv = to_csv(&small_tree()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        // Numeric cells stay bare, string cells are quoted
        assert!(lines[1].contains("\"Main Panel\""));
        assert!(lines[1].contains(",1200,"));
        assert!(lines[2].contains(",350,"));
    }

    #[test]
    fn test_csv_no_children_column() {
        let csv = to_csv(&small_tree()).unwrap();
        assert!(!csv.contains("_children"));
        assert!(!csv.contains("subRows"));
    }

    #[test]
    fn test_json_round_trip() {
        let tree = small_tree();
        let json = to_json(&tree).unwrap();
        let import = import::from_json(&json).unwrap();
        assert_eq!(import.tree.roots(), tree.roots());
    }

    #[test]
    fn test_json_nests_children() {
        let json = to_json(&small_tree()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["_children"][0]["id"], "H1-101");
        // Leaves carry no children container at all
        assert!(value[0]["_children"][0].get("_children").is_none());
    }

    #[test]
    fn test_extras_columns_appended() {
        let mut tree = small_tree();
        tree.set_extra("H1-101", "supplier", FieldValue::Text("Acme".to_string()))
            .unwrap();
        let csv = to_csv(&tree).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].ends_with("\"supplier\""));
        assert!(lines[2].ends_with("\"Acme\""));
    }
}
