//! CSV/JSON import with normalization
//!
//! Both formats funnel into the same pipeline: raw records become JSON
//! objects, a normalization pass repairs what files commonly get wrong
//! (missing quantities, stringly booleans, numeric ids), and only then are
//! rows converted into typed line items. Import is all-or-nothing: a
//! failure at any stage aborts with an error and the existing tree is left
//! untouched.

use std::fs;
use std::path::Path;

use log::info;
use serde_json::{Map, Number, Value};

use super::error::ImportError;
use super::item::LineItem;
use super::tree::BomTree;

/// Result of a successful import
#[derive(Debug)]
pub struct Import {
    pub tree: BomTree,
    /// Column names discovered in the file, in file order (containers and
    /// internal markers excluded)
    pub fields: Vec<String>,
    /// Number of top-level rows loaded
    pub rows: usize,
}

/// Load a BOM file, dispatching on its extension
pub fn load_path(path: &Path) -> Result<Import, ImportError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match extension.as_str() {
        "csv" => {
            let text = fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
            from_csv(&text)
        }
        "json" => {
            let text = fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
            from_json(&text)
        }
        other => Err(ImportError::unsupported(other)),
    }
}

/// Parse CSV text: first line is the header row, every cell is numeric when
/// it reads as a number. CSV rows are always flat (no nesting).
pub fn from_csv(text: &str) -> Result<Import, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut objects = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut map = Map::new();
        for (index, header) in headers.iter().enumerate() {
            let raw = record.get(index).unwrap_or("").trim();
            map.insert(header.clone(), infer_cell(raw));
        }
        objects.push(Value::Object(map));
    }

    build(objects, headers)
}

/// Parse JSON text: must be an array of objects; `_children` arrays are
/// normalized recursively with the same rules as their parents.
pub fn from_json(text: &str) -> Result<Import, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(objects) = value else {
        return Err(ImportError::NotAnArray);
    };
    if objects.is_empty() || !objects.iter().all(Value::is_object) {
        return Err(ImportError::NotAnArray);
    }

    let fields = objects[0]
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();
    build(objects, fields)
}

fn build(mut objects: Vec<Value>, discovered: Vec<String>) -> Result<Import, ImportError> {
    if objects.is_empty() {
        return Err(ImportError::Empty);
    }

    let mut synthetic = 0u32;
    for object in &mut objects {
        normalize(object, &mut synthetic);
    }

    let mut items = Vec::with_capacity(objects.len());
    for object in objects {
        items.push(serde_json::from_value::<LineItem>(object)?);
    }

    let fields: Vec<String> = discovered
        .into_iter()
        .filter(|name| !name.starts_with('_') && name != "isHeader")
        .collect();

    let rows = items.len();
    let mut tree = BomTree::new(items);
    if !fields.is_empty() {
        tree.set_fields(fields.clone());
    }
    info!("imported {rows} top-level rows");
    Ok(Import { tree, fields, rows })
}

/// A raw CSV cell: numeric when it parses as a number, text otherwise.
/// Whole numbers become integers so integer-typed fields accept them.
fn infer_cell(raw: &str) -> Value {
    if !raw.is_empty() {
        if let Ok(n) = raw.parse::<f64>() {
            return number(n);
        }
    }
    Value::String(raw.to_string())
}

fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Repair one imported row in place, then recurse into `_children`:
/// - missing/blank `id` gets a synthesized one, numeric ids become strings
/// - missing `quantity` defaults to 1, fractional quantities round, and
///   anything below 1 clamps up
/// - `total` is (re)derived from cost × quantity whenever cost is present
/// - stringly `isHeader` flags become booleans; rows with children are
///   headers regardless
fn normalize(value: &mut Value, synthetic: &mut u32) {
    let Some(map) = value.as_object_mut() else {
        return;
    };

    // Legacy files nest children under subRows instead of _children
    if !map.contains_key("_children") {
        if let Some(children @ Value::Array(_)) = map.remove("subRows") {
            map.insert("_children".to_string(), children);
        }
    }

    // String-typed columns tolerate numeric cells (part numbers, voltages)
    for key in ["id", "name", "voltage", "manufacturer", "rating"] {
        if let Some(Value::Number(n)) = map.get(key) {
            let text = n.to_string();
            map.insert(key.to_string(), Value::String(text));
        }
    }
    // Number-typed columns tolerate stringly cells; blanks fall back to the
    // field default rather than failing the row
    for key in ["cost", "total", "ampRating"] {
        if let Some(Value::String(s)) = map.get(key) {
            match s.trim().parse::<f64>() {
                Ok(n) => {
                    map.insert(key.to_string(), number(n));
                }
                Err(_) => {
                    map.remove(key);
                }
            }
        }
    }

    let blank_id = match map.get("id") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    };
    if blank_id {
        *synthetic += 1;
        map.insert("id".to_string(), Value::String(format!("row-{synthetic}")));
    }

    let quantity = match map.get("quantity") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(1.0).round().max(1.0) as u64,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(|q| q.round().max(1.0) as u64)
            .unwrap_or(1),
        _ => 1,
    };
    map.insert("quantity".to_string(), Value::Number(Number::from(quantity)));

    if let Some(cost) = map.get("cost").and_then(Value::as_f64) {
        map.insert("total".to_string(), number(cost * quantity as f64));
    }

    if let Some(amps) = map.get("ampRating").and_then(Value::as_f64) {
        map.insert(
            "ampRating".to_string(),
            Value::Number(Number::from(amps.round().max(0.0) as u64)),
        );
    }

    let header_flag = match map.get("isHeader") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        _ => false,
    };
    let has_children = map
        .get("_children")
        .and_then(Value::as_array)
        .is_some_and(|children| !children.is_empty());
    if header_flag || has_children {
        map.insert("isHeader".to_string(), Value::Bool(true));
    } else {
        map.remove("isHeader");
    }

    if !matches!(map.get("_children"), Some(Value::Array(_))) {
        map.remove("_children");
    }
    // Extras hold scalar cells only; nulls and nested structures other than
    // the children container are dropped rather than failing the row
    map.retain(|key, value| {
        key == "_children"
            || !matches!(value, Value::Array(_) | Value::Object(_) | Value::Null)
    });
    if let Some(Value::Array(children)) = map.get_mut("_children") {
        for child in children {
            normalize(child, synthetic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::item::{FieldValue, ItemType};

    #[test]
    fn test_csv_numeric_inference() {
        let csv = "id,name,type,cost,quantity\n\
                   B1,Main Breaker,Breaker,350,2\n\
                   B2,Bus Bar,Bus Bar,180.5,1\n";
        let import = from_csv(csv).unwrap();
        assert_eq!(import.rows, 2);

        let b1 = import.tree.find("B1").unwrap();
        assert_eq!(b1.cost, 350.0);
        assert_eq!(b1.quantity, 2);
        assert_eq!(b1.total, 700.0);
        assert_eq!(b1.kind, ItemType::Breaker);

        let b2 = import.tree.find("B2").unwrap();
        assert_eq!(b2.kind, ItemType::BusBar);
        assert_eq!(b2.total, 180.5);
    }

    #[test]
    fn test_csv_missing_quantity_defaults_to_one() {
        let csv = "id,name,type,cost\nB1,Breaker,Breaker,100\n";
        let import = from_csv(csv).unwrap();
        let row = import.tree.find("B1").unwrap();
        assert_eq!(row.quantity, 1);
        assert_eq!(row.total, 100.0);
    }

    #[test]
    fn test_csv_unknown_columns_become_extras() {
        let csv = "id,name,type,cost,supplier,leadTime\nB1,Breaker,Breaker,100,Acme,14\n";
        let import = from_csv(csv).unwrap();
        assert_eq!(
            import.fields,
            vec!["id", "name", "type", "cost", "supplier", "leadTime"]
        );

        let row = import.tree.find("B1").unwrap();
        assert_eq!(
            row.extras.get("supplier"),
            Some(&FieldValue::Text("Acme".to_string()))
        );
        assert_eq!(row.extras.get("leadTime"), Some(&FieldValue::Number(14.0)));
    }

    #[test]
    fn test_csv_blank_lines_skipped() {
        let csv = "id,name,type,cost\nB1,Breaker,Breaker,100\n,,,\n";
        let import = from_csv(csv).unwrap();
        assert_eq!(import.rows, 1);
    }

    #[test]
    fn test_json_nested_children_normalized() {
        let json = r#"[
            {
                "id": "H1", "name": "Panel", "type": "Panel", "cost": 1200,
                "isHeader": true,
                "_children": [
                    { "id": "H1-1", "name": "Breaker", "type": "Breaker", "cost": 350 }
                ]
            }
        ]"#;
        let import = from_json(json).unwrap();
        assert_eq!(import.rows, 1);

        let panel = import.tree.find("H1").unwrap();
        assert!(panel.is_header);
        assert_eq!(panel.children.len(), 1);
        // Child quantity defaulted and total derived recursively
        assert_eq!(panel.children[0].quantity, 1);
        assert_eq!(panel.children[0].total, 350.0);
    }

    #[test]
    fn test_json_children_imply_header() {
        let json = r#"[
            { "id": "H1", "name": "Panel", "type": "Panel",
              "_children": [ { "id": "c", "name": "x", "type": "Breaker" } ] }
        ]"#;
        let import = from_json(json).unwrap();
        assert!(import.tree.find("H1").unwrap().is_header);
    }

    #[test]
    fn test_json_not_an_array() {
        let err = from_json(r#"{ "id": "H1" }"#).unwrap_err();
        assert!(matches!(err, ImportError::NotAnArray));

        let err = from_json("[]").unwrap_err();
        assert!(matches!(err, ImportError::NotAnArray));
    }

    #[test]
    fn test_json_malformed() {
        let err = from_json("not json at all").unwrap_err();
        assert!(matches!(err, ImportError::Json(_)));
    }

    #[test]
    fn test_json_field_order_preserved() {
        let json = r#"[
            { "name": "Row", "id": "X", "voltage": "120V", "type": "Component", "cost": 5 }
        ]"#;
        let import = from_json(json).unwrap();
        assert_eq!(import.fields, vec!["name", "id", "voltage", "type", "cost"]);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_path(Path::new("parts.xlsx")).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_id_synthesized() {
        let csv = "name,type,cost\nBreaker,Breaker,100\nRelay,Component,50\n";
        let import = from_csv(csv).unwrap();
        assert!(import.tree.find("row-1").is_some());
        assert!(import.tree.find("row-2").is_some());
    }

    #[test]
    fn test_numeric_ids_become_strings() {
        let csv = "id,name,type,cost\n1000,Breaker,Breaker,100\n";
        let import = from_csv(csv).unwrap();
        assert!(import.tree.find("1000").is_some());
    }

    #[test]
    fn test_legacy_subrows_and_nulls() {
        let json = r#"[
            { "id": "H1", "name": "Panel", "type": "Panel", "cost": 900, "notes": null,
              "subRows": [ { "id": "c", "name": "x", "type": "Breaker", "cost": 10 } ] }
        ]"#;
        let import = from_json(json).unwrap();
        let panel = import.tree.find("H1").unwrap();
        assert!(panel.is_header);
        assert_eq!(panel.children.len(), 1);
        // Null cells are dropped, not carried as extras
        assert!(panel.extras.is_empty());
    }

    #[test]
    fn test_stringly_header_flag() {
        let csv = "id,name,type,cost,isHeader\nH1,Panel,Panel,900,true\nB1,Breaker,Breaker,100,\n";
        let import = from_csv(csv).unwrap();
        assert!(import.tree.find("H1").unwrap().is_header);
        assert!(!import.tree.find("B1").unwrap().is_header);
        // The marker is not a display column
        assert!(!import.fields.iter().any(|f| f == "isHeader"));
    }
}
