//! BOM line items
//!
//! A line item carries the fixed domain schema of an estimation row plus a
//! side-table (`extras`) for whatever additional columns an imported file
//! brings along. Engine bookkeeping (baseline quantities, separator
//! markers) never lives here; see [`crate::bom::tree::BomTree`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Row category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Panel,
    Breaker,
    BusBar,
    Component,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Panel => "Panel",
            ItemType::Breaker => "Breaker",
            ItemType::BusBar => "Bus Bar",
            ItemType::Component => "Component",
        }
    }

    /// Parse a type string, tolerating case and spelling variants.
    /// Unknown values normalize to `Component`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "panel" => ItemType::Panel,
            "breaker" => ItemType::Breaker,
            "bus bar" | "busbar" | "bus-bar" => ItemType::BusBar,
            _ => ItemType::Component,
        }
    }

    pub fn all() -> [ItemType; 4] {
        [
            ItemType::Panel,
            ItemType::Breaker,
            ItemType::BusBar,
            ItemType::Component,
        ]
    }
}

impl Default for ItemType {
    fn default() -> Self {
        ItemType::Component
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(ItemType::parse(&value))
    }
}

/// A value in the extras side-table: numeric cells keep their numeric
/// identity so they can be formatted and summed like built-in columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Parse a raw cell: numeric when it reads as a number, text otherwise.
    /// Empty cells stay empty text rather than coercing to zero.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            if let Ok(n) = trimmed.parse::<f64>() {
                return FieldValue::Number(n);
            }
        }
        FieldValue::Text(raw.to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Role a column plays in the table, inferred from its name.
///
/// Cost-, quantity- and total-like columns get numeric formatting and their
/// edits trigger a roll-up recompute; everything else is plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Cost,
    Quantity,
    Total,
    Plain,
}

impl FieldKind {
    /// Case-insensitive substring classification of a column name
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("total") {
            FieldKind::Total
        } else if lower.contains("cost") {
            FieldKind::Cost
        } else if lower.contains("quantity") || lower.contains("qty") {
            FieldKind::Quantity
        } else {
            FieldKind::Plain
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldKind::Plain)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One line of the bill of materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ItemType,
    #[serde(default)]
    pub voltage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub cost: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Derived: cost × quantity for leaves, leaf-sum for parents. Never
    /// edited independently.
    #[serde(default)]
    pub total: f64,
    #[serde(rename = "ampRating", default, skip_serializing_if = "Option::is_none")]
    pub amp_rating: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(rename = "isHeader", default, skip_serializing_if = "is_false")]
    pub is_header: bool,
    #[serde(rename = "_children", default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LineItem>,
    /// Extra columns carried by imported files, keyed by column name
    #[serde(flatten)]
    pub extras: BTreeMap<String, FieldValue>,
}

fn default_quantity() -> u32 {
    1
}

impl LineItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ItemType,
        voltage: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            voltage: voltage.into(),
            manufacturer: None,
            cost: 0.0,
            quantity: 1,
            total: 0.0,
            amp_rating: None,
            rating: None,
            is_header: false,
            children: Vec::new(),
            extras: BTreeMap::new(),
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self.total = self.cost * self.quantity as f64;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self.total = self.cost * self.quantity as f64;
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_amp_rating(mut self, amps: u32) -> Self {
        self.amp_rating = Some(amps);
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    pub fn header(mut self) -> Self {
        self.is_header = true;
        self
    }

    pub fn with_children(mut self, children: Vec<LineItem>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Sum of cost × quantity over all leaf descendants (not direct
    /// children: the full leaf set under this item)
    pub fn leaf_sum(&self) -> f64 {
        if self.is_leaf() {
            return self.cost * self.quantity as f64;
        }
        self.children.iter().map(LineItem::leaf_sum).sum()
    }

    /// Count of all descendants (children, grandchildren, ...)
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// True when this item or any descendant has the given type
    pub fn subtree_has_type(&self, kind: ItemType) -> bool {
        self.kind == kind || self.children.iter().any(|c| c.subtree_has_type(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_parse() {
        assert_eq!(ItemType::parse("Panel"), ItemType::Panel);
        assert_eq!(ItemType::parse("bus bar"), ItemType::BusBar);
        assert_eq!(ItemType::parse("BREAKER"), ItemType::Breaker);
        assert_eq!(ItemType::parse("Widget"), ItemType::Component);
    }

    #[test]
    fn test_item_type_round_trip() {
        for kind in ItemType::all() {
            assert_eq!(ItemType::parse(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_field_kind_classification() {
        assert_eq!(FieldKind::classify("cost"), FieldKind::Cost);
        assert_eq!(FieldKind::classify("UnitCost"), FieldKind::Cost);
        assert_eq!(FieldKind::classify("quantity"), FieldKind::Quantity);
        assert_eq!(FieldKind::classify("Qty"), FieldKind::Quantity);
        assert_eq!(FieldKind::classify("total"), FieldKind::Total);
        assert_eq!(FieldKind::classify("voltage"), FieldKind::Plain);
        assert!(FieldKind::Cost.is_numeric());
        assert!(!FieldKind::Plain.is_numeric());
    }

    #[test]
    fn test_field_value_infer() {
        assert_eq!(FieldValue::infer("42"), FieldValue::Number(42.0));
        assert_eq!(FieldValue::infer("3.5"), FieldValue::Number(3.5));
        assert_eq!(
            FieldValue::infer("Siemens"),
            FieldValue::Text("Siemens".to_string())
        );
        // Empty cells stay text, not zero
        assert_eq!(FieldValue::infer(""), FieldValue::Text(String::new()));
    }

    #[test]
    fn test_builder_derives_total() {
        let item = LineItem::new("X1", "Feed Breaker", ItemType::Breaker, "480V")
            .with_cost(120.0)
            .with_quantity(3);
        assert_eq!(item.total, 360.0);
    }

    #[test]
    fn test_leaf_sum_spans_depths() {
        let tree = LineItem::new("H1", "Panel", ItemType::Panel, "480V")
            .header()
            .with_cost(1000.0)
            .with_children(vec![
                LineItem::new("H1-1", "Breaker", ItemType::Breaker, "480V")
                    .with_cost(10.0)
                    .with_quantity(2),
                LineItem::new("H1-2", "Sub", ItemType::Component, "480V").with_children(vec![
                    LineItem::new("H1-2-1", "Bus", ItemType::BusBar, "480V").with_cost(5.0),
                ]),
            ]);
        // 10*2 + 5*1; the parent's own cost does not contribute
        assert_eq!(tree.leaf_sum(), 25.0);
        assert_eq!(tree.descendant_count(), 3);
    }

    #[test]
    fn test_subtree_has_type() {
        let tree = LineItem::new("H1", "Panel", ItemType::Panel, "480V")
            .header()
            .with_children(vec![LineItem::new(
                "H1-1",
                "Bus",
                ItemType::BusBar,
                "480V",
            )]);
        assert!(tree.subtree_has_type(ItemType::BusBar));
        assert!(tree.subtree_has_type(ItemType::Panel));
        assert!(!tree.subtree_has_type(ItemType::Breaker));
    }

    #[test]
    fn test_json_shape() {
        let item = LineItem::new("H9", "Spare Panel", ItemType::Panel, "208V")
            .header()
            .with_cost(100.0);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "Panel");
        assert_eq!(json["isHeader"], true);
        // Leaf rows carry no children key at all
        assert!(json.get("_children").is_none());

        let back: LineItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_unknown_extra_fields_survive() {
        let json = serde_json::json!({
            "id": "X", "name": "Row", "type": "Breaker",
            "cost": 10.0, "quantity": 2, "total": 20.0,
            "supplier": "Acme", "leadTimeDays": 14
        });
        let item: LineItem = serde_json::from_value(json).unwrap();
        assert_eq!(
            item.extras.get("supplier"),
            Some(&FieldValue::Text("Acme".to_string()))
        );
        assert_eq!(
            item.extras.get("leadTimeDays"),
            Some(&FieldValue::Number(14.0))
        );
    }
}
