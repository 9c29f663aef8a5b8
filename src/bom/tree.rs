//! BOM tree engine: edits, roll-up propagation, separators
//!
//! The tree owns the line items plus two engine-private bookkeeping maps
//! keyed by row id: the baseline ("original") quantities that header
//! cascades divide against, and the set of headers with a separator row
//! above them. Neither ever appears on the items themselves, so exports and
//! projections cannot leak them.
//!
//! Totals are derived state. After every cost or quantity edit the whole
//! tree is rewalked: a leaf's total is cost × quantity, a parent's total is
//! the sum over all of its leaf descendants. Row counts are tens, so the
//! O(n) rewalk is cheap and keeps the invariant global.

use std::collections::{BTreeSet, HashMap, HashSet};

use log::debug;

use crate::notify::Notice;

use super::error::RowNotFound;
use super::item::{FieldKind, FieldValue, ItemType, LineItem};

/// Column set shown when no file has been imported
pub const DEFAULT_FIELDS: &[&str] = &[
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
];

/// Outcome of a quantity edit
#[derive(Debug)]
pub struct QuantityEdit {
    /// Number of descendant leaves rewritten by a header cascade
    pub cascaded: usize,
    /// At most one summary notice for the whole propagation
    pub notices: Vec<Notice>,
}

/// The bill-of-materials tree and its bookkeeping
#[derive(Debug, Clone)]
pub struct BomTree {
    roots: Vec<LineItem>,
    /// Header quantity at the time of the last cascade, keyed by row id
    baseline_qty: HashMap<String, u32>,
    /// Header ids with a separator row synthesized above them
    separators: BTreeSet<String>,
    fields: Vec<String>,
    next_id: u32,
}

impl BomTree {
    pub fn new(roots: Vec<LineItem>) -> Self {
        Self {
            roots,
            baseline_qty: HashMap::new(),
            separators: BTreeSet::new(),
            fields: DEFAULT_FIELDS.iter().map(|s| s.to_string()).collect(),
            next_id: 1000,
        }
    }

    pub fn roots(&self) -> &[LineItem] {
        &self.roots
    }

    /// Column names for the table, in display order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Replace the column set (used after an import discovers its headers)
    pub fn set_fields(&mut self, fields: Vec<String>) {
        self.fields = fields;
    }

    pub fn has_separator(&self, header_id: &str) -> bool {
        self.separators.contains(header_id)
    }

    /// Count of all rows (separators are projections, never counted)
    pub fn item_count(&self) -> usize {
        self.roots
            .iter()
            .map(|r| 1 + r.descendant_count())
            .sum()
    }

    pub fn find(&self, id: &str) -> Option<&LineItem> {
        find_in(&self.roots, id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut LineItem> {
        find_in_mut(&mut self.roots, id)
    }

    /// Baseline quantity a header cascade will divide against
    pub fn quantity_baseline(&self, id: &str) -> Option<u32> {
        self.baseline_qty.get(id).copied()
    }

    /// Distinct type names present anywhere in the tree, "All" first
    pub fn type_options(&self) -> Vec<String> {
        let mut options = vec!["All".to_string()];
        let mut seen = HashSet::new();
        fn visit(items: &[LineItem], seen: &mut HashSet<ItemType>, out: &mut Vec<String>) {
            for item in items {
                if seen.insert(item.kind) {
                    out.push(item.kind.as_str().to_string());
                }
                visit(&item.children, seen, out);
            }
        }
        visit(&self.roots, &mut seen, &mut options);
        options
    }

    // ── Cell edits ────────────────────────────────────────────────────

    pub fn set_name(&mut self, id: &str, name: impl Into<String>) -> Result<(), RowNotFound> {
        self.row_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn set_kind(&mut self, id: &str, kind: ItemType) -> Result<(), RowNotFound> {
        self.row_mut(id)?.kind = kind;
        Ok(())
    }

    pub fn set_voltage(&mut self, id: &str, voltage: impl Into<String>) -> Result<(), RowNotFound> {
        self.row_mut(id)?.voltage = voltage.into();
        Ok(())
    }

    pub fn set_manufacturer(
        &mut self,
        id: &str,
        manufacturer: impl Into<String>,
    ) -> Result<(), RowNotFound> {
        self.row_mut(id)?.manufacturer = Some(manufacturer.into());
        Ok(())
    }

    pub fn set_amp_rating(&mut self, id: &str, amps: u32) -> Result<(), RowNotFound> {
        self.row_mut(id)?.amp_rating = Some(amps);
        Ok(())
    }

    pub fn set_rating(&mut self, id: &str, rating: impl Into<String>) -> Result<(), RowNotFound> {
        self.row_mut(id)?.rating = Some(rating.into());
        Ok(())
    }

    /// Set a cost, clamped non-negative, and rewalk totals
    pub fn set_cost(&mut self, id: &str, cost: f64) -> Result<(), RowNotFound> {
        self.row_mut(id)?.cost = cost.max(0.0);
        self.recompute_totals();
        Ok(())
    }

    /// Write an extras cell. Numeric-role columns trigger the same roll-up
    /// rewalk as the built-in cost/quantity columns.
    pub fn set_extra(
        &mut self,
        id: &str,
        field: impl Into<String>,
        value: FieldValue,
    ) -> Result<(), RowNotFound> {
        let field = field.into();
        let numeric = FieldKind::classify(&field).is_numeric();
        self.row_mut(id)?.extras.insert(field, value);
        if numeric {
            self.recompute_totals();
        }
        Ok(())
    }

    /// Set a quantity, clamped to at least 1.
    ///
    /// On a header row with children this cascades: every descendant leaf is
    /// rewritten to `max(1, round(quantity × new/baseline))`, the baseline
    /// updates to the new quantity, and a single summary notice reports the
    /// number of children touched. A multiplier of exactly 1 writes nothing
    /// and reports nothing.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> Result<QuantityEdit, RowNotFound> {
        let quantity = quantity.max(1);

        let row = self.row_mut(id)?;
        let previous = row.quantity;
        let is_cascade = row.is_header && !row.children.is_empty();

        if !is_cascade {
            row.quantity = quantity;
            self.recompute_totals();
            return Ok(QuantityEdit {
                cascaded: 0,
                notices: Vec::new(),
            });
        }

        let baseline = self.baseline_qty.get(id).copied().unwrap_or(previous);
        let row = self.row_mut(id)?;
        row.quantity = quantity;

        let multiplier = quantity as f64 / baseline as f64;
        if multiplier == 1.0 {
            self.recompute_totals();
            return Ok(QuantityEdit {
                cascaded: 0,
                notices: Vec::new(),
            });
        }

        let mut cascaded = 0usize;
        for child in &mut row.children {
            for_each_leaf_mut(child, &mut |leaf| {
                let scaled = (leaf.quantity as f64 * multiplier).round();
                leaf.quantity = (scaled as u32).max(1);
                cascaded += 1;
            });
        }
        self.baseline_qty.insert(id.to_string(), quantity);
        self.recompute_totals();

        debug!("cascaded quantity x{multiplier} from {id} to {cascaded} leaves");
        Ok(QuantityEdit {
            cascaded,
            notices: vec![Notice::info(format!(
                "Updated quantities for {cascaded} child components"
            ))],
        })
    }

    // ── Row operations ────────────────────────────────────────────────

    /// Append a fresh top-level component row; returns its id
    pub fn add_row(&mut self) -> String {
        let id = self.next_id.to_string();
        self.next_id += 1;
        let row = LineItem::new(id.clone(), "New Component", ItemType::Component, "120V")
            .with_manufacturer("Generic")
            .with_cost(0.0);
        self.roots.push(row);
        id
    }

    /// Remove the given rows (and their subtrees) wherever they sit.
    /// Returns the number of rows removed; an empty selection removes none.
    pub fn delete_rows<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let targets: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();
        let mut removed = 0usize;
        remove_ids(&mut self.roots, &targets, &mut removed);

        let mut live = HashSet::new();
        collect_ids(&self.roots, &mut live);
        self.baseline_qty.retain(|id, _| live.contains(id));
        self.separators.retain(|id| live.contains(id));
        if removed > 0 {
            self.recompute_totals();
        }
        removed
    }

    /// Mark a separator above every top-level header that lacks one.
    /// Idempotent: a second call adds zero.
    pub fn add_separators(&mut self) -> usize {
        let mut added = 0usize;
        for root in &self.roots {
            if root.is_header && self.separators.insert(root.id.clone()) {
                added += 1;
            }
        }
        added
    }

    /// Rewalk every total: leaves from cost × quantity, parents from their
    /// leaf sums
    pub fn recompute_totals(&mut self) {
        for root in &mut self.roots {
            recompute(root);
        }
    }

    fn row_mut(&mut self, id: &str) -> Result<&mut LineItem, RowNotFound> {
        find_in_mut(&mut self.roots, id).ok_or_else(|| RowNotFound { id: id.to_string() })
    }
}

fn collect_ids(items: &[LineItem], out: &mut HashSet<String>) {
    for item in items {
        out.insert(item.id.clone());
        collect_ids(&item.children, out);
    }
}

fn find_in<'a>(items: &'a [LineItem], id: &str) -> Option<&'a LineItem> {
    for item in items {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find_in(&item.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(items: &'a mut [LineItem], id: &str) -> Option<&'a mut LineItem> {
    for item in items {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find_in_mut(&mut item.children, id) {
            return Some(found);
        }
    }
    None
}

fn for_each_leaf_mut(item: &mut LineItem, f: &mut impl FnMut(&mut LineItem)) {
    if item.is_leaf() {
        f(item);
        return;
    }
    for child in &mut item.children {
        for_each_leaf_mut(child, f);
    }
}

fn recompute(item: &mut LineItem) {
    if item.is_leaf() {
        item.total = item.cost * item.quantity as f64;
        return;
    }
    for child in &mut item.children {
        recompute(child);
    }
    item.total = item.leaf_sum();
}

fn remove_ids(items: &mut Vec<LineItem>, targets: &HashSet<&str>, removed: &mut usize) {
    items.retain(|item| {
        let keep = !targets.contains(item.id.as_str());
        if !keep {
            *removed += 1 + item.descendant_count();
        }
        keep
    });
    for item in items {
        remove_ids(&mut item.children, targets, removed);
    }
}
