//! Table projections over the BOM tree
//!
//! Tree mode and group mode are two presentations of the same data. A
//! projection never mutates the tree: switching modes (or filtering, or
//! grouping) and switching back reproduces exactly the rows it started
//! with.

use super::item::{ItemType, LineItem};
use super::tree::BomTree;

/// Which presentation the table uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Native parent/child rows with indentation
    #[default]
    Tree,
    /// All nodes flattened as peers, optionally bucketed by a field
    Group,
}

/// Field a group-mode projection can bucket by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Type,
    Voltage,
    Manufacturer,
}

impl GroupField {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupField::Type => "type",
            GroupField::Voltage => "voltage",
            GroupField::Manufacturer => "manufacturer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "type" => Some(GroupField::Type),
            "voltage" => Some(GroupField::Voltage),
            "manufacturer" => Some(GroupField::Manufacturer),
            _ => None,
        }
    }

    fn key(&self, item: &LineItem) -> String {
        match self {
            GroupField::Type => item.kind.as_str().to_string(),
            GroupField::Voltage => item.voltage.clone(),
            GroupField::Manufacturer => item.manufacturer.clone().unwrap_or_default(),
        }
    }
}

/// One projected row
#[derive(Debug, PartialEq)]
pub enum TableRow<'a> {
    /// Synthesized spacer above a header (tree mode, no filter active)
    Separator { id: String },
    /// A line item at the given indentation depth
    Item { item: &'a LineItem, depth: usize },
    /// Bucket heading with aggregates over its rows (group mode)
    GroupHeader {
        key: String,
        rows: usize,
        cost: f64,
        total: f64,
    },
}

/// Presentation state: mode, grouping, and type filter
#[derive(Debug, Clone, Default)]
pub struct TableView {
    mode: DisplayMode,
    group_by: Option<GroupField>,
    type_filter: Option<ItemType>,
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    pub fn group_field(&self) -> Option<GroupField> {
        self.group_by
    }

    /// Select a grouping field. Selecting the active field again clears
    /// grouping (toggle semantics).
    pub fn set_group_by(&mut self, field: GroupField) {
        if self.group_by == Some(field) {
            self.group_by = None;
        } else {
            self.group_by = Some(field);
        }
    }

    pub fn clear_grouping(&mut self) {
        self.group_by = None;
    }

    pub fn type_filter(&self) -> Option<ItemType> {
        self.type_filter
    }

    /// Filter rows by type; `None` ("All") clears the filter entirely
    pub fn set_type_filter(&mut self, filter: Option<ItemType>) {
        self.type_filter = filter;
    }

    /// Project the tree into display rows. Pure: the tree is untouched.
    pub fn rows<'a>(&self, tree: &'a BomTree) -> Vec<TableRow<'a>> {
        match self.mode {
            DisplayMode::Tree => self.tree_rows(tree),
            DisplayMode::Group => self.group_rows(tree),
        }
    }

    /// Number of item rows currently visible (separators and bucket
    /// headings never count)
    pub fn visible_item_count(&self, tree: &BomTree) -> usize {
        self.rows(tree)
            .iter()
            .filter(|row| matches!(row, TableRow::Item { .. }))
            .count()
    }

    fn visible(&self, item: &LineItem) -> bool {
        match self.type_filter {
            None => true,
            Some(kind) => item.subtree_has_type(kind),
        }
    }

    fn tree_rows<'a>(&self, tree: &'a BomTree) -> Vec<TableRow<'a>> {
        let mut rows = Vec::new();
        for root in tree.roots() {
            if !self.visible(root) {
                continue;
            }
            // Separators carry no type, so any active filter hides them
            if self.type_filter.is_none() && root.is_header && tree.has_separator(&root.id) {
                rows.push(TableRow::Separator {
                    id: format!("sep-{}", root.id),
                });
            }
            self.push_subtree(root, 0, &mut rows);
        }
        rows
    }

    fn push_subtree<'a>(&self, item: &'a LineItem, depth: usize, rows: &mut Vec<TableRow<'a>>) {
        rows.push(TableRow::Item { item, depth });
        for child in &item.children {
            if self.visible(child) {
                self.push_subtree(child, depth + 1, rows);
            }
        }
    }

    fn group_rows<'a>(&self, tree: &'a BomTree) -> Vec<TableRow<'a>> {
        let mut flat = Vec::new();
        for root in tree.roots() {
            flatten_visible(self, root, &mut flat);
        }

        let Some(field) = self.group_by else {
            return flat
                .into_iter()
                .map(|item| TableRow::Item { item, depth: 0 })
                .collect();
        };

        // Buckets in first-seen order
        let mut keys: Vec<String> = Vec::new();
        let mut buckets: Vec<Vec<&LineItem>> = Vec::new();
        for item in flat {
            let key = field.key(item);
            match keys.iter().position(|k| *k == key) {
                Some(index) => buckets[index].push(item),
                None => {
                    keys.push(key);
                    buckets.push(vec![item]);
                }
            }
        }

        let mut rows = Vec::new();
        for (key, bucket) in keys.into_iter().zip(buckets) {
            rows.push(TableRow::GroupHeader {
                key,
                rows: bucket.len(),
                cost: bucket.iter().map(|i| i.cost).sum(),
                total: bucket.iter().map(|i| i.total).sum(),
            });
            for item in bucket {
                rows.push(TableRow::Item { item, depth: 0 });
            }
        }
        rows
    }
}

fn flatten_visible<'a>(view: &TableView, item: &'a LineItem, out: &mut Vec<&'a LineItem>) {
    if view.visible(item) {
        out.push(item);
    }
    for child in &item.children {
        flatten_visible(view, child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> BomTree {
        BomTree::new(vec![
            LineItem::new("H1", "Main Panel", ItemType::Panel, "480V")
                .header()
                .with_manufacturer("Siemens")
                .with_cost(1200.0)
                .with_children(vec![
                    LineItem::new("H1-101", "Main Breaker", ItemType::Breaker, "480V")
                        .with_manufacturer("Siemens")
                        .with_cost(350.0),
                    LineItem::new("H1-102", "Copper Bus Bar", ItemType::BusBar, "480V")
                        .with_manufacturer("Generic")
                        .with_cost(180.0),
                ]),
            LineItem::new("H2", "Lighting Panel", ItemType::Panel, "208V")
                .header()
                .with_manufacturer("Square D")
                .with_cost(850.0),
        ])
    }

    fn item_ids<'a>(rows: &'a [TableRow<'a>]) -> Vec<&'a str> {
        rows.iter()
            .filter_map(|row| match row {
                TableRow::Item { item, .. } => Some(item.id.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_tree_mode_preorder_with_depth() {
        let tree = sample_tree();
        let view = TableView::new();
        let rows = view.rows(&tree);

        assert_eq!(item_ids(&rows), vec!["H1", "H1-101", "H1-102", "H2"]);
        let depths: Vec<usize> = rows
            .iter()
            .filter_map(|row| match row {
                TableRow::Item { depth, .. } => Some(*depth),
                _ => None,
            })
            .collect();
        assert_eq!(depths, vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_separators_in_tree_mode() {
        let mut tree = sample_tree();
        tree.add_separators();
        let view = TableView::new();
        let rows = view.rows(&tree);

        assert!(matches!(&rows[0], TableRow::Separator { id } if id == "sep-H1"));
        // Counts ignore separators
        assert_eq!(view.visible_item_count(&tree), 4);
    }

    #[test]
    fn test_type_filter_matches_descendants() {
        let tree = sample_tree();
        let mut view = TableView::new();
        view.set_type_filter(Some(ItemType::Breaker));
        let rows = view.rows(&tree);

        // H1 shows because a descendant matches; its bus bar child does not
        assert_eq!(item_ids(&rows), vec!["H1", "H1-101"]);
    }

    #[test]
    fn test_filter_round_trip_restores_rows() {
        let tree = sample_tree();
        let mut view = TableView::new();
        let before = view.rows(&tree);

        view.set_type_filter(Some(ItemType::BusBar));
        let filtered = view.rows(&tree);
        assert_ne!(item_ids(&before), item_ids(&filtered));

        view.set_type_filter(None);
        assert_eq!(view.rows(&tree), before);
    }

    #[test]
    fn test_mode_round_trip_does_not_mutate() {
        let tree = sample_tree();
        let snapshot = tree.roots().to_vec();
        let mut view = TableView::new();

        view.set_mode(DisplayMode::Group);
        view.set_group_by(GroupField::Type);
        let _ = view.rows(&tree);
        view.set_mode(DisplayMode::Tree);
        let _ = view.rows(&tree);

        assert_eq!(tree.roots(), snapshot.as_slice());
    }

    #[test]
    fn test_group_mode_flattens_all_nodes_as_peers() {
        let tree = sample_tree();
        let mut view = TableView::new();
        view.set_mode(DisplayMode::Group);
        let rows = view.rows(&tree);

        assert_eq!(item_ids(&rows), vec!["H1", "H1-101", "H1-102", "H2"]);
        assert!(rows.iter().all(|row| matches!(
            row,
            TableRow::Item { depth: 0, .. }
        )));
    }

    #[test]
    fn test_group_by_type_buckets_and_aggregates() {
        let tree = sample_tree();
        let mut view = TableView::new();
        view.set_mode(DisplayMode::Group);
        view.set_group_by(GroupField::Type);
        let rows = view.rows(&tree);

        let TableRow::GroupHeader { key, rows: count, cost, total } = &rows[0] else {
            panic!("expected a bucket heading first");
        };
        assert_eq!(key, "Panel");
        assert_eq!(*count, 2);
        assert_eq!(*cost, 2050.0);
        assert_eq!(*total, 2050.0);

        // Buckets appear in first-seen order
        let headers: Vec<&str> = rows
            .iter()
            .filter_map(|row| match row {
                TableRow::GroupHeader { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(headers, vec!["Panel", "Breaker", "Bus Bar"]);
    }

    #[test]
    fn test_group_by_toggle_semantics() {
        let mut view = TableView::new();
        view.set_group_by(GroupField::Voltage);
        assert_eq!(view.group_field(), Some(GroupField::Voltage));

        // Selecting the active field again clears it
        view.set_group_by(GroupField::Voltage);
        assert_eq!(view.group_field(), None);

        view.set_group_by(GroupField::Voltage);
        view.set_group_by(GroupField::Manufacturer);
        assert_eq!(view.group_field(), Some(GroupField::Manufacturer));
    }

    #[test]
    fn test_filter_hides_separators() {
        let mut tree = sample_tree();
        tree.add_separators();
        let mut view = TableView::new();
        view.set_type_filter(Some(ItemType::Panel));
        let rows = view.rows(&tree);
        assert!(rows
            .iter()
            .all(|row| !matches!(row, TableRow::Separator { .. })));
    }
}
