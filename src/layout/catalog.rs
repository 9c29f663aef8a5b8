//! Built-in component catalog
//!
//! The palette of placeable parts. Entries are read-only reference data:
//! loaded once, never persisted, never mutated by the engines.

use crate::geometry::Size;

/// A static catalog part definition
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub image: &'static str,
    pub width: f64,
    pub height: f64,
}

impl CatalogEntry {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// The built-in part palette
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "breaker-1",
        name: "Circuit Breaker 1P",
        category: "breakers",
        image: "/placeholder.svg",
        width: 40.0,
        height: 80.0,
    },
    CatalogEntry {
        id: "breaker-2",
        name: "Circuit Breaker 2P",
        category: "breakers",
        image: "/placeholder.svg",
        width: 40.0,
        height: 100.0,
    },
    CatalogEntry {
        id: "terminal-1",
        name: "Terminal Block",
        category: "terminals",
        image: "/placeholder.svg",
        width: 30.0,
        height: 40.0,
    },
    CatalogEntry {
        id: "relay-1",
        name: "Control Relay",
        category: "relays",
        image: "/placeholder.svg",
        width: 60.0,
        height: 80.0,
    },
    CatalogEntry {
        id: "contactor-1",
        name: "Contactor",
        category: "contactors",
        image: "/placeholder.svg",
        width: 80.0,
        height: 120.0,
    },
];

/// Look up a catalog entry by id
pub fn find(id: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.id == id)
}

/// Distinct categories in palette order
pub fn categories() -> Vec<&'static str> {
    let mut seen = Vec::new();
    for entry in CATALOG {
        if !seen.contains(&entry.category) {
            seen.push(entry.category);
        }
    }
    seen
}
