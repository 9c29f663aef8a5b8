//! Layout engine for placing components inside enclosures
//!
//! This module owns the set of placed items and the protocols that mutate
//! them: drop placement, drag reconciliation, snap-guide computation, and
//! the continuous violation scan. It consumes pointer events from a
//! rendering surface and produces updated rectangles plus violation
//! annotations; it never renders anything itself.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod snap;
pub mod violations;

pub use catalog::{CatalogEntry, CATALOG};
pub use config::LayoutConfig;
pub use engine::{
    Component, DragOutcome, DropOutcome, DropRequest, Enclosure, PanelLayout, Placement,
};
pub use error::LayoutError;
pub use snap::{GuideKind, SnapGuide};
pub use violations::{IntersectionMarker, ScanReport};
