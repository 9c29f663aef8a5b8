//! Panelboard - layout and cost-estimation engines for electrical panel design
//!
//! Two cooperating subsystems share rectangle geometry and a tree/flat
//! duality but no code:
//!
//! - [`layout`] places components inside resizable enclosures, detects
//!   overlap and containment violations in real time, and computes
//!   alignment guides during drags.
//! - [`bom`] maintains a hierarchical bill of materials with derived
//!   totals, cascading quantity edits, tabular projections, and CSV/JSON
//!   import/export.
//!
//! Rendering, widgets, and persistence are out of scope: the engines
//! consume pointer events and file contents at their boundaries and return
//! updated state plus transient [`notify::Notice`] values for the caller to
//! surface.
//!
//! # Example
//!
//! ```rust
//! use panelboard::geometry::Point;
//! use panelboard::layout::{DropRequest, PanelLayout, CATALOG};
//!
//! let mut layout = PanelLayout::default();
//! layout.add_enclosure();
//!
//! let request = DropRequest::from(&CATALOG[0]);
//! let outcome = layout
//!     .drop_component(&request, Point::new(150.0, 150.0))
//!     .unwrap();
//! let placed = layout.component(&outcome.component_id).unwrap();
//! assert!(!placed.outside_enclosure);
//! ```

pub mod bom;
pub mod geometry;
pub mod layout;
pub mod notify;
pub mod settings;

pub use bom::{BomTree, TableView};
pub use layout::{LayoutConfig, LayoutError, PanelLayout};
pub use notify::{Notice, Severity};
pub use settings::Settings;
