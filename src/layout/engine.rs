//! Panel layout engine
//!
//! Owns the placed items (enclosures and components) as an arena keyed by
//! stable string id, with insertion-order side lists (the drop protocol
//! depends on "first enclosure" order). All mutation goes through the
//! protocol methods here; callers never touch rectangles directly.
//!
//! Components are positioned parent-relative: `Component::position` is an
//! offset from the owning enclosure's origin when `parent` is set, and a
//! canvas-absolute point otherwise. Geometry always runs in the canvas
//! frame via [`PanelLayout::canvas_rect`]; conversion happens only at that
//! boundary.

use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::geometry::{clamp, Point, Rect, Size};
use crate::notify::Notice;

use super::catalog::CatalogEntry;
use super::config::LayoutConfig;
use super::error::LayoutError;
use super::snap::{self, SnapGuide};
use super::violations::{self, IntersectionMarker};

/// A rectangular container representing a physical panel box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enclosure {
    pub id: String,
    pub label: String,
    pub bounds: Rect,
}

/// A placed instance of a catalog part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub catalog_id: String,
    pub name: String,
    pub image: String,
    pub size: Size,
    /// Offset from the parent enclosure's origin, or canvas position when
    /// unparented
    pub position: Point,
    pub parent: Option<String>,
    /// Derived by the violation scan: contained by no enclosure
    #[serde(default)]
    pub outside_enclosure: bool,
    /// Derived by the violation scan: member of an overlapping pair
    #[serde(default)]
    pub overlapping: bool,
    /// Derived by the violation scan: one marker per overlapping partner
    #[serde(skip)]
    pub intersections: Vec<IntersectionMarker>,
}

/// A catalog part handed over by the palette on drop.
///
/// Dimensions are optional at this boundary; a payload without them falls
/// back to the configured default component size.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DropRequest {
    pub id: String,
    pub name: String,
    pub image: String,
    pub dimensions: Option<Size>,
}

impl From<&CatalogEntry> for DropRequest {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            name: entry.name.to_string(),
            image: entry.image.to_string(),
            dimensions: Some(entry.size()),
        }
    }
}

/// Result of a drop
#[derive(Debug)]
pub struct DropOutcome {
    pub component_id: String,
    /// Enclosure the component was placed into, if any
    pub placed_in: Option<String>,
    /// True when the drop point was outside every enclosure and the
    /// component was forced into the first one
    pub forced: bool,
    pub notices: Vec<Notice>,
}

/// Result of ending a drag
#[derive(Debug)]
pub struct DragOutcome {
    /// Final stored position (parent-relative when parented)
    pub position: Point,
    /// Enclosure the component was relocated into, when the drop point was
    /// outside all of them
    pub relocated_to: Option<String>,
    pub notices: Vec<Notice>,
}

/// Serializable snapshot of all placed items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    pub enclosures: Vec<Enclosure>,
    pub components: Vec<Component>,
}

#[derive(Debug)]
struct DragState {
    id: String,
    start_position: Point,
}

/// The layout engine state: every placed item plus the checking toggle
#[derive(Debug)]
pub struct PanelLayout {
    config: LayoutConfig,
    enclosures: HashMap<String, Enclosure>,
    enclosure_order: Vec<String>,
    components: HashMap<String, Component>,
    component_order: Vec<String>,
    checking: bool,
    drag: Option<DragState>,
    next_enclosure: u32,
    next_component: u32,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl PanelLayout {
    pub fn new(config: LayoutConfig) -> Self {
        let checking = config.check_violations;
        Self {
            config,
            enclosures: HashMap::new(),
            enclosure_order: Vec::new(),
            components: HashMap::new(),
            component_order: Vec::new(),
            checking,
            drag: None,
            next_enclosure: 0,
            next_component: 0,
        }
    }

    /// Rebuild an engine from a saved placement and run an initial scan
    pub fn from_placement(placement: Placement, config: LayoutConfig) -> Self {
        let mut layout = Self::new(config);
        for enclosure in placement.enclosures {
            layout.next_enclosure = layout.next_enclosure.max(id_suffix(&enclosure.id));
            layout.enclosure_order.push(enclosure.id.clone());
            layout.enclosures.insert(enclosure.id.clone(), enclosure);
        }
        for component in placement.components {
            layout.next_component = layout.next_component.max(id_suffix(&component.id));
            layout.component_order.push(component.id.clone());
            layout.components.insert(component.id.clone(), component);
        }
        layout.rescan();
        layout
    }

    /// Snapshot all placed items for serialization
    pub fn to_placement(&self) -> Placement {
        Placement {
            enclosures: self.iter_enclosures().cloned().collect(),
            components: self.iter_components().cloned().collect(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn checking(&self) -> bool {
        self.checking
    }

    pub fn enclosure(&self, id: &str) -> Option<&Enclosure> {
        self.enclosures.get(id)
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    /// Enclosures in creation order
    pub fn iter_enclosures(&self) -> impl Iterator<Item = &Enclosure> {
        self.enclosure_order
            .iter()
            .filter_map(|id| self.enclosures.get(id))
    }

    /// Components in creation order
    pub fn iter_components(&self) -> impl Iterator<Item = &Component> {
        self.component_order
            .iter()
            .filter_map(|id| self.components.get(id))
    }

    /// Stacking order for rendering: enclosures behind, components in front
    pub fn render_order(&self) -> Vec<&str> {
        self.enclosure_order
            .iter()
            .chain(self.component_order.iter())
            .map(String::as_str)
            .collect()
    }

    /// A component's rectangle in the canvas frame
    pub fn canvas_rect(&self, component: &Component) -> Rect {
        let mut origin = component.position;
        if let Some(parent) = component
            .parent
            .as_ref()
            .and_then(|id| self.enclosures.get(id))
        {
            origin.x += parent.bounds.x;
            origin.y += parent.bounds.y;
        }
        Rect::from_parts(origin, component.size)
    }

    // ── Enclosure operations ──────────────────────────────────────────

    /// Create an enclosure at the default position and size; returns its id
    pub fn add_enclosure(&mut self) -> String {
        self.next_enclosure += 1;
        let id = format!("enclosure-{}", self.next_enclosure);
        let (x, y) = self.config.enclosure_origin;
        let (width, height) = self.config.enclosure_size;
        let enclosure = Enclosure {
            id: id.clone(),
            label: format!("Panel {}", self.next_enclosure),
            bounds: Rect::new(x, y, width, height),
        };
        debug!("added enclosure {id}");
        self.enclosures.insert(id.clone(), enclosure);
        self.enclosure_order.push(id.clone());
        id
    }

    pub fn move_enclosure(&mut self, id: &str, to: Point) -> Result<(), LayoutError> {
        let enclosure = self
            .enclosures
            .get_mut(id)
            .ok_or_else(|| LayoutError::unknown_enclosure(id))?;
        enclosure.bounds.x = to.x;
        enclosure.bounds.y = to.y;
        self.rescan();
        Ok(())
    }

    /// Resize an enclosure, clamped to the configured minimum. Children keep
    /// their relative positions, so shrinking can push them outside.
    pub fn resize_enclosure(
        &mut self,
        id: &str,
        width: f64,
        height: f64,
    ) -> Result<(), LayoutError> {
        let (min_w, min_h) = self.config.min_enclosure_size;
        let enclosure = self
            .enclosures
            .get_mut(id)
            .ok_or_else(|| LayoutError::unknown_enclosure(id))?;
        enclosure.bounds.width = width.max(min_w);
        enclosure.bounds.height = height.max(min_h);
        self.rescan();
        Ok(())
    }

    /// Delete an enclosure. Contained components are orphaned: re-expressed
    /// at their current canvas position with no parent link, to be flagged
    /// by the next scan.
    pub fn delete_enclosure(&mut self, id: &str) -> Result<Vec<Notice>, LayoutError> {
        let enclosure = self
            .enclosures
            .remove(id)
            .ok_or_else(|| LayoutError::unknown_enclosure(id))?;
        self.enclosure_order.retain(|eid| eid != id);

        let mut orphaned = 0usize;
        for component in self.components.values_mut() {
            if component.parent.as_deref() == Some(id) {
                component.position.x += enclosure.bounds.x;
                component.position.y += enclosure.bounds.y;
                component.parent = None;
                orphaned += 1;
            }
        }
        self.rescan();

        let mut notices = Vec::new();
        if orphaned > 0 {
            warn!("deleted enclosure {id}, orphaning {orphaned} component(s)");
            notices.push(Notice::warning(format!(
                "Deleted {}; {} component(s) are no longer inside an enclosure",
                enclosure.label, orphaned
            )));
        }
        Ok(notices)
    }

    // ── Drop protocol ─────────────────────────────────────────────────

    /// Place a catalog part dropped at `at` (canvas coordinates).
    ///
    /// The drop point, not the part's eventual rectangle, selects the
    /// parent: the first enclosure whose bounds contain it. With checking
    /// enabled, a point outside every enclosure forces the part into the
    /// first enclosure at a fixed offset and reports a warning; with
    /// checking disabled the literal position is kept. With no enclosure at
    /// all the drop is rejected.
    pub fn drop_component(
        &mut self,
        request: &DropRequest,
        at: Point,
    ) -> Result<DropOutcome, LayoutError> {
        if self.enclosure_order.is_empty() {
            return Err(LayoutError::NoEnclosure);
        }

        let (default_w, default_h) = self.config.default_component_size;
        let size = request
            .dimensions
            .unwrap_or_else(|| Size::new(default_w, default_h));

        let target = self
            .enclosure_order
            .iter()
            .find(|eid| self.enclosures[*eid].bounds.contains(at))
            .cloned();

        let mut notices = Vec::new();
        let mut forced = false;
        let (parent, position) = match target {
            Some(eid) => {
                let origin = self.enclosures[&eid].bounds.origin();
                (Some(eid), Point::new(at.x - origin.x, at.y - origin.y))
            }
            None if self.checking => {
                let first = self.enclosure_order[0].clone();
                let label = self.enclosures[&first].label.clone();
                let (dx, dy) = self.config.forced_drop_offset;
                warn!("drop at ({}, {}) outside every enclosure", at.x, at.y);
                notices.push(Notice::warning(format!(
                    "Dropped outside any enclosure; component was placed into {label}"
                )));
                forced = true;
                (Some(first), Point::new(dx, dy))
            }
            None => (None, at),
        };

        self.next_component += 1;
        let id = format!("comp-{}", self.next_component);
        let component = Component {
            id: id.clone(),
            catalog_id: request.id.clone(),
            name: request.name.clone(),
            image: request.image.clone(),
            size,
            position,
            parent: parent.clone(),
            outside_enclosure: false,
            overlapping: false,
            intersections: Vec::new(),
        };
        debug!("placed component {id} ({})", request.name);
        self.components.insert(id.clone(), component);
        self.component_order.push(id.clone());
        self.rescan();

        Ok(DropOutcome {
            component_id: id,
            placed_in: parent,
            forced,
            notices,
        })
    }

    // ── Drag protocol ─────────────────────────────────────────────────

    /// Begin dragging a component, recording its position for cancel
    pub fn drag_start(&mut self, id: &str) -> Result<(), LayoutError> {
        let component = self
            .components
            .get(id)
            .ok_or_else(|| LayoutError::unknown_component(id))?;
        self.drag = Some(DragState {
            id: id.to_string(),
            start_position: component.position,
        });
        Ok(())
    }

    /// Move the dragged component by a pointer delta and return the snap
    /// guides currently active against all other components.
    pub fn drag_move(&mut self, id: &str, delta: (f64, f64)) -> Result<Vec<SnapGuide>, LayoutError> {
        self.require_drag(id)?;
        {
            let component = self
                .components
                .get_mut(id)
                .ok_or_else(|| LayoutError::unknown_component(id))?;
            component.position.x += delta.0;
            component.position.y += delta.1;
        }
        self.rescan();

        let dragged = self.canvas_rect(&self.components[id]);
        let others: Vec<(String, Rect)> = self
            .iter_components()
            .filter(|c| c.id != id)
            .map(|c| (c.id.clone(), self.canvas_rect(c)))
            .collect();
        Ok(snap::compute_guides(
            &dragged,
            &others,
            self.config.snap_tolerance,
        ))
    }

    /// End a drag at the final pointer position (canvas coordinates).
    ///
    /// With checking enabled, a component left inside an enclosure adopts it
    /// as parent; a component contained by none is relocated to the nearest
    /// enclosure (top-left corner distance), clamped inside its bounds, and
    /// a warning is reported. Guides are gone once this returns.
    pub fn drag_end(&mut self, id: &str, final_position: Point) -> Result<DragOutcome, LayoutError> {
        self.require_drag(id)?;
        self.drag = None;

        // Store the literal end position in the component's current frame.
        let parent_origin = self.parent_origin(id);
        {
            let component = self
                .components
                .get_mut(id)
                .ok_or_else(|| LayoutError::unknown_component(id))?;
            component.position = Point::new(
                final_position.x - parent_origin.x,
                final_position.y - parent_origin.y,
            );
        }

        let mut notices = Vec::new();
        let mut relocated_to = None;

        if self.checking {
            let rect = self.canvas_rect(&self.components[id]);
            let containing = self
                .enclosure_order
                .iter()
                .find(|eid| self.enclosures[*eid].bounds.contains_rect(&rect))
                .cloned();

            match containing {
                Some(eid) => {
                    let origin = self.enclosures[&eid].bounds.origin();
                    if let Some(component) = self.components.get_mut(id) {
                        component.parent = Some(eid);
                        component.position = Point::new(rect.x - origin.x, rect.y - origin.y);
                    }
                }
                None => {
                    if let Some(eid) = self.nearest_enclosure(rect.origin()) {
                        let inset = self.config.relocation_inset;
                        let bounds = self.enclosures[&eid].bounds;
                        let label = self.enclosures[&eid].label.clone();
                        let x = clamp(rect.x, bounds.x + inset, bounds.right() - rect.width);
                        let y = clamp(rect.y, bounds.y + inset, bounds.bottom() - rect.height);

                        if let Some(component) = self.components.get_mut(id) {
                            component.parent = Some(eid.clone());
                            component.position = Point::new(x - bounds.x, y - bounds.y);
                        }

                        warn!("component {id} ended outside all enclosures; relocated to {eid}");
                        notices.push(Notice::warning(format!(
                            "Component was outside all enclosures and has been moved into {label}"
                        )));
                        relocated_to = Some(eid);
                    }
                }
            }
        }

        self.rescan();
        Ok(DragOutcome {
            position: self.components[id].position,
            relocated_to,
            notices,
        })
    }

    /// Abandon a drag, restoring the position recorded at drag start
    pub fn drag_cancel(&mut self, id: &str) -> Result<(), LayoutError> {
        self.require_drag(id)?;
        let Some(drag) = self.drag.take() else {
            return Err(LayoutError::no_active_drag(id));
        };
        let component = self
            .components
            .get_mut(id)
            .ok_or_else(|| LayoutError::unknown_component(id))?;
        component.position = drag.start_position;
        self.rescan();
        Ok(())
    }

    // ── Component operations ──────────────────────────────────────────

    pub fn delete_component(&mut self, id: &str) -> Result<(), LayoutError> {
        if self.components.remove(id).is_none() {
            return Err(LayoutError::unknown_component(id));
        }
        self.component_order.retain(|cid| cid != id);
        if self.drag.as_ref().is_some_and(|d| d.id == id) {
            self.drag = None;
        }
        self.rescan();
        Ok(())
    }

    /// Toggle violation checking. Disabling clears every flag and marker and
    /// skips all pairwise work until re-enabled.
    pub fn set_checking(&mut self, enabled: bool) {
        self.checking = enabled;
        if enabled {
            self.rescan();
        } else {
            for component in self.components.values_mut() {
                component.outside_enclosure = false;
                component.overlapping = false;
                component.intersections.clear();
            }
        }
    }

    /// Re-run the violation scan and write flags back onto components.
    /// No-op while checking is disabled.
    pub fn rescan(&mut self) {
        if !self.checking {
            return;
        }
        let rects: Vec<(String, Rect)> = self
            .component_order
            .iter()
            .map(|id| (id.clone(), self.canvas_rect(&self.components[id])))
            .collect();
        let enclosures: Vec<Rect> = self
            .enclosure_order
            .iter()
            .map(|id| self.enclosures[id].bounds)
            .collect();

        let mut report = violations::scan(&rects, &enclosures);
        for (id, component) in self.components.iter_mut() {
            component.overlapping = report.overlapping.contains(id);
            component.outside_enclosure = report.outside.contains(id);
            component.intersections = report.intersections.remove(id).unwrap_or_default();
        }
    }

    fn require_drag(&self, id: &str) -> Result<(), LayoutError> {
        match &self.drag {
            Some(drag) if drag.id == id => Ok(()),
            _ => Err(LayoutError::no_active_drag(id)),
        }
    }

    fn parent_origin(&self, id: &str) -> Point {
        self.components
            .get(id)
            .and_then(|c| c.parent.as_ref())
            .and_then(|eid| self.enclosures.get(eid))
            .map(|e| e.bounds.origin())
            .unwrap_or(Point::new(0.0, 0.0))
    }

    fn nearest_enclosure(&self, from: Point) -> Option<String> {
        let mut best: Option<(f64, &String)> = None;
        for eid in &self.enclosure_order {
            let dist = from.distance(self.enclosures[eid].bounds.origin());
            match best {
                Some((d, _)) if d <= dist => {}
                _ => best = Some((dist, eid)),
            }
        }
        best.map(|(_, eid)| eid.clone())
    }
}

/// Numeric suffix of an engine-generated id ("comp-12" -> 12), 0 otherwise
fn id_suffix(id: &str) -> u32 {
    id.rsplit('-')
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}
