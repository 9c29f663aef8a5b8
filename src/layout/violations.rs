//! Violation scanning: overlap and containment checks
//!
//! Runs after every position-changing mutation while checking is enabled.
//! The pairwise overlap scan is O(n²); when checking is disabled the engine
//! skips this module entirely and clears all flags instead.

use std::collections::{HashMap, HashSet};

use crate::geometry::{Point, Rect};

/// Marker for one overlapping pair, stored on each member separately.
///
/// Storage is directional: A's list records the intersection with B and B's
/// list separately records the intersection with A.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionMarker {
    /// Id of the other component in the pair
    pub other: String,
    /// Centroid of the intersection rectangle, in canvas coordinates
    pub at: Point,
}

/// Result of a full violation scan
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Ids appearing in at least one overlapping pair
    pub overlapping: HashSet<String>,
    /// Ids contained by no enclosure
    pub outside: HashSet<String>,
    /// Per-component intersection markers, keyed by component id
    pub intersections: HashMap<String, Vec<IntersectionMarker>>,
}

/// Scan all components (as canvas rectangles, in insertion order) against
/// each other and against the enclosures.
pub fn scan(components: &[(String, Rect)], enclosures: &[Rect]) -> ScanReport {
    let mut report = ScanReport::default();

    for i in 0..components.len() {
        for j in (i + 1)..components.len() {
            let (id_a, rect_a) = &components[i];
            let (id_b, rect_b) = &components[j];

            let Some(overlap) = rect_a.intersection(rect_b) else {
                continue;
            };

            report.overlapping.insert(id_a.clone());
            report.overlapping.insert(id_b.clone());

            let at = overlap.center();
            report
                .intersections
                .entry(id_a.clone())
                .or_default()
                .push(IntersectionMarker {
                    other: id_b.clone(),
                    at,
                });
            report
                .intersections
                .entry(id_b.clone())
                .or_default()
                .push(IntersectionMarker {
                    other: id_a.clone(),
                    at,
                });
        }
    }

    for (id, rect) in components {
        let contained = enclosures.iter().any(|enc| enc.contains_rect(rect));
        if !contained {
            report.outside.insert(id.clone());
        }
    }

    report
}
