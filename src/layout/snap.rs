//! Snap-guide computation for drag alignment
//!
//! While a component is being dragged its rectangle is compared against
//! every other component (enclosures are never snap targets). Each of the
//! six alignment relations that falls within tolerance emits one guide
//! line; simultaneous alignments are reported independently, not merged.
//! Guides are transient: they exist only in the return value of a drag-move
//! and are gone once the drag ends.

use crate::geometry::Rect;

/// Which alignment relation produced a guide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideKind {
    CenterX,
    CenterY,
    Left,
    Right,
    Top,
    Bottom,
}

impl GuideKind {
    /// Vertical guides mark x-alignment; horizontal guides mark y-alignment
    pub fn is_vertical(&self) -> bool {
        matches!(self, GuideKind::CenterX | GuideKind::Left | GuideKind::Right)
    }
}

/// A single transient alignment line
#[derive(Debug, Clone, PartialEq)]
pub struct SnapGuide {
    pub kind: GuideKind,
    /// Id of the component the dragged rectangle aligns with
    pub other: String,
    /// x-position for vertical guides, y-position for horizontal ones
    pub position: f64,
    /// Extent along the cross axis, covering both rectangles
    pub span: (f64, f64),
}

/// Compare the dragged rectangle against all other component rectangles and
/// collect every alignment within `tolerance`.
pub fn compute_guides(
    dragged: &Rect,
    others: &[(String, Rect)],
    tolerance: f64,
) -> Vec<SnapGuide> {
    let mut guides = Vec::new();

    for (id, other) in others {
        let x_span = (dragged.x.min(other.x), dragged.right().max(other.right()));
        let y_span = (dragged.y.min(other.y), dragged.bottom().max(other.bottom()));

        let vertical = [
            (GuideKind::CenterX, dragged.center().x, other.center().x),
            (GuideKind::Left, dragged.x, other.x),
            (GuideKind::Right, dragged.right(), other.right()),
        ];
        for (kind, ours, theirs) in vertical {
            if (ours - theirs).abs() <= tolerance {
                guides.push(SnapGuide {
                    kind,
                    other: id.clone(),
                    position: theirs,
                    span: y_span,
                });
            }
        }

        let horizontal = [
            (GuideKind::CenterY, dragged.center().y, other.center().y),
            (GuideKind::Top, dragged.y, other.y),
            (GuideKind::Bottom, dragged.bottom(), other.bottom()),
        ];
        for (kind, ours, theirs) in horizontal {
            if (ours - theirs).abs() <= tolerance {
                guides.push(SnapGuide {
                    kind,
                    other: id.clone(),
                    position: theirs,
                    span: x_span,
                });
            }
        }
    }

    guides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn others(list: &[(&str, Rect)]) -> Vec<(String, Rect)> {
        list.iter()
            .map(|(id, r)| (id.to_string(), *r))
            .collect()
    }

    #[test]
    fn test_exact_left_edge_alignment() {
        let dragged = Rect::new(100.0, 0.0, 40.0, 40.0);
        let fixed = others(&[("a", Rect::new(100.0, 200.0, 60.0, 60.0))]);

        let guides = compute_guides(&dragged, &fixed, 5.0);
        let left: Vec<_> = guides
            .iter()
            .filter(|g| g.kind == GuideKind::Left)
            .collect();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].position, 100.0);
        assert!(left[0].kind.is_vertical());
        // Span covers both rectangles vertically
        assert_eq!(left[0].span, (0.0, 260.0));
    }

    #[test]
    fn test_within_tolerance() {
        let dragged = Rect::new(103.0, 0.0, 40.0, 40.0);
        let fixed = others(&[("a", Rect::new(100.0, 100.0, 40.0, 40.0))]);

        let guides = compute_guides(&dragged, &fixed, 5.0);
        assert!(guides.iter().any(|g| g.kind == GuideKind::Left));
        // Guide sits at the other rectangle's edge, not the dragged one's
        let left = guides.iter().find(|g| g.kind == GuideKind::Left).unwrap();
        assert_eq!(left.position, 100.0);
    }

    #[test]
    fn test_outside_tolerance() {
        let dragged = Rect::new(106.0, 0.0, 40.0, 40.0);
        let fixed = others(&[("a", Rect::new(100.0, 100.0, 40.0, 40.0))]);

        let guides = compute_guides(&dragged, &fixed, 5.0);
        assert!(guides.iter().all(|g| g.kind != GuideKind::Left));
    }

    #[test]
    fn test_identical_rects_emit_all_six() {
        // Same size at the same x/y alignment: every relation matches
        let dragged = Rect::new(50.0, 50.0, 40.0, 40.0);
        let fixed = others(&[("a", Rect::new(50.0, 50.0, 40.0, 40.0))]);

        let guides = compute_guides(&dragged, &fixed, 5.0);
        assert_eq!(guides.len(), 6);
    }

    #[test]
    fn test_center_alignment_only() {
        // Different widths centered on the same x: centers align, edges don't
        let dragged = Rect::new(90.0, 0.0, 20.0, 20.0);
        let fixed = others(&[("a", Rect::new(50.0, 100.0, 100.0, 40.0))]);

        let guides = compute_guides(&dragged, &fixed, 5.0);
        assert_eq!(guides.len(), 1);
        assert_eq!(guides[0].kind, GuideKind::CenterX);
        assert_eq!(guides[0].position, 100.0);
    }

    #[test]
    fn test_multiple_targets_multiple_guides() {
        let dragged = Rect::new(0.0, 0.0, 40.0, 40.0);
        let fixed = others(&[
            ("a", Rect::new(0.0, 100.0, 40.0, 40.0)),
            ("b", Rect::new(0.0, 200.0, 40.0, 40.0)),
        ]);

        let guides = compute_guides(&dragged, &fixed, 5.0);
        // Left, Right, CenterX against each of the two targets
        assert_eq!(guides.len(), 6);
        assert!(guides.iter().any(|g| g.other == "a"));
        assert!(guides.iter().any(|g| g.other == "b"));
    }

    #[test]
    fn test_no_targets_no_guides() {
        let dragged = Rect::new(0.0, 0.0, 40.0, 40.0);
        assert!(compute_guides(&dragged, &[], 5.0).is_empty());
    }
}
