//! Snapping of placements to nearby base geometry.
//!
//! Distances are measured in screen pixels so the tolerance feels the same at
//! every zoom level. Vertices win over edges: if any vertex lies within the
//! tolerance the nearest one is taken, otherwise the nearest point on any
//! edge within the tolerance. The result is a display coordinate, so callers
//! convert snapped and unsnapped placements identically.

use super::layer::BaseLayer;
use crate::types::Coord;
use crate::viewport::Viewport;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapKind {
    Vertex,
    Edge,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SnapHit {
    /// Snapped location in display coordinates.
    pub display: Coord,
    pub kind: SnapKind,
    pub distance_px: f64,
}

/// Finds the snap target for a click at `screen`, if any lies within
/// `tolerance_px`.
pub fn snap_to_layer(
    layer: &BaseLayer,
    viewport: &Viewport,
    screen: Coord,
    tolerance_px: f64,
) -> Option<SnapHit> {
    if !(tolerance_px > 0.0) || layer.is_empty() {
        return None;
    }
    let to_screen = |p: &Coord| viewport.display_to_screen(*p);

    let mut best_vertex: Option<(f64, Coord)> = None;
    let vertices = layer
        .features
        .iter()
        .flat_map(|f| f.points.iter().chain(f.paths.iter().flatten()));
    for p in vertices {
        let d = dist(to_screen(p), screen);
        if d <= tolerance_px && best_vertex.map_or(true, |(bd, _)| d < bd) {
            best_vertex = Some((d, *p));
        }
    }
    if let Some((d, p)) = best_vertex {
        return Some(SnapHit {
            display: p,
            kind: SnapKind::Vertex,
            distance_px: d,
        });
    }

    let mut best_edge: Option<(f64, Coord)> = None;
    for path in layer.features.iter().flat_map(|f| f.paths.iter()) {
        for seg in path.windows(2) {
            let a = to_screen(&seg[0]);
            let b = to_screen(&seg[1]);
            let (t, d) = closest_on_segment(a, b, screen);
            if d <= tolerance_px && best_edge.map_or(true, |(bd, _)| d < bd) {
                let p = [
                    seg[0][0] + t * (seg[1][0] - seg[0][0]),
                    seg[0][1] + t * (seg[1][1] - seg[0][1]),
                ];
                best_edge = Some((d, p));
            }
        }
    }
    best_edge.map(|(d, p)| SnapHit {
        display: p,
        kind: SnapKind::Edge,
        distance_px: d,
    })
}

#[inline]
fn dist(a: Coord, b: Coord) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

/// Parameter `t ∈ [0, 1]` of the point on `ab` closest to `p`, and its distance.
#[inline]
fn closest_on_segment(a: Coord, b: Coord, p: Coord) -> (f64, f64) {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let len2 = ab[0] * ab[0] + ab[1] * ab[1];
    let t = if len2 <= f64::EPSILON {
        0.0
    } else {
        (((p[0] - a[0]) * ab[0] + (p[1] - a[1]) * ab[1]) / len2).clamp(0.0, 1.0)
    };
    let q = [a[0] + t * ab[0], a[1] + t * ab[1]];
    (t, dist(q, p))
}
