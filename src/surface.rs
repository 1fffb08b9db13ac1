//! One interactive map: base geometry, a viewport and a derived marker layer.
//!
//! A surface never holds pairing state. It turns screen clicks into
//! [`Placement`]s in its dataset's storage space and re-derives its markers
//! from whatever pair snapshot it is handed.

use crate::color::PairColor;
use crate::config::PairingParams;
use crate::geometry::geojson::{parse_or_empty, FeatureCollection};
use crate::geometry::{snap_to_layer, BaseLayer, FeatureLabel};
use crate::types::{ControlPair, Coord, DatasetSide, PairId, Placement};
use crate::viewport::Viewport;
use log::debug;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Member of a confirmed pair.
    Pair,
    /// This side's pending selection.
    Pending,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub pair_id: Option<PairId>,
    /// Position in display coordinates.
    pub display: Coord,
    pub color: Option<PairColor>,
    /// 1-based row in the current pair list; empty for the pending marker.
    pub label: String,
}

/// Derives the marker layer for `side` from a pair snapshot and the pending
/// selection. Pure and idempotent.
pub fn render_markers(side: DatasetSide, pairs: &[ControlPair], pending: Option<Coord>) -> Vec<Marker> {
    let mut markers: Vec<Marker> = pairs
        .iter()
        .enumerate()
        .map(|(index, pair)| Marker {
            kind: MarkerKind::Pair,
            pair_id: Some(pair.id),
            display: side.to_display(pair.coord(side)),
            color: Some(pair.color),
            label: (index + 1).to_string(),
        })
        .collect();
    if let Some(coord) = pending {
        markers.push(Marker {
            kind: MarkerKind::Pending,
            pair_id: None,
            display: side.to_display(coord),
            color: None,
            label: String::new(),
        });
    }
    markers
}

#[derive(Clone, Debug)]
pub struct MapSurface {
    side: DatasetSide,
    collection: FeatureCollection,
    key_attribute: Option<String>,
    layer: BaseLayer,
    viewport: Viewport,
    placement_enabled: bool,
    snap_enabled: bool,
    snap_tolerance_px: f64,
    markers: Vec<Marker>,
}

impl MapSurface {
    pub fn new(side: DatasetSide, width: f64, height: f64, params: &PairingParams) -> Self {
        Self {
            side,
            collection: FeatureCollection::default(),
            key_attribute: None,
            layer: BaseLayer::empty(side),
            viewport: Viewport::new(width, height),
            placement_enabled: true,
            snap_enabled: params.snap_enabled,
            snap_tolerance_px: params.snap_tolerance_px,
            markers: Vec::new(),
        }
    }

    pub fn side(&self) -> DatasetSide {
        self.side
    }

    /// Replaces the base geometry. `geojson` is sanitized and parsed
    /// leniently; `bounds` (native `[minX, minY, maxX, maxY]`) fits the view
    /// when present and valid, otherwise the current view is kept. Without an
    /// explicit key attribute the collection's first column is used.
    pub fn load(&mut self, geojson: Value, key_attribute: Option<String>, bounds: Option<&[f64]>) {
        self.collection = parse_or_empty(geojson);
        self.key_attribute =
            key_attribute.or_else(|| self.collection.columns().into_iter().next());
        self.rebuild_layer();
        match bounds.and_then(|b| self.side.bounds_to_display(b)) {
            Some(extent) => self.viewport.fit(extent),
            None => debug!("MapSurface[{}] no usable bounds, skipping view fit", self.side),
        }
        debug!(
            "MapSurface[{}] loaded {} features ({} vertices)",
            self.side,
            self.layer.features.len(),
            self.layer.vertex_count()
        );
    }

    pub fn set_key_attribute(&mut self, key: Option<String>) {
        if self.key_attribute != key {
            self.key_attribute = key;
            self.rebuild_layer();
        }
    }

    pub fn key_attribute(&self) -> Option<&str> {
        self.key_attribute.as_deref()
    }

    fn rebuild_layer(&mut self) {
        self.layer = BaseLayer::build(self.side, &self.collection, self.key_attribute.as_deref());
    }

    pub fn set_placement_enabled(&mut self, enabled: bool) {
        self.placement_enabled = enabled;
    }

    pub fn placement_enabled(&self) -> bool {
        self.placement_enabled
    }

    /// Translates a click into a storage-space coordinate for this side.
    /// Returns `None` while placement is disabled.
    pub fn place_point(&self, screen: Coord) -> Option<Placement> {
        if !self.placement_enabled {
            debug!("MapSurface[{}] placement disabled, ignoring click", self.side);
            return None;
        }
        let snap = if self.snap_enabled {
            snap_to_layer(&self.layer, &self.viewport, screen, self.snap_tolerance_px)
        } else {
            None
        };
        let display = snap.map_or_else(|| self.viewport.screen_to_display(screen), |hit| hit.display);
        let coord = self.side.to_stored(display);
        debug!(
            "MapSurface[{}] placed {:?} (snapped={})",
            self.side,
            coord,
            snap.is_some()
        );
        Some(Placement {
            side: self.side,
            coord,
            snapped: snap.is_some(),
        })
    }

    /// Recomputes the marker layer from scratch.
    pub fn render(&mut self, pairs: &[ControlPair], pending: Option<Coord>) -> &[Marker] {
        self.markers = render_markers(self.side, pairs, pending);
        &self.markers
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Marker positions in screen pixels under the current view.
    pub fn marker_screen_positions(&self) -> Vec<Coord> {
        self.markers
            .iter()
            .map(|m| self.viewport.display_to_screen(m.display))
            .collect()
    }

    pub fn labels(&self) -> Vec<FeatureLabel> {
        self.layer.labels()
    }

    pub fn layer(&self) -> &BaseLayer {
        &self.layer
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Pan/zoom is driven by the host; the surface only reads it.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}
