//! GeoJSON feature collections as produced by the ingestion service.
//!
//! Collections may carry a legacy `crs` member (GeoPandas writes one). The
//! member is stripped before parsing at every level it can appear: the
//! projection of each surface is fixed, and an annotation that disagrees with
//! it would misplace every feature.

use crate::error::Result;
use crate::projection;
use crate::types::{Coord, DatasetSide};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GeoJSON position. Only the first two ordinates are used.
pub type Position = Vec<f64>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    /// Flattens into isolated vertices and paths, converting each position
    /// with `f`. Invalid positions (fewer than two finite ordinates) are
    /// dropped.
    pub fn flatten_into<F>(&self, f: &F, points: &mut Vec<Coord>, paths: &mut Vec<Vec<Coord>>)
    where
        F: Fn(Coord) -> Coord,
    {
        let path = |ring: &[Position]| -> Vec<Coord> {
            ring.iter().filter_map(|p| to_coord(p)).map(f).collect()
        };
        match self {
            Geometry::Point { coordinates } => points.extend(to_coord(coordinates).map(f)),
            Geometry::MultiPoint { coordinates } => {
                points.extend(coordinates.iter().filter_map(|p| to_coord(p)).map(f))
            }
            Geometry::LineString { coordinates } => push_path(paths, path(coordinates)),
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                for line in coordinates {
                    push_path(paths, path(line));
                }
            }
            Geometry::MultiPolygon { coordinates } => {
                for ring in coordinates.iter().flatten() {
                    push_path(paths, path(ring));
                }
            }
            Geometry::GeometryCollection { geometries } => {
                for g in geometries {
                    g.flatten_into(f, points, paths);
                }
            }
        }
    }

    /// Same as [`Geometry::flatten_into`] using the display conversion of `side`.
    pub fn flatten_for(&self, side: DatasetSide) -> (Vec<Coord>, Vec<Vec<Coord>>) {
        let mut points = Vec::new();
        let mut paths = Vec::new();
        match side {
            DatasetSide::Raw => self.flatten_into(&|c: Coord| c, &mut points, &mut paths),
            DatasetSide::Ref => {
                self.flatten_into(&projection::lonlat_to_mercator, &mut points, &mut paths)
            }
        }
        (points, paths)
    }
}

fn push_path(paths: &mut Vec<Vec<Coord>>, path: Vec<Coord>) {
    if !path.is_empty() {
        paths.push(path);
    }
}

#[inline]
fn to_coord(p: &Position) -> Option<Coord> {
    match p.as_slice() {
        [x, y, ..] if x.is_finite() && y.is_finite() => Some([*x, *y]),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl Feature {
    /// Property `key` rendered as a label string. Strings are used as-is,
    /// numbers and booleans are formatted, null and missing yield `None`.
    pub fn label(&self, key: &str) -> Option<String> {
        match self.properties.as_ref()?.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Distinct property names across all features, in first-seen order.
    pub fn columns(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for props in self.features.iter().filter_map(|f| f.properties.as_ref()) {
            for key in props.keys() {
                if !out.iter().any(|k| k == key) {
                    out.push(key.clone());
                }
            }
        }
        out
    }
}

/// Removes every `crs` member from a collection, its features and their
/// geometries. Returns how many were removed.
pub fn sanitize_crs(value: &mut Value) -> usize {
    let mut removed = 0;
    strip_crs(value, &mut removed);
    removed
}

fn strip_crs(value: &mut Value, removed: &mut usize) {
    let Value::Object(obj) = value else {
        return;
    };
    if obj.remove("crs").is_some() {
        *removed += 1;
    }
    for key in ["features", "geometries"] {
        if let Some(Value::Array(items)) = obj.get_mut(key) {
            for item in items {
                strip_crs(item, removed);
            }
        }
    }
    if let Some(geom) = obj.get_mut("geometry") {
        strip_crs(geom, removed);
    }
}

/// Collection envelope; features are decoded one by one.
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    features: Vec<Value>,
}

/// Sanitizes and parses a feature collection. `null` parses as empty.
///
/// Only the envelope must be well formed. Features that fail to decode are
/// dropped with a warning and the rest are kept.
pub fn parse_feature_collection(mut value: Value) -> Result<FeatureCollection> {
    if value.is_null() {
        return Ok(FeatureCollection::default());
    }
    let removed = sanitize_crs(&mut value);
    if removed > 0 {
        warn!("GeoJSON: stripped {removed} crs annotation(s) before parsing");
    }
    let envelope: Envelope = serde_json::from_value(value)?;
    let mut features = Vec::with_capacity(envelope.features.len());
    for (index, raw) in envelope.features.into_iter().enumerate() {
        match serde_json::from_value::<Feature>(raw) {
            Ok(feature) => features.push(feature),
            Err(e) => warn!("GeoJSON: skipping malformed feature #{index}: {e}"),
        }
    }
    Ok(FeatureCollection { features })
}

/// Lenient variant used by surfaces: anything unparseable becomes an empty
/// collection.
pub fn parse_or_empty(value: Value) -> FeatureCollection {
    parse_feature_collection(value).unwrap_or_else(|e| {
        warn!("GeoJSON: unreadable feature collection, rendering empty layer: {e}");
        FeatureCollection::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::3857" } },
            "features": [
                {
                    "id": "0",
                    "type": "Feature",
                    "properties": { "plot_id": "A1", "area": 12.5 },
                    "geometry": {
                        "type": "Polygon",
                        "crs": { "type": "name", "properties": { "name": "EPSG:4326" } },
                        "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "plot_id": 7, "area": null },
                    "geometry": { "type": "Point", "coordinates": [5.0, 5.0, 1.0] }
                },
                { "type": "Feature", "properties": null, "geometry": null }
            ]
        })
    }

    #[test]
    fn strips_crs_at_every_level() {
        let mut v = sample();
        assert_eq!(sanitize_crs(&mut v), 2);
        assert!(v.get("crs").is_none());
        assert!(v["features"][0]["geometry"].get("crs").is_none());
    }

    #[test]
    fn parses_mixed_features() {
        let fc = parse_feature_collection(sample()).unwrap();
        assert_eq!(fc.features.len(), 3);
        assert_eq!(fc.features[0].label("plot_id").as_deref(), Some("A1"));
        assert_eq!(fc.features[1].label("plot_id").as_deref(), Some("7"));
        assert_eq!(fc.features[1].label("area"), None);
        assert_eq!(fc.features[2].label("plot_id"), None);
        assert_eq!(fc.columns(), vec!["area".to_string(), "plot_id".to_string()]);
    }

    #[test]
    fn null_and_garbage_are_empty() {
        assert!(parse_feature_collection(Value::Null).unwrap().is_empty());
        assert!(parse_feature_collection(json!({"features": 3})).is_err());
        assert!(parse_or_empty(json!("nope")).is_empty());
    }

    #[test]
    fn malformed_features_are_dropped_individually() {
        let fc = parse_feature_collection(json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "plot_id": "ok" },
                  "geometry": { "type": "Point", "coordinates": [1.0, 2.0] } },
                { "type": "Feature", "properties": { "plot_id": "no-coords" },
                  "geometry": { "type": "Polygon" } },
                { "type": "Feature", "properties": ["not", "a", "map"],
                  "geometry": { "type": "Point", "coordinates": [3.0, 4.0] } },
                42
            ]
        }))
        .unwrap();
        assert_eq!(fc.features.len(), 1);
        assert_eq!(fc.features[0].label("plot_id").as_deref(), Some("ok"));
    }

    #[test]
    fn flatten_drops_invalid_positions() {
        let g = Geometry::LineString {
            coordinates: vec![vec![0.0, 0.0], vec![1.0], vec![f64::NAN, 2.0], vec![3.0, 4.0]],
        };
        let (points, paths) = g.flatten_for(DatasetSide::Raw);
        assert!(points.is_empty());
        assert_eq!(paths, vec![vec![[0.0, 0.0], [3.0, 4.0]]]);
    }

    #[test]
    fn ref_geometry_is_projected() {
        let g = Geometry::Point {
            coordinates: vec![180.0, 0.0],
        };
        let (points, _) = g.flatten_for(DatasetSide::Ref);
        assert!((points[0][0] - projection::MERCATOR_HALF_SIZE).abs() < 1e-6);
    }
}
