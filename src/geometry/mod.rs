//! Base geometry handed to a map surface.
//!
//! - [`geojson`] – sanitizing parser for GeoJSON feature collections.
//! - [`layer`] – display-space flattening of features into points and paths,
//!   plus key-attribute labels.
//! - [`snap`] – vertex/edge snapping in screen space.
//!
//! The core never interprets geometry beyond its vertices: rings and lines
//! become paths, points become isolated vertices.

pub mod geojson;
pub mod layer;
pub mod snap;

pub use self::geojson::{parse_feature_collection, sanitize_crs, Feature, FeatureCollection, Geometry};
pub use self::layer::{BaseLayer, DisplayFeature, FeatureLabel};
pub use self::snap::{snap_to_layer, SnapHit, SnapKind};
