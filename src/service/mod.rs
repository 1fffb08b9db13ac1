//! Boundaries to the external georeferencing services.
//!
//! The pairing core only assembles and validates payloads; ingestion, the
//! transform solve and session storage live behind these traits. [`http`]
//! provides a blocking HTTP implementation for the server's REST API.

pub mod http;

use crate::error::Result;
use crate::types::{Coord, DatasetSide};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub use self::http::HttpClient;

/// Archive name the transform service uses when none is advertised.
pub const DEFAULT_ARCHIVE_NAME: &str = "georef_final.zip";

/// Ingestion result for one uploaded dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub columns: Vec<String>,
    pub feature_count: usize,
    /// `[minX, minY, maxX, maxY]`; may be empty or non-finite for empty datasets.
    #[serde(default)]
    pub bounds: Vec<f64>,
    #[serde(default)]
    pub geojson: Value,
}

/// Payload accepted by the transform service.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransformRequest {
    pub session_id: String,
    pub raw_key_col: String,
    pub ref_key_col: String,
    /// `[raw, ref]` per control pair; ids and colors are stripped.
    pub pairs: Vec<[Coord; 2]>,
}

/// Downloadable result of a successful transform.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformArchive {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub has_raw: bool,
    pub has_ref: bool,
    pub raw_count: usize,
    pub ref_count: usize,
}

/// A single feature looked up by key value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureInfo {
    pub properties: Map<String, Value>,
    pub geometry: Value,
}

pub trait IngestionService {
    /// Uploads a zipped dataset. REF uploads require the session created by
    /// the RAW upload.
    fn upload(&self, side: DatasetSide, session_id: Option<&str>, path: &Path) -> Result<UploadResponse>;

    /// Re-fetches a dataset's geometry labelled by `key_col`.
    fn geojson(&self, side: DatasetSide, session_id: &str, key_col: &str) -> Result<Value>;

    fn feature(
        &self,
        side: DatasetSide,
        session_id: &str,
        key_col: &str,
        feature_id: &str,
    ) -> Result<FeatureInfo>;
}

pub trait TransformService {
    fn transform(&self, request: &TransformRequest) -> Result<TransformArchive>;
}

pub trait SessionService {
    fn info(&self, session_id: &str) -> Result<SessionInfo>;
    fn delete(&self, session_id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upload_response_tolerates_missing_optional_fields() {
        let r: UploadResponse = serde_json::from_value(json!({
            "session_id": "abc",
            "columns": ["plot_id", "geometry"],
            "feature_count": 0
        }))
        .unwrap();
        assert!(r.bounds.is_empty());
        assert!(r.geojson.is_null());
    }

    #[test]
    fn transform_request_serializes_tuples() {
        let req = TransformRequest {
            session_id: "s".into(),
            raw_key_col: "plot_id".into(),
            ref_key_col: "PLOT".into(),
            pairs: vec![[[10.0, 20.0], [45.0, -93.0]]],
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["pairs"], json!([[[10.0, 20.0], [45.0, -93.0]]]));
        assert_eq!(v["ref_key_col"], "PLOT");
    }
}
