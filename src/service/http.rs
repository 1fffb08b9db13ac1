//! Blocking REST client for the georeferencing server.

use super::{
    FeatureInfo, IngestionService, SessionInfo, SessionService, TransformArchive,
    TransformRequest, TransformService, UploadResponse, DEFAULT_ARCHIVE_NAME,
};
use crate::error::{Error, Result};
use crate::types::DatasetSide;
use log::{debug, info};
use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::CONTENT_DISPOSITION;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Passes successful responses through; turns everything else into
/// [`Error::Service`] with the server's message.
fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(service_error(status.as_u16(), &body))
}

/// Decodes `{"detail": ...}` error bodies; other bodies are kept as-is.
pub fn service_error(status: u16, body: &str) -> Error {
    let detail = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(mut obj)) => match obj.remove("detail") {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ => body.to_string(),
    };
    Error::Service { status, detail }
}

/// Extracts `filename=` from a Content-Disposition header value.
pub fn disposition_filename(value: &str) -> Option<String> {
    value.split(';').find_map(|part| {
        let name = part.trim().strip_prefix("filename=")?;
        let name = name.trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}

impl IngestionService for HttpClient {
    fn upload(&self, side: DatasetSide, session_id: Option<&str>, path: &Path) -> Result<UploadResponse> {
        let mut req = self.client.post(self.url(&format!("/upload/{side}")));
        if side == DatasetSide::Ref {
            let id = session_id.ok_or(Error::MissingSession)?;
            req = req.query(&[("session_id", id)]);
        }
        let form = multipart::Form::new().file("file", path)?;
        info!("Uploading {side} dataset {}", path.display());
        let resp = check(req.multipart(form).send()?)?;
        let upload: UploadResponse = resp.json()?;
        debug!(
            "Upload {side}: session={} features={} columns={:?}",
            upload.session_id, upload.feature_count, upload.columns
        );
        Ok(upload)
    }

    fn geojson(&self, side: DatasetSide, session_id: &str, key_col: &str) -> Result<Value> {
        let resp = self
            .client
            .get(self.url(&format!("/geojson/{side}/{session_id}")))
            .query(&[("key_col", key_col)])
            .send()?;
        Ok(check(resp)?.json()?)
    }

    fn feature(
        &self,
        side: DatasetSide,
        session_id: &str,
        key_col: &str,
        feature_id: &str,
    ) -> Result<FeatureInfo> {
        let resp = self
            .client
            .get(self.url(&format!("/feature/{side}/{session_id}")))
            .query(&[("key_col", key_col), ("feature_id", feature_id)])
            .send()?;
        Ok(check(resp)?.json()?)
    }
}

impl TransformService for HttpClient {
    fn transform(&self, request: &TransformRequest) -> Result<TransformArchive> {
        info!(
            "Submitting {} control pairs for session {}",
            request.pairs.len(),
            request.session_id
        );
        let resp = check(self.client.post(self.url("/transform")).json(request).send()?)?;
        let filename = resp
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename)
            .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string());
        let bytes = resp.bytes()?.to_vec();
        debug!("Transform returned {filename} ({} bytes)", bytes.len());
        Ok(TransformArchive { filename, bytes })
    }
}

impl SessionService for HttpClient {
    fn info(&self, session_id: &str) -> Result<SessionInfo> {
        let resp = self
            .client
            .get(self.url(&format!("/session/{session_id}/info")))
            .send()?;
        Ok(check(resp)?.json()?)
    }

    fn delete(&self, session_id: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.url(&format!("/session/{session_id}")))
            .send()?;
        check(resp)?;
        Ok(())
    }
}
