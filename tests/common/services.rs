use georef_pairing::service::{TransformArchive, TransformRequest, TransformService};
use georef_pairing::{Error, Result};
use std::cell::RefCell;

/// In-memory transform service that records every request it receives.
pub struct FakeTransform {
    pub requests: RefCell<Vec<TransformRequest>>,
    pub reject_with: Option<String>,
}

impl FakeTransform {
    pub fn accepting() -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            reject_with: None,
        }
    }

    pub fn rejecting(detail: &str) -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            reject_with: Some(detail.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl TransformService for FakeTransform {
    fn transform(&self, request: &TransformRequest) -> Result<TransformArchive> {
        self.requests.borrow_mut().push(request.clone());
        if let Some(detail) = &self.reject_with {
            return Err(Error::Service {
                status: 500,
                detail: detail.clone(),
            });
        }
        if request.pairs.len() < 3 {
            return Err(Error::Service {
                status: 400,
                detail: "At least 3 control point pairs required".to_string(),
            });
        }
        Ok(TransformArchive {
            filename: "georef_final.zip".to_string(),
            bytes: b"PK\x03\x04".to_vec(),
        })
    }
}
