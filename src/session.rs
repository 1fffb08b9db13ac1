//! Host application state: the pair list's single owner.
//!
//! [`GeorefSession`] wires two [`MapSurface`]s to one [`PairingController`].
//! Surfaces push placements up; after every mutation the session pushes a
//! fresh pair snapshot back down to both surfaces. It also assembles and
//! validates the transform payload before anything is sent.

use crate::config::PairingParams;
use crate::diagnostics::SessionReport;
use crate::error::{Error, Result};
use crate::pairing::{PairingController, PendingSlots, PlacementOutcome};
use crate::service::{TransformArchive, TransformRequest, TransformService, UploadResponse};
use crate::surface::MapSurface;
use crate::types::{ControlPair, Coord, DatasetSide, PairId};
use crate::viewport::Viewport;
use log::{debug, info, warn};
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct GeorefSession {
    params: PairingParams,
    session_id: Option<String>,
    raw_columns: Vec<String>,
    ref_columns: Vec<String>,
    controller: PairingController,
    raw: MapSurface,
    ref_: MapSurface,
}

impl GeorefSession {
    pub fn new(params: PairingParams, width: f64, height: f64) -> Self {
        Self {
            raw: MapSurface::new(DatasetSide::Raw, width, height, &params),
            ref_: MapSurface::new(DatasetSide::Ref, width, height, &params),
            controller: PairingController::new(params.palette.clone()),
            session_id: None,
            raw_columns: Vec::new(),
            ref_columns: Vec::new(),
            params,
        }
    }

    pub fn params(&self) -> &PairingParams {
        &self.params
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn set_session_id(&mut self, id: impl Into<String>) {
        self.session_id = Some(id.into());
    }

    pub fn surface(&self, side: DatasetSide) -> &MapSurface {
        match side {
            DatasetSide::Raw => &self.raw,
            DatasetSide::Ref => &self.ref_,
        }
    }

    fn surface_mut(&mut self, side: DatasetSide) -> &mut MapSurface {
        match side {
            DatasetSide::Raw => &mut self.raw,
            DatasetSide::Ref => &mut self.ref_,
        }
    }

    pub fn columns(&self, side: DatasetSide) -> &[String] {
        match side {
            DatasetSide::Raw => &self.raw_columns,
            DatasetSide::Ref => &self.ref_columns,
        }
    }

    pub fn pairs(&self) -> &[ControlPair] {
        self.controller.pairs()
    }

    pub fn pending(&self) -> PendingSlots {
        self.controller.pending()
    }

    /// Installs an ingestion result on its surface. A RAW upload opens a new
    /// session. Either upload discards existing pairs, which referred to the
    /// previous dataset. The first column becomes the key attribute.
    pub fn load_upload(&mut self, side: DatasetSide, upload: UploadResponse) {
        let adopt = match (&self.session_id, side) {
            (Some(current), DatasetSide::Ref) => {
                if *current != upload.session_id {
                    warn!(
                        "REF upload belongs to session {} but current session is {current}",
                        upload.session_id
                    );
                }
                false
            }
            _ => true,
        };
        if adopt {
            self.session_id = Some(upload.session_id.clone());
        }
        let key = upload.columns.first().cloned();
        info!(
            "Loaded {side} dataset: {} features, key column {:?}",
            upload.feature_count, key
        );
        match side {
            DatasetSide::Raw => self.raw_columns = upload.columns,
            DatasetSide::Ref => self.ref_columns = upload.columns,
        }
        self.load_geojson(side, upload.geojson, key, Some(&upload.bounds));
    }

    /// Installs base geometry without an ingestion round-trip.
    pub fn load_geojson(
        &mut self,
        side: DatasetSide,
        geojson: Value,
        key: Option<String>,
        bounds: Option<&[f64]>,
    ) {
        self.surface_mut(side).load(geojson, key, bounds);
        if !self.controller.is_empty() || !self.controller.pending().is_empty() {
            info!("New {side} dataset loaded, clearing {} pairs", self.controller.len());
        }
        self.controller.reset();
        self.refresh();
    }

    pub fn set_key_column(&mut self, side: DatasetSide, key: impl Into<String>) {
        self.surface_mut(side).set_key_attribute(Some(key.into()));
    }

    pub fn key_column(&self, side: DatasetSide) -> Option<&str> {
        self.surface(side).key_attribute()
    }

    pub fn set_placement_enabled(&mut self, side: DatasetSide, enabled: bool) {
        self.surface_mut(side).set_placement_enabled(enabled);
    }

    /// Host-driven pan/zoom of one surface.
    pub fn set_viewport(&mut self, side: DatasetSide, viewport: Viewport) {
        self.surface_mut(side).set_viewport(viewport);
    }

    /// Screen click on one surface. `None` when that surface ignores placement.
    pub fn click(&mut self, side: DatasetSide, screen: Coord) -> Option<PlacementOutcome> {
        let placement = self.surface(side).place_point(screen)?;
        let outcome = self.controller.apply(placement);
        self.refresh();
        Some(outcome)
    }

    /// Places an already-converted coordinate (storage space of `side`).
    pub fn place(&mut self, side: DatasetSide, coord: Coord) -> PlacementOutcome {
        let outcome = self.controller.on_placed(side, coord);
        self.refresh();
        outcome
    }

    pub fn remove_pair(&mut self, id: PairId) -> Option<ControlPair> {
        let removed = self.controller.remove_pair(id);
        if removed.is_some() {
            self.refresh();
        }
        removed
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        self.refresh();
    }

    /// Pushes the current snapshot to both surfaces.
    fn refresh(&mut self) {
        let pending = self.controller.pending();
        let pairs = self.controller.pairs();
        self.raw.render(pairs, pending.raw);
        self.ref_.render(pairs, pending.ref_);
    }

    /// Pair-count check alone.
    pub fn validate(&self) -> Result<()> {
        let have = self.controller.len();
        let need = self.params.min_transform_pairs;
        if have < need {
            return Err(Error::InsufficientPairs { have, need });
        }
        Ok(())
    }

    pub fn ready_for_submission(&self) -> bool {
        self.validate().is_ok() && self.session_id.is_some()
    }

    pub fn transform_request(&self) -> Result<TransformRequest> {
        self.validate()?;
        let session_id = self.session_id.clone().ok_or(Error::MissingSession)?;
        Ok(TransformRequest {
            session_id,
            raw_key_col: self.key_column(DatasetSide::Raw).unwrap_or_default().to_string(),
            ref_key_col: self.key_column(DatasetSide::Ref).unwrap_or_default().to_string(),
            pairs: self.controller.tuples(),
        })
    }

    /// Validates locally and, if that passes, hands the payload to `service`.
    /// Failures leave pairs and session untouched.
    pub fn submit<S: TransformService + ?Sized>(&self, service: &S) -> Result<TransformArchive> {
        let request = self.transform_request()?;
        debug!("Submitting transform request with {} pairs", request.pairs.len());
        service.transform(&request).map_err(|e| {
            warn!("Transform submission failed: {e}");
            e
        })
    }

    pub fn report(&self) -> SessionReport {
        SessionReport::from_session(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> GeorefSession {
        GeorefSession::new(PairingParams::default(), 400.0, 300.0)
    }

    #[test]
    fn raw_upload_opens_session_and_picks_first_column() {
        let mut s = session();
        s.load_upload(
            DatasetSide::Raw,
            UploadResponse {
                session_id: "abc".into(),
                columns: vec!["plot_id".into(), "geometry".into()],
                feature_count: 0,
                bounds: vec![0.0, 0.0, 100.0, 100.0],
                geojson: json!({ "type": "FeatureCollection", "features": [] }),
            },
        );
        assert_eq!(s.session_id(), Some("abc"));
        assert_eq!(s.key_column(DatasetSide::Raw), Some("plot_id"));
        assert_eq!(s.columns(DatasetSide::Raw).len(), 2);
    }

    #[test]
    fn loading_a_dataset_clears_pairs() {
        let mut s = session();
        s.place(DatasetSide::Raw, [1.0, 1.0]);
        s.place(DatasetSide::Ref, [2.0, 2.0]);
        s.place(DatasetSide::Raw, [3.0, 3.0]);
        assert_eq!(s.pairs().len(), 1);
        s.load_geojson(DatasetSide::Ref, Value::Null, None, None);
        assert!(s.pairs().is_empty());
        assert!(s.pending().is_empty());
    }

    #[test]
    fn surfaces_track_snapshot() {
        let mut s = session();
        s.place(DatasetSide::Raw, [1.0, 1.0]);
        assert_eq!(s.surface(DatasetSide::Raw).markers().len(), 1);
        assert!(s.surface(DatasetSide::Ref).markers().is_empty());
        s.place(DatasetSide::Ref, [2.0, 2.0]);
        assert_eq!(s.surface(DatasetSide::Raw).markers().len(), 1);
        assert_eq!(s.surface(DatasetSide::Ref).markers().len(), 1);
        let id = s.pairs()[0].id;
        s.remove_pair(id);
        assert!(s.surface(DatasetSide::Raw).markers().is_empty());
    }

    #[test]
    fn request_needs_session() {
        let mut s = session();
        for i in 0..3 {
            let v = i as f64;
            s.place(DatasetSide::Raw, [v, v]);
            s.place(DatasetSide::Ref, [v + 10.0, v]);
        }
        assert!(matches!(s.transform_request(), Err(Error::MissingSession)));
        s.set_session_id("xyz");
        let req = s.transform_request().unwrap();
        assert_eq!(req.pairs.len(), 3);
        assert_eq!(req.pairs[2], [[2.0, 2.0], [12.0, 2.0]]);
    }

    #[test]
    fn disabled_surface_click_is_ignored() {
        let mut s = session();
        s.set_placement_enabled(DatasetSide::Ref, false);
        assert!(s.click(DatasetSide::Ref, [10.0, 10.0]).is_none());
        assert!(s.pending().is_empty());
    }
}
