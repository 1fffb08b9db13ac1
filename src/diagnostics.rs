use crate::pairing::PendingSlots;
use crate::session::GeorefSession;
use crate::types::{Coord, DatasetSide, PairId};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct PairRow {
    /// 1-based position in the current list.
    pub index: usize,
    pub id: PairId,
    pub color_css: String,
    pub color_hex: String,
    pub raw: Coord,
    #[serde(rename = "ref")]
    pub ref_: Coord,
}

#[derive(Clone, Debug, Serialize)]
pub struct SurfaceSummary {
    pub side: DatasetSide,
    pub key_attribute: Option<String>,
    pub features: usize,
    pub vertices: usize,
    pub labels: usize,
    pub markers: usize,
    pub placement_enabled: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionReport {
    pub session_id: Option<String>,
    pub pair_count: usize,
    pub min_transform_pairs: usize,
    pub ready_for_submission: bool,
    pub pairs: Vec<PairRow>,
    pub pending: PendingSlots,
    pub raw: SurfaceSummary,
    #[serde(rename = "ref")]
    pub ref_: SurfaceSummary,
}

impl SessionReport {
    pub fn from_session(session: &GeorefSession) -> Self {
        let pairs = session
            .pairs()
            .iter()
            .enumerate()
            .map(|(i, p)| PairRow {
                index: i + 1,
                id: p.id,
                color_css: p.color.to_css(),
                color_hex: p.color.to_hex(),
                raw: p.raw,
                ref_: p.ref_,
            })
            .collect();
        Self {
            session_id: session.session_id().map(str::to_string),
            pair_count: session.pairs().len(),
            min_transform_pairs: session.params().min_transform_pairs,
            ready_for_submission: session.ready_for_submission(),
            pairs,
            pending: session.pending(),
            raw: summarize(session, DatasetSide::Raw),
            ref_: summarize(session, DatasetSide::Ref),
        }
    }
}

fn summarize(session: &GeorefSession, side: DatasetSide) -> SurfaceSummary {
    let surface = session.surface(side);
    SurfaceSummary {
        side,
        key_attribute: surface.key_attribute().map(str::to_string),
        features: surface.layer().features.len(),
        vertices: surface.layer().vertex_count(),
        labels: surface.labels().len(),
        markers: surface.markers().len(),
        placement_enabled: surface.placement_enabled(),
    }
}
