//! Pairing controller: joins one pending placement per side into control pairs.
//!
//! State is effectively a two-slot join. A placement fills its side's slot
//! (replacing any stale value); when both slots hold a coordinate the join
//! commits immediately, so there is never a persistent "both pending" state.
//! A commit that would exactly duplicate an existing pair (same raw AND same
//! ref) is dropped silently. Both slots are cleared after every join attempt.
//!
//! Ids and colors come from counters that only grow, so removing a pair never
//! causes its id or color to be handed out again.

use crate::color::ColorAllocator;
use crate::config::pairing::PaletteParams;
use crate::types::{ControlPair, Coord, DatasetSide, PairId, Placement};
use log::debug;
use serde::Serialize;

/// Result of feeding one placement into the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum PlacementOutcome {
    /// Stored in the side's pending slot; waiting for the other side.
    Pending(DatasetSide),
    /// Completed a join and appended a new pair.
    Committed(ControlPair),
    /// Completed a join that matched an existing pair exactly; nothing added.
    Duplicate,
}

/// The two pending slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PendingSlots {
    pub raw: Option<Coord>,
    #[serde(rename = "ref")]
    pub ref_: Option<Coord>,
}

impl PendingSlots {
    pub fn get(&self, side: DatasetSide) -> Option<Coord> {
        match side {
            DatasetSide::Raw => self.raw,
            DatasetSide::Ref => self.ref_,
        }
    }

    fn set(&mut self, side: DatasetSide, coord: Coord) {
        match side {
            DatasetSide::Raw => self.raw = Some(coord),
            DatasetSide::Ref => self.ref_ = Some(coord),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_none() && self.ref_.is_none()
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Debug)]
pub struct PairingController {
    pairs: Vec<ControlPair>,
    pending: PendingSlots,
    next_id: PairId,
    colors: ColorAllocator,
}

impl Default for PairingController {
    fn default() -> Self {
        Self::new(PaletteParams::default())
    }
}

impl PairingController {
    pub fn new(palette: PaletteParams) -> Self {
        Self {
            pairs: Vec::new(),
            pending: PendingSlots::default(),
            next_id: 0,
            colors: ColorAllocator::new(palette),
        }
    }

    pub fn pairs(&self) -> &[ControlPair] {
        &self.pairs
    }

    pub fn pending(&self) -> PendingSlots {
        self.pending
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, id: PairId) -> Option<&ControlPair> {
        self.pairs.iter().find(|p| p.id == id)
    }

    pub fn on_raw_placed(&mut self, coord: Coord) -> PlacementOutcome {
        self.on_placed(DatasetSide::Raw, coord)
    }

    pub fn on_ref_placed(&mut self, coord: Coord) -> PlacementOutcome {
        self.on_placed(DatasetSide::Ref, coord)
    }

    pub fn apply(&mut self, placement: Placement) -> PlacementOutcome {
        self.on_placed(placement.side, placement.coord)
    }

    pub fn on_placed(&mut self, side: DatasetSide, coord: Coord) -> PlacementOutcome {
        if let Some(stale) = self.pending.get(side) {
            debug!("Pairing: {side} pending {stale:?} replaced by {coord:?}");
        }
        self.pending.set(side, coord);
        match (self.pending.raw, self.pending.ref_) {
            (Some(raw), Some(ref_)) => self.commit(raw, ref_),
            _ => PlacementOutcome::Pending(side),
        }
    }

    fn commit(&mut self, raw: Coord, ref_: Coord) -> PlacementOutcome {
        self.pending.clear();
        if self.pairs.iter().any(|p| p.matches(&raw, &ref_)) {
            debug!("Pairing: duplicate pair raw={raw:?} ref={ref_:?} discarded");
            return PlacementOutcome::Duplicate;
        }
        let pair = ControlPair {
            id: self.next_id,
            color: self.colors.next_color(),
            raw,
            ref_,
        };
        self.next_id += 1;
        debug!(
            "Pairing: committed pair #{} raw={:?} ref={:?} color={}",
            pair.id,
            pair.raw,
            pair.ref_,
            pair.color.to_css()
        );
        self.pairs.push(pair.clone());
        PlacementOutcome::Committed(pair)
    }

    /// Removes the pair with `id`; other pairs and both counters are untouched.
    pub fn remove_pair(&mut self, id: PairId) -> Option<ControlPair> {
        let idx = self.pairs.iter().position(|p| p.id == id)?;
        let removed = self.pairs.remove(idx);
        debug!("Pairing: removed pair #{id}, {} left", self.pairs.len());
        Some(removed)
    }

    /// Back to the initial state: no pairs, no pending slots, counters at zero.
    pub fn reset(&mut self) {
        self.pairs.clear();
        self.pending.clear();
        self.next_id = 0;
        self.colors.reset();
    }

    /// Pairs reduced to `[raw, ref]` tuples, in list order.
    pub fn tuples(&self) -> Vec<[Coord; 2]> {
        self.pairs.iter().map(ControlPair::to_tuple).collect()
    }
}
