#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod color;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod pairing;
pub mod session;
pub mod surface;
pub mod types;

// Building blocks used by the surfaces; public for tools and tests.
pub mod geometry;
pub mod io;
pub mod projection;
pub mod service;
pub mod viewport;

// --- High-level re-exports -------------------------------------------------

pub use crate::color::{ColorAllocator, PairColor};
pub use crate::config::PairingParams;
pub use crate::error::{Error, Result};
pub use crate::pairing::{PairingController, PendingSlots, PlacementOutcome};
pub use crate::session::GeorefSession;
pub use crate::surface::{render_markers, MapSurface, Marker, MarkerKind};
pub use crate::types::{ControlPair, Coord, DatasetSide, PairId, Placement};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use georef_pairing::prelude::*;
///
/// let mut session = GeorefSession::new(PairingParams::default(), 800.0, 600.0);
/// session.place(DatasetSide::Raw, [10.0, 20.0]);
/// let outcome = session.place(DatasetSide::Ref, [45.0, -93.0]);
/// assert!(matches!(outcome, PlacementOutcome::Committed(_)));
/// assert_eq!(session.pairs()[0].id, 0);
/// ```
pub mod prelude {
    pub use crate::{
        ControlPair, DatasetSide, GeorefSession, PairingController, PairingParams,
        PlacementOutcome,
    };
}
