//! JSON configuration for the pairing core and the replay tool.

pub mod pairing;
pub mod replay;

pub use pairing::{PaletteParams, PairingParams};
