//! Parameter types configuring snapping, palette and submission rules.
//!
//! Defaults match the interactive tool: 20 px snapping, a 12-hue palette at
//! 70% saturation, and the transform's minimum of three control pairs.

use serde::{Deserialize, Serialize};

/// Minimum pair count the transform service accepts.
pub const MIN_TRANSFORM_PAIRS: usize = 3;

/// Pairing-wide parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingParams {
    /// Screen-space radius (pixels) within which placements snap to geometry.
    pub snap_tolerance_px: f64,
    /// Disables snapping entirely when false.
    pub snap_enabled: bool,
    pub palette: PaletteParams,
    /// Submission is blocked locally below this count.
    pub min_transform_pairs: usize,
}

impl Default for PairingParams {
    fn default() -> Self {
        Self {
            snap_tolerance_px: 20.0,
            snap_enabled: true,
            palette: PaletteParams::default(),
            min_transform_pairs: MIN_TRANSFORM_PAIRS,
        }
    }
}

/// Palette generator settings.
///
/// - `hue_steps`: equally spaced hue slots around the circle.
/// - `saturation`: constant saturation in percent.
/// - `lightness_tiers`: lightness values (percent) used in order, one tier
///   per full round of hues.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteParams {
    pub hue_steps: u32,
    pub saturation: f32,
    pub lightness_tiers: Vec<f32>,
}

impl Default for PaletteParams {
    fn default() -> Self {
        Self {
            hue_steps: 12,
            saturation: 70.0,
            lightness_tiers: vec![35.0, 50.0, 65.0, 75.0, 85.0],
        }
    }
}

impl PaletteParams {
    /// Replaces zero hue steps or an empty tier list with defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = PaletteParams::default();
        if self.hue_steps == 0 {
            self.hue_steps = defaults.hue_steps;
        }
        self.lightness_tiers.retain(|l| l.is_finite());
        if self.lightness_tiers.is_empty() {
            self.lightness_tiers = defaults.lightness_tiers;
        }
        if !self.saturation.is_finite() {
            self.saturation = defaults.saturation;
        }
        self
    }
}
