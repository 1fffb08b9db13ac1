//! Deterministic per-pair colors.
//!
//! The hue circle is split into `hue_steps` equally spaced slots. Request `n`
//! takes hue slot `n % hue_steps` and lightness tier `n / hue_steps` (cycling
//! through the tier list), so the first `hue_steps` colors never share a hue.
//! Saturation is constant. The counter only grows: removing a pair never
//! frees its color.

use crate::config::pairing::PaletteParams;
use palette::{FromColor, Hsl, Srgb};
use serde::{Deserialize, Serialize};

/// HSL color assigned to a control pair. Hue in degrees, saturation and
/// lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairColor {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl PairColor {
    /// CSS functional notation, e.g. `hsl(30, 70%, 50%)`.
    pub fn to_css(&self) -> String {
        format!(
            "hsl({}, {}%, {}%)",
            trim_float(self.hue),
            trim_float(self.saturation),
            trim_float(self.lightness)
        )
    }

    /// `[r, g, b]` in 8-bit sRGB.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let hsl: Hsl = Hsl::new(
            self.hue,
            (self.saturation / 100.0).clamp(0.0, 1.0),
            (self.lightness / 100.0).clamp(0.0, 1.0),
        );
        let rgb: Srgb = Srgb::from_color(hsl);
        let rgb8: Srgb<u8> = rgb.into_format();
        [rgb8.red, rgb8.green, rgb8.blue]
    }

    /// `#rrggbb` hex string.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

fn trim_float(v: f32) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}

/// Issues the next color on every call.
#[derive(Clone, Debug)]
pub struct ColorAllocator {
    params: PaletteParams,
    counter: u64,
}

impl Default for ColorAllocator {
    fn default() -> Self {
        Self::new(PaletteParams::default())
    }
}

impl ColorAllocator {
    pub fn new(params: PaletteParams) -> Self {
        Self {
            params: params.sanitized(),
            counter: 0,
        }
    }

    /// Number of colors issued so far.
    pub fn issued(&self) -> u64 {
        self.counter
    }

    pub fn params(&self) -> &PaletteParams {
        &self.params
    }

    /// Color for the `n`-th allocation, without touching the counter.
    pub fn color_at(&self, n: u64) -> PairColor {
        let steps = self.params.hue_steps as u64;
        let slot = n % steps;
        let tier = (n / steps) as usize % self.params.lightness_tiers.len();
        PairColor {
            hue: slot as f32 * (360.0 / steps as f32),
            saturation: self.params.saturation,
            lightness: self.params.lightness_tiers[tier],
        }
    }

    pub fn next_color(&mut self) -> PairColor {
        let color = self.color_at(self.counter);
        self.counter += 1;
        color
    }

    /// Restart from the first color.
    pub fn reset(&mut self) {
        self.counter = 0;
    }
}
