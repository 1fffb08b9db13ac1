//! Screen ⇄ display-projection mapping for one map surface.
//!
//! Screen pixels have their origin at the top-left with `y` growing down;
//! display coordinates are projected map units with `y` growing up. The
//! mapping is a pure scale + translation parameterised by the view centre
//! and the resolution (map units per pixel).

use crate::types::Coord;
use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

/// Padding (pixels) left around an extent when fitting the view.
pub const FIT_PADDING_PX: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub center: Coord,
    /// Map units per screen pixel (>0).
    pub resolution: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            center: [0.0, 0.0],
            resolution: 1.0,
        }
    }

    /// Screen → display homogeneous transform.
    pub fn screen_to_display_matrix(&self) -> Matrix3<f64> {
        let r = self.resolution;
        Matrix3::new(
            r,
            0.0,
            self.center[0] - 0.5 * self.width * r,
            0.0,
            -r,
            self.center[1] + 0.5 * self.height * r,
            0.0,
            0.0,
            1.0,
        )
    }

    /// Display → screen homogeneous transform.
    pub fn display_to_screen_matrix(&self) -> Matrix3<f64> {
        let inv = 1.0 / self.resolution;
        Matrix3::new(
            inv,
            0.0,
            0.5 * self.width - self.center[0] * inv,
            0.0,
            -inv,
            0.5 * self.height + self.center[1] * inv,
            0.0,
            0.0,
            1.0,
        )
    }

    #[inline]
    pub fn screen_to_display(&self, screen: Coord) -> Coord {
        apply(&self.screen_to_display_matrix(), screen)
    }

    #[inline]
    pub fn display_to_screen(&self, display: Coord) -> Coord {
        apply(&self.display_to_screen_matrix(), display)
    }

    /// Centres the view on `extent` (`[minX, minY, maxX, maxY]`, display
    /// units) and picks the resolution that shows all of it. Degenerate
    /// extents only recentre.
    pub fn fit(&mut self, extent: [f64; 4]) {
        let [min_x, min_y, max_x, max_y] = extent;
        self.center = [0.5 * (min_x + max_x), 0.5 * (min_y + max_y)];
        let avail_w = (self.width - 2.0 * FIT_PADDING_PX).max(1.0);
        let avail_h = (self.height - 2.0 * FIT_PADDING_PX).max(1.0);
        let res = ((max_x - min_x) / avail_w).max((max_y - min_y) / avail_h);
        if res.is_finite() && res > 0.0 {
            self.resolution = res;
        }
    }
}

#[inline]
fn apply(m: &Matrix3<f64>, p: Coord) -> Coord {
    let v = m * Vector3::new(p[0], p[1], 1.0);
    [v[0] / v[2], v[1] / v[2]]
}
