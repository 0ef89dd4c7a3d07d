// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use cartograph_gesture::RotationSnap;
use cartograph_gesture::tap::TapConfig;

/// Configuration of a [`MapControl`](crate::MapControl).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlConfig {
    /// Physical pixels per logical pixel of the host display.
    ///
    /// Touch positions and view sizes arrive in physical pixels and are
    /// divided by this before they reach the viewport. Values that are not
    /// positive and finite are treated as `1.0`.
    ///
    /// Default: `1.0`.
    pub pixel_density: f64,
    /// Rotation snapping of pinch gestures.
    pub rotation: RotationSnap,
    /// Tap recognition thresholds, in logical pixels and milliseconds.
    pub taps: TapConfig,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            pixel_density: 1.0,
            rotation: RotationSnap::default(),
            taps: TapConfig::default(),
        }
    }
}

impl ControlConfig {
    pub(crate) fn density(&self) -> f64 {
        if self.pixel_density > 0.0 && self.pixel_density.is_finite() {
            self.pixel_density
        } else {
            1.0
        }
    }
}
