// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;

/// Result of an info query triggered by a tap.
#[derive(Clone, Debug, PartialEq)]
pub struct MapInfo {
    /// Tap position in logical screen pixels.
    pub screen_position: Point,
    /// Tap position in world coordinates.
    pub world_position: Point,
    /// Resolution at the time of the tap.
    pub resolution: f64,
    /// `1` for a single tap, `2` for a double tap.
    pub tap_count: u8,
    /// Name of the layer holding the hit feature, if any.
    pub layer: Option<String>,
    /// Index of the hit feature within that layer.
    pub feature_index: Option<usize>,
}

impl MapInfo {
    /// Returns `true` if a feature was hit.
    pub fn is_hit(&self) -> bool {
        self.feature_index.is_some()
    }
}
