// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

/// Geometry of a multi-pointer touch at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchValues {
    /// Centroid of all pointers, in screen coordinates.
    pub center: Point,
    /// Mean distance of the pointers from the centroid.
    pub radius: f64,
    /// Angle in degrees of the line from the first to the second pointer,
    /// measured clockwise from the screen X axis.
    pub angle: f64,
}

impl PinchValues {
    /// Computes pinch values over `pointers`.
    ///
    /// Returns `None` with fewer than two pointers.
    #[must_use]
    pub fn from_pointers(pointers: &[Point]) -> Option<Self> {
        let [first, second, ..] = pointers else {
            return None;
        };
        let count = pointers.len() as f64;
        let sum = pointers.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
        let center = (sum / count).to_point();
        let radius = pointers.iter().map(|p| (*p - center).hypot()).sum::<f64>() / count;
        let angle = (*second - *first).atan2().to_degrees();
        Some(Self {
            center,
            radius,
            angle,
        })
    }
}
