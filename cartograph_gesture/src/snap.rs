// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rotation snapping for pinch gestures.
//!
//! While the map points north, small twists during a pinch are ignored until
//! the accumulated twist reaches [`RotationSnap::unsnap_degrees`]. Once the
//! map is rotated, it follows the fingers freely, and snaps back to north
//! when the accumulated twist comes within [`RotationSnap::resnap_degrees`]
//! of zero.

/// Rotation snap configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationSnap {
    /// Accumulated twist, in degrees, needed to start rotating an unrotated map.
    ///
    /// Default: `30.0`.
    pub unsnap_degrees: f64,
    /// Twist, in degrees, within which a rotated map snaps back to north.
    ///
    /// Default: `5.0`.
    pub resnap_degrees: f64,
    /// Disables rotation entirely.
    ///
    /// Default: `false`.
    pub locked: bool,
}

impl Default for RotationSnap {
    fn default() -> Self {
        Self {
            unsnap_degrees: 30.0,
            resnap_degrees: 5.0,
            locked: false,
        }
    }
}

impl RotationSnap {
    /// Returns the rotation change to apply for an accumulated twist.
    ///
    /// `inner_rotation` is the unsnapped rotation the fingers describe (the
    /// viewport rotation when the pinch started plus the twist since);
    /// `current_rotation` is the viewport rotation now. Both are in degrees.
    #[must_use]
    pub fn rotation_delta(&self, inner_rotation: f64, current_rotation: f64) -> f64 {
        if self.locked {
            return 0.0;
        }
        if current_rotation == 0.0 {
            if inner_rotation.abs() >= self.unsnap_degrees.abs() {
                inner_rotation
            } else {
                0.0
            }
        } else if inner_rotation.abs() <= self.resnap_degrees.abs() {
            -current_rotation
        } else {
            inner_rotation - current_rotation
        }
    }
}
