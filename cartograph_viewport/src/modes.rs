// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// How panning is constrained relative to a limit box.
///
/// The limit box is either an explicit box from
/// [`ViewportLimits::pan_limits`](crate::ViewportLimits::pan_limits) or, when
/// that is absent, the data envelope of the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PanMode {
    /// Do not constrain the center; the view may move freely.
    Unlimited,
    /// Keep the whole visible rectangle inside the limit box.
    ///
    /// Along an axis where the visible rectangle is larger than the box the
    /// view is centered on the box instead.
    KeepWithinExtent,
    /// Keep only the center point inside the limit box.
    #[default]
    KeepCenterWithinExtent,
}

/// How the resolution (zoom level) is constrained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ZoomMode {
    /// Do not constrain the resolution.
    Unlimited,
    /// Clamp the resolution into the extremes of the allowed resolutions.
    #[default]
    KeepWithinResolutions,
    /// Like [`ZoomMode::KeepWithinResolutions`], but never zoom out beyond the
    /// resolution at which the data envelope still fills the whole screen.
    ///
    /// When both constraints cannot be met at once, the fill constraint is
    /// dropped and only the resolution extremes apply.
    KeepWithinResolutionsAndAlwaysFillViewport,
}
