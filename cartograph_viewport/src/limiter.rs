// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan and zoom limiting.
//!
//! The functions here are stateless: they look at a proposed [`Viewport`]
//! state and pull it back inside the configured limits. Resolution is always
//! limited before the extent, because the visible extent depends on the
//! resolution.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::Viewport;
use crate::modes::{PanMode, ZoomMode};

/// Inclusive range of allowed resolutions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLimits {
    /// Smallest allowed resolution (most zoomed in).
    pub min: f64,
    /// Largest allowed resolution (most zoomed out).
    pub max: f64,
}

impl ZoomLimits {
    /// Creates a range from two bounds in any order.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Returns the extremes of a resolution sequence.
    ///
    /// Entries that are not positive and finite are skipped. Returns `None`
    /// when no usable entry remains.
    #[must_use]
    pub fn from_resolutions(resolutions: &[f64]) -> Option<Self> {
        let mut usable = resolutions
            .iter()
            .copied()
            .filter(|r| *r > 0.0 && r.is_finite());
        let first = usable.next()?;
        Some(usable.fold(Self::new(first, first), |acc, r| Self {
            min: acc.min.min(r),
            max: acc.max.max(r),
        }))
    }

    /// Clamps `resolution` into the range. `NaN` maps to `min`.
    #[must_use]
    pub fn clamp(&self, resolution: f64) -> f64 {
        if resolution.is_nan() || resolution < self.min {
            self.min
        } else if resolution > self.max {
            self.max
        } else {
            resolution
        }
    }
}

/// Pan and zoom limit configuration of a map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewportLimits {
    /// How the center is kept near the limit box.
    pub pan_mode: PanMode,
    /// Explicit pan limit box; when `None` the data envelope is used.
    pub pan_limits: Option<Rect>,
    /// How the resolution is limited.
    pub zoom_mode: ZoomMode,
    /// Explicit resolution range; when `None` the extremes of
    /// [`ViewportLimits::resolutions`] are used.
    pub zoom_limits: Option<ZoomLimits>,
    /// Allowed resolutions, typically the tile pyramid of the base layer.
    pub resolutions: Vec<f64>,
}

impl ViewportLimits {
    /// Applies [`limit`] with this configuration.
    pub fn limit(&self, viewport: &mut Viewport, envelope: Option<Rect>) {
        limit(
            viewport,
            self.zoom_mode,
            self.zoom_limits,
            &self.resolutions,
            self.pan_mode,
            self.pan_limits,
            envelope,
        );
    }

    /// Applies [`limit_extent`] with this configuration.
    pub fn limit_extent(&self, viewport: &mut Viewport, envelope: Option<Rect>) {
        limit_extent(viewport, self.pan_mode, self.pan_limits, envelope);
    }
}

/// Limits resolution, then extent.
///
/// See [`limit_resolution`] and [`limit_extent`].
pub fn limit(
    viewport: &mut Viewport,
    zoom_mode: ZoomMode,
    zoom_limits: Option<ZoomLimits>,
    resolutions: &[f64],
    pan_mode: PanMode,
    pan_limits: Option<Rect>,
    envelope: Option<Rect>,
) {
    let resolution = limit_resolution(
        viewport.resolution(),
        viewport.width(),
        viewport.height(),
        zoom_mode,
        zoom_limits,
        resolutions,
        envelope,
    );
    viewport.set_resolution(resolution);
    limit_extent(viewport, pan_mode, pan_limits, envelope);
}

/// Returns `resolution` limited according to `zoom_mode`.
///
/// `zoom_limits` takes precedence over the extremes of `resolutions`. When
/// neither yields a range the input is returned unchanged. `width`/`height`
/// are the screen size and only matter for
/// [`ZoomMode::KeepWithinResolutionsAndAlwaysFillViewport`].
#[must_use]
pub fn limit_resolution(
    resolution: f64,
    width: f64,
    height: f64,
    zoom_mode: ZoomMode,
    zoom_limits: Option<ZoomLimits>,
    resolutions: &[f64],
    envelope: Option<Rect>,
) -> f64 {
    if zoom_mode == ZoomMode::Unlimited {
        return resolution;
    }
    let Some(mut extremes) = zoom_limits.or_else(|| ZoomLimits::from_resolutions(resolutions))
    else {
        return resolution;
    };

    // When filling would need a resolution below the minimum, both limits
    // cannot be met at once and the resolution extremes win.
    if zoom_mode == ZoomMode::KeepWithinResolutionsAndAlwaysFillViewport
        && let Some(fill) = envelope.and_then(|e| filling_resolution(e.abs(), width, height))
        && fill >= extremes.min
    {
        extremes.max = extremes.max.min(fill);
    }

    extremes.clamp(resolution)
}

/// Resolution at which `envelope` covers the whole screen.
fn filling_resolution(envelope: Rect, width: f64, height: f64) -> Option<f64> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let fill = (envelope.width() / width).min(envelope.height() / height);
    (fill > 0.0 && fill.is_finite()).then_some(fill)
}

/// Moves the viewport center so the view respects `pan_mode`.
///
/// The limit box is `pan_limits` if given, otherwise `envelope`. Without
/// either the viewport is left unchanged.
pub fn limit_extent(
    viewport: &mut Viewport,
    pan_mode: PanMode,
    pan_limits: Option<Rect>,
    envelope: Option<Rect>,
) {
    let Some(bounds) = pan_limits.or(envelope).map(|b| b.abs()) else {
        return;
    };
    if !bounds.is_finite() {
        return;
    }
    let center = viewport.center();
    let limited = match pan_mode {
        PanMode::Unlimited => return,
        PanMode::KeepCenterWithinExtent => Point::new(
            center.x.clamp(bounds.x0, bounds.x1),
            center.y.clamp(bounds.y0, bounds.y1),
        ),
        PanMode::KeepWithinExtent => {
            let extent = viewport.extent();
            Point::new(
                center.x + axis_shift(extent.x0, extent.x1, bounds.x0, bounds.x1),
                center.y + axis_shift(extent.y0, extent.y1, bounds.y0, bounds.y1),
            )
        }
    };
    viewport.set_center(limited);
}

/// Shift along one axis that moves `[lo, hi]` inside `[min, max]`, or centers
/// it on `[min, max]` when it does not fit.
fn axis_shift(lo: f64, hi: f64, min: f64, max: f64) -> f64 {
    if hi - lo >= max - min {
        (min + max) * 0.5 - (lo + hi) * 0.5
    } else if lo < min {
        min - lo
    } else if hi > max {
        max - hi
    } else {
        0.0
    }
}

/// Next resolution when zooming in one step.
///
/// Picks the largest entry of `resolutions` that is smaller than `current`;
/// without one, halves `current`.
#[must_use]
pub fn zoom_in_resolution(resolutions: &[f64], current: f64) -> f64 {
    let threshold = current * (1.0 - 1e-9);
    resolutions
        .iter()
        .copied()
        .filter(|r| *r > 0.0 && *r < threshold)
        .reduce(f64::max)
        .unwrap_or(current * 0.5)
}

/// Next resolution when zooming out one step.
///
/// Picks the smallest entry of `resolutions` that is larger than `current`;
/// without one, doubles `current`.
#[must_use]
pub fn zoom_out_resolution(resolutions: &[f64], current: f64) -> f64 {
    let threshold = current * (1.0 + 1e-9);
    resolutions
        .iter()
        .copied()
        .filter(|r| r.is_finite() && *r > threshold)
        .reduce(f64::min)
        .unwrap_or(current * 2.0)
}
