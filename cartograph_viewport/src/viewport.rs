// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Vec2};

/// Normalizes an angle in degrees into the half-open range `(-180, 180]`.
///
/// Non-finite input yields `0.0`.
#[must_use]
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let mut r = degrees % 360.0;
    if r > 180.0 {
        r -= 360.0;
    } else if r <= -180.0 {
        r += 360.0;
    }
    r
}

/// Map viewport: which part of the world is shown on a screen of a given size.
///
/// The state is a world‑space `center`, a `resolution` in world units per
/// screen pixel, a clockwise `rotation` in degrees and the screen size in
/// pixels. World Y points up, screen Y points down; the screen origin is the
/// top‑left corner.
///
/// A viewport starts uninitialized. [`Viewport::try_initialize`] fits a data
/// envelope to the screen once both are known; after that the viewport is
/// mutated by [`Viewport::transform`] and the setters.
#[derive(Clone, Debug)]
pub struct Viewport {
    center: Point,
    resolution: f64,
    rotation: f64,
    width: f64,
    height: f64,
    initialized: bool,
    world_to_screen: Affine,
    screen_to_world: Affine,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Creates an uninitialized viewport.
    ///
    /// - Center is the world origin.
    /// - Resolution is `1.0`, rotation is `0.0`.
    /// - Screen size is `0 x 0`.
    #[must_use]
    pub fn new() -> Self {
        let mut vp = Self {
            center: Point::ORIGIN,
            resolution: 1.0,
            rotation: 0.0,
            width: 0.0,
            height: 0.0,
            initialized: false,
            world_to_screen: Affine::IDENTITY,
            screen_to_world: Affine::IDENTITY,
        };
        vp.rebuild_transforms();
        vp
    }

    /// Fits `envelope` into a screen of `width` x `height` pixels.
    ///
    /// Returns `false` without changing anything when the viewport is already
    /// initialized, when the screen size is not positive, or when the
    /// envelope is missing or degenerate. On success the resolution is chosen
    /// so the whole envelope is visible and the center is its centroid.
    pub fn try_initialize(&mut self, envelope: Option<Rect>, width: f64, height: f64) -> bool {
        if self.initialized {
            return false;
        }
        if width <= 0.0 || height <= 0.0 || !width.is_finite() || !height.is_finite() {
            return false;
        }
        let Some(envelope) = envelope.map(|r| r.abs()) else {
            return false;
        };
        let resolution = (envelope.width() / width).max(envelope.height() / height);
        if resolution <= 0.0 || !resolution.is_finite() {
            return false;
        }
        let center = envelope.center();
        if !center.is_finite() {
            return false;
        }

        self.width = width;
        self.height = height;
        self.resolution = resolution;
        self.center = center;
        self.initialized = true;
        self.rebuild_transforms();
        true
    }

    /// Returns `true` once [`Viewport::try_initialize`] has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the world‑space center.
    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Sets the world‑space center. Non‑finite points are ignored.
    pub fn set_center(&mut self, center: Point) {
        if !center.is_finite() || self.center == center {
            return;
        }
        self.center = center;
        self.rebuild_transforms();
    }

    /// Returns the resolution in world units per screen pixel.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Sets the resolution.
    ///
    /// Values that are not strictly positive and finite are ignored so that
    /// the resolution always stays positive.
    pub fn set_resolution(&mut self, resolution: f64) {
        if resolution <= 0.0 || !resolution.is_finite() || self.resolution == resolution {
            return;
        }
        self.resolution = resolution;
        self.rebuild_transforms();
    }

    /// Returns the clockwise rotation in degrees, in `(-180, 180]`.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Sets the rotation in degrees; the value is normalized into `(-180, 180]`.
    pub fn set_rotation(&mut self, degrees: f64) {
        let rotation = normalize_rotation(degrees);
        if self.rotation == rotation {
            return;
        }
        self.rotation = rotation;
        self.rebuild_transforms();
    }

    /// Returns the screen width in pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the screen height in pixels.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Sets the screen size in pixels.
    ///
    /// Negative or non‑finite sizes are stored as zero. The center and
    /// resolution are kept, so the visible world extent grows or shrinks
    /// around the center.
    pub fn set_size(&mut self, width: f64, height: f64) {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.rebuild_transforms();
    }

    /// Applies a combined pan, zoom and rotation step.
    ///
    /// The world point that was under `previous` on screen ends up under
    /// `position`. Zoom (`scale_factor`, new resolution is
    /// `resolution / scale_factor`) and rotation (`rotation_delta`, degrees
    /// clockwise) are then applied around `position`, which keeps that world
    /// point fixed on screen.
    ///
    /// A non‑finite or non‑positive `scale_factor` is treated as `1.0` and a
    /// non‑finite `rotation_delta` as `0.0`.
    pub fn transform(
        &mut self,
        position: Point,
        previous: Point,
        scale_factor: f64,
        rotation_delta: f64,
    ) {
        if !position.is_finite() || !previous.is_finite() {
            return;
        }
        let scale_factor = if scale_factor > 0.0 && scale_factor.is_finite() {
            scale_factor
        } else {
            1.0
        };
        let rotation_delta = if rotation_delta.is_finite() {
            rotation_delta
        } else {
            0.0
        };

        // Pan: the world point under `previous` moves to `position`.
        let anchor = self.screen_to_world(previous);
        let pan = anchor - self.screen_to_world(position);
        self.center += pan;
        self.rebuild_transforms();

        if scale_factor == 1.0 && rotation_delta == 0.0 {
            return;
        }

        let resolution = self.resolution / scale_factor;
        if resolution > 0.0 && resolution.is_finite() {
            self.resolution = resolution;
        }
        self.rotation = normalize_rotation(self.rotation + rotation_delta);
        self.rebuild_transforms();

        // Pivot: shift the center so `anchor` is under `position` again.
        let drift = anchor - self.screen_to_world(position);
        self.center += drift;
        self.rebuild_transforms();
    }

    /// Converts a world‑space point into screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, pt: Point) -> Point {
        self.world_to_screen * pt
    }

    /// Converts a screen point into world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, pt: Point) -> Point {
        self.screen_to_world * pt
    }

    /// Returns the world → screen affine transform.
    #[must_use]
    pub fn world_to_screen_transform(&self) -> Affine {
        self.world_to_screen
    }

    /// Converts a world‑space rectangle into its screen‑space bounding box.
    #[must_use]
    pub fn world_to_screen_rect(&self, rect: Rect) -> Rect {
        self.world_to_screen.transform_rect_bbox(rect.abs())
    }

    /// Converts a screen rectangle into its world‑space bounding box.
    #[must_use]
    pub fn screen_to_world_rect(&self, rect: Rect) -> Rect {
        self.screen_to_world.transform_rect_bbox(rect.abs())
    }

    /// Returns the world‑space bounding box of the visible screen.
    ///
    /// With a non‑zero rotation this box is larger than the screen footprint.
    #[must_use]
    pub fn extent(&self) -> Rect {
        self.screen_to_world_rect(Rect::new(0.0, 0.0, self.width, self.height))
    }

    /// Snapshot of the current viewport state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        ViewportDebugInfo {
            center: self.center,
            resolution: self.resolution,
            rotation: self.rotation,
            width: self.width,
            height: self.height,
            initialized: self.initialized,
            extent: self.extent(),
        }
    }

    fn rebuild_transforms(&mut self) {
        let screen_center = Vec2::new(self.width * 0.5, self.height * 0.5);
        let scale = 1.0 / self.resolution;
        // World → screen: move center to origin, scale with Y flip, rotate
        // clockwise on screen, then move into the middle of the screen.
        self.world_to_screen = Affine::translate(screen_center)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(scale, -scale)
            * Affine::translate(-self.center.to_vec2());
        self.screen_to_world = self.world_to_screen.inverse();
    }
}

/// Debug snapshot of a [`Viewport`] state.
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// World‑space center.
    pub center: Point,
    /// World units per screen pixel.
    pub resolution: f64,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
    /// Screen width in pixels.
    pub width: f64,
    /// Screen height in pixels.
    pub height: f64,
    /// Whether the viewport has been initialized.
    pub initialized: bool,
    /// World‑space bounding box of the visible screen.
    pub extent: Rect,
}
