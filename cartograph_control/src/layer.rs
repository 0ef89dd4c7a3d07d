// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Map layers and feature hit testing.

use std::fmt;

use kurbo::{Point, Rect};

/// What the map shows after a committed viewport change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewChange {
    /// World‑space bounding box of the visible screen.
    pub extent: Rect,
    /// World units per logical pixel.
    pub resolution: f64,
    /// `true` when the change came from the user or from (re)initialization,
    /// which providers treat as a reason to refetch.
    pub user_interacted: bool,
}

/// A layer of the map, as seen by the control.
///
/// Rendering is left to the [`Renderer`](crate::Renderer); the control only
/// needs to tell layers about view changes and ask them for features under a
/// tap.
pub trait Layer {
    /// Layer name, used to pick info layers.
    fn name(&self) -> &str;

    /// Disabled layers are neither drawn nor queried.
    fn enabled(&self) -> bool {
        true
    }

    /// Opacity in `0.0..=1.0`.
    fn opacity(&self) -> f64 {
        1.0
    }

    /// Enables or disables the layer.
    ///
    /// Layers that are always shown ignore this.
    fn set_enabled(&mut self, _enabled: bool) {}

    /// Sets the opacity.
    ///
    /// Layers that are always opaque ignore this.
    fn set_opacity(&mut self, _opacity: f64) {}

    /// World‑space bounding box of the layer data, if known.
    fn envelope(&self) -> Option<Rect> {
        None
    }

    /// The view changed; data providers refetch for the new extent here.
    fn view_changed(&mut self, _change: &ViewChange) {}

    /// Index of the topmost feature hit at `world_position`, if any.
    fn feature_at(&self, _world_position: Point, _resolution: f64) -> Option<usize> {
        None
    }
}

impl fmt::Debug for dyn Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("name", &self.name())
            .field("enabled", &self.enabled())
            .finish_non_exhaustive()
    }
}

/// Decides whether a world position hits a feature.
///
/// Closures of the shape `Fn(Point, &F, f64) -> bool` implement this trait.
pub trait FeatureHitTest<F: ?Sized> {
    /// Returns `true` if `world_position` hits `feature` at `resolution`
    /// world units per pixel.
    fn is_hit(&self, world_position: Point, feature: &F, resolution: f64) -> bool;
}

impl<F: ?Sized, T> FeatureHitTest<F> for T
where
    T: Fn(Point, &F, f64) -> bool,
{
    fn is_hit(&self, world_position: Point, feature: &F, resolution: f64) -> bool {
        self(world_position, feature, resolution)
    }
}

/// Something with a world‑space bounding box.
pub trait Bounded {
    /// World‑space bounding box.
    fn bounds(&self) -> Rect;
}

impl Bounded for Rect {
    fn bounds(&self) -> Rect {
        self.abs()
    }
}

impl Bounded for Point {
    fn bounds(&self) -> Rect {
        Rect::from_points(*self, *self)
    }
}

/// Hits features whose bounding box, grown by a pixel tolerance, contains
/// the position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundsHitTest {
    /// Tolerance in logical pixels.
    pub tolerance: f64,
}

impl Default for BoundsHitTest {
    fn default() -> Self {
        Self { tolerance: 4.0 }
    }
}

impl<F: Bounded> FeatureHitTest<F> for BoundsHitTest {
    fn is_hit(&self, world_position: Point, feature: &F, resolution: f64) -> bool {
        let margin = self.tolerance.max(0.0) * resolution;
        feature.bounds().inflate(margin, margin).contains(world_position)
    }
}

/// Layer over features held in memory.
pub struct MemoryLayer<F, H = BoundsHitTest> {
    name: String,
    features: Vec<F>,
    hit_test: H,
    enabled: bool,
    opacity: f64,
    last_change: Option<ViewChange>,
}

impl<F: Bounded> MemoryLayer<F> {
    /// Creates a layer hit tested by feature bounds.
    pub fn new(name: impl Into<String>, features: Vec<F>) -> Self {
        Self::with_hit_test(name, features, BoundsHitTest::default())
    }
}

impl<F, H: FeatureHitTest<F>> MemoryLayer<F, H> {
    /// Creates a layer with a custom hit test.
    pub fn with_hit_test(name: impl Into<String>, features: Vec<F>, hit_test: H) -> Self {
        Self {
            name: name.into(),
            features,
            hit_test,
            enabled: true,
            opacity: 1.0,
            last_change: None,
        }
    }

    /// Returns the features.
    pub fn features(&self) -> &[F] {
        &self.features
    }

    /// Returns the most recent view change the layer was told about.
    pub fn last_change(&self) -> Option<ViewChange> {
        self.last_change
    }
}

impl<F, H> fmt::Debug for MemoryLayer<F, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryLayer")
            .field("name", &self.name)
            .field("features", &self.features.len())
            .field("enabled", &self.enabled)
            .field("opacity", &self.opacity)
            .finish_non_exhaustive()
    }
}

impl<F: Bounded, H: FeatureHitTest<F>> Layer for MemoryLayer<F, H> {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn opacity(&self) -> f64 {
        self.opacity
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Clamps into `0.0..=1.0`; NaN means fully opaque.
    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
    }

    fn envelope(&self) -> Option<Rect> {
        self.features
            .iter()
            .map(Bounded::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    fn view_changed(&mut self, change: &ViewChange) {
        self.last_change = Some(*change);
    }

    fn feature_at(&self, world_position: Point, resolution: f64) -> Option<usize> {
        // Later features are drawn on top, so they win.
        self.features
            .iter()
            .rposition(|f| self.hit_test.is_hit(world_position, f, resolution))
    }
}
