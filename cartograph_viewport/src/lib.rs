// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cartograph Viewport: the map viewport model and its limits.
//!
//! This crate provides a small, headless model of which part of a map is
//! shown on screen. It focuses on:
//! - Viewport state: world‑space center, resolution (world units per
//!   pixel), clockwise rotation and screen size.
//! - Coordinate conversion between world and screen space.
//! - A combined pan + zoom + rotate step that keeps a pivot fixed on screen,
//!   which is what pointer gestures produce.
//! - Stateless limiting of resolution and pan against configured limits.
//!
//! It does **not** interpret pointer events or own any rendering backend.
//! Gesture recognition lives in `cartograph_gesture`; the map control in
//! `cartograph_control` wires both together.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use cartograph_viewport::{PanMode, Viewport, ViewportLimits, ZoomMode};
//!
//! let envelope = Some(Rect::new(0.0, 0.0, 1000.0, 500.0));
//! let mut viewport = Viewport::new();
//! assert!(viewport.try_initialize(envelope, 200.0, 100.0));
//! assert_eq!(viewport.resolution(), 5.0);
//!
//! // Drag the map 20 px to the right.
//! viewport.transform(Point::new(120.0, 50.0), Point::new(100.0, 50.0), 1.0, 0.0);
//! assert!((viewport.center().x - 400.0).abs() < 1e-9);
//!
//! // Keep the center within the data.
//! let limits = ViewportLimits {
//!     pan_mode: PanMode::KeepCenterWithinExtent,
//!     zoom_mode: ZoomMode::KeepWithinResolutions,
//!     resolutions: vec![10.0, 5.0, 2.5],
//!     ..ViewportLimits::default()
//! };
//! limits.limit(&mut viewport, envelope);
//!
//! // Convert a tap position into world space for hit testing.
//! let world = viewport.screen_to_world(Point::new(10.0, 10.0));
//! assert!((viewport.world_to_screen(world).x - 10.0).abs() < 1e-9);
//! ```
//!
//! ## Conventions
//!
//! - World Y points up, screen Y points down, the screen origin is top‑left.
//! - Rotation is in degrees, clockwise on screen, normalized to `(-180, 180]`.
//! - The resolution is always strictly positive; setters ignore values that
//!   would break this.
//!
//! This crate is `no_std` (with `alloc`).

#![no_std]

extern crate alloc;

mod limiter;
mod modes;
mod viewport;

pub use limiter::{
    ViewportLimits, ZoomLimits, limit, limit_extent, limit_resolution, zoom_in_resolution,
    zoom_out_resolution,
};
pub use modes::{PanMode, ZoomMode};
pub use viewport::{Viewport, ViewportDebugInfo, normalize_rotation};
