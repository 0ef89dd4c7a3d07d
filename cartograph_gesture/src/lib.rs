// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cartograph Gesture: touch gesture state for map viewports.
//!
//! This crate turns a raw multi-pointer touch stream into viewport steps. It
//! does not own the viewport; callers feed each event's pointer positions
//! together with the current rotation and apply the returned step.
//!
//! - [`GestureTracker`]: one pointer pans; two or more pointers pan, zoom
//!   around their centroid and rotate with snapping (see [`RotationSnap`]).
//! - [`tap`]: single and double tap recognition, kept separate from the
//!   tracker so hosts that have their own tap detection can skip it.
//!
//! ## Pinch example
//!
//! ```rust
//! use cartograph_gesture::{GestureTracker, GestureUpdate, TouchAction};
//! use cartograph_viewport::Viewport;
//! use kurbo::{Point, Rect};
//!
//! let mut viewport = Viewport::new();
//! viewport.try_initialize(Some(Rect::new(0.0, 0.0, 400.0, 400.0)), 200.0, 200.0);
//! let mut tracker = GestureTracker::default();
//!
//! let start = [Point::new(80.0, 100.0), Point::new(120.0, 100.0)];
//! tracker.handle(TouchAction::Down, &start[..1], viewport.rotation());
//! tracker.handle(TouchAction::PointerDown(1), &start, viewport.rotation());
//!
//! // Fingers spread to twice the distance: zoom in by a factor of two.
//! let spread = [Point::new(60.0, 100.0), Point::new(140.0, 100.0)];
//! if let GestureUpdate::Pinch(delta) =
//!     tracker.handle(TouchAction::Move, &spread, viewport.rotation())
//! {
//!     delta.apply_to(&mut viewport);
//! }
//! assert!((viewport.resolution() - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` debug events on gesture mode changes.
//!
//! This crate is `no_std`.

#![no_std]

mod log;
mod pinch;
mod snap;
pub mod tap;
mod tracker;

pub use pinch::PinchValues;
pub use snap::RotationSnap;
pub use tracker::{GestureTracker, GestureUpdate, TouchAction, TouchMode, ViewportDelta};
