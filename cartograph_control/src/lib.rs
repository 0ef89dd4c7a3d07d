// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cartograph Control: a platform‑neutral map control.
//!
//! [`MapControl`] glues a [`Map`] (viewport, layers, widgets and navigation
//! limits) to a host toolkit. The host forwards raw touch events, view sizes
//! and paint requests; the control turns touches into pans, pinches and info
//! taps, keeps the viewport within its limits, tells layers when the view
//! changed and asks a [`Renderer`] to draw.
//!
//! Everything runs on the UI thread. Data providers working in the
//! background report through a [`RepaintHandle`], whose requests are
//! marshaled onto the UI thread by a [`UiDispatcher`] and picked up by
//! [`MapControl::process_pending`]. A host whose event loop sleeps passes a
//! [`UiWaker`] to [`MapControl::with_waker`] to learn when to drain or paint.
//!
//! Single taps are held back until no double tap can follow; the host calls
//! [`MapControl::tick`] once [`MapControl::tap_deadline`] has passed.
//!
//! ## Minimal example
//!
//! ```rust
//! use cartograph_control::{
//!     ControlConfig, ControlError, Frame, MapControl, MemoryLayer, Renderer, TouchEvent,
//! };
//! use cartograph_gesture::TouchAction;
//! use kurbo::{Point, Rect};
//!
//! #[derive(Debug, Default)]
//! struct Counting(usize);
//!
//! impl Renderer for Counting {
//!     type Canvas = ();
//!     fn render(&mut self, _: &mut (), _: &Frame<'_>) -> Result<(), ControlError> {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut control = MapControl::new(Counting::default(), ControlConfig::default());
//! control
//!     .map_mut()
//!     .add_layer(MemoryLayer::new("parcels", vec![Rect::new(0.0, 0.0, 1000.0, 500.0)]));
//! control.set_size(200.0, 100.0);
//! assert_eq!(control.viewport().resolution(), 5.0);
//!
//! // Drag 20 pixels to the right: the map moves 100 world units west.
//! for (action, x, t) in [(TouchAction::Down, 100.0, 0), (TouchAction::Move, 120.0, 16)] {
//!     let pointers = [Point::new(x, 50.0)];
//!     control.handle_touch(&TouchEvent { action, pointers: &pointers, time_ms: t });
//! }
//! assert!((control.viewport().center().x - 400.0).abs() < 1e-9);
//!
//! assert!(control.needs_repaint());
//! control.paint(&mut ()).unwrap();
//! assert_eq!(control.renderer().0, 1);
//! ```

mod config;
mod control;
mod dispatch;
mod error;
mod info;
mod layer;
mod map;
mod renderer;
mod repaint;
mod widget;

pub use config::ControlConfig;
pub use control::{MapControl, TouchEvent};
pub use dispatch::{UiDispatcher, UiHandle, UiWaker};
pub use error::{ControlError, FetchError};
pub use info::MapInfo;
pub use layer::{Bounded, BoundsHitTest, FeatureHitTest, Layer, MemoryLayer, ViewChange};
pub use map::Map;
pub use renderer::{Frame, Renderer};
pub use repaint::RepaintHandle;
pub use widget::{Hyperlink, Widget};
