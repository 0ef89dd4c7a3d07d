// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen‑space widgets drawn on top of the map.

use std::fmt;

use kurbo::{Point, Rect};

/// A widget placed in screen coordinates, above all layers.
///
/// Widgets get the first chance to handle a tap; a tap on a widget never
/// reaches the layers.
pub trait Widget {
    /// Screen‑space bounds in logical pixels.
    fn envelope(&self) -> Rect;

    /// The widget was tapped at `position`.
    fn handle_touched(&mut self, position: Point, tap_count: u8);

    /// Link to open when the widget is tapped, if any.
    fn url(&self) -> Option<&str> {
        None
    }
}

impl fmt::Debug for dyn Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("envelope", &self.envelope())
            .finish_non_exhaustive()
    }
}

/// A text label that opens a link when tapped.
#[derive(Clone, Debug, PartialEq)]
pub struct Hyperlink {
    /// Text drawn by the renderer.
    pub text: String,
    /// Link target.
    pub url: String,
    /// Screen‑space bounds in logical pixels.
    pub envelope: Rect,
}

impl Widget for Hyperlink {
    fn envelope(&self) -> Rect {
        self.envelope
    }

    fn handle_touched(&mut self, _position: Point, _tap_count: u8) {}

    fn url(&self) -> Option<&str> {
        Some(&self.url)
    }
}
