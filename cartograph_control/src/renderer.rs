// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use cartograph_viewport::Viewport;
use peniko::Color;

use crate::error::ControlError;
use crate::layer::Layer;
use crate::widget::Widget;

/// Everything a renderer needs to draw one frame.
#[derive(Debug)]
pub struct Frame<'a> {
    /// Initialized viewport to draw through.
    pub viewport: &'a Viewport,
    /// Layers, bottom first. Disabled layers are included; skip them.
    pub layers: &'a [Box<dyn Layer>],
    /// Widgets, bottom first, drawn above all layers.
    pub widgets: &'a [Box<dyn Widget>],
    /// Color to clear to.
    pub background: Color,
    /// Physical pixels per logical pixel; scale the canvas by this.
    pub pixel_density: f64,
}

/// Draws the map onto a platform canvas.
pub trait Renderer {
    /// The drawing surface handed to [`MapControl::paint`](crate::MapControl::paint).
    type Canvas;

    /// Draws one frame.
    ///
    /// Only called with an initialized viewport.
    fn render(&mut self, canvas: &mut Self::Canvas, frame: &Frame<'_>) -> Result<(), ControlError>;
}
