// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The map model: viewport, layers, widgets and navigation limits.

use std::fmt;

use cartograph_viewport::{Viewport, ViewportLimits};
use kurbo::{Point, Rect};
use peniko::Color;

use crate::info::MapInfo;
use crate::layer::{Layer, ViewChange};
use crate::widget::Widget;

type ViewChangedListener = Box<dyn FnMut(&ViewChange)>;

/// What the control shows and how far the user may navigate.
pub struct Map {
    viewport: Viewport,
    envelope: Option<Rect>,
    layers: Vec<Box<dyn Layer>>,
    widgets: Vec<Box<dyn Widget>>,
    info_layers: Vec<String>,
    limits: ViewportLimits,
    background: Color,
    listeners: Vec<ViewChangedListener>,
}

impl Default for Map {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(),
            envelope: None,
            layers: Vec::new(),
            widgets: Vec::new(),
            info_layers: Vec::new(),
            limits: ViewportLimits::default(),
            background: Color::WHITE,
            listeners: Vec::new(),
        }
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("viewport", &self.viewport)
            .field("envelope", &self.envelope)
            .field("layers", &self.layers)
            .field("widgets", &self.widgets.len())
            .field("info_layers", &self.info_layers)
            .field("limits", &self.limits)
            .field("background", &self.background)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Map {
    /// Creates an empty map with a white background.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Returns the viewport for mutation.
    ///
    /// Call [`Map::view_changed`] once a change is final.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// World‑space extent of the map data.
    ///
    /// An explicit envelope wins; otherwise this is the union of the enabled
    /// layers' envelopes.
    pub fn envelope(&self) -> Option<Rect> {
        self.envelope.or_else(|| {
            self.layers
                .iter()
                .filter(|l| l.enabled())
                .filter_map(|l| l.envelope())
                .map(|r| r.abs())
                .reduce(|acc, r| acc.union(r))
        })
    }

    /// Sets or clears the explicit envelope.
    pub fn set_envelope(&mut self, envelope: Option<Rect>) {
        self.envelope = envelope.map(|r| r.abs());
    }

    /// Returns the layers, bottom first.
    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    /// Returns the layer called `name` for mutation.
    ///
    /// Changes made here are not repainted on their own; prefer
    /// [`MapControl::set_layer_enabled`](crate::MapControl::set_layer_enabled)
    /// and friends once the map is shown.
    pub fn layer_mut(&mut self, name: &str) -> Option<&mut (dyn Layer + 'static)> {
        self.layers
            .iter_mut()
            .find(|l| l.name() == name)
            .map(|l| &mut **l)
    }

    /// Adds a layer on top.
    pub fn add_layer(&mut self, layer: impl Layer + 'static) {
        self.layers.push(Box::new(layer));
    }

    /// Returns the widgets, bottom first.
    pub fn widgets(&self) -> &[Box<dyn Widget>] {
        &self.widgets
    }

    /// Adds a widget on top.
    pub fn add_widget(&mut self, widget: impl Widget + 'static) {
        self.widgets.push(Box::new(widget));
    }

    /// Names of the layers queried on taps.
    pub fn info_layers(&self) -> &[String] {
        &self.info_layers
    }

    /// Marks a layer as queried on taps.
    pub fn add_info_layer(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.info_layers.contains(&name) {
            self.info_layers.push(name);
        }
    }

    /// Returns the navigation limits.
    pub fn limits(&self) -> &ViewportLimits {
        &self.limits
    }

    /// Returns the navigation limits for mutation.
    pub fn limits_mut(&mut self) -> &mut ViewportLimits {
        &mut self.limits
    }

    /// Returns the background color.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Sets the background color.
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Registers a listener for committed view changes.
    pub fn on_view_changed(&mut self, listener: impl FnMut(&ViewChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Applies resolution and extent limits to the viewport.
    pub fn limit(&mut self) {
        let envelope = self.envelope();
        self.limits.limit(&mut self.viewport, envelope);
    }

    /// Applies only the extent limits to the viewport.
    pub fn limit_extent(&mut self) {
        let envelope = self.envelope();
        self.limits.limit_extent(&mut self.viewport, envelope);
    }

    /// Tells every layer and listener what is now visible.
    ///
    /// Does nothing before the viewport is initialized.
    pub fn view_changed(&mut self, user_interacted: bool) {
        if !self.viewport.is_initialized() {
            return;
        }
        let change = ViewChange {
            extent: self.viewport.extent(),
            resolution: self.viewport.resolution(),
            user_interacted,
        };
        for layer in &mut self.layers {
            layer.view_changed(&change);
        }
        for listener in &mut self.listeners {
            listener(&change);
        }
    }

    /// Index of the topmost widget under `screen_position`.
    pub fn widget_at(&self, screen_position: Point) -> Option<usize> {
        self.widgets
            .iter()
            .rposition(|w| w.envelope().abs().contains(screen_position))
    }

    pub(crate) fn widget_mut(&mut self, index: usize) -> Option<&mut (dyn Widget + 'static)> {
        self.widgets.get_mut(index).map(|w| &mut **w)
    }

    /// Queries the info layers at a screen position, topmost layer first.
    pub fn get_info(&self, screen_position: Point, tap_count: u8) -> MapInfo {
        let world_position = self.viewport.screen_to_world(screen_position);
        let resolution = self.viewport.resolution();
        let hit = self
            .layers
            .iter()
            .rev()
            .filter(|l| l.enabled() && self.info_layers.iter().any(|n| n == l.name()))
            .find_map(|l| {
                l.feature_at(world_position, resolution)
                    .map(|index| (l.name().to_owned(), index))
            });
        let (layer, feature_index) = match hit {
            Some((name, index)) => (Some(name), Some(index)),
            None => (None, None),
        };
        MapInfo {
            screen_position,
            world_position,
            resolution,
            tap_count,
            layer,
            feature_index,
        }
    }
}
