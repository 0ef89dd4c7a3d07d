// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;

use cartograph_gesture::tap::{Tap, TapState};
use cartograph_gesture::{GestureTracker, GestureUpdate, TouchAction};
use cartograph_viewport::{Viewport, zoom_in_resolution, zoom_out_resolution};
use kurbo::Point;
use smallvec::SmallVec;

use crate::config::ControlConfig;
use crate::dispatch::{UiDispatcher, UiWaker};
use crate::error::{ControlError, FetchError};
use crate::info::MapInfo;
use crate::layer::Layer;
use crate::map::Map;
use crate::renderer::{Frame, Renderer};
use crate::repaint::RepaintHandle;

/// One raw touch event from the host toolkit.
#[derive(Clone, Copy, Debug)]
pub struct TouchEvent<'a> {
    /// What happened.
    pub action: TouchAction,
    /// Every active pointer in physical window pixels, including one that
    /// just went down or is going up.
    pub pointers: &'a [Point],
    /// Event time in milliseconds, used for tap recognition.
    pub time_ms: u64,
}

/// Platform-neutral map control.
///
/// Lives on the UI thread: it is created there, fed pointer events and asked
/// to paint. Background work reaches it through a [`RepaintHandle`].
pub struct MapControl<R: Renderer> {
    renderer: R,
    config: ControlConfig,
    map: Map,
    origin: Point,
    tracker: GestureTracker,
    taps: TapState,
    dispatcher: UiDispatcher,
    repaint: RepaintHandle,
    on_viewport_initialized: Vec<Box<dyn FnMut(&Viewport)>>,
    on_info: Vec<Box<dyn FnMut(&MapInfo)>>,
    on_open_url: Vec<Box<dyn FnMut(&str)>>,
}

impl<R: Renderer + fmt::Debug> fmt::Debug for MapControl<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapControl")
            .field("renderer", &self.renderer)
            .field("config", &self.config)
            .field("map", &self.map)
            .field("origin", &self.origin)
            .field("tracker", &self.tracker)
            .field("taps", &self.taps)
            .field("dispatcher", &self.dispatcher)
            .field("repaint", &self.repaint)
            .finish_non_exhaustive()
    }
}

impl<R: Renderer> MapControl<R> {
    /// Creates a control with an empty map.
    ///
    /// Must be called on the UI thread.
    pub fn new(renderer: R, config: ControlConfig) -> Self {
        Self::with_dispatcher(renderer, config, UiDispatcher::new())
    }

    /// Creates a control whose host event loop is woken by `waker` when a
    /// repaint or queued UI work is waiting.
    ///
    /// Must be called on the UI thread.
    pub fn with_waker(renderer: R, config: ControlConfig, waker: UiWaker) -> Self {
        Self::with_dispatcher(renderer, config, UiDispatcher::with_waker(waker))
    }

    fn with_dispatcher(renderer: R, config: ControlConfig, dispatcher: UiDispatcher) -> Self {
        let repaint = RepaintHandle::new(dispatcher.handle());
        Self {
            renderer,
            config,
            map: Map::new(),
            origin: Point::ZERO,
            tracker: GestureTracker::new(config.rotation),
            taps: TapState::new(config.taps),
            dispatcher,
            repaint,
            on_viewport_initialized: Vec::new(),
            on_info: Vec::new(),
            on_open_url: Vec::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Returns the renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the map.
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Returns the map for mutation.
    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    /// Returns the viewport of the map.
    pub fn viewport(&self) -> &Viewport {
        self.map.viewport()
    }

    /// Replaces the map, keeping the current view size.
    pub fn set_map(&mut self, mut map: Map) {
        let (width, height) = (self.viewport().width(), self.viewport().height());
        map.viewport_mut().set_size(width, height);
        self.map = map;
        if self.viewport().is_initialized() {
            self.refresh();
        } else {
            self.try_initialize_viewport();
        }
    }

    /// Enables or disables the layer called `name` and schedules a repaint.
    ///
    /// Returns `false` if the map has no such layer.
    pub fn set_layer_enabled(&mut self, name: &str, enabled: bool) -> bool {
        self.update_layer(name, |layer| layer.set_enabled(enabled))
    }

    /// Sets the opacity of the layer called `name` and schedules a repaint.
    ///
    /// Returns `false` if the map has no such layer.
    pub fn set_layer_opacity(&mut self, name: &str, opacity: f64) -> bool {
        self.update_layer(name, |layer| layer.set_opacity(opacity))
    }

    /// Returns a handle for requesting repaints from any thread.
    pub fn repaint_handle(&self) -> RepaintHandle {
        self.repaint.clone()
    }

    /// Sets the top-left of the view in physical window pixels.
    ///
    /// Touch positions are taken relative to it.
    pub fn set_view_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Registers a listener called once the viewport is first initialized.
    pub fn on_viewport_initialized(&mut self, listener: impl FnMut(&Viewport) + 'static) {
        self.on_viewport_initialized.push(Box::new(listener));
    }

    /// Registers a listener for info queries triggered by taps.
    pub fn on_info(&mut self, listener: impl FnMut(&MapInfo) + 'static) {
        self.on_info.push(Box::new(listener));
    }

    /// Registers a listener for links opened by tapping widgets.
    pub fn on_open_url(&mut self, listener: impl FnMut(&str) + 'static) {
        self.on_open_url.push(Box::new(listener));
    }

    /// The view was resized; sizes are in physical pixels.
    pub fn set_size(&mut self, width_px: f64, height_px: f64) {
        let density = self.config.density();
        let was_initialized = self.viewport().is_initialized();
        self.map
            .viewport_mut()
            .set_size(width_px / density, height_px / density);
        if was_initialized {
            self.refresh();
        } else {
            self.try_initialize_viewport();
        }
    }

    /// Tries to fit the viewport to the map envelope.
    ///
    /// Returns `false` while the view has no size or the map has no extent;
    /// call again on the next layout pass.
    pub fn try_initialize_viewport(&mut self) -> bool {
        if self.viewport().is_initialized() {
            return true;
        }
        let envelope = self.map.envelope();
        let (width, height) = (self.viewport().width(), self.viewport().height());
        if !self
            .map
            .viewport_mut()
            .try_initialize(envelope, width, height)
        {
            tracing::debug!(?envelope, width, height, "viewport not initialized yet");
            return false;
        }
        self.map.limit();
        tracing::debug!(
            resolution = self.viewport().resolution(),
            "viewport initialized"
        );
        self.map.view_changed(true);
        for listener in &mut self.on_viewport_initialized {
            listener(self.map.viewport());
        }
        self.refresh_graphics();
        true
    }

    /// Feeds one touch event and applies the resulting viewport step.
    pub fn handle_touch(&mut self, event: &TouchEvent<'_>) -> GestureUpdate {
        let pointers = self.to_canvas(event.pointers);
        if let Some(tap) = self.recognize_tap(event.action, &pointers, event.time_ms) {
            self.invoke_info(tap);
        }

        let rotation = self.viewport().rotation();
        let update = self.tracker.handle(event.action, &pointers, rotation);
        if !self.viewport().is_initialized() {
            return GestureUpdate::Ignored;
        }
        match update {
            GestureUpdate::Ignored => {}
            GestureUpdate::Pan(delta) => {
                delta.apply_to(self.map.viewport_mut());
                self.map.limit_extent();
                self.refresh_graphics();
            }
            GestureUpdate::Pinch(delta) => {
                delta.apply_to(self.map.viewport_mut());
                self.map.limit();
                self.refresh_graphics();
            }
            GestureUpdate::Commit => self.refresh(),
        }
        update
    }

    /// Delivers a single tap once no second tap can follow it.
    ///
    /// Single taps are held back for the double-tap window so a double tap
    /// is reported once. Call this when [`tap_deadline`](Self::tap_deadline)
    /// passes. Returns `true` if a tap was delivered.
    pub fn tick(&mut self, time_ms: u64) -> bool {
        let Some(tap) = self.taps.poll(time_ms) else {
            return false;
        };
        self.invoke_info(tap);
        true
    }

    /// Time at which [`tick`](Self::tick) will deliver the pending single
    /// tap, if there is one.
    pub fn tap_deadline(&self) -> Option<u64> {
        self.taps.deadline()
    }

    /// Schedules a repaint.
    pub fn refresh_graphics(&self) {
        if let Err(err) = self.repaint.request_repaint() {
            tracing::debug!(%err, "repaint skipped");
        }
    }

    /// Tells the layers to fetch data for the current view.
    pub fn refresh_data(&mut self) {
        self.map.view_changed(true);
    }

    /// Refreshes data and graphics.
    pub fn refresh(&mut self) {
        self.refresh_data();
        self.refresh_graphics();
    }

    /// Zooms in one step of the map's resolutions.
    pub fn zoom_in(&mut self) {
        let next = zoom_in_resolution(
            &self.map.limits().resolutions,
            self.viewport().resolution(),
        );
        self.zoom_to(next);
    }

    /// Zooms out one step of the map's resolutions.
    pub fn zoom_out(&mut self) {
        let next = zoom_out_resolution(
            &self.map.limits().resolutions,
            self.viewport().resolution(),
        );
        self.zoom_to(next);
    }

    /// Reports the outcome of a data fetch; see [`RepaintHandle::data_changed`].
    pub fn data_changed(&self, result: Result<(), FetchError>) {
        self.repaint.data_changed(result);
    }

    /// Runs work queued for the UI thread; returns how many tasks ran.
    pub fn process_pending(&self) -> usize {
        self.dispatcher.drain()
    }

    /// Returns `true` when a repaint is pending.
    pub fn needs_repaint(&self) -> bool {
        self.repaint.is_dirty()
    }

    /// Draws the map onto `canvas`.
    pub fn paint(&mut self, canvas: &mut R::Canvas) -> Result<(), ControlError> {
        if self.repaint.is_disposed() {
            tracing::warn!("paint called on a disposed map control");
            return Err(ControlError::Disposed);
        }
        if !self.try_initialize_viewport() {
            return Err(ControlError::NotInitialized);
        }
        self.repaint.take_dirty();
        let frame = Frame {
            viewport: self.map.viewport(),
            layers: self.map.layers(),
            widgets: self.map.widgets(),
            background: self.map.background(),
            pixel_density: self.config.density(),
        };
        self.renderer.render(canvas, &frame).inspect_err(|err| {
            tracing::warn!(%err, "rendering the map failed");
        })
    }

    /// Tears the control down; later repaint requests are skipped.
    pub fn dispose(&mut self) {
        tracing::debug!("disposing map control");
        self.repaint.dispose();
        self.tracker.cancel();
        self.taps.reset();
    }

    fn update_layer(
        &mut self,
        name: &str,
        update: impl FnOnce(&mut (dyn Layer + 'static)),
    ) -> bool {
        let Some(layer) = self.map.layer_mut(name) else {
            tracing::debug!(name, "no layer to update");
            return false;
        };
        update(layer);
        self.refresh_graphics();
        true
    }

    fn zoom_to(&mut self, resolution: f64) {
        if !self.viewport().is_initialized() {
            return;
        }
        self.map.viewport_mut().set_resolution(resolution);
        self.map.limit();
        self.refresh();
    }

    fn to_canvas(&self, pointers: &[Point]) -> SmallVec<[Point; 4]> {
        let density = self.config.density();
        let origin = self.origin.to_vec2();
        pointers
            .iter()
            .map(|p| ((p.to_vec2() - origin) / density).to_point())
            .collect()
    }

    fn recognize_tap(
        &mut self,
        action: TouchAction,
        pointers: &[Point],
        time_ms: u64,
    ) -> Option<Tap> {
        match action {
            TouchAction::Down => {
                let first = pointers.first()?;
                // Confirms a pending tap this press cannot pair with.
                self.taps.on_down(*first, pointers.len(), time_ms)
            }
            TouchAction::PointerDown(_) => {
                // A second finger makes this a pinch.
                self.taps.cancel();
                None
            }
            TouchAction::Move => {
                if let [single] = pointers {
                    self.taps.on_move(*single);
                }
                None
            }
            TouchAction::PointerUp(_) => None,
            TouchAction::Up => {
                let last = pointers.first()?;
                self.taps.on_up(*last, time_ms)
            }
            TouchAction::Cancel => {
                self.taps.cancel();
                None
            }
        }
    }

    /// Widgets get the tap first; otherwise the info layers are queried.
    fn invoke_info(&mut self, tap: Tap) {
        if let Some(widget) = self
            .map
            .widget_at(tap.position)
            .and_then(|index| self.map.widget_mut(index))
        {
            if let Some(url) = widget.url() {
                tracing::debug!(%url, "opening link");
                for listener in &mut self.on_open_url {
                    listener(url);
                }
            }
            widget.handle_touched(tap.position, tap.count);
            return;
        }
        if !self.viewport().is_initialized() {
            return;
        }
        let info = self.map.get_info(tap.position, tap.count);
        for listener in &mut self.on_info {
            listener(&info);
        }
    }
}
