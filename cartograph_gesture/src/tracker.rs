// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture tracker: turn multi-pointer touch events into viewport steps.
//!
//! ## Usage
//!
//! 1) On every touch event, call [`GestureTracker::handle`] with the action,
//!    the positions of all pointers the event reports, and the current
//!    viewport rotation.
//! 2) Apply [`GestureUpdate::Pan`] / [`GestureUpdate::Pinch`] deltas to the
//!    viewport with [`ViewportDelta::apply_to`], then limit and repaint.
//! 3) On [`GestureUpdate::Commit`], tell data providers that the view changed.
//!
//! ## Minimal example
//!
//! ```
//! use cartograph_gesture::{GestureTracker, GestureUpdate, TouchAction, TouchMode};
//! use cartograph_viewport::Viewport;
//! use kurbo::{Point, Rect};
//!
//! let mut viewport = Viewport::new();
//! viewport.try_initialize(Some(Rect::new(0.0, 0.0, 100.0, 100.0)), 100.0, 100.0);
//! let mut tracker = GestureTracker::default();
//!
//! tracker.handle(TouchAction::Down, &[Point::new(10.0, 10.0)], viewport.rotation());
//! assert_eq!(tracker.mode(), TouchMode::Dragging);
//!
//! let update = tracker.handle(TouchAction::Move, &[Point::new(15.0, 10.0)], viewport.rotation());
//! if let GestureUpdate::Pan(delta) = update {
//!     delta.apply_to(&mut viewport);
//! }
//! assert!((viewport.center().x - 45.0).abs() < 1e-9);
//!
//! let update = tracker.handle(TouchAction::Up, &[Point::new(15.0, 10.0)], viewport.rotation());
//! assert_eq!(update, GestureUpdate::Commit);
//! assert_eq!(tracker.mode(), TouchMode::None);
//! ```

use cartograph_viewport::{Viewport, normalize_rotation};
use kurbo::Point;
use smallvec::SmallVec;

use crate::log::debug;
use crate::pinch::PinchValues;
use crate::snap::RotationSnap;

/// What the tracker is currently doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TouchMode {
    /// No gesture in progress.
    #[default]
    None,
    /// One pointer is panning the map.
    Dragging,
    /// Two or more pointers are zooming and rotating the map.
    Zooming,
}

/// Kind of a touch event, as reported by the host toolkit.
///
/// The pointer list passed along with an event always contains every pointer
/// that is down during the event, including one that is being lifted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchAction {
    /// The first pointer went down.
    Down,
    /// An additional pointer went down; carries its index in the pointer list.
    PointerDown(usize),
    /// One or more pointers moved.
    Move,
    /// A pointer other than the last one was lifted; carries its index.
    PointerUp(usize),
    /// The last pointer was lifted.
    Up,
    /// The host aborted the gesture.
    Cancel,
}

/// Arguments of one [`Viewport::transform`] step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportDelta {
    /// Screen position the pivot moves to.
    pub position: Point,
    /// Screen position of the pivot at the previous event.
    pub previous: Point,
    /// Zoom factor; the resolution is divided by it.
    pub scale_factor: f64,
    /// Clockwise rotation change in degrees.
    pub rotation_delta: f64,
}

impl ViewportDelta {
    /// A pure pan from `previous` to `position`.
    #[must_use]
    pub fn pan(position: Point, previous: Point) -> Self {
        Self {
            position,
            previous,
            scale_factor: 1.0,
            rotation_delta: 0.0,
        }
    }

    /// Applies this step to `viewport`.
    pub fn apply_to(&self, viewport: &mut Viewport) {
        viewport.transform(
            self.position,
            self.previous,
            self.scale_factor,
            self.rotation_delta,
        );
    }
}

/// Result of feeding one touch event to a [`GestureTracker`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureUpdate {
    /// Nothing to apply.
    Ignored,
    /// One-pointer pan step.
    Pan(ViewportDelta),
    /// Multi-pointer pan, zoom and rotate step.
    Pinch(ViewportDelta),
    /// All pointers are up; the gesture is over and the view should be
    /// committed (for example by refreshing map data).
    Commit,
}

/// Tracks a multi-touch gesture across events.
#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
    mode: TouchMode,
    previous_center: Point,
    previous_radius: f64,
    previous_angle: f64,
    inner_rotation: f64,
    snap: RotationSnap,
}

impl GestureTracker {
    /// Creates a tracker with the given rotation snap configuration.
    #[must_use]
    pub fn new(snap: RotationSnap) -> Self {
        Self {
            snap,
            ..Self::default()
        }
    }

    /// Returns the current mode.
    #[must_use]
    pub fn mode(&self) -> TouchMode {
        self.mode
    }

    /// Returns the pivot recorded at the previous event.
    #[must_use]
    pub fn previous_center(&self) -> Point {
        self.previous_center
    }

    /// Returns the unsnapped rotation accumulated by the current pinch.
    #[must_use]
    pub fn inner_rotation(&self) -> f64 {
        self.inner_rotation
    }

    /// Returns the rotation snap configuration.
    #[must_use]
    pub fn rotation_snap(&self) -> RotationSnap {
        self.snap
    }

    /// Replaces the rotation snap configuration.
    pub fn set_rotation_snap(&mut self, snap: RotationSnap) {
        self.snap = snap;
    }

    /// Feeds one touch event.
    ///
    /// `rotation` is the current viewport rotation in degrees.
    pub fn handle(
        &mut self,
        action: TouchAction,
        pointers: &[Point],
        rotation: f64,
    ) -> GestureUpdate {
        match action {
            TouchAction::Down | TouchAction::PointerDown(_) => {
                self.pointer_down(pointers, rotation);
                GestureUpdate::Ignored
            }
            TouchAction::PointerUp(index) => {
                self.pointer_up(pointers, index, rotation);
                GestureUpdate::Ignored
            }
            TouchAction::Move => self.pointer_move(pointers, rotation),
            TouchAction::Up => self.all_up(),
            TouchAction::Cancel => {
                self.cancel();
                GestureUpdate::Ignored
            }
        }
    }

    /// A pointer went down; `pointers` includes it.
    pub fn pointer_down(&mut self, pointers: &[Point], rotation: f64) {
        self.start(pointers, rotation);
    }

    /// The pointer at `released` was lifted; `pointers` still includes it.
    ///
    /// The gesture restarts from the remaining pointers so the next move does
    /// not jump. An out-of-range `released` index is ignored.
    pub fn pointer_up(&mut self, pointers: &[Point], released: usize, rotation: f64) {
        if released >= pointers.len() {
            return;
        }
        let mut remaining: SmallVec<[Point; 4]> = SmallVec::from_slice(pointers);
        remaining.remove(released);
        self.start(&remaining, rotation);
    }

    /// Pointers moved; returns the viewport step to apply.
    pub fn pointer_move(&mut self, pointers: &[Point], rotation: f64) -> GestureUpdate {
        match self.mode {
            TouchMode::None => GestureUpdate::Ignored,
            TouchMode::Dragging => {
                let [position] = pointers else {
                    return GestureUpdate::Ignored;
                };
                let delta = ViewportDelta::pan(*position, self.previous_center);
                self.previous_center = *position;
                GestureUpdate::Pan(delta)
            }
            TouchMode::Zooming => {
                let Some(pinch) = PinchValues::from_pointers(pointers) else {
                    return GestureUpdate::Ignored;
                };

                let mut rotation_delta = 0.0;
                if !self.snap.locked {
                    self.inner_rotation = normalize_rotation(
                        self.inner_rotation + pinch.angle - self.previous_angle,
                    );
                    rotation_delta = self.snap.rotation_delta(self.inner_rotation, rotation);
                }
                let scale_factor = if self.previous_radius > 0.0 && pinch.radius > 0.0 {
                    pinch.radius / self.previous_radius
                } else {
                    1.0
                };

                let delta = ViewportDelta {
                    position: pinch.center,
                    previous: self.previous_center,
                    scale_factor,
                    rotation_delta,
                };
                self.record(pinch);
                GestureUpdate::Pinch(delta)
            }
        }
    }

    /// The last pointer was lifted.
    ///
    /// Commits only if a gesture was in progress; a release after
    /// [`cancel`](Self::cancel) is ignored.
    pub fn all_up(&mut self) -> GestureUpdate {
        if self.mode == TouchMode::None {
            return GestureUpdate::Ignored;
        }
        debug!(from = ?self.mode, "gesture ended");
        self.mode = TouchMode::None;
        GestureUpdate::Commit
    }

    /// Abandons the current gesture without committing.
    pub fn cancel(&mut self) {
        debug!(from = ?self.mode, "gesture cancelled");
        self.mode = TouchMode::None;
    }

    fn start(&mut self, pointers: &[Point], rotation: f64) {
        match pointers {
            [] => {}
            [single] => {
                self.mode = TouchMode::Dragging;
                self.previous_center = *single;
                debug!(pointers = 1, "dragging");
            }
            _ => {
                if let Some(pinch) = PinchValues::from_pointers(pointers) {
                    self.mode = TouchMode::Zooming;
                    self.record(pinch);
                    self.inner_rotation = rotation;
                    debug!(pointers = pointers.len(), "zooming");
                }
            }
        }
    }

    fn record(&mut self, pinch: PinchValues) {
        self.previous_center = pinch.center;
        self.previous_radius = pinch.radius;
        self.previous_angle = pinch.angle;
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    /// Second pointer 10 px from the origin at `degrees` clockwise.
    fn twisted(degrees: f64) -> [Point; 2] {
        [Point::ORIGIN, (Vec2::from_angle(degrees.to_radians()) * 10.0).to_point()]
    }

    fn pinch(update: GestureUpdate) -> ViewportDelta {
        match update {
            GestureUpdate::Pinch(delta) => delta,
            other => panic!("expected a pinch step, got {other:?}"),
        }
    }

    #[test]
    fn new_tracker_is_idle() {
        let tracker = GestureTracker::default();
        assert_eq!(tracker.mode(), TouchMode::None);
        assert_eq!(tracker.rotation_snap(), RotationSnap::default());
    }

    #[test]
    fn one_pointer_drags() {
        let mut tracker = GestureTracker::default();
        tracker.handle(TouchAction::Down, &[p(100.0, 100.0)], 0.0);
        assert_eq!(tracker.mode(), TouchMode::Dragging);
        assert_eq!(tracker.previous_center(), p(100.0, 100.0));

        let update = tracker.handle(TouchAction::Move, &[p(120.0, 110.0)], 0.0);
        assert_eq!(
            update,
            GestureUpdate::Pan(ViewportDelta::pan(p(120.0, 110.0), p(100.0, 100.0)))
        );
        assert_eq!(tracker.previous_center(), p(120.0, 110.0));

        // Deltas are incremental.
        let update = tracker.handle(TouchAction::Move, &[p(125.0, 110.0)], 0.0);
        assert_eq!(
            update,
            GestureUpdate::Pan(ViewportDelta::pan(p(125.0, 110.0), p(120.0, 110.0)))
        );
    }

    #[test]
    fn move_with_wrong_pointer_count_is_ignored() {
        let mut tracker = GestureTracker::default();
        assert_eq!(
            tracker.handle(TouchAction::Move, &[p(1.0, 1.0)], 0.0),
            GestureUpdate::Ignored
        );

        tracker.handle(TouchAction::Down, &[p(0.0, 0.0)], 0.0);
        let update = tracker.handle(TouchAction::Move, &[p(1.0, 1.0), p(2.0, 2.0)], 0.0);
        assert_eq!(update, GestureUpdate::Ignored);
        assert_eq!(tracker.mode(), TouchMode::Dragging);
        assert_eq!(tracker.previous_center(), p(0.0, 0.0));

        tracker.handle(TouchAction::PointerDown(1), &[p(0.0, 0.0), p(10.0, 0.0)], 0.0);
        let update = tracker.handle(TouchAction::Move, &[p(3.0, 3.0)], 0.0);
        assert_eq!(update, GestureUpdate::Ignored);
        assert_eq!(tracker.mode(), TouchMode::Zooming);
    }

    #[test]
    fn second_pointer_starts_zooming() {
        let mut tracker = GestureTracker::default();
        tracker.handle(TouchAction::Down, &[p(0.0, 0.0)], 12.0);
        tracker.handle(TouchAction::PointerDown(1), &[p(0.0, 0.0), p(10.0, 0.0)], 12.0);
        assert_eq!(tracker.mode(), TouchMode::Zooming);
        assert_eq!(tracker.previous_center(), p(5.0, 0.0));
        assert_eq!(tracker.inner_rotation(), 12.0);
    }

    #[test]
    fn spreading_fingers_zooms_in() {
        let mut tracker = GestureTracker::default();
        tracker.handle(TouchAction::Down, &[p(40.0, 50.0)], 0.0);
        tracker.handle(TouchAction::PointerDown(1), &[p(40.0, 50.0), p(60.0, 50.0)], 0.0);

        let pointers = [p(30.0, 50.0), p(70.0, 50.0)];
        let delta = pinch(tracker.handle(TouchAction::Move, &pointers, 0.0));
        assert_eq!(delta.scale_factor, 2.0);
        assert_eq!(delta.rotation_delta, 0.0);
        assert_eq!(delta.position, p(50.0, 50.0));
        assert_eq!(delta.previous, p(50.0, 50.0));
    }

    #[test]
    fn coincident_pointers_do_not_zoom() {
        let mut tracker = GestureTracker::default();
        tracker.handle(TouchAction::Down, &[p(5.0, 5.0)], 0.0);
        tracker.handle(TouchAction::PointerDown(1), &[p(5.0, 5.0), p(5.0, 5.0)], 0.0);
        let pointers = [p(0.0, 5.0), p(10.0, 5.0)];
        let delta = pinch(tracker.handle(TouchAction::Move, &pointers, 0.0));
        assert_eq!(delta.scale_factor, 1.0);

        let pointers = [p(5.0, 5.0), p(5.0, 5.0)];
        let delta = pinch(tracker.handle(TouchAction::Move, &pointers, 0.0));
        assert_eq!(delta.scale_factor, 1.0);
    }

    #[test]
    fn small_twist_stays_snapped() {
        let mut tracker = GestureTracker::default();
        tracker.handle(TouchAction::PointerDown(1), &[p(0.0, 0.0), p(10.0, 0.0)], 0.0);

        // Twist by 20 degrees: below the 30 degree threshold.
        let delta = pinch(tracker.handle(TouchAction::Move, &twisted(20.0), 0.0));
        assert_eq!(delta.rotation_delta, 0.0);
        assert!((tracker.inner_rotation() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn large_twist_unsnaps_then_resnaps() {
        let mut tracker = GestureTracker::default();
        let mut rotation = 0.0;
        tracker.handle(TouchAction::PointerDown(1), &[p(0.0, 0.0), p(10.0, 0.0)], rotation);

        let delta = pinch(tracker.handle(TouchAction::Move, &twisted(40.0), rotation));
        assert!((delta.rotation_delta - 40.0).abs() < 1e-9);
        rotation += delta.rotation_delta;

        // Twist back to 3 degrees: inside the resnap zone.
        let delta = pinch(tracker.handle(TouchAction::Move, &twisted(3.0), rotation));
        assert!((delta.rotation_delta + rotation).abs() < 1e-9);
    }

    #[test]
    fn locked_rotation_ignores_twists() {
        let mut tracker = GestureTracker::new(RotationSnap {
            locked: true,
            ..RotationSnap::default()
        });
        tracker.handle(TouchAction::PointerDown(1), &[p(0.0, 0.0), p(10.0, 0.0)], 0.0);
        let delta = pinch(tracker.handle(TouchAction::Move, &twisted(90.0), 0.0));
        assert_eq!(delta.rotation_delta, 0.0);
        assert_eq!(tracker.inner_rotation(), 0.0);
    }

    #[test]
    fn lifting_one_of_two_pointers_reseeds_drag() {
        let mut tracker = GestureTracker::default();
        tracker.handle(TouchAction::Down, &[p(0.0, 0.0)], 0.0);
        tracker.handle(TouchAction::PointerDown(1), &[p(0.0, 0.0), p(100.0, 0.0)], 0.0);
        tracker.handle(TouchAction::Move, &[p(10.0, 0.0), p(90.0, 0.0)], 0.0);
        assert_eq!(tracker.previous_center(), p(50.0, 0.0));

        // Lift the first pointer; the remaining one becomes the drag pivot.
        tracker.handle(TouchAction::PointerUp(0), &[p(10.0, 0.0), p(90.0, 0.0)], 0.0);
        assert_eq!(tracker.mode(), TouchMode::Dragging);
        assert_eq!(tracker.previous_center(), p(90.0, 0.0));

        let update = tracker.handle(TouchAction::Move, &[p(95.0, 0.0)], 0.0);
        assert_eq!(
            update,
            GestureUpdate::Pan(ViewportDelta::pan(p(95.0, 0.0), p(90.0, 0.0)))
        );
    }

    #[test]
    fn lifting_one_of_three_pointers_keeps_zooming() {
        let mut tracker = GestureTracker::default();
        let three = [p(0.0, 0.0), p(10.0, 0.0), p(20.0, 0.0)];
        tracker.handle(TouchAction::PointerDown(2), &three, 7.0);
        tracker.handle(TouchAction::PointerUp(0), &three, 7.0);
        assert_eq!(tracker.mode(), TouchMode::Zooming);
        assert_eq!(tracker.previous_center(), p(15.0, 0.0));
        assert_eq!(tracker.inner_rotation(), 7.0);
    }

    #[test]
    fn malformed_events_keep_state() {
        let mut tracker = GestureTracker::default();
        tracker.handle(TouchAction::Down, &[p(3.0, 4.0)], 0.0);
        tracker.handle(TouchAction::Down, &[], 0.0);
        tracker.handle(TouchAction::PointerUp(0), &[p(3.0, 4.0)], 0.0);
        tracker.handle(TouchAction::PointerUp(5), &[], 0.0);
        assert_eq!(tracker.mode(), TouchMode::Dragging);
        assert_eq!(tracker.previous_center(), p(3.0, 4.0));
    }

    #[test]
    fn up_commits_and_cancel_does_not() {
        let mut tracker = GestureTracker::default();
        tracker.handle(TouchAction::Down, &[p(0.0, 0.0)], 0.0);
        assert_eq!(
            tracker.handle(TouchAction::Up, &[p(0.0, 0.0)], 0.0),
            GestureUpdate::Commit
        );
        assert_eq!(tracker.mode(), TouchMode::None);

        tracker.handle(TouchAction::Down, &[p(0.0, 0.0)], 0.0);
        assert_eq!(
            tracker.handle(TouchAction::Cancel, &[], 0.0),
            GestureUpdate::Ignored
        );
        assert_eq!(tracker.mode(), TouchMode::None);
    }

    #[test]
    fn release_after_cancel_is_ignored() {
        let mut tracker = GestureTracker::default();
        tracker.handle(TouchAction::Down, &[p(0.0, 0.0)], 0.0);
        tracker.handle(TouchAction::Move, &[p(5.0, 0.0)], 0.0);
        tracker.cancel();
        assert_eq!(
            tracker.handle(TouchAction::Up, &[p(5.0, 0.0)], 0.0),
            GestureUpdate::Ignored
        );

        // A stray release with nothing down is ignored too.
        assert_eq!(tracker.all_up(), GestureUpdate::Ignored);
    }
}
