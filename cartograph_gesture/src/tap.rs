// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap recognition: single and double taps from down/up pairs.
//!
//! A press becomes a tap when it is released within
//! [`TapConfig::max_press_ms`] without moving further than
//! [`TapConfig::slop`] and without a second pointer joining. A second press
//! that starts within [`TapConfig::double_tap_ms`] of the first tap's release,
//! and close to it, makes a double tap.
//!
//! A single tap is only confirmed once no second press can follow it, so a
//! double tap is reported exactly once. Until then it is pending; the host
//! calls [`TapState::poll`] after [`TapState::deadline`] to collect it.
//!
//! Timestamps are supplied by the caller in milliseconds.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use cartograph_gesture::tap::{Tap, TapState};
//!
//! let mut taps = TapState::default();
//! taps.on_down(Point::new(10.0, 10.0), 1, 1000);
//! assert_eq!(taps.on_up(Point::new(11.0, 10.0), 1080), None);
//! assert_eq!(taps.poll(1200), None);
//! assert_eq!(
//!     taps.poll(1400),
//!     Some(Tap { position: Point::new(10.0, 10.0), count: 1 })
//! );
//!
//! // Two quick presses are one double tap.
//! taps.on_down(Point::new(12.0, 11.0), 1, 2000);
//! taps.on_up(Point::new(12.0, 11.0), 2040);
//! taps.on_down(Point::new(13.0, 11.0), 1, 2150);
//! assert_eq!(taps.on_up(Point::new(13.0, 11.0), 2200).map(|t| t.count), Some(2));
//! assert_eq!(taps.poll(3000), None);
//! ```

use kurbo::Point;

/// Tap recognition thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapConfig {
    /// Maximum pointer travel, in screen units, for a press to remain a tap.
    ///
    /// Default: `8.0`.
    pub slop: f64,
    /// Maximum time between a tap's release and the next press for the two
    /// to form a double tap.
    ///
    /// Default: `300`.
    pub double_tap_ms: u64,
    /// Maximum press duration of a tap.
    ///
    /// Default: `500`.
    pub max_press_ms: u64,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            slop: 8.0,
            double_tap_ms: 300,
            max_press_ms: 500,
        }
    }
}

/// A recognized tap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tap {
    /// Screen position where the press started; for a double tap, where
    /// the first press started.
    pub position: Point,
    /// `1` for a single tap, `2` for a double tap.
    pub count: u8,
}

/// Tracks presses to recognize taps.
#[derive(Clone, Copy, Debug, Default)]
pub struct TapState {
    config: TapConfig,
    press: Option<(Point, u64)>,
    /// Single tap awaiting confirmation, with its release time.
    pending: Option<(Point, u64)>,
}

impl TapState {
    /// Creates a recognizer with the given thresholds.
    #[must_use]
    pub fn new(config: TapConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the thresholds in use.
    #[must_use]
    pub fn config(&self) -> TapConfig {
        self.config
    }

    /// A pointer went down; `pointer_count` includes it.
    ///
    /// A second pointer turns the press into a pinch, which is never a tap.
    /// Returns the pending single tap when this press cannot pair with it.
    pub fn on_down(
        &mut self,
        position: Point,
        pointer_count: usize,
        time_ms: u64,
    ) -> Option<Tap> {
        self.press = (pointer_count == 1).then_some((position, time_ms));
        let (last, released_at) = self.pending?;
        let pairs = time_ms.saturating_sub(released_at) <= self.config.double_tap_ms
            && last.distance(position) <= self.config.slop * 2.0;
        if pairs || pointer_count != 1 {
            // Left for `on_up`, or for `poll` once the pinch is over.
            return None;
        }
        self.pending = None;
        Some(Tap {
            position: last,
            count: 1,
        })
    }

    /// The pointer moved; travelling beyond the slop cancels the tap.
    pub fn on_move(&mut self, position: Point) {
        if let Some((start, _)) = self.press
            && start.distance(position) > self.config.slop
        {
            self.press = None;
        }
    }

    /// The last pointer went up; returns the double tap this release
    /// completes, if any.
    ///
    /// A single tap is held back until [`poll`](Self::poll) confirms it.
    pub fn on_up(&mut self, position: Point, time_ms: u64) -> Option<Tap> {
        let (start, pressed_at) = self.press.take()?;
        if start.distance(position) > self.config.slop
            || time_ms.saturating_sub(pressed_at) > self.config.max_press_ms
        {
            return None;
        }

        // `on_down` already confirmed a pending tap this press cannot pair with.
        if let Some((first, _)) = self.pending.take() {
            Some(Tap {
                position: first,
                count: 2,
            })
        } else {
            self.pending = Some((start, time_ms));
            None
        }
    }

    /// Confirms the pending single tap once the double-tap window has passed.
    ///
    /// Nothing is confirmed while a press is in progress.
    pub fn poll(&mut self, time_ms: u64) -> Option<Tap> {
        let deadline = self.deadline()?;
        if time_ms < deadline || self.press.is_some() {
            return None;
        }
        let (position, _) = self.pending.take()?;
        Some(Tap { position, count: 1 })
    }

    /// Earliest time at which [`poll`](Self::poll) can confirm the pending
    /// single tap, if there is one.
    #[must_use]
    pub fn deadline(&self) -> Option<u64> {
        let window = self.config.double_tap_ms.saturating_add(1);
        self.pending
            .map(|(_, released_at)| released_at.saturating_add(window))
    }

    /// Forgets any press in progress.
    ///
    /// A pending single tap stays pending.
    pub fn cancel(&mut self) {
        self.press = None;
    }

    /// Forgets the press in progress and the pending single tap.
    pub fn reset(&mut self) {
        self.press = None;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;

    /// One press at `at`, released 40 ms later on the same spot.
    fn press(taps: &mut TapState, at: Point, time_ms: u64) -> (Option<Tap>, Option<Tap>) {
        let down = taps.on_down(at, 1, time_ms);
        (down, taps.on_up(at, time_ms + 40))
    }

    #[test]
    fn quick_press_is_a_single_tap() {
        let mut taps = TapState::default();
        taps.on_down(Point::new(5.0, 5.0), 1, 0);
        taps.on_move(Point::new(7.0, 6.0));
        assert_eq!(taps.on_up(Point::new(7.0, 6.0), 100), None);
        assert_eq!(taps.deadline(), Some(401));

        assert_eq!(taps.poll(400), None);
        let tap = taps.poll(401).unwrap();
        assert_eq!(tap.count, 1);
        assert_eq!(tap.position, Point::new(5.0, 5.0));
        assert_eq!(taps.poll(1000), None);
        assert_eq!(taps.deadline(), None);
    }

    #[test]
    fn moving_beyond_slop_is_not_a_tap() {
        let mut taps = TapState::default();
        taps.on_down(Point::new(0.0, 0.0), 1, 0);
        taps.on_move(Point::new(20.0, 0.0));
        taps.on_move(Point::new(0.0, 0.0));
        assert_eq!(taps.on_up(Point::new(0.0, 0.0), 50), None);
        assert_eq!(taps.poll(10_000), None);
    }

    #[test]
    fn long_press_is_not_a_tap() {
        let mut taps = TapState::default();
        taps.on_down(Point::new(0.0, 0.0), 1, 0);
        assert_eq!(taps.on_up(Point::new(0.0, 0.0), 501), None);
        assert_eq!(taps.poll(10_000), None);
    }

    #[test]
    fn second_pointer_cancels_tap() {
        let mut taps = TapState::default();
        taps.on_down(Point::new(0.0, 0.0), 1, 0);
        taps.on_down(Point::new(50.0, 0.0), 2, 10);
        assert_eq!(taps.on_up(Point::new(0.0, 0.0), 60), None);
        assert_eq!(taps.poll(10_000), None);
    }

    #[test]
    fn double_tap_is_reported_once() {
        let mut taps = TapState::default();
        assert_eq!(press(&mut taps, Point::new(0.0, 0.0), 0), (None, None));
        let (down, up) = press(&mut taps, Point::new(3.0, 3.0), 200);
        assert_eq!(down, None);
        assert_eq!(
            up,
            Some(Tap {
                position: Point::new(0.0, 0.0),
                count: 2
            })
        );
        assert_eq!(taps.poll(10_000), None);

        // A third tap starts over.
        assert_eq!(press(&mut taps, Point::new(3.0, 3.0), 300), (None, None));
        assert_eq!(taps.poll(10_000).map(|t| t.count), Some(1));
    }

    #[test]
    fn slow_or_distant_second_press_confirms_the_first() {
        let mut taps = TapState::new(TapConfig {
            double_tap_ms: 100,
            ..TapConfig::default()
        });
        press(&mut taps, Point::new(0.0, 0.0), 0);
        let (down, up) = press(&mut taps, Point::new(0.0, 0.0), 500);
        assert_eq!(down.map(|t| t.count), Some(1));
        assert_eq!(up, None);

        let (down, up) = press(&mut taps, Point::new(200.0, 0.0), 560);
        assert_eq!(down.map(|t| t.position), Some(Point::new(0.0, 0.0)));
        assert_eq!(up, None);
        assert_eq!(taps.poll(1000).map(|t| t.position), Some(Point::new(200.0, 0.0)));
    }

    #[test]
    fn held_second_press_delays_confirmation() {
        let mut taps = TapState::default();
        press(&mut taps, Point::new(0.0, 0.0), 0);
        taps.on_down(Point::new(1.0, 0.0), 1, 100);
        assert_eq!(taps.poll(600), None);

        // Dragging away leaves the first tap to be confirmed.
        taps.on_move(Point::new(50.0, 0.0));
        assert_eq!(taps.poll(610).map(|t| t.count), Some(1));
        assert_eq!(taps.on_up(Point::new(50.0, 0.0), 620), None);
    }

    #[test]
    fn up_without_down_is_ignored() {
        let mut taps = TapState::default();
        assert_eq!(taps.on_up(Point::new(0.0, 0.0), 10), None);
        taps.on_down(Point::new(0.0, 0.0), 1, 0);
        taps.cancel();
        assert_eq!(taps.on_up(Point::new(0.0, 0.0), 10), None);
        assert_eq!(taps.poll(10_000), None);
    }

    #[test]
    fn reset_drops_the_pending_tap() {
        let mut taps = TapState::default();
        press(&mut taps, Point::new(0.0, 0.0), 0);
        taps.reset();
        assert_eq!(taps.deadline(), None);
        assert_eq!(taps.poll(10_000), None);
    }
}
