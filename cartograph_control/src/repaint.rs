// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::dispatch::UiHandle;
use crate::error::{ControlError, FetchError};

#[derive(Debug, Default)]
struct RepaintState {
    dirty: AtomicBool,
    disposed: AtomicBool,
}

/// Requests repaints of a [`MapControl`](crate::MapControl) from any thread.
///
/// Requests are marshaled onto the UI thread. The first request after a
/// paint wakes the host through its [`UiWaker`](crate::UiWaker). Once the
/// control is disposed requests are skipped with a warning.
#[derive(Clone, Debug)]
pub struct RepaintHandle {
    state: Arc<RepaintState>,
    ui: UiHandle,
}

impl RepaintHandle {
    pub(crate) fn new(ui: UiHandle) -> Self {
        Self {
            state: Arc::default(),
            ui,
        }
    }

    /// Schedules a repaint.
    pub fn request_repaint(&self) -> Result<(), ControlError> {
        if self.is_disposed() {
            tracing::warn!("repaint requested after the map control was disposed");
            return Err(ControlError::Disposed);
        }
        let state = self.state.clone();
        let ui = self.ui.clone();
        self.ui.run_on_ui_thread(move || {
            // The control may have gone away while this was queued.
            if state.disposed.load(Ordering::Acquire) {
                tracing::warn!("skipping repaint of a disposed map control");
            } else if !state.dirty.swap(true, Ordering::AcqRel) {
                ui.wake();
            }
        });
        Ok(())
    }

    /// Reports the outcome of a data fetch.
    ///
    /// Failures are logged and never stop the control; success schedules a
    /// repaint.
    pub fn data_changed(&self, result: Result<(), FetchError>) {
        match result {
            Ok(()) => {
                if let Err(err) = self.request_repaint() {
                    tracing::debug!(%err, "not repainting after data change");
                }
            }
            Err(FetchError::Cancelled) => tracing::warn!("fetching data was cancelled"),
            Err(err) => tracing::warn!(%err, "data fetch failed"),
        }
    }

    /// Returns `true` once the control is disposed.
    pub fn is_disposed(&self) -> bool {
        self.state.disposed.load(Ordering::Acquire)
    }

    pub(crate) fn dispose(&self) {
        self.state.disposed.store(true, Ordering::Release);
        self.state.dirty.store(false, Ordering::Release);
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.state.dirty.load(Ordering::Acquire)
    }

    pub(crate) fn take_dirty(&self) -> bool {
        self.state.dirty.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    use super::*;
    use crate::dispatch::UiDispatcher;

    #[test]
    fn background_request_lands_after_drain() {
        let dispatcher = UiDispatcher::new();
        let handle = RepaintHandle::new(dispatcher.handle());
        let remote = handle.clone();
        thread::spawn(move || remote.request_repaint())
            .join()
            .unwrap()
            .unwrap();

        assert!(!handle.is_dirty());
        dispatcher.drain();
        assert!(handle.take_dirty());
        assert!(!handle.is_dirty());
    }

    #[test]
    fn disposal_race_skips_queued_repaint() {
        let dispatcher = UiDispatcher::new();
        let handle = RepaintHandle::new(dispatcher.handle());
        let remote = handle.clone();
        thread::spawn(move || remote.request_repaint())
            .join()
            .unwrap()
            .unwrap();

        handle.dispose();
        dispatcher.drain();
        assert!(!handle.is_dirty());
        assert_eq!(handle.request_repaint(), Err(ControlError::Disposed));
    }

    #[test]
    fn failed_fetch_does_not_repaint() {
        let dispatcher = UiDispatcher::new();
        let handle = RepaintHandle::new(dispatcher.handle());
        handle.data_changed(Err(FetchError::Failed("timeout".into())));
        handle.data_changed(Err(FetchError::Cancelled));
        assert!(!handle.is_dirty());
        handle.data_changed(Ok(()));
        assert!(handle.is_dirty());
    }

    #[test]
    fn only_the_first_request_after_a_paint_wakes() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let dispatcher = UiDispatcher::with_waker(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let handle = RepaintHandle::new(dispatcher.handle());

        handle.request_repaint().unwrap();
        handle.request_repaint().unwrap();
        assert_eq!(wakes.load(Ordering::SeqCst), 1);

        assert!(handle.take_dirty());
        handle.request_repaint().unwrap();
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }
}
