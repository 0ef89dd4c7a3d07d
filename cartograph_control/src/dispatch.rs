// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Running work on the UI thread.
//!
//! A [`UiDispatcher`] is created on the UI thread and drained by its event
//! loop. [`UiHandle`]s are cheap to clone and may be sent anywhere; work
//! submitted from the UI thread itself runs inline, work from other threads
//! is queued until the next [`UiDispatcher::drain`].
//!
//! An event loop that sleeps while idle installs a [`UiWaker`] so it learns
//! when there is something to drain or to paint.

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, ThreadId};

type Task = Box<dyn FnOnce() + Send>;

/// Host callback that wakes the UI event loop; may be called from any thread.
pub type UiWaker = Arc<dyn Fn() + Send + Sync>;

/// Owner side of the UI task queue. Lives on the UI thread.
pub struct UiDispatcher {
    thread: ThreadId,
    sender: Sender<Task>,
    receiver: Receiver<Task>,
    waker: Option<UiWaker>,
}

impl fmt::Debug for UiDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiDispatcher")
            .field("thread", &self.thread)
            .field("waker", &self.waker.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for UiDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl UiDispatcher {
    /// Creates a dispatcher bound to the calling thread.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            thread: thread::current().id(),
            sender,
            receiver,
            waker: None,
        }
    }

    /// Creates a dispatcher bound to the calling thread that calls `waker`
    /// whenever work is queued or a repaint becomes due.
    pub fn with_waker(waker: UiWaker) -> Self {
        Self {
            waker: Some(waker),
            ..Self::new()
        }
    }

    /// Returns a handle for submitting work.
    pub fn handle(&self) -> UiHandle {
        UiHandle {
            thread: self.thread,
            sender: self.sender.clone(),
            waker: self.waker.clone(),
        }
    }

    /// Runs every queued task; returns how many ran.
    pub fn drain(&self) -> usize {
        let mut count = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            count += 1;
        }
        count
    }
}

/// Submits work to the UI thread from anywhere.
#[derive(Clone)]
pub struct UiHandle {
    thread: ThreadId,
    sender: Sender<Task>,
    waker: Option<UiWaker>,
}

impl fmt::Debug for UiHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiHandle")
            .field("thread", &self.thread)
            .field("waker", &self.waker.is_some())
            .finish_non_exhaustive()
    }
}

impl UiHandle {
    /// Returns `true` when called on the UI thread.
    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.thread
    }

    /// Runs `task` now if on the UI thread, otherwise queues it.
    ///
    /// Queued tasks wake the event loop. Tasks queued after the dispatcher
    /// is dropped are discarded.
    pub fn run_on_ui_thread(&self, task: impl FnOnce() + Send + 'static) {
        if self.is_ui_thread() {
            task();
        } else if self.sender.send(Box::new(task)).is_err() {
            tracing::debug!("UI dispatcher is gone; dropping task");
        } else {
            self.wake();
        }
    }

    /// Calls the host's waker, if one is installed.
    pub(crate) fn wake(&self) {
        if let Some(waker) = &self.waker {
            waker();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;

    #[test]
    fn runs_inline_on_ui_thread() {
        let dispatcher = UiDispatcher::new();
        let ran = Arc::new(AtomicUsize::new(0));
        let counter = ran.clone();
        dispatcher.handle().run_on_ui_thread(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.drain(), 0);
    }

    #[test]
    fn queues_from_other_threads_until_drained() {
        let dispatcher = UiDispatcher::new();
        let handle = dispatcher.handle();
        let ran = Arc::new(AtomicUsize::new(0));
        let counter = ran.clone();
        thread::spawn(move || {
            assert!(!handle.is_ui_thread());
            handle.run_on_ui_thread(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        })
        .join()
        .unwrap();

        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(dispatcher.drain(), 1);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn queued_work_wakes_the_event_loop() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let dispatcher = UiDispatcher::with_waker(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        // Inline work needs no wake-up.
        dispatcher.handle().run_on_ui_thread(|| {});
        assert_eq!(wakes.load(Ordering::SeqCst), 0);

        let handle = dispatcher.handle();
        thread::spawn(move || handle.run_on_ui_thread(|| {}))
            .join()
            .unwrap();
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.drain(), 1);
    }
}
