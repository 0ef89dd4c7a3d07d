// Copyright 2025 the Cartograph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors raised by the map control and its collaborators.
///
/// None of these are fatal: the control logs them and carries on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// The control was disposed; repaints and UI tasks are skipped.
    #[error("the map control has been disposed")]
    Disposed,
    /// An operation needed an initialized viewport.
    #[error("the viewport is not initialized yet")]
    NotInitialized,
    /// The renderer failed to draw a frame.
    #[error("rendering failed: {0}")]
    Render(String),
}

/// Outcome of a failed data fetch, reported by data providers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The fetch was cancelled, typically because the view changed again.
    #[error("fetching data was cancelled")]
    Cancelled,
    /// The fetch failed.
    #[error("an error occurred while fetching data: {0}")]
    Failed(String),
}
