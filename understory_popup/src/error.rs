// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::String;

use kurbo::Size;
use thiserror::Error;

/// Invalid [`PopupOptions`](crate::PopupOptions) or anchor name.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The popup size must be finite and strictly positive on both axes.
    #[error("popup size must be finite and positive, got {}x{}", .0.width, .0.height)]
    InvalidPopupSize(Size),

    /// An anchor name that is not one of `center`, `top`, `bottom`, `left`, `right`.
    #[error("unknown popup anchor `{0}`")]
    UnknownAnchor(String),
}

/// The feature source cannot answer right now, for example because the map
/// has no style or viewport yet.
///
/// This is not a failure of the update: callers should simply try again on
/// the next viewport event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Error)]
#[error("feature source is not ready")]
pub struct SourceUnavailable;
