// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time configuration: anchor modes and [`PopupOptions`].

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::num::NonZeroUsize;
use core::str::FromStr;

use kurbo::{Size, Vec2};

use crate::error::ConfigError;

/// Which point of the popup rectangle sits on the feature's projected position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PopupAnchor {
    /// The rectangle is centered on the point.
    #[default]
    Center,
    /// The point is at the middle of the bottom edge; the popup sits above it.
    Top,
    /// The point is at the middle of the top edge; the popup hangs below it.
    Bottom,
    /// The point is at the middle of the right edge; the popup sits to its left.
    Left,
    /// The point is at the bottom-left corner; the popup sits up and to its right.
    Right,
}

impl PopupAnchor {
    /// Offset from the projected point to the popup's top-left corner.
    pub fn offset(self, size: Size) -> Vec2 {
        let (w, h) = (size.width, size.height);
        match self {
            Self::Center => Vec2::new(-w / 2.0, -h / 2.0),
            Self::Top => Vec2::new(-w / 2.0, -h),
            Self::Bottom => Vec2::new(-w / 2.0, 0.0),
            Self::Left => Vec2::new(-w, -h / 2.0),
            Self::Right => Vec2::new(0.0, -h),
        }
    }

    /// The lowercase name used by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl FromStr for PopupAnchor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(Self::Center),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(ConfigError::UnknownAnchor(other.to_string())),
        }
    }
}

/// Configuration for a [`PopupManager`](crate::PopupManager).
///
/// Fields are public so callers can use struct update syntax:
///
/// ```rust
/// use kurbo::Size;
/// use understory_popup::{PopupAnchor, PopupOptions};
///
/// let options = PopupOptions {
///     classes: Some(vec!["city".into(), "town".into()]),
///     popup_size: Size::new(140.0, 70.0),
///     popup_anchor: PopupAnchor::Top,
///     ..PopupOptions::default()
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PopupOptions {
    /// Layers to query. `None` queries every layer the source knows.
    pub layers: Option<Vec<String>>,
    /// Feature classes to keep. `None` keeps every class, including unclassified features.
    pub classes: Option<Vec<String>>,
    /// Popup size in screen pixels.
    pub popup_size: Size,
    /// How popups attach to their feature.
    pub popup_anchor: PopupAnchor,
    /// Upper bound on simultaneously displayed popups.
    pub max: Option<NonZeroUsize>,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            layers: None,
            classes: None,
            popup_size: Size::new(150.0, 50.0),
            popup_anchor: PopupAnchor::Center,
            max: None,
        }
    }
}

impl PopupOptions {
    /// Check the options for values the manager cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Size { width, height } = self.popup_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidPopupSize(self.popup_size));
        }
        Ok(())
    }

    /// Whether a feature class passes the class allow-list.
    pub fn accepts_class(&self, class: Option<&str>) -> bool {
        match &self.classes {
            None => true,
            Some(classes) => class.is_some_and(|c| classes.iter().any(|k| k == c)),
        }
    }
}
