// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: feature identity, geographic coordinates, candidates and placed popups.

use alloc::string::String;

use kurbo::{Point, Rect, Size};

use crate::collision::rects_overlap;

/// Stable identity of a feature, and of the popup placed for it.
///
/// Map engines usually hand these out per vector-tile feature; the same
/// feature keeps its id while it stays loaded.
pub type PopupId = u64;

/// Geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LngLat {
    /// Longitude, east positive.
    pub lng: f64,
    /// Latitude, north positive.
    pub lat: f64,
}

impl LngLat {
    /// Create a coordinate from longitude and latitude.
    #[inline]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Whether both components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

/// A point feature reported by a [`FeatureSource`](crate::FeatureSource).
///
/// Features are produced fresh for every update. Anything the source could
/// not fill in is `None`; the engine discards such features instead of
/// failing the whole update.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature<P> {
    /// Feature identity. Features without one cannot be tracked across frames.
    pub id: Option<PopupId>,
    /// Point geometry.
    pub coordinate: Option<LngLat>,
    /// Priority; lower values win. Zero and NaN count as "no rank".
    pub rank: Option<f64>,
    /// Classification label, matched against [`PopupOptions::classes`](crate::PopupOptions::classes).
    pub class: Option<String>,
    /// Caller payload carried through to the placed [`Popup`].
    pub properties: P,
}

impl<P> Feature<P> {
    /// Create an unranked, unclassified feature.
    pub fn new(id: PopupId, coordinate: LngLat, properties: P) -> Self {
        Self {
            id: Some(id),
            coordinate: Some(coordinate),
            rank: None,
            class: None,
            properties,
        }
    }

    /// Set the rank.
    #[must_use]
    pub fn with_rank(mut self, rank: f64) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Set the class label.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// The rank if it makes the feature eligible for placement.
    ///
    /// A rank counts only when it is present, non-zero, and not NaN.
    #[inline]
    pub fn effective_rank(&self) -> Option<f64> {
        self.rank.filter(|r| *r != 0.0 && !r.is_nan())
    }
}

/// A popup placed on screen for one feature.
#[derive(Clone, Debug, PartialEq)]
pub struct Popup<P> {
    /// Identity, copied from the feature.
    pub id: PopupId,
    /// Top-left corner in screen space (y grows downward).
    pub position: Point,
    /// Size in screen space, shared by every popup of one manager.
    pub size: Size,
    /// The feature this popup was placed for.
    pub feature: Feature<P>,
}

impl<P> Popup<P> {
    /// Screen-space bounding rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Whether the two popups overlap. Touching edges count as overlap.
    #[inline]
    pub fn collides(&self, other: &Self) -> bool {
        rects_overlap(&self.rect(), &other.rect())
    }
}
