// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the placement engine and whatever renders the map.

use alloc::string::String;

use kurbo::{Affine, Point};

use crate::error::SourceUnavailable;
use crate::types::{Feature, LngLat};

/// Maps geographic coordinates to screen pixels under the current viewport.
pub trait Projection {
    /// Screen position of `at` (origin top-left, y down).
    fn project(&self, at: LngLat) -> Point;
}

/// Treats longitude/latitude as plane `x`/`y` and applies the affine map.
///
/// Useful for non-geographic maps (floor plans, game worlds) and for tests.
impl Projection for Affine {
    #[inline]
    fn project(&self, at: LngLat) -> Point {
        *self * Point::new(at.lng, at.lat)
    }
}

/// Supplies the point features currently visible on the map.
///
/// A source must answer synchronously and consistently for the duration of a
/// single [`update`](crate::PopupManager::update): the manager visits the
/// features once, then projects the survivors through the same source.
pub trait FeatureSource: Projection {
    /// Caller data carried on every [`Feature`].
    type Payload: Clone;

    /// Call `f` once per visible feature, restricted to `layers` when given.
    ///
    /// Order matters only between features of equal rank, where the manager
    /// keeps the order reported here.
    ///
    /// Returns [`SourceUnavailable`] when the source cannot answer yet; the
    /// manager then reports no result and keeps its state.
    fn visit_features<F>(&self, layers: Option<&[String]>, f: F) -> Result<(), SourceUnavailable>
    where
        F: FnMut(Feature<Self::Payload>);
}

impl<T: Projection + ?Sized> Projection for &T {
    fn project(&self, at: LngLat) -> Point {
        (**self).project(at)
    }
}

impl<T: FeatureSource + ?Sized> FeatureSource for &T {
    type Payload = T::Payload;

    fn visit_features<F>(&self, layers: Option<&[String]>, f: F) -> Result<(), SourceUnavailable>
    where
        F: FnMut(Feature<Self::Payload>),
    {
        (**self).visit_features(layers, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    #[test]
    fn affine_projection() {
        let p = Affine::translate(Vec2::new(100.0, 50.0)) * Affine::scale(2.0);
        assert_eq!(p.project(LngLat::new(3.0, 4.0)), Point::new(106.0, 58.0));
        assert_eq!((&p).project(LngLat::new(0.0, 0.0)), Point::new(100.0, 50.0));
    }
}
