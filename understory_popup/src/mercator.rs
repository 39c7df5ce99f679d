// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web Mercator viewport.
//!
//! A small stand-in for a map engine's camera: a center coordinate, a
//! fractional zoom level and a view size in pixels. It projects the same way
//! slippy-map renderers do (square world of `tile_size * 2^zoom` pixels), so
//! popup placement computed against it lines up with tiles drawn elsewhere.

use core::f64::consts::{E, PI};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size, Vec2};

use crate::source::Projection;
use crate::types::LngLat;

/// Latitude limit of the square Web Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Tile size used by vector map renderers.
pub const DEFAULT_TILE_SIZE: f64 = 512.0;

const MIN_ZOOM: f64 = 0.0;
const MAX_ZOOM: f64 = 24.0;

/// Web Mercator camera over a view of fixed pixel size.
#[derive(Clone, Debug, PartialEq)]
pub struct MercatorView {
    center: LngLat,
    zoom: f64,
    view_size: Size,
    tile_size: f64,
}

impl MercatorView {
    /// Create a view centered on `center` at `zoom`.
    ///
    /// Zoom is clamped to `[0, 24]` and the center latitude to
    /// ±[`MAX_LATITUDE`].
    #[must_use]
    pub fn new(center: LngLat, zoom: f64, view_size: Size) -> Self {
        let mut view = Self {
            center: LngLat::new(0.0, 0.0),
            zoom: MIN_ZOOM,
            view_size,
            tile_size: DEFAULT_TILE_SIZE,
        };
        view.set_zoom(zoom);
        view.set_center(center);
        view
    }

    /// Use a different tile size (for example 256 for raster tiles).
    #[must_use]
    pub fn with_tile_size(mut self, tile_size: f64) -> Self {
        if tile_size.is_finite() && tile_size > 0.0 {
            self.tile_size = tile_size;
        }
        self
    }

    /// The coordinate at the middle of the view.
    pub fn center(&self) -> LngLat {
        self.center
    }

    /// Move the view so `center` is in the middle.
    pub fn set_center(&mut self, center: LngLat) {
        self.center = LngLat::new(center.lng, clamp_lat(center.lat));
    }

    /// Current zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom level, clamped to `[0, 24]`. Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// View size in pixels.
    pub fn view_size(&self) -> Size {
        self.view_size
    }

    /// Resize the view; the center stays put.
    pub fn set_view_size(&mut self, size: Size) {
        self.view_size = size;
    }

    /// The view rectangle in screen space, anchored at the origin.
    pub fn view_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.view_size)
    }

    /// Edge length of the whole world in pixels at the current zoom.
    pub fn world_size(&self) -> f64 {
        self.tile_size * 2_f64.powf(self.zoom)
    }

    /// Pan by a screen-space delta, as a drag of the map by `-delta` would.
    pub fn pan_by_view(&mut self, delta: Vec2) {
        let center = self.view_size.to_vec2() / 2.0;
        let target = self.unproject(Point::ZERO + center + delta);
        self.set_center(target);
    }

    /// Screen position back to a coordinate.
    pub fn unproject(&self, point: Point) -> LngLat {
        let world = self.world_size();
        let origin = self.world_point(self.center) - self.view_size.to_vec2() / 2.0;
        let p = point + origin.to_vec2();
        let lng = p.x / world * 360.0 - 180.0;
        let y = 180.0 - p.y / world * 360.0;
        let lat = 360.0 / PI * E.powf(y * PI / 180.0).atan() - 90.0;
        LngLat::new(lng, lat)
    }

    /// Position of a coordinate in world pixels at the current zoom.
    fn world_point(&self, at: LngLat) -> Point {
        let world = self.world_size();
        let x = (180.0 + at.lng) / 360.0 * world;
        let lat = clamp_lat(at.lat);
        let merc = (PI / 4.0 + lat * PI / 360.0).tan().ln() * 180.0 / PI;
        let y = (180.0 - merc) / 360.0 * world;
        Point::new(x, y)
    }
}

impl Projection for MercatorView {
    fn project(&self, at: LngLat) -> Point {
        let offset = self.world_point(at) - self.world_point(self.center);
        Point::ZERO + self.view_size.to_vec2() / 2.0 + offset
    }
}

fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn view() -> MercatorView {
        MercatorView::new(LngLat::new(2.35, 48.85), 6.0, Size::new(800.0, 600.0))
    }

    #[test]
    fn center_projects_to_middle_of_view() {
        let v = view();
        let p = v.project(v.center());
        assert!((p.x - 400.0).abs() < EPS);
        assert!((p.y - 300.0).abs() < EPS);
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let v = view();
        let c = v.project(v.center());
        let north = v.project(LngLat::new(2.35, 49.85));
        let east = v.project(LngLat::new(3.35, 48.85));
        assert!(north.y < c.y);
        assert!(east.x > c.x);
    }

    #[test]
    fn one_degree_of_longitude_at_zoom_zero() {
        let v = MercatorView::new(LngLat::new(0.0, 0.0), 0.0, Size::new(512.0, 512.0));
        let a = v.project(LngLat::new(0.0, 0.0));
        let b = v.project(LngLat::new(1.0, 0.0));
        assert!((b.x - a.x - 512.0 / 360.0).abs() < EPS);
        assert!((v.world_size() - 512.0).abs() < EPS);
    }

    #[test]
    fn world_size_doubles_per_zoom_level() {
        let mut v = MercatorView::new(LngLat::new(0.0, 0.0), 3.0, Size::new(100.0, 100.0));
        assert!((v.world_size() - 4096.0).abs() < EPS);
        v.set_zoom(3.5);
        assert!((v.world_size() - 4096.0 * core::f64::consts::SQRT_2).abs() < 1e-6);
        let v = v.with_tile_size(256.0);
        assert!((v.world_size() - 2048.0 * core::f64::consts::SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn unproject_inverts_project() {
        let v = view();
        for at in [
            LngLat::new(2.35, 48.85),
            LngLat::new(-0.12, 51.5),
            LngLat::new(13.4, 52.5),
        ] {
            let back = v.unproject(v.project(at));
            assert!((back.lng - at.lng).abs() < 1e-9, "{at:?} -> {back:?}");
            assert!((back.lat - at.lat).abs() < 1e-9, "{at:?} -> {back:?}");
        }
    }

    #[test]
    fn pan_moves_features_opposite_to_delta() {
        let mut v = view();
        let paris = LngLat::new(2.35, 48.85);
        let before = v.project(paris);
        v.pan_by_view(Vec2::new(100.0, -40.0));
        let after = v.project(paris);
        assert!((after.x - (before.x - 100.0)).abs() < 1e-6);
        assert!((after.y - (before.y + 40.0)).abs() < 1e-6);
    }

    #[test]
    fn zoom_and_latitude_are_clamped() {
        let mut v = MercatorView::new(LngLat::new(0.0, 89.9), 40.0, Size::new(10.0, 10.0));
        assert_eq!(v.zoom(), MAX_ZOOM);
        assert_eq!(v.center().lat, MAX_LATITUDE);
        v.set_zoom(f64::NAN);
        assert_eq!(v.zoom(), MAX_ZOOM);
        v.set_zoom(-3.0);
        assert_eq!(v.zoom(), MIN_ZOOM);
    }
}
