// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_popup --heading-base-level=0

//! Understory Popup: rank-ordered, collision-free popups over map features.
//!
//! Maps that annotate places (a temperature bubble next to each city, a
//! price tag next to each listing) cannot show a popup for every feature in
//! view. This crate decides which ones to show and tells the host what
//! changed since the last frame:
//!
//! - A [`FeatureSource`] reports the point features currently visible and
//!   projects coordinates to screen pixels. Map engines implement it around
//!   their rendered-feature query; [`FeatureSnapshot`] is an in-memory one.
//! - [`PopupManager::update`] keeps ranked features, sorts them by rank,
//!   applies the class allow-list and the cap, then accepts them greedily:
//!   a popup is shown unless its rectangle touches one already accepted.
//! - The returned [`PopupStatus`] splits the accepted popups into
//!   [`new`][PopupStatus::new] and [`updated`][PopupStatus::updated] ones, and
//!   lists the popups that disappeared in [`removed`][PopupStatus::removed].
//!   Hosts patch existing visuals for updated ids instead of rebuilding them;
//!   [`PopupLayer`] does that bookkeeping for them.
//!
//! The manager runs synchronously and keeps only the previous accepted set
//! between calls. When the source is not ready, `update` returns `None` and
//! changes nothing; call it again on the next viewport event.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Affine, Size};
//! use understory_popup::{
//!     Feature, FeatureSnapshot, LngLat, PopupAnchor, PopupManager, PopupOptions,
//! };
//!
//! // Plane coordinates map straight to pixels here.
//! let mut places = FeatureSnapshot::new(Affine::IDENTITY);
//! places.push("towns", Feature::new(1, LngLat::new(50.0, 50.0), "Arles").with_rank(1.0));
//! places.push("towns", Feature::new(2, LngLat::new(52.0, 52.0), "Nîmes").with_rank(2.0));
//!
//! let options = PopupOptions {
//!     popup_size: Size::new(10.0, 10.0),
//!     popup_anchor: PopupAnchor::Top,
//!     ..PopupOptions::default()
//! };
//! let mut popups = PopupManager::new(places, options).unwrap();
//!
//! // The two popups overlap; the better-ranked one wins.
//! let status = popups.update().unwrap();
//! assert_eq!(status.new.ids().collect::<Vec<_>>(), [1]);
//!
//! // Same view again: the popup is still there, now as an update.
//! let status = popups.update().unwrap();
//! assert!(status.new.is_empty());
//! assert_eq!(status.updated.ids().collect::<Vec<_>>(), [1]);
//!
//! // The first town leaves the view; the second one takes its place.
//! popups.source_mut().remove(1);
//! let status = popups.update().unwrap();
//! assert_eq!(status.new.ids().collect::<Vec<_>>(), [2]);
//! assert_eq!(status.removed.ids().collect::<Vec<_>>(), [1]);
//! ```
//!
//! ## Geographic maps
//!
//! [`MercatorView`] projects longitude/latitude the way slippy-map renderers
//! do, and [`FeatureSnapshot::with_view`] culls features to its view
//! rectangle:
//!
//! ```rust
//! use kurbo::{Size, Vec2};
//! use understory_popup::{
//!     Feature, FeatureSnapshot, LngLat, MercatorView, PopupManager, PopupOptions,
//! };
//!
//! let view = MercatorView::new(LngLat::new(4.8, 45.7), 7.0, Size::new(800.0, 600.0));
//! let mut places = FeatureSnapshot::with_view(view);
//! places.push("cities", Feature::new(10, LngLat::new(4.84, 45.76), ()).with_rank(1.0));
//! places.push("cities", Feature::new(11, LngLat::new(5.72, 45.19), ()).with_rank(2.0));
//!
//! let mut popups = PopupManager::new(places, PopupOptions::default()).unwrap();
//! assert_eq!(popups.update().unwrap().new.len(), 2);
//!
//! // Drag the map; both popups move and are reported as updates.
//! popups.source_mut().projection_mut().pan_by_view(Vec2::new(30.0, 0.0));
//! assert_eq!(popups.update().unwrap().updated.len(), 2);
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: enables `std` support for `kurbo`.
//! - `libm`: `no_std` float math for `kurbo` (needed by [`MercatorView`]).
//! - `occupancy_grid` *(default)*: [`GridOccupancy`] and
//!   [`PopupManager::with_grid`], a grid broad phase for large caps. It pulls
//!   in `smallvec`.
//!
//! Logging goes through the `log` facade: one `debug` record per update and a
//! `trace` record per rejected feature. For structured per-feature reasons use
//! [`PopupManager::update_with_trace`] with a [`PlacementTrace`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod collision;
mod error;
mod layer;
mod manager;
mod mercator;
pub mod occupancy;
mod options;
mod snapshot;
mod source;
mod status;
mod trace;
mod types;

pub use collision::{Occupancy, rects_overlap};
pub use error::{ConfigError, SourceUnavailable};
pub use layer::{PopupLayer, PopupView};
pub use manager::PopupManager;
pub use mercator::{DEFAULT_TILE_SIZE, MAX_LATITUDE, MercatorView};
pub use occupancy::FlatOccupancy;
#[cfg(feature = "occupancy_grid")]
pub use occupancy::GridOccupancy;
pub use options::{PopupAnchor, PopupOptions};
pub use snapshot::FeatureSnapshot;
pub use source::{FeatureSource, Projection};
pub use status::{PopupChange, PopupList, PopupStatus};
pub use trace::{PlacementTally, PlacementTrace, Rejection};
pub use types::{Feature, LngLat, Popup, PopupId};
