// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The placement-and-diff engine.

use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashSet;
use kurbo::Vec2;

use crate::collision::Occupancy;
use crate::error::ConfigError;
use crate::occupancy::FlatOccupancy;
#[cfg(feature = "occupancy_grid")]
use crate::occupancy::GridOccupancy;
use crate::options::PopupOptions;
use crate::source::FeatureSource;
use crate::status::{PopupChange, PopupList, PopupStatus};
use crate::trace::{PlacementTrace, Rejection};
use crate::types::{Feature, Popup, PopupId};

/// Places popups over the features of a [`FeatureSource`] and diffs each
/// placement against the previous one.
///
/// Call [`update`][Self::update] whenever the viewport changes. Each call
/// takes a fresh snapshot of the source, picks a non-overlapping subset of
/// features greedily in rank order, and reports which popups appeared, stayed,
/// or disappeared since the previous call.
///
/// `O` selects the collision broad phase; it does not change the result.
pub struct PopupManager<S: FeatureSource, O = FlatOccupancy> {
    source: S,
    options: PopupOptions,
    anchor_offset: Vec2,
    occupancy: O,
    /// Popups accepted by the last successful update.
    present: PopupList<S::Payload>,
    // Scratch reused across updates.
    candidates: Vec<Feature<S::Payload>>,
    seen: HashSet<PopupId>,
}

impl<S, O> Debug for PopupManager<S, O>
where
    S: FeatureSource + Debug,
    O: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PopupManager")
            .field("source", &self.source)
            .field("options", &self.options)
            .field("occupancy", &self.occupancy)
            .field("present", &self.present.len())
            .finish_non_exhaustive()
    }
}

impl<S: FeatureSource> PopupManager<S> {
    /// Create a manager that tests collisions with a linear scan.
    pub fn new(source: S, options: PopupOptions) -> Result<Self, ConfigError> {
        Self::with_occupancy(source, options, FlatOccupancy::new())
    }
}

#[cfg(feature = "occupancy_grid")]
impl<S: FeatureSource> PopupManager<S, GridOccupancy> {
    /// Create a manager that tests collisions on a grid sized to the popups.
    ///
    /// Prefer this when the cap allows hundreds of popups on screen.
    pub fn with_grid(source: S, options: PopupOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let cell = options.popup_size.width.max(options.popup_size.height);
        Self::with_occupancy(source, options, GridOccupancy::new(cell))
    }
}

impl<S: FeatureSource, O: Occupancy> PopupManager<S, O> {
    /// Create a manager with an explicit occupancy backend.
    ///
    /// The backend is cleared and fitted to the configured popup size.
    pub fn with_occupancy(
        source: S,
        options: PopupOptions,
        mut occupancy: O,
    ) -> Result<Self, ConfigError> {
        options.validate()?;
        occupancy.clear();
        occupancy.fit_popup_size(options.popup_size);
        Ok(Self {
            source,
            anchor_offset: options.popup_anchor.offset(options.popup_size),
            options,
            occupancy,
            present: PopupList::new(),
            candidates: Vec::new(),
            seen: HashSet::new(),
        })
    }

    /// Recompute placement for the current viewport.
    ///
    /// Returns `None` when the source is not ready. That is not an error: the
    /// manager's state is left untouched and the caller should try again on
    /// the next viewport event.
    pub fn update(&mut self) -> Option<PopupStatus<S::Payload>> {
        self.update_with_trace(&mut ())
    }

    /// Like [`update`][Self::update], reporting every decision to `trace`.
    pub fn update_with_trace<T>(&mut self, trace: &mut T) -> Option<PopupStatus<S::Payload>>
    where
        T: PlacementTrace + ?Sized,
    {
        let Self {
            source,
            options,
            anchor_offset,
            occupancy,
            present,
            candidates,
            seen,
        } = self;

        candidates.clear();
        if source
            .visit_features(options.layers.as_deref(), |f| candidates.push(f))
            .is_err()
        {
            log::debug!(
                "feature source unavailable; keeping {} popups",
                present.len()
            );
            return None;
        }
        let visited = candidates.len();

        candidates.retain(|f| match eligibility(f) {
            Ok(()) => true,
            Err(reason) => {
                reject(trace, f.id, reason);
                false
            }
        });

        // Stable, so equal ranks keep the source's order.
        candidates.sort_by(|a, b| sort_rank(a).total_cmp(&sort_rank(b)));

        candidates.retain(|f| {
            let keep = options.accepts_class(f.class.as_deref());
            if !keep {
                reject(trace, f.id, Rejection::ClassFiltered);
            }
            keep
        });

        seen.clear();
        candidates.retain(|f| {
            let keep = f.id.is_some_and(|id| seen.insert(id));
            if !keep {
                reject(trace, f.id, Rejection::DuplicateId);
            }
            keep
        });

        if let Some(max) = options.max
            && candidates.len() > max.get()
        {
            for f in candidates.drain(max.get()..) {
                reject(trace, f.id, Rejection::OverCap);
            }
        }

        occupancy.clear();
        let previous = core::mem::take(present);
        let mut status = PopupStatus::default();

        for feature in candidates.drain(..) {
            let (Some(id), Some(at)) = (feature.id, feature.coordinate) else {
                continue;
            };
            let anchor = source.project(at);
            if !(anchor.x.is_finite() && anchor.y.is_finite()) {
                reject(trace, Some(id), Rejection::NonFiniteProjection);
                continue;
            }
            let popup = Popup {
                id,
                position: anchor + *anchor_offset,
                size: options.popup_size,
                feature,
            };
            let rect = popup.rect();
            if occupancy.collides(&rect) {
                reject(trace, Some(id), Rejection::Collision);
                continue;
            }
            occupancy.insert(rect);

            let change = if previous.contains(id) {
                PopupChange::Updated
            } else {
                PopupChange::New
            };
            trace.accepted(id, rect, change);
            present.push(popup.clone());
            if change == PopupChange::New {
                status.new.push(popup);
            } else {
                status.updated.push(popup);
            }
        }

        for popup in previous {
            if !present.contains(popup.id) {
                trace.removed(popup.id);
                status.removed.push(popup);
            }
        }

        log::debug!(
            "placed {} of {} features: {} new, {} updated, {} removed",
            present.len(),
            visited,
            status.new.len(),
            status.updated.len(),
            status.removed.len()
        );
        Some(status)
    }

    /// Popups shown after the last successful update, in rank order.
    pub fn present(&self) -> &PopupList<S::Payload> {
        &self.present
    }

    /// Forget what is shown and return it.
    ///
    /// Use this when the host tears down its visuals (for example on a style
    /// change). The next update reports every accepted popup as new and
    /// nothing as removed.
    pub fn clear(&mut self) -> PopupList<S::Payload> {
        core::mem::take(&mut self.present)
    }

    /// The collision backend.
    pub fn occupancy(&self) -> &O {
        &self.occupancy
    }

    /// The options the manager was built with.
    pub fn options(&self) -> &PopupOptions {
        &self.options
    }

    /// Offset from a projected feature to its popup's top-left corner.
    pub fn anchor_offset(&self) -> Vec2 {
        self.anchor_offset
    }

    /// The feature source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the feature source, for example to move its viewport.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

fn reject<T: PlacementTrace + ?Sized>(trace: &mut T, id: Option<PopupId>, reason: Rejection) {
    log::trace!("feature {id:?} rejected: {reason}");
    trace.rejected(id, reason);
}

fn eligibility<P>(f: &Feature<P>) -> Result<(), Rejection> {
    if f.id.is_none() {
        return Err(Rejection::MissingId);
    }
    if !f.coordinate.is_some_and(|c| c.is_finite()) {
        return Err(Rejection::MissingCoordinate);
    }
    if f.effective_rank().is_none() {
        return Err(Rejection::Unranked);
    }
    Ok(())
}

/// Rank used for ordering; only called on eligible features.
fn sort_rank<P>(f: &Feature<P>) -> f64 {
    f.effective_rank().unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PopupAnchor;
    use crate::snapshot::FeatureSnapshot;
    use crate::trace::PlacementTally;
    use crate::types::LngLat;
    use alloc::vec;
    use core::num::NonZeroUsize;
    use kurbo::{Affine, Point, Size};

    type Snapshot = FeatureSnapshot<(), Affine>;

    fn ranked(id: PopupId, x: f64, y: f64, rank: f64) -> Feature<()> {
        Feature::new(id, LngLat::new(x, y), ()).with_rank(rank)
    }

    fn manager(features: &[Feature<()>], options: PopupOptions) -> PopupManager<Snapshot> {
        let mut snapshot = FeatureSnapshot::new(Affine::IDENTITY);
        for f in features {
            snapshot.push("places", f.clone());
        }
        PopupManager::new(snapshot, options).unwrap()
    }

    fn ids(list: &PopupList<()>) -> Vec<PopupId> {
        list.ids().collect()
    }

    fn small() -> PopupOptions {
        PopupOptions {
            popup_size: Size::new(10.0, 10.0),
            popup_anchor: PopupAnchor::Top,
            ..PopupOptions::default()
        }
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = PopupOptions {
            popup_size: Size::new(0.0, 10.0),
            ..PopupOptions::default()
        };
        let snapshot = Snapshot::new(Affine::IDENTITY);
        assert!(matches!(
            PopupManager::new(snapshot, options),
            Err(ConfigError::InvalidPopupSize(_))
        ));
    }

    #[test]
    fn anchor_offset_positions_popup() {
        let mut m = manager(&[ranked(1, 50.0, 50.0, 1.0)], small());
        let status = m.update().unwrap();
        let popup = status.new.get(1).unwrap();
        assert_eq!(popup.position, Point::new(45.0, 40.0));
        assert_eq!(popup.size, Size::new(10.0, 10.0));
        assert_eq!(m.anchor_offset(), Vec2::new(-5.0, -10.0));
    }

    #[test]
    fn malformed_and_unranked_features_are_skipped() {
        let mut no_id = ranked(1, 0.0, 0.0, 1.0);
        no_id.id = None;
        let mut no_coord = ranked(2, 0.0, 0.0, 1.0);
        no_coord.coordinate = None;
        let nan_coord = ranked(3, f64::NAN, 0.0, 1.0);
        let unranked = Feature::new(4, LngLat::new(100.0, 0.0), ());
        let zero_rank = ranked(5, 200.0, 0.0, 0.0);
        let good = ranked(6, 300.0, 0.0, 2.0);

        let mut m = manager(
            &[no_id, no_coord, nan_coord, unranked, zero_rank, good],
            small(),
        );
        let mut tally = PlacementTally::new();
        let status = m.update_with_trace(&mut tally).unwrap();
        assert_eq!(ids(&status.new), [6]);
        assert_eq!(tally.rejected_for(Rejection::MissingId), 1);
        assert_eq!(tally.rejected_for(Rejection::MissingCoordinate), 2);
        assert_eq!(tally.rejected_for(Rejection::Unranked), 2);
        assert_eq!(tally.new, 1);
    }

    #[test]
    fn class_filter_applies() {
        let features = [
            ranked(1, 0.0, 0.0, 1.0).with_class("hamlet"),
            ranked(2, 100.0, 0.0, 2.0).with_class("city"),
            ranked(3, 200.0, 0.0, 3.0),
        ];
        let options = PopupOptions {
            classes: Some(vec!["city".into()]),
            ..small()
        };
        let mut m = manager(&features, options);
        let status = m.update().unwrap();
        assert_eq!(ids(&status.new), [2]);
    }

    #[test]
    fn duplicate_ids_keep_best_rank() {
        let features = [ranked(7, 0.0, 0.0, 5.0), ranked(7, 100.0, 0.0, 1.0)];
        let mut m = manager(&features, small());
        let mut tally = PlacementTally::new();
        let status = m.update_with_trace(&mut tally).unwrap();
        assert_eq!(status.new.len(), 1);
        assert_eq!(status.new.get(7).unwrap().position.x, 95.0);
        assert_eq!(tally.rejected_for(Rejection::DuplicateId), 1);
    }

    #[test]
    fn cap_counts_before_collisions() {
        // Rank 1 and 2 collide; the cap of 2 is spent on them, so rank 3 never gets a chance.
        let features = [
            ranked(1, 0.0, 0.0, 1.0),
            ranked(2, 2.0, 2.0, 2.0),
            ranked(3, 100.0, 100.0, 3.0),
        ];
        let options = PopupOptions {
            max: NonZeroUsize::new(2),
            ..small()
        };
        let mut m = manager(&features, options);
        let mut tally = PlacementTally::new();
        let status = m.update_with_trace(&mut tally).unwrap();
        assert_eq!(ids(&status.new), [1]);
        assert_eq!(tally.rejected_for(Rejection::Collision), 1);
        assert_eq!(tally.rejected_for(Rejection::OverCap), 1);
    }

    #[test]
    fn equal_ranks_keep_source_order() {
        let features = [ranked(9, 0.0, 0.0, 1.0), ranked(4, 3.0, 0.0, 1.0)];
        let mut m = manager(&features, small());
        assert_eq!(ids(&m.update().unwrap().new), [9]);
    }

    #[test]
    fn non_finite_projection_is_rejected() {
        let mut snapshot = FeatureSnapshot::new(Affine::scale(f64::INFINITY));
        snapshot.push("places", ranked(1, 1.0, 1.0, 1.0));
        let mut m = PopupManager::new(snapshot, small()).unwrap();
        let mut tally = PlacementTally::new();
        let status = m.update_with_trace(&mut tally).unwrap();
        assert!(status.is_empty());
        assert_eq!(tally.rejected_for(Rejection::NonFiniteProjection), 1);
    }

    #[test]
    fn unavailable_source_keeps_state() {
        let mut m = manager(&[ranked(1, 0.0, 0.0, 1.0)], small());
        assert_eq!(ids(&m.update().unwrap().new), [1]);

        m.source_mut().set_ready(false);
        assert!(m.update().is_none());
        assert_eq!(ids(m.present()), [1]);

        m.source_mut().set_ready(true);
        let status = m.update().unwrap();
        assert!(status.new.is_empty());
        assert_eq!(ids(&status.updated), [1]);
    }

    #[test]
    fn clear_restarts_tracking() {
        let mut m = manager(&[ranked(1, 0.0, 0.0, 1.0)], small());
        let _ = m.update();
        let shown = m.clear();
        assert_eq!(ids(&shown), [1]);
        assert!(m.present().is_empty());

        let status = m.update().unwrap();
        assert_eq!(ids(&status.new), [1]);
        assert!(status.removed.is_empty());
    }

    #[test]
    fn layers_are_forwarded_to_source() {
        let mut snapshot = FeatureSnapshot::new(Affine::IDENTITY);
        snapshot.push("towns", ranked(1, 0.0, 0.0, 1.0));
        snapshot.push("lakes", ranked(2, 100.0, 0.0, 1.0));
        let options = PopupOptions {
            layers: Some(vec!["towns".into()]),
            ..small()
        };
        let mut m = PopupManager::new(snapshot, options).unwrap();
        assert_eq!(ids(&m.update().unwrap().new), [1]);
    }

    #[cfg(feature = "occupancy_grid")]
    #[test]
    fn tiny_grid_cells_are_fitted_to_popups() {
        let snapshot = Snapshot::new(Affine::IDENTITY);
        let options = PopupOptions {
            popup_size: Size::new(120.0, 30.0),
            ..PopupOptions::default()
        };
        let m = PopupManager::with_occupancy(snapshot, options, GridOccupancy::new(1e-6)).unwrap();
        assert_eq!(m.occupancy().cell_size(), 120.0);
    }

    #[cfg(feature = "occupancy_grid")]
    #[test]
    fn grid_manager_matches_flat_manager() {
        let mut features = Vec::new();
        for i in 0..300_u32 {
            let x = f64::from((i * 71) % 640);
            let y = f64::from((i * 29) % 480);
            features.push(ranked(u64::from(i), x, y, f64::from(1 + i % 17)));
        }
        let options = PopupOptions {
            popup_size: Size::new(40.0, 18.0),
            ..PopupOptions::default()
        };
        let mut flat = manager(&features, options.clone());
        let mut snapshot = FeatureSnapshot::new(Affine::IDENTITY);
        for f in &features {
            snapshot.push("places", f.clone());
        }
        let mut grid = PopupManager::with_grid(snapshot, options).unwrap();

        let a = flat.update().unwrap();
        let b = grid.update().unwrap();
        assert_eq!(a.new, b.new);
        assert!(!a.new.is_empty());
    }
}
