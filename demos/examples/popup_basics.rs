// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popups over a panning Mercator map.
//!
//! This example shows how to combine:
//! - `FeatureSnapshot` as the visible-feature query of a slippy map,
//! - `PopupManager` for rank-ordered, non-overlapping placement,
//! - `PopupLayer` to keep one "visual" per shown popup in sync with each diff.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example popup_basics`

use kurbo::{Point, Size, Vec2};
use understory_popup::{
    Feature, FeatureSnapshot, LngLat, MercatorView, PlacementTally, Popup, PopupAnchor,
    PopupLayer, PopupManager, PopupOptions, PopupView, Rejection,
};

/// Caller payload: what the popup should say.
#[derive(Clone, Debug)]
struct City {
    name: &'static str,
    population_k: u32,
}

/// A stand-in for a renderer: prints what it would do to the screen.
#[derive(Default)]
struct Console {
    next_node: u32,
}

impl PopupView<City> for Console {
    type Handle = u32;

    fn create(&mut self, popup: &Popup<City>) -> u32 {
        self.next_node += 1;
        println!(
            "  + node {} {:<10} at ({:.0}, {:.0})",
            self.next_node, popup.feature.properties.name, popup.position.x, popup.position.y
        );
        self.next_node
    }

    fn update(&mut self, popup: &Popup<City>, node: &mut u32) {
        println!(
            "  ~ node {} {:<10} -> ({:.0}, {:.0})",
            node, popup.feature.properties.name, popup.position.x, popup.position.y
        );
    }

    fn remove(&mut self, popup: &Popup<City>, node: u32) {
        println!("  - node {} {}", node, popup.feature.properties.name);
    }
}

fn cities() -> Vec<Feature<City>> {
    // Rank: lower shows first. Here, bigger cities rank better.
    let raw = [
        (1, "Paris", 2.35, 48.86, 2_100),
        (2, "Lyon", 4.84, 45.76, 520),
        (3, "Marseille", 5.37, 43.30, 870),
        (4, "Toulouse", 1.44, 43.60, 500),
        (5, "Nice", 7.26, 43.70, 340),
        (6, "Nantes", -1.55, 47.22, 320),
        (7, "Bordeaux", -0.58, 44.84, 260),
        (8, "Lille", 3.06, 50.63, 235),
        (9, "Grenoble", 5.72, 45.19, 160),
        (10, "Dijon", 5.04, 47.32, 160),
        (11, "Geneva", 6.14, 46.20, 200),
        (12, "Turin", 7.69, 45.07, 850),
    ];
    raw.into_iter()
        .map(|(id, name, lng, lat, population_k)| {
            let city = City { name, population_k };
            Feature::new(id, LngLat::new(lng, lat), city)
                .with_rank(1.0 / f64::from(population_k))
                .with_class(if population_k >= 500 { "major" } else { "minor" })
        })
        .collect()
}

fn main() {
    env_logger::init();

    let view = MercatorView::new(LngLat::new(3.0, 46.5), 5.5, Size::new(900.0, 700.0));
    let mut snapshot = FeatureSnapshot::with_view(view);
    for city in cities() {
        snapshot.push("cities", city);
    }

    let options = PopupOptions {
        popup_size: Size::new(110.0, 36.0),
        popup_anchor: PopupAnchor::Bottom,
        ..PopupOptions::default()
    };
    let mut popups = match PopupManager::new(snapshot, options) {
        Ok(m) => m,
        Err(err) => {
            eprintln!("bad popup options: {err}");
            return;
        }
    };

    let mut layer = PopupLayer::new();
    let mut console = Console::default();
    let mut tally = PlacementTally::new();

    let pans = [
        Vec2::ZERO,
        Vec2::new(120.0, 0.0),
        Vec2::new(120.0, 60.0),
        Vec2::new(-300.0, -40.0),
    ];
    for (frame, pan) in pans.into_iter().enumerate() {
        popups.source_mut().projection_mut().pan_by_view(pan);
        let center = popups.source().projection().center();
        println!("frame {frame}: center ({:.2}, {:.2})", center.lng, center.lat);

        let Some(status) = popups.update_with_trace(&mut tally) else {
            println!("  source not ready");
            continue;
        };
        layer.apply(&status, &mut console);

        let names: Vec<_> = popups
            .present()
            .iter()
            .map(|p| {
                let city = &p.feature.properties;
                format!("{} ({}k)", city.name, city.population_k)
            })
            .collect();
        println!("  showing {}: {}", names.len(), names.join(", "));
    }

    println!(
        "totals: {} new, {} updated, {} removed, {} lost to collisions",
        tally.new,
        tally.updated,
        tally.removed,
        tally.rejected_for(Rejection::Collision)
    );

    // Geographic position under the middle of the screen.
    let view = popups.source().projection();
    let middle = Point::new(view.view_size().width / 2.0, view.view_size().height / 2.0);
    let under = view.unproject(middle);
    println!("view middle is at ({:.2}, {:.2})", under.lng, under.lat);

    // Tear everything down, as on a style switch.
    popups.clear();
    for (id, node) in layer.clear() {
        println!("  - node {node} (popup {id}) on teardown");
    }
}
