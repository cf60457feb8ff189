// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line strings queried by a viewport.
//!
//! Pack a few line strings, query them with a Kurbo viewport rectangle, edit
//! one, and read back the damaged region and the line-list indices a renderer
//! would upload.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p tessera_demos --example viewport_source`

use kurbo::Rect;
use tessera_index::{Extent, RTreeConfig};
use tessera_source::LineStringSource;

fn main() {
    env_logger::init();

    let mut source = LineStringSource::new(256, 2, RTreeConfig::default()).unwrap();
    let road = source
        .add(&[[0.0, 0.0], [40.0, 0.0], [40.0, 30.0]])
        .unwrap();
    let river = source
        .add(&[[-20.0, 50.0], [10.0, 60.0], [60.0, 55.0]])
        .unwrap();
    let trail = source.add(&[[100.0, 100.0], [120.0, 140.0]]).unwrap();
    let _ = source.commit();

    let viewport = Rect::new(30.0, -10.0, 70.0, 58.0);
    for (offset, line) in source.lines_in_extent(Extent::from(viewport)).unwrap() {
        let name = match offset {
            o if o == road => "road",
            o if o == river => "river",
            _ => "trail",
        };
        println!("{name} at {offset}: {line:?}");
    }

    // Extending the trail moves it to a new offset.
    let trail = source
        .set(trail, &[[100.0, 100.0], [120.0, 140.0], [90.0, 160.0]])
        .unwrap();
    let damage = source.commit();
    if let Some(region) = damage.union() {
        println!("repaint {:?}", region.to_rect());
    }

    println!(
        "trail now at {trail}, indices {:?}",
        source.indices().unwrap()
    );
    for range in source.take_dirty().iter() {
        log::debug!("upload slots [{}, {})", range.offset, range.end());
    }
}
