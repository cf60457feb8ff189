// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packed buffer allocation, fragmentation, and dirty ranges.
//!
//! Fill a small buffer, free alternating runs, and show that a request larger
//! than any single hole fails even though enough slots are free in total.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p tessera_demos --example buffer_fragmentation`

use tessera_buffer::{BufferError, BufferUsage, PackedBuffer};

fn main() {
    env_logger::init();

    let mut buf = PackedBuffer::<f64>::with_capacity(16).with_usage(BufferUsage::Dynamic);
    let offsets: Vec<usize> = (0..4).map(|_| buf.allocate(4).unwrap()).collect();
    println!("allocated runs at {offsets:?}");

    buf.remove(4, offsets[0]).unwrap();
    buf.remove(4, offsets[2]).unwrap();
    println!(
        "free slots {}, largest run {}",
        buf.free_slots(),
        buf.largest_free()
    );
    match buf.allocate(6) {
        Err(BufferError::Full {
            requested,
            largest_free,
        }) => println!("cannot place {requested} slots, largest hole is {largest_free}"),
        other => panic!("expected a fragmentation failure, got {other:?}"),
    }

    // Write into a live run and publish the change.
    let live = offsets[1];
    buf.as_mut_slice()[live..live + 4].copy_from_slice(&[1.0, 2.0, 3.0, 1e10 + 0.25]);
    buf.mark_dirty(4, live).unwrap();
    buf.for_each_dirty_range(|start, end| println!("dirty [{start}, {end})"));
    let synced = buf.take_dirty();
    assert!(buf.dirty().is_empty());
    println!("acknowledged {} dirty runs", synced.len());

    // High/low f32 pairs preserve more precision than a plain f32 cast.
    let split = buf.split32();
    let (hi, lo) = (split[2 * (live + 3)], split[2 * (live + 3) + 1]);
    println!("1e10 + 0.25 -> hi {hi}, lo {lo}");
}
