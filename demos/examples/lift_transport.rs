// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lift transport.
//!
//! Drive the lift up to a bundle, pick it up in transport mode, carry it,
//! and watch a blocked move get rejected.
//!
//! Run:
//! - `RUST_LOG=lift_transport=info,yard_engine=debug cargo run -p yard_demos --example lift_transport`

use kurbo::Point;
use tracing_subscriber::EnvFilter;
use yard_engine::{LiftCommand, Yard, YardError};

fn main() -> Result<(), YardError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut yard = Yard::new();
    let load = yard.create_bundle(Point::new(0.0, -10.0))?;
    let wall = yard.create_bundle(Point::new(0.0, 20.0))?;

    let target = yard.move_lift_to_bundle()?;
    assert_eq!(target, load);
    println!("parked at {:?}", yard.lift_dto());

    // The body now touches the load, which rests on the arms.
    println!("carried group: {:?}", yard.carried_group());
    assert_eq!(
        yard.move_lift_forward(),
        Err(YardError::CollidesWithBundle(load))
    );

    yard.set_transport_mode(true);
    let mut steps = 0;
    while yard.command_lift(LiftCommand::MoveForward).is_ok() {
        steps += 1;
    }
    tracing::info!(steps, %wall, "transport stopped");
    println!("carried the load {steps} steps before reaching {wall}");
    if let Some(b) = yard.bundle(load) {
        println!("load now at ({:.1}, {:.1})", b.footprint.center.x, b.footprint.center.y);
    }

    // Back away from the wall before turning with the load.
    for _ in 0..5 {
        yard.move_lift_backward()?;
    }
    for _ in 0..6 {
        yard.turn_lift_right()?;
    }
    yard.set_transport_mode(false);
    yard.move_lift_backward()?;
    println!("lift after backing off: {:?}", yard.lift_dto());

    while yard.can_undo() {
        yard.undo()?;
    }
    tracing::info!(redo = yard.history().redo_len(), "history unwound");
    println!("back to the start, {} bundles", yard.bundle_count());
    Ok(())
}
