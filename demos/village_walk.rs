//! Village Walk
//!
//! This example demonstrates a live Markov walk between three places.
//!
//! Key concepts:
//! - Building a simulation from a preset
//! - Subscribing to updates published after every mutation
//! - Manual steps, auto-advance and reset
//! - Editing a weight while the walk is running
//!
//! Run with: RUST_LOG=debug cargo run --example village_walk

use markov_walk::config::{RollTiming, SimulationConfig};
use markov_walk::presets::{village_walk, Place};
use markov_walk::UpdateKind;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    println!("=== Village Walk ===\n");

    let simulation = village_walk()
        .config(SimulationConfig {
            roll: RollTiming {
                frames: 4,
                frame_delay_ms: 50,
                reveal_delay_ms: 150,
                settle_delay_ms: 150,
            },
            seed: Some(42),
            ..SimulationConfig::default()
        })
        .build()
        .unwrap();

    let mut updates = simulation.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(update) = updates.recv().await {
            match update.kind {
                UpdateKind::Stepped(outcome) => println!(
                    "  rolled {:>3}: {:?} -> {:?}",
                    outcome.draw, outcome.from, outcome.to
                ),
                UpdateKind::Reset => println!("  reset to {:?}", update.snapshot.current),
                UpdateKind::WeightChanged { from, to, weight } => {
                    println!("  weight {:?} -> {:?} is now {}", from, to, weight)
                }
                UpdateKind::AutoAdvanceChanged { enabled } => {
                    println!("  auto-advance {}", if enabled { "on" } else { "off" })
                }
                _ => {}
            }
        }
    });

    println!("Three manual steps:");
    for _ in 0..3 {
        simulation.step().await;
    }

    println!("\nSchool now always leads home:");
    simulation.set_weight(&Place::School, &Place::Home, 90).unwrap();
    simulation.set_weight(&Place::School, &Place::Park, 10).unwrap();
    simulation.set_weight(&Place::School, &Place::School, 0).unwrap();

    println!("\nAuto-advancing every 500ms for five seconds:");
    simulation.set_interval(Duration::from_millis(500)).unwrap();
    simulation.set_auto_advance(true).unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    simulation.set_auto_advance(false).unwrap();
    tokio::time::sleep(RollTiming::default().total()).await;

    let snapshot = simulation.snapshot();
    println!("\nAfter {} moves:", snapshot.total_moves());
    for place in Place::ALL {
        println!(
            "  {:<6} {:>3} visits ({:.1}%)",
            format!("{:?}", place),
            snapshot.visit_count(place).unwrap_or(0),
            snapshot.visit_share(place).unwrap_or(0.0)
        );
    }
    println!("  recent: {:?}", snapshot.history.to_vec());

    simulation.reset();
    tokio::time::sleep(Duration::from_millis(10)).await;
    drop(simulation);
    printer.abort();

    println!("\n=== Example Complete ===");
}
