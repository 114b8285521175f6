//! Headless swarm demo.
//!
//! A ring of static pillars and a swarm of drifting circles. Each step the
//! swarm is re-registered, collisions are collected, and bodies that touch a
//! pillar bounce back. Set `RUST_LOG=radyx_grid=debug` to see per-step
//! broad-phase summaries.
//!
//! Run with: `cargo run --example swarm`

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use radyx_grid::prelude::*;

const WORLD: usize = 400;
const PILLAR_RADIUS: f64 = 12.0;
const SWARM_RADIUS: f64 = 3.0;
const STEPS: usize = 240;

/// Entity indices below this are pillars.
const FIRST_MOVER: usize = 1_000;

struct Mover {
    pos: Vector2,
    vel: Vector2,
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let mut physics = GridPhysics::with_config(GridConfig {
        size: WORLD,
        cell_size: 20,
        ..Default::default()
    })?;

    // Static layer: 16 pillars on a circle around the centre.
    let centre = WORLD as f64 / 2.0;
    for i in 0..16 {
        let angle = i as f64 / 16.0 * std::f64::consts::TAU;
        let pos = Vector2::new(centre + 120.0 * angle.cos(), centre + 120.0 * angle.sin());
        physics.add_static_circle(i, pos, PILLAR_RADIUS)?;
    }

    let mut rng = Pcg64Mcg::seed_from_u64(7);
    let mut movers: Vec<Mover> = (0..300)
        .map(|_| Mover {
            pos: Vector2::new(
                rng.gen_range(100.0..300.0),
                rng.gen_range(100.0..300.0),
            ),
            vel: Vector2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0)),
        })
        .collect();

    let mut pillar_hits = 0usize;
    let mut swarm_contacts = 0usize;

    for _ in 0..STEPS {
        for m in &mut movers {
            m.pos.x += m.vel.x;
            m.pos.y += m.vel.y;
            if m.pos.x < 0.0 || m.pos.x > WORLD as f64 {
                m.vel.x = -m.vel.x;
            }
            if m.pos.y < 0.0 || m.pos.y > WORLD as f64 {
                m.vel.y = -m.vel.y;
            }
        }

        physics.reset();
        for (i, m) in movers.iter().enumerate() {
            physics.add_dynamic_circle(FIRST_MOVER + i, m.pos, SWARM_RADIUS)?;
        }

        for collision in physics.get_collisions_sorted() {
            let a = collision.self_entity_index();
            let b = collision.other_entity_index();
            if a < FIRST_MOVER {
                // Pillar on the self side (smaller index); bounce the mover.
                pillar_hits += 1;
                let m = &mut movers[b - FIRST_MOVER];
                m.vel = Vector2::new(-m.vel.x, -m.vel.y);
            } else {
                swarm_contacts += 1;
            }
        }
    }

    let near_centre = physics.get_collisions_within_area(Vector2::new(centre, centre), 50.0)?;
    let stats = physics.stats();

    println!("steps:            {STEPS}");
    println!("pillar hits:      {pillar_hits}");
    println!("swarm contacts:   {swarm_contacts}");
    println!("near centre now:  {}", near_centre.len());
    println!("stats:            {}", serde_json::to_string(&stats)?);
    Ok(())
}
