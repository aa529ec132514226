use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{
    boid::{Boid, BoidKind},
    options::RunOptions,
};

/// Generator for a run, reproducible when the options carry a seed.
pub fn get_rng(run_options: &RunOptions) -> Xoshiro256PlusPlus {
    match run_options.seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_entropy(),
    }
}

/// The whole starting population: prey, then predators, then the wall ring.
/// Ids follow that order.
pub fn get_boids(run_options: &RunOptions, rng: &mut impl Rng) -> Vec<Boid> {
    let mut boids = Vec::with_capacity(run_options.population());

    for _ in 0..run_options.prey_count {
        let id = boids.len();
        boids.push(get_boid(run_options, id, BoidKind::Prey, rng));
    }

    for _ in 0..run_options.predator_count {
        let id = boids.len();
        boids.push(get_boid(run_options, id, BoidKind::Predator, rng));
    }

    let first_wall = boids.len();
    boids.extend(
        get_walls(run_options)
            .enumerate()
            .map(|(index, position)| Boid::wall(first_wall + index, position)),
    );

    boids
}

fn get_boid(run_options: &RunOptions, id: usize, kind: BoidKind, rng: &mut impl Rng) -> Boid {
    let extent = run_options.spawn_half_extent;
    let speed = run_options.spawn_max_speed;

    // position in [-extent, extent)^3
    let position = Vec3::new(
        uniform(rng, extent),
        uniform(rng, extent),
        uniform(rng, extent),
    );
    // velocity in [-speed, speed)^3
    let velocity = Vec3::new(uniform(rng, speed), uniform(rng, speed), uniform(rng, speed));

    let mut boid = Boid::new(id, kind, position, velocity);
    boid.refresh_heading(run_options.heading_length);
    boid
}

fn uniform(rng: &mut impl Rng, half_extent: f32) -> f32 {
    if half_extent > 0. {
        rng.gen_range(-half_extent..half_extent)
    } else {
        0.
    }
}

/// A vertical line of markers on the (-boundary/2, _, -boundary/2) edge, spaced
/// evenly and centred on y = 0.
fn get_walls(run_options: &RunOptions) -> impl Iterator<Item = Vec3> {
    let plane = run_options.wall_plane();
    let spacing = run_options.wall_spacing;
    let half = (run_options.wall_count / 2) as i64;

    (0..run_options.wall_count as i64)
        .map(move |i| Vec3::new(plane, (i - half) as f32 * spacing, plane))
}
