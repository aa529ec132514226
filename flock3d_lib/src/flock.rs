use glam::Vec3;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, trace};

use crate::boid::{Boid, BoidKind};
use crate::options::{RunOptions, UpdateMode};

pub mod spawn;

/// The agent store. Owns every boid for the lifetime of a run and advances them
/// one tick at a time with a brute force O(N^2) neighbour scan.
///
/// The population is fixed once built, nothing is inserted or removed by
/// [`Flock::update`].
pub struct Flock {
    boids: Vec<Boid>,
    rng: Xoshiro256PlusPlus,
    ticks: u64,
}

impl Flock {
    pub fn new(run_options: &RunOptions) -> Self {
        let mut rng = spawn::get_rng(run_options);
        let boids = spawn::get_boids(run_options, &mut rng);

        debug!(
            prey = run_options.prey_count,
            predators = run_options.predator_count,
            walls = run_options.wall_count,
            "spawned flock"
        );

        Flock {
            boids,
            rng,
            ticks: 0,
        }
    }

    /// Takes a hand made population, ids are reassigned to match the order.
    pub fn from_boids(boids: Vec<Boid>) -> Self {
        let boids = boids
            .into_iter()
            .enumerate()
            .map(|(index, mut b)| {
                b.id = index;
                b
            })
            .collect();

        Flock {
            boids,
            rng: spawn::get_rng(&RunOptions::default()),
            ticks: 0,
        }
    }

    /// Advances every boid by one tick.
    ///
    /// `target` is the point the flock is asked to follow, `None` when it is not
    /// following anything.
    pub fn update(&mut self, run_options: &RunOptions, target: Option<Vec3>) {
        match run_options.update_mode {
            UpdateMode::Simultaneous => self.update_simultaneous(run_options, target),
            UpdateMode::Sequential => self.update_sequential(run_options, target),
        }

        for b in self.boids.iter_mut().filter(|b| b.kind.is_mobile()) {
            b.refresh_heading(run_options.heading_length);
        }

        self.ticks += 1;
        trace!(tick = self.ticks, boids = self.boids.len(), "flock updated");
    }

    /// Everyone steers from the state at the start of the tick, then everyone moves.
    fn update_simultaneous(&mut self, run_options: &RunOptions, target: Option<Vec3>) {
        let steering = self.steering(run_options, target);

        for (b, s) in self.boids.iter_mut().zip(steering) {
            b.update_location(s, run_options);
        }
    }

    /// Boids move in store order, each as soon as its own steering is known.
    fn update_sequential(&mut self, run_options: &RunOptions, target: Option<Vec3>) {
        for i_cur in 0..self.boids.len() {
            let steering = self.boids[i_cur].steering(&self.boids, run_options, target);
            self.boids[i_cur].update_location(steering, run_options);
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn steering(&self, run_options: &RunOptions, target: Option<Vec3>) -> Vec<Vec3> {
        self.boids
            .iter()
            .map(|b| b.steering(&self.boids, run_options, target))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn steering(&self, run_options: &RunOptions, target: Option<Vec3>) -> Vec<Vec3> {
        use rayon::prelude::*;

        self.boids
            .par_iter()
            .map(|b| b.steering(&self.boids, run_options, target))
            .collect()
    }

    /// Respawns the whole population from the options, continuing the run's
    /// random stream.
    pub fn restart(&mut self, run_options: &RunOptions) {
        self.boids = spawn::get_boids(run_options, &mut self.rng);
        self.ticks = 0;
        debug!(boids = self.boids.len(), "flock restarted");
    }

    pub fn view(&self) -> &[Boid] {
        &self.boids
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn count(&self, kind: BoidKind) -> usize {
        self.boids.iter().filter(|b| b.kind == kind).count()
    }
}
