use birdwatcher::{Birdwatcher, BoidData};
use error::RecordError;
use flock::Flock;
use options::RunOptions;

pub mod boid;
pub mod flock;

pub mod birdwatcher;
pub mod error;
pub mod geometry;
pub mod math_helpers;
pub mod options;
pub mod simulation;

/// Runs the flock headless for `no_iter` ticks, sampling it as configured, and
/// returns the samples (saving them too if the options ask for it).
pub fn flock_base(no_iter: u64, run_options: RunOptions) -> Result<Vec<BoidData>, RecordError> {
    let ro = run_options;
    let mut flock = Flock::new(&ro);
    let mut bird_watcher = Birdwatcher::new(ro.sample_rate);

    (0..no_iter).for_each(|_| {
        flock.update(&ro, None);
        bird_watcher.watch(&flock);
    });

    bird_watcher.pop_data_save(&ro.save_options)
}
