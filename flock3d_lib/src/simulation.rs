use glam::Vec3;
use tracing::info;

use crate::{
    flock::Flock,
    geometry::{FrameGeometry, Renderer},
    options::RunOptions,
};

/// External signals the flock reacts to, set by whatever handles input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    pub playing: bool,
    pub follow_target: bool,
    /// world position the flock follows while `follow_target` is on
    pub target: Vec3,
}

impl Default for Controls {
    fn default() -> Self {
        Controls {
            playing: false,
            follow_target: false,
            target: Vec3::ZERO,
        }
    }
}

/// Owns the flock together with the options and controls that drive it.
/// Renderers and input handlers only ever borrow it.
pub struct Simulation {
    flock: Flock,
    pub run_options: RunOptions,
    pub controls: Controls,
}

impl Simulation {
    /// A new simulation starts paused.
    pub fn new(run_options: RunOptions) -> Self {
        let flock = Flock::new(&run_options);

        Simulation {
            flock,
            run_options,
            controls: Default::default(),
        }
    }

    pub fn from_flock(flock: Flock, run_options: RunOptions) -> Self {
        Simulation {
            flock,
            run_options,
            controls: Default::default(),
        }
    }

    /// Runs a tick unless paused. Returns whether the flock moved.
    pub fn step(&mut self) -> bool {
        if !self.controls.playing {
            return false;
        }

        let target = if self.controls.follow_target {
            Some(self.controls.target)
        } else {
            None
        };

        self.flock.update(&self.run_options, target);
        true
    }

    pub fn toggle_play(&mut self) {
        self.controls.playing = !self.controls.playing;
        info!(playing = self.controls.playing, "play toggled");
    }

    pub fn toggle_follow(&mut self) {
        self.controls.follow_target = !self.controls.follow_target;
        info!(following = self.controls.follow_target, "follow target toggled");
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.controls.target = target;
    }

    /// Respawns the flock, controls are kept.
    pub fn restart(&mut self) {
        self.flock.restart(&self.run_options);
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    pub fn tick_count(&self) -> u64 {
        self.flock.ticks()
    }

    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry::build(self.flock.view())
    }

    pub fn render(&self, renderer: &mut impl Renderer) {
        renderer.render(&self.geometry());
    }
}
