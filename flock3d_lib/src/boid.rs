use std::fmt::Debug;

use glam::f32::Vec3;
use serde::{Deserialize, Serialize};

use crate::{
    math_helpers::{direction, in_field_of_vision, limit_speed, offset_from_mean},
    options::RunOptions,
};

/// What a boid is. Walls are static markers the others steer away from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoidKind {
    Prey,
    Predator,
    Wall,
}

impl BoidKind {
    pub fn is_mobile(self) -> bool {
        !matches!(self, BoidKind::Wall)
    }

    /// Size of the rendered body.
    pub fn geometry_scale(self) -> f32 {
        match self {
            BoidKind::Wall => 15.,
            BoidKind::Predator => 7.,
            BoidKind::Prey => 2.,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    // sequential id starting from 0
    pub id: usize,
    pub kind: BoidKind,
    pub position: Vec3,
    pub velocity: Vec3,
    /// direction of travel scaled to the display length, only moves with velocity
    pub heading: Vec3,
    /// sum of every velocity the boid has moved by
    pub travelled: Vec3,
}

/// What one boid picked up about the others during a single scan.
#[derive(Debug, Default)]
struct Perception {
    position_sum: Vec3,
    velocity_sum: Vec3,
    neighbours: usize,
    avoidance: Vec3,
    others_position_sum: Vec3,
    others: usize,
}

impl Boid {
    /// Creates a new [`Boid`] with no heading until [`Boid::refresh_heading`] runs.
    pub fn new(id: usize, kind: BoidKind, position: Vec3, velocity: Vec3) -> Self {
        Boid {
            id,
            kind,
            position,
            velocity,
            heading: Vec3::ZERO,
            travelled: Vec3::ZERO,
        }
    }

    pub fn wall(id: usize, position: Vec3) -> Self {
        Boid::new(id, BoidKind::Wall, position, Vec3::ZERO)
    }

    /// Whether `other` falls inside this boid's field of vision.
    pub fn sees(&self, other: &Boid, run_options: &RunOptions) -> bool {
        in_field_of_vision(
            self.heading,
            other.position - self.position,
            run_options.field_of_vision_half_cos,
            run_options.field_of_vision_all_round,
        )
    }

    /// Velocity change for this tick given everyone else in `others` (which may
    /// include this boid, it is skipped by id).
    ///
    /// `target` is the point to seek, if the flock is following one.
    pub fn steering(&self, others: &[Boid], run_options: &RunOptions, target: Option<Vec3>) -> Vec3 {
        if !self.kind.is_mobile() {
            return Vec3::ZERO;
        }

        let perception = self.perceive(others, run_options);

        let (cohesion, alignment) = if perception.neighbours > 0 {
            (
                offset_from_mean(perception.position_sum, perception.neighbours, self.position)
                    * run_options.cohesion_coefficient,
                offset_from_mean(perception.velocity_sum, perception.neighbours, self.velocity)
                    * run_options.alignment_coefficient,
            )
        } else {
            (Vec3::ZERO, Vec3::ZERO)
        };

        let seek = match target {
            Some(target) => (target - self.position) * run_options.seek_coefficient,
            None => Vec3::ZERO,
        };

        let mut sum = cohesion + alignment + perception.avoidance + seek;

        // predators weigh avoidance twice and drift towards where the others are
        if self.kind == BoidKind::Predator {
            let density = if perception.others > 0 {
                offset_from_mean(perception.others_position_sum, perception.others, self.position)
                    * run_options.density_coefficient
            } else {
                Vec3::ZERO
            };

            sum += perception.avoidance + density;
        }

        sum
    }

    fn perceive(&self, others: &[Boid], run_options: &RunOptions) -> Perception {
        let mut res = Perception::default();

        for other in others {
            if other.id == self.id {
                continue;
            }

            res.others_position_sum += other.position;
            res.others += 1;

            let offset = other.position - self.position;
            let distance = offset.length();

            match other.kind {
                BoidKind::Prey => {
                    if !self.sees(other, run_options) {
                        continue;
                    }

                    if distance < run_options.follow_radius
                        && distance > run_options.avoidance_radius
                    {
                        res.position_sum += other.position;
                        res.velocity_sum += other.velocity;
                        res.neighbours += 1;
                    }

                    if distance < run_options.avoidance_radius {
                        res.avoidance -= offset * run_options.prey_avoidance_coefficient;
                    }
                }
                BoidKind::Predator => {
                    if distance < run_options.avoidance_radius * run_options.predator_scare_factor {
                        res.avoidance -= offset * run_options.predator_avoidance_coefficient;
                    }
                }
                BoidKind::Wall => {
                    if distance < run_options.avoidance_radius {
                        res.avoidance -= offset * run_options.wall_avoidance_coefficient;
                    }
                }
            }
        }

        res
    }

    // Actually shifts the individual's location
    pub fn update_location(&mut self, steering: Vec3, run_options: &RunOptions) {
        let max_speed = match run_options.max_speed(self.kind) {
            Some(max_speed) => max_speed,
            None => return,
        };

        self.velocity += steering;

        self.boundaries(run_options);

        self.velocity = limit_speed(self.velocity, max_speed);

        self.travelled += self.velocity;
        self.position += self.velocity;
    }

    /// Turns the velocity back towards the box on every axis the boid is outside of.
    fn boundaries(&mut self, run_options: &RunOptions) {
        let boundary = run_options.boundary;
        let turn = run_options.boundary_turn;

        turn_back(self.position.x, &mut self.velocity.x, boundary, turn);
        turn_back(self.position.y, &mut self.velocity.y, boundary, turn);
        turn_back(self.position.z, &mut self.velocity.z, boundary, turn);
    }

    /// Points the heading along the velocity at `length`. A boid that stands
    /// still keeps the heading it had.
    pub fn refresh_heading(&mut self, length: f32) {
        if let Some(dir) = direction(self.velocity) {
            self.heading = dir * length;
        }
    }
}

#[inline]
fn turn_back(position: f32, velocity: &mut f32, boundary: f32, turn: f32) {
    if position >= boundary {
        *velocity -= turn;
    } else if position < -boundary {
        *velocity += turn;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;
    use rstest::{fixture, rstest};

    use super::{Boid, BoidKind};
    use crate::options::RunOptions;

    macro_rules! assert_eqf32 {
        ($x:expr, $y:expr) => {
            assert_relative_eq!($x, $y, epsilon = 1e-5_f32)
        };
    }

    #[fixture]
    fn run_options() -> RunOptions {
        let mut res = RunOptions::default();
        res.field_of_vision_deg = 360.;
        res.update_fov();
        res
    }

    fn prey(id: usize, position: Vec3, velocity: Vec3) -> Boid {
        let mut b = Boid::new(id, BoidKind::Prey, position, velocity);
        b.refresh_heading(5.);
        b
    }

    #[rstest]
    #[case(BoidKind::Wall, 15.)]
    #[case(BoidKind::Predator, 7.)]
    #[case(BoidKind::Prey, 2.)]
    fn geometry_scale_by_kind(#[case] kind: BoidKind, #[case] scale: f32) {
        assert_eqf32!(kind.geometry_scale(), scale);
    }

    #[test]
    fn heading_follows_velocity() {
        let mut b = Boid::new(0, BoidKind::Prey, Vec3::ZERO, Vec3::new(0., 2., 0.));
        b.refresh_heading(5.);

        assert_eq!(b.heading, Vec3::new(0., 5., 0.));
    }

    #[test]
    fn still_boid_keeps_heading() {
        let mut b = prey(0, Vec3::ZERO, Vec3::X);
        b.velocity = Vec3::ZERO;
        b.refresh_heading(5.);

        assert_eq!(b.heading, Vec3::new(5., 0., 0.));
        assert!(!b.heading.is_nan());
    }

    #[rstest]
    fn no_one_is_seen_without_a_heading(run_options: RunOptions) {
        let blind = Boid::new(0, BoidKind::Prey, Vec3::ZERO, Vec3::ZERO);
        let other = prey(1, Vec3::X, Vec3::X);

        assert!(!blind.sees(&other, &run_options));
        assert!(other.sees(&blind, &run_options));
    }

    #[rstest]
    fn wall_does_not_steer(run_options: RunOptions) {
        let wall = Boid::wall(0, Vec3::ZERO);
        let others = [wall, prey(1, Vec3::X, Vec3::X)];

        assert_eq!(wall.steering(&others, &run_options, Some(Vec3::splat(100.))), Vec3::ZERO);
    }

    #[rstest]
    fn wall_never_moves(run_options: RunOptions) {
        let mut wall = Boid::wall(0, Vec3::new(-100., 10., -100.));
        let before = wall;
        wall.update_location(Vec3::splat(7.), &run_options);

        assert_eq!(wall, before);
    }

    #[rstest]
    fn cohesion_pulls_towards_neighbour(run_options: RunOptions) {
        let mut a = prey(0, Vec3::ZERO, Vec3::ZERO);
        let b = prey(1, Vec3::new(20., 0., 0.), Vec3::ZERO);
        // still boids have no heading, give one a direction to look in
        a.heading = Vec3::new(5., 0., 0.);

        let steering = a.steering(&[a, b], &run_options, None);

        // (20 - 0) / 150, alignment is zero with still neighbours
        assert_eqf32!(steering.x, 20. / 150.);
        assert_eqf32!(steering.y, 0.);
        assert_eqf32!(steering.z, 0.);
    }

    #[rstest]
    fn close_prey_is_avoided_not_followed(run_options: RunOptions) {
        let a = prey(0, Vec3::ZERO, Vec3::X);
        let b = prey(1, Vec3::new(10., 0., 0.), Vec3::X);

        let steering = a.steering(&[a, b], &run_options, None);

        // inside the avoidance radius, -10 / 50
        assert_eqf32!(steering.x, -10. / 50.);
    }

    #[rstest]
    fn unseen_prey_is_ignored(mut run_options: RunOptions) {
        run_options.field_of_vision_deg = 90.;
        run_options.update_fov();

        let a = prey(0, Vec3::ZERO, Vec3::X);
        let behind = prey(1, Vec3::new(-10., 0., 0.), Vec3::X);

        assert_eq!(a.steering(&[a, behind], &run_options, None), Vec3::ZERO);
    }

    #[rstest]
    fn wall_is_avoided_regardless_of_vision(mut run_options: RunOptions) {
        run_options.field_of_vision_deg = 0.;
        run_options.update_fov();

        let a = prey(0, Vec3::ZERO, Vec3::X);
        let wall = Boid::wall(1, Vec3::new(0., 0., 5.));

        let steering = a.steering(&[a, wall], &run_options, None);
        assert_eqf32!(steering.z, -5. / 10.);
    }

    #[rstest]
    fn predator_double_counts_avoidance_and_seeks_density(run_options: RunOptions) {
        let predator = Boid::new(0, BoidKind::Predator, Vec3::ZERO, Vec3::ZERO);
        let wall = Boid::wall(1, Vec3::new(10., 0., 0.));
        let far_prey = prey(2, Vec3::new(0., 400., 0.), Vec3::ZERO);

        let steering = predator.steering(&[predator, wall, far_prey], &run_options, None);

        let avoidance = -10. / 10.;
        let density_x = (10. / 2.) / 200.;
        let density_y = (400. / 2.) / 200.;
        assert_eqf32!(steering.x, 2. * avoidance + density_x);
        assert_eqf32!(steering.y, density_y);
    }

    #[rstest]
    fn prey_ignores_density(run_options: RunOptions) {
        let a = prey(0, Vec3::ZERO, Vec3::X);
        let far = prey(1, Vec3::new(0., 400., 0.), Vec3::ZERO);

        assert_eq!(a.steering(&[a, far], &run_options, None), Vec3::ZERO);
    }

    #[rstest]
    fn seeks_target(run_options: RunOptions) {
        let a = prey(0, Vec3::ZERO, Vec3::X);

        let steering = a.steering(&[a], &run_options, Some(Vec3::new(0., 100., 0.)));
        assert_eqf32!(steering.y, 0.1);
    }

    #[rstest]
    #[case(Vec3::new(201., 0., 0.), Vec3::new(-0.05, 0., 0.))]
    #[case(Vec3::new(200., 0., 0.), Vec3::new(-0.05, 0., 0.))]
    #[case(Vec3::new(0., -201., 0.), Vec3::new(0., 0.05, 0.))]
    #[case(Vec3::new(-201., 0., 201.), Vec3::new(0.05, 0., -0.05))]
    #[case(Vec3::new(-200., 0., 0.), Vec3::ZERO)]
    fn boundary_turns_back(run_options: RunOptions, #[case] position: Vec3, #[case] velocity: Vec3) {
        let mut b = Boid::new(0, BoidKind::Prey, position, Vec3::ZERO);
        b.update_location(Vec3::ZERO, &run_options);

        assert_eqf32!(b.velocity.x, velocity.x);
        assert_eqf32!(b.velocity.y, velocity.y);
        assert_eqf32!(b.velocity.z, velocity.z);
        assert_eq!(b.position, position + b.velocity);
    }

    #[rstest]
    #[case(BoidKind::Prey, 1.)]
    #[case(BoidKind::Predator, 3.)]
    fn speed_is_clamped(run_options: RunOptions, #[case] kind: BoidKind, #[case] max: f32) {
        let mut b = Boid::new(0, kind, Vec3::ZERO, Vec3::new(10., -10., 5.));
        b.update_location(Vec3::ZERO, &run_options);

        assert_eqf32!(b.velocity.length(), max);
        assert_eq!(b.travelled, b.velocity);
    }
}
