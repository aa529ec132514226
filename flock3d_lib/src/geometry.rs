use glam::Vec3;

use crate::boid::{Boid, BoidKind};

/// Corners of the body shared by every boid, in units of the kind's scale,
/// relative to the boid's position. Three faces around a common apex.
const BODY: [[f32; 3]; 9] = [
    [0.5, 1.5, 0.],
    [0.5, 0.5, 0.5],
    [0., 0., 0.],
    //
    [0., 0., 0.],
    [0.5, 0.5, 0.5],
    [1., 0., 0.],
    //
    [1., 0., 0.],
    [0.5, 0.5, 0.5],
    [0.5, 1.5, 0.],
];

/// Everything a renderer needs to draw one boid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidGeometry {
    pub id: usize,
    pub kind: BoidKind,
    pub triangles: [[Vec3; 3]; 3],
    /// from the position to the tip of the heading, walls have none
    pub heading_line: Option<[Vec3; 2]>,
}

impl BoidGeometry {
    pub fn new(boid: &Boid) -> Self {
        let scale = boid.kind.geometry_scale();
        let corner = |i: usize| Vec3::from(BODY[i]) * scale + boid.position;

        let triangles = [
            [corner(0), corner(1), corner(2)],
            [corner(3), corner(4), corner(5)],
            [corner(6), corner(7), corner(8)],
        ];

        let heading_line = match boid.kind {
            BoidKind::Wall => None,
            _ => Some([boid.position, boid.position + boid.heading]),
        };

        BoidGeometry {
            id: boid.id,
            kind: boid.kind,
            triangles,
            heading_line,
        }
    }
}

/// Renderable snapshot of the whole flock, in store order.
#[derive(Debug, Clone, Default)]
pub struct FrameGeometry {
    pub boids: Vec<BoidGeometry>,
}

impl FrameGeometry {
    pub fn build(boids: &[Boid]) -> Self {
        FrameGeometry {
            boids: boids.iter().map(BoidGeometry::new).collect(),
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = (BoidKind, &[Vec3; 3])> + '_ {
        self.boids
            .iter()
            .flat_map(|g| g.triangles.iter().map(move |t| (g.kind, t)))
    }

    pub fn heading_lines(&self) -> impl Iterator<Item = &[Vec3; 2]> + '_ {
        self.boids.iter().filter_map(|g| g.heading_line.as_ref())
    }
}

/// Anything that can put a frame of the flock on screen.
pub trait Renderer {
    fn render(&mut self, geometry: &FrameGeometry);
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn prey_body_is_scaled_and_offset() {
        let prey = Boid::new(0, BoidKind::Prey, Vec3::new(10., 20., 30.), Vec3::ZERO);
        let g = BoidGeometry::new(&prey);

        assert_eq!(g.triangles[0][0], Vec3::new(11., 23., 30.));
        assert_eq!(g.triangles[0][1], Vec3::new(11., 21., 31.));
        assert_eq!(g.triangles[0][2], Vec3::new(10., 20., 30.));
        assert_eq!(g.triangles[1][2], Vec3::new(12., 20., 30.));
    }

    #[test]
    fn wall_is_large_and_has_no_heading_line() {
        let wall = Boid::wall(3, Vec3::ZERO);
        let g = BoidGeometry::new(&wall);

        assert_eq!(g.triangles[2][0], Vec3::new(15., 0., 0.));
        assert_eq!(g.heading_line, None);
        assert_eq!(g.id, 3);
    }

    #[test]
    fn heading_line_points_along_heading() {
        let mut predator = Boid::new(1, BoidKind::Predator, Vec3::ONE, Vec3::new(0., 0., 3.));
        predator.refresh_heading(5.);

        let g = BoidGeometry::new(&predator);
        assert_eq!(g.heading_line, Some([Vec3::ONE, Vec3::new(1., 1., 6.)]));
    }

    #[test]
    fn frame_keeps_store_order() {
        let boids = [
            Boid::new(0, BoidKind::Prey, Vec3::ZERO, Vec3::X),
            Boid::new(1, BoidKind::Predator, Vec3::ZERO, Vec3::X),
            Boid::wall(2, Vec3::ZERO),
        ];
        let frame = FrameGeometry::build(&boids);

        let kinds: Vec<BoidKind> = frame.boids.iter().map(|g| g.kind).collect();
        assert_eq!(kinds, vec![BoidKind::Prey, BoidKind::Predator, BoidKind::Wall]);
        assert_eq!(frame.triangles().count(), 9);
        assert_eq!(frame.heading_lines().count(), 2);
    }
}
