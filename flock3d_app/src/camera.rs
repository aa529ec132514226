/*
 * Camera Module
 *
 * A perspective camera looking at a focus point. It orbits the focus when the
 * view is dragged, pans and turns from the keyboard, and projects world points
 * onto the window.
 */

use glam::{Mat4, Quat, Vec2, Vec3};

pub struct Camera {
    pub eye: Vec3,
    pub focus: Vec3,
    pub up: Vec3,
    /// vertical field of view in degrees
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(eye: Vec3, direction: Vec3, up: Vec3) -> Self {
        Self {
            eye,
            focus: eye + direction,
            up: up.normalize(),
            fov_deg: 60.,
            near: 0.01,
            far: 1000.,
        }
    }

    fn forward(&self) -> Vec3 {
        (self.focus - self.eye).normalize()
    }

    fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.focus, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_deg.to_radians(), aspect, self.near, self.far)
    }

    /// Projects a world point to window coordinates centred on the window with
    /// y pointing up. `None` for points behind the camera.
    pub fn project(&self, point: Vec3, window_size: Vec2) -> Option<Vec2> {
        let aspect = window_size.x / window_size.y.max(1.);
        let clip = self.projection_matrix(aspect) * self.view_matrix() * point.extend(1.);

        if clip.w <= self.near {
            return None;
        }

        Some(Vec2::new(
            clip.x / clip.w * window_size.x / 2.,
            clip.y / clip.w * window_size.y / 2.,
        ))
    }

    /// Moves eye and focus together, `delta` in camera space (x right, y up,
    /// z towards the focus).
    pub fn pan(&mut self, delta: Vec3) {
        let shift = self.right() * delta.x + self.up * delta.y + self.forward() * delta.z;
        self.eye += shift;
        self.focus += shift;
    }

    pub fn rotate_left_right(&mut self, angle: f32) {
        let rotation = Quat::from_axis_angle(self.up, angle);
        self.focus = self.eye + rotation * (self.focus - self.eye);
    }

    pub fn rotate_up_down(&mut self, angle: f32) {
        let rotation = Quat::from_axis_angle(self.right(), angle);
        self.focus = self.eye + rotation * (self.focus - self.eye);
        self.up = (rotation * self.up).normalize();
    }

    pub fn rotate_roll(&mut self, angle: f32) {
        let rotation = Quat::from_axis_angle(self.forward(), angle);
        self.up = (rotation * self.up).normalize();
    }

    /// Swings the eye around the focus, `dx` about the up axis and `dy` about the
    /// right axis.
    pub fn rotate_around_focus(&mut self, dx: f32, dy: f32) {
        let yaw = Quat::from_axis_angle(self.up, -dx);
        let pitch = Quat::from_axis_angle(self.right(), -dy);
        let rotation = yaw * pitch;

        self.eye = self.focus + rotation * (self.eye - self.focus);
        self.up = (rotation * self.up).normalize();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{Vec2, Vec3};

    use super::Camera;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0., 0., 500.), -Vec3::Z, Vec3::Y)
    }

    #[test]
    fn focus_projects_to_the_centre() {
        let p = camera().project(Vec3::ZERO, Vec2::new(800., 600.)).unwrap();

        assert_relative_eq!(p.x, 0., epsilon = 1e-3);
        assert_relative_eq!(p.y, 0., epsilon = 1e-3);
    }

    #[test]
    fn right_and_up_stay_right_and_up() {
        let c = camera();
        let size = Vec2::new(800., 600.);

        assert!(c.project(Vec3::new(50., 0., 0.), size).unwrap().x > 0.);
        assert!(c.project(Vec3::new(0., 50., 0.), size).unwrap().y > 0.);
    }

    #[test]
    fn points_behind_are_dropped() {
        assert_eq!(camera().project(Vec3::new(0., 0., 600.), Vec2::new(800., 600.)), None);
    }

    #[test]
    fn orbit_keeps_distance_to_focus() {
        let mut c = camera();
        c.rotate_around_focus(0.7, -0.3);

        assert_relative_eq!(c.eye.distance(c.focus), 500., epsilon = 1e-2);
    }

    #[test]
    fn pan_moves_eye_and_focus() {
        let mut c = camera();
        c.pan(Vec3::new(10., 0., 0.));

        assert_relative_eq!(c.eye.x, 10., epsilon = 1e-4);
        assert_relative_eq!(c.focus.x, 10., epsilon = 1e-4);
    }
}
