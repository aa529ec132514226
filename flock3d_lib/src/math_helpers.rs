use std::f32::consts::PI;

use glam::Vec3;

/// Below this length a vector is treated as having no direction.
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Converts a full field of vision in degrees to the half angle in radians.
#[inline]
pub fn deg_to_half_rad(deg: f32) -> f32 {
    deg * PI / 360.
}

/// Unit vector along `v`, or `None` when `v` has no usable direction.
#[inline]
pub fn direction(v: Vec3) -> Option<Vec3> {
    let length = v.length();
    if length > DIRECTION_EPSILON && length.is_finite() {
        Some(v / length)
    } else {
        None
    }
}

/// Mean of `sum` over `count` contributors minus `own`, the shared shape of the
/// cohesion, alignment and density terms.
#[inline]
pub fn offset_from_mean(sum: Vec3, count: usize, own: Vec3) -> Vec3 {
    sum / count as f32 - own
}

/// Whether something at `offset` from an observer looking along `heading` falls
/// inside the field of vision.
///
/// `half_fov_cos` is the cosine of half the field of vision, `all_round` is set
/// for fields of vision of 360° or more. Nothing is visible to an observer
/// without a heading and nothing is visible at zero offset.
pub fn in_field_of_vision(heading: Vec3, offset: Vec3, half_fov_cos: f32, all_round: bool) -> bool {
    let (heading, offset) = match (direction(heading), direction(offset)) {
        (Some(h), Some(o)) => (h, o),
        _ => return false,
    };

    if all_round {
        return true;
    }

    // h•o = |h||o|cos(ß) = cos(ß) for unit vectors
    heading.dot(offset) > half_fov_cos
}

/// Rescales `v` to `max` when it is longer, direction preserved.
#[inline]
pub fn limit_speed(v: Vec3, max: f32) -> Vec3 {
    let speed = v.length();
    if speed > max {
        v / speed * max
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;
    use rstest::rstest;

    use super::*;

    macro_rules! assert_eqf32 {
        ($x:expr, $y:expr) => {
            assert_relative_eq!($x, $y, epsilon = 1e-5_f32)
        };
    }

    #[test]
    fn half_rad_of_full_circle_is_pi() {
        assert_eqf32!(deg_to_half_rad(360.), PI);
        assert_eqf32!(deg_to_half_rad(90.), PI / 4.);
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert_eq!(direction(Vec3::ZERO), None);
        assert_eq!(direction(Vec3::new(f32::NAN, 0., 0.)), None);
        assert_eq!(direction(Vec3::new(0., 4., 0.)), Some(Vec3::Y));
    }

    #[rstest]
    #[case(Vec3::X, true)]
    #[case(Vec3::new(1., 0.9, 0.), true)]
    #[case(Vec3::new(1., 1.1, 0.), false)]
    #[case(Vec3::Y, false)]
    #[case(-Vec3::X, false)]
    fn ninety_degree_cone(#[case] offset: Vec3, #[case] expected: bool) {
        let half_cos = deg_to_half_rad(90.).cos();
        assert_eq!(in_field_of_vision(Vec3::X * 5., offset, half_cos, false), expected);
    }

    #[rstest]
    #[case(Vec3::X)]
    #[case(Vec3::Y)]
    #[case(-Vec3::X)]
    #[case(Vec3::new(-1., 0.001, 0.))]
    fn zero_fov_sees_nothing(#[case] offset: Vec3) {
        let half_cos = deg_to_half_rad(0.).cos();
        assert!(!in_field_of_vision(Vec3::X, offset, half_cos, false));
    }

    #[rstest]
    #[case(Vec3::X)]
    #[case(Vec3::Z)]
    #[case(-Vec3::X)]
    fn all_round_fov_sees_everything(#[case] offset: Vec3) {
        let half_cos = deg_to_half_rad(360.).cos();
        assert!(in_field_of_vision(Vec3::X, offset, half_cos, true));
    }

    #[test]
    fn degenerate_heading_or_offset_is_never_visible() {
        assert!(!in_field_of_vision(Vec3::ZERO, Vec3::X, -1., true));
        assert!(!in_field_of_vision(Vec3::X, Vec3::ZERO, -1., true));
    }

    #[test]
    fn limit_speed_keeps_direction() {
        let v = limit_speed(Vec3::new(3., 4., 0.), 1.);
        assert_eqf32!(v.length(), 1.);
        assert_eqf32!(v.x, 0.6);
        assert_eqf32!(v.y, 0.8);

        let slow = Vec3::new(0.1, 0., 0.);
        assert_eq!(limit_speed(slow, 1.), slow);
    }

    #[test]
    fn offset_from_mean_subtracts_own() {
        let res = offset_from_mean(Vec3::new(4., 8., 0.), 2, Vec3::new(1., 1., 1.));
        assert_eq!(res, Vec3::new(1., 3., -1.));
    }
}
