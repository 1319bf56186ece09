/// Model placement matrices and the orbit state of the viewing camera
use std::f32::consts::PI;

use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Keeps the camera off the poles, where the up vector is undefined.
const POLAR_EPSILON: f32 = 1.0e-3;

/// Spherical camera position around a target, angles in radians.
///
/// `polar` is measured from +Y, `azimuth` around +Y starting at +Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitState {
    pub azimuth: f32,
    pub polar: f32,
    pub distance: f32,
}

impl OrbitState {
    pub fn new(azimuth: f32, polar: f32, distance: f32) -> Self {
        let mut state = Self {
            azimuth,
            polar,
            distance,
        };
        state.polar = Self::clamp_polar(state.polar);
        state
    }

    fn clamp_polar(polar: f32) -> f32 {
        polar.clamp(POLAR_EPSILON, PI - POLAR_EPSILON)
    }

    /// Jump to a preset angle pair, keeping the distance
    pub fn set_angles(&mut self, azimuth: f32, polar: f32) {
        self.azimuth = azimuth;
        self.polar = Self::clamp_polar(polar);
    }

    /// Orbit by delta amounts (in radians)
    pub fn rotate(&mut self, d_azimuth: f32, d_polar: f32) {
        self.azimuth = (self.azimuth + d_azimuth).rem_euclid(2.0 * PI);
        self.polar = Self::clamp_polar(self.polar + d_polar);
    }

    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance *= factor;
        }
    }

    /// Camera position for this orbit around `target`
    pub fn position(&self, target: &Point3<f32>) -> Point3<f32> {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        target + Vector3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }
}

impl Default for OrbitState {
    /// Straight down the +Z axis at 240 mm.
    fn default() -> Self {
        Self::new(0.0, PI / 2.0, 240.0)
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation about the X axis
    pub fn rotation_x(angle: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(angle, 0.0, 0.0))
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Lift a solid to height `y`, optionally turning it upside down first
    pub fn placement(y: f32, flipped: bool) -> Matrix4<f32> {
        let lift = Self::translation_matrix(0.0, y, 0.0);
        if flipped {
            lift * Self::rotation_x(PI)
        } else {
            lift
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_state() {
        let mut state = OrbitState::default();
        assert_eq!(state.azimuth, 0.0);
        assert!((state.polar - PI / 2.0).abs() < 1e-6);

        state.rotate(0.1, 0.2);
        assert!((state.azimuth - 0.1).abs() < 1e-6);
        assert!((state.polar - (PI / 2.0 + 0.2)).abs() < 1e-6);

        state.rotate(-0.2, 10.0);
        assert!((state.azimuth - (2.0 * PI - 0.1)).abs() < 1e-5);
        assert!(state.polar < PI);
    }

    #[test]
    fn test_orbit_position() {
        let state = OrbitState::default();
        let p = state.position(&Point3::origin());
        assert!((p - Point3::new(0.0, 0.0, 240.0)).norm() < 1e-3);

        let side = OrbitState::new(PI / 2.0, PI / 2.0, 10.0);
        let p = side.position(&Point3::new(0.0, 1.0, 0.0));
        assert!((p - Point3::new(10.0, 1.0, 0.0)).norm() < 1e-4);
    }

    #[test]
    fn test_flipped_placement() {
        let m = Transform::placement(-5.0, true);
        let apex = m.transform_point(&Point3::new(0.0, 37.5, 0.0));
        assert!((apex - Point3::new(0.0, -42.5, 0.0)).norm() < 1e-4);

        let m = Transform::placement(2.0, false);
        let p = m.transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert!((p - Point3::new(1.0, 3.0, 1.0)).norm() < 1e-6);
    }
}
