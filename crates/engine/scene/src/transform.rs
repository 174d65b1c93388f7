//! Object transforms
//!
//! Rotation is stored as XYZ Euler angles in radians so incremental control
//! can add to individual axes; the quaternion and matrix forms are derived.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, Euler rotation and scale of a scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// XYZ Euler angles in radians
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Rotation as a quaternion
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Overwrite the rotation with an absolute orientation
    pub fn set_orientation(&mut self, orientation: Quat) {
        let (x, y, z) = orientation.normalize().to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    /// Local transform matrix (scale, then rotation, then translation)
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation(), self.position)
    }

    /// Replace position, rotation and scale with the decomposition of `matrix`
    pub fn set_matrix(&mut self, matrix: Mat4) {
        let (scale, orientation, position) = matrix.to_scale_rotation_translation();
        self.scale = scale;
        self.position = position;
        self.set_orientation(orientation);
    }

    /// Premultiply the current transform by `matrix`
    pub fn apply_matrix(&mut self, matrix: Mat4) {
        self.set_matrix(matrix * self.matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_matrix() {
        assert_eq!(Transform::IDENTITY.matrix(), Mat4::IDENTITY);
        assert_eq!(Transform::default(), Transform::IDENTITY);
    }

    #[test]
    fn test_orientation_round_trip() {
        let mut transform = Transform::default();
        let orientation = Quat::from_rotation_y(0.7) * Quat::from_rotation_x(-0.3);
        transform.set_orientation(orientation);

        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            assert!((transform.orientation() * axis).abs_diff_eq(orientation * axis, 1e-5));
        }
    }

    #[test]
    fn test_apply_matrix_onto_identity_copies_it() {
        let source = Transform {
            position: Vec3::new(1.0, -2.0, 0.5),
            rotation: Vec3::new(0.2, 0.4, -0.1),
            scale: Vec3::splat(2.0),
        };

        let mut target = Transform::default();
        target.apply_matrix(source.matrix());

        assert!(target.matrix().abs_diff_eq(source.matrix(), 1e-5));
        assert!(target.position.abs_diff_eq(source.position, 1e-5));
    }
}
