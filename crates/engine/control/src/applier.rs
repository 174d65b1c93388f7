//! Applies a frame's [`TransformOp`] to an object transform

use crate::arbiter::{RotationOp, TransformOp};
use scene::Transform;

/// Mutate `transform` according to `op`
pub fn apply(op: &TransformOp, transform: &mut Transform) {
    match op.rotation {
        Some(RotationOp::Absolute(orientation)) => transform.set_orientation(orientation),
        Some(RotationOp::Incremental(delta)) => transform.rotation += delta,
        None => {}
    }

    if let Some(delta) = op.translation {
        transform.position += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn test_incremental_rotation_accumulates() {
        let mut transform = Transform::default();
        let op = TransformOp {
            rotation: Some(RotationOp::Incremental(Vec3::new(0.1, 0.2, -0.3))),
            translation: None,
        };

        apply(&op, &mut transform);
        apply(&op, &mut transform);

        assert!(transform.rotation.abs_diff_eq(Vec3::new(0.2, 0.4, -0.6), 1e-6));
        assert_eq!(transform.position, Vec3::ZERO);
    }

    #[test]
    fn test_absolute_rotation_overwrites() {
        let mut transform = Transform::default();
        transform.rotation = Vec3::new(1.0, 1.0, 1.0);
        let orientation = Quat::from_rotation_y(0.25);
        let op = TransformOp {
            rotation: Some(RotationOp::Absolute(orientation)),
            translation: Some(Vec3::new(0.0, 0.0, 0.05)),
        };

        apply(&op, &mut transform);
        apply(&op, &mut transform);

        assert!(transform.rotation.abs_diff_eq(Vec3::new(0.0, 0.25, 0.0), 1e-5));
        assert!(transform.position.abs_diff_eq(Vec3::new(0.0, 0.0, 0.1), 1e-6));
    }

    #[test]
    fn test_noop_leaves_transform() {
        let mut transform = Transform::default();
        apply(&TransformOp::default(), &mut transform);
        assert_eq!(transform, Transform::IDENTITY);
    }
}
