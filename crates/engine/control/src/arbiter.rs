//! Input source arbitration
//!
//! The orientation sensor outranks the gamepad: while the serial link is up,
//! the active object's rotation is overwritten with the latest sample and
//! gamepad rotation deltas are dropped. Translation is a separate component
//! and keeps following the gamepad in pan mode.
//!
//! Gains are fixed per-frame steps, so motion speed follows the frame rate.

use devices::{ControlVector, InteractionMode, OrientationSample};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Rotation step per frame at full deflection, in radians
pub const ROTATE_GAIN: f32 = 5.0 * PI / 360.0;
/// Translation step per frame at full deflection, in scene units
pub const PAN_GAIN: f32 = 0.05;

/// Per-frame gains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gains {
    pub rotate: f32,
    pub pan: f32,
}

impl Default for Gains {
    fn default() -> Self {
        Self {
            rotate: ROTATE_GAIN,
            pan: PAN_GAIN,
        }
    }
}

/// How the rotation changes this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationOp {
    /// Overwrite with an absolute orientation
    Absolute(Quat),
    /// Add to the Euler angles
    Incremental(Vec3),
}

/// Transform change for one frame
///
/// At most one rotation pathway can be chosen per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformOp {
    pub rotation: Option<RotationOp>,
    /// Added to the position
    pub translation: Option<Vec3>,
}

impl TransformOp {
    pub fn is_noop(&self) -> bool {
        self.rotation.is_none() && self.translation.is_none()
    }
}

/// Everything the arbiter looks at in one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    pub mode: InteractionMode,
    pub control: ControlVector,
    pub serial_connected: bool,
    /// Latest good sensor sample, if any
    pub orientation: Option<OrientationSample>,
}

#[derive(Debug, Clone, Default)]
pub struct InputArbiter {
    gains: Gains,
}

impl InputArbiter {
    pub fn new(gains: Gains) -> Self {
        Self { gains }
    }

    pub fn gains(&self) -> Gains {
        self.gains
    }

    /// Pick this frame's transform change
    pub fn decide(&self, input: &FrameInput) -> TransformOp {
        if input.serial_connected {
            return TransformOp {
                rotation: input
                    .orientation
                    .map(|sample| RotationOp::Absolute(sample.rotation)),
                translation: (input.mode == InteractionMode::Pan)
                    .then(|| self.pan_delta(input.control)),
            };
        }

        match input.mode {
            InteractionMode::Rotate => TransformOp {
                rotation: Some(RotationOp::Incremental(self.rotate_delta(input.control))),
                translation: None,
            },
            InteractionMode::Pan => TransformOp {
                rotation: None,
                translation: Some(self.pan_delta(input.control)),
            },
        }
    }

    /// Euler delta: x and y follow the control, z is inverted
    pub fn rotate_delta(&self, control: ControlVector) -> Vec3 {
        let gain = self.gains.rotate;
        Vec3::new(gain * control.x, gain * control.y, -(gain * control.z))
    }

    /// Position delta: x and z follow the control, y is inverted
    pub fn pan_delta(&self, control: ControlVector) -> Vec3 {
        let gain = self.gains.pan;
        Vec3::new(gain * control.x, -(gain * control.y), gain * control.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(mode: InteractionMode, control: Vec3) -> FrameInput {
        FrameInput {
            mode,
            control,
            serial_connected: false,
            orientation: None,
        }
    }

    fn sample() -> OrientationSample {
        OrientationSample {
            rotation: Quat::from_rotation_z(0.5),
            channels: [0.0; 4],
        }
    }

    #[test]
    fn test_default_gains() {
        let gains = Gains::default();
        assert_eq!(gains.rotate, 5.0 * PI / 360.0);
        assert_eq!(gains.pan, 0.05);
    }

    #[test]
    fn test_pan_without_serial() {
        let op = InputArbiter::default().decide(&input(InteractionMode::Pan, Vec3::new(1.0, 1.0, 1.0)));
        assert_eq!(op.rotation, None);
        assert_eq!(op.translation, Some(Vec3::new(0.05, -0.05, 0.05)));
    }

    #[test]
    fn test_rotate_without_serial() {
        let op = InputArbiter::default().decide(&input(InteractionMode::Rotate, Vec3::new(1.0, -1.0, 1.0)));
        assert_eq!(op.translation, None);
        assert_eq!(
            op.rotation,
            Some(RotationOp::Incremental(Vec3::new(
                ROTATE_GAIN,
                -ROTATE_GAIN,
                -ROTATE_GAIN
            )))
        );
    }

    #[test]
    fn test_serial_suppresses_gamepad_rotation() {
        let mut frame = input(InteractionMode::Rotate, Vec3::ONE);
        frame.serial_connected = true;
        frame.orientation = Some(sample());

        let op = InputArbiter::default().decide(&frame);
        assert_eq!(op.rotation, Some(RotationOp::Absolute(sample().rotation)));
        assert_eq!(op.translation, None);
    }

    #[test]
    fn test_serial_keeps_pan() {
        let mut frame = input(InteractionMode::Pan, Vec3::X);
        frame.serial_connected = true;
        frame.orientation = Some(sample());

        let op = InputArbiter::default().decide(&frame);
        assert_eq!(op.rotation, Some(RotationOp::Absolute(sample().rotation)));
        assert_eq!(op.translation, Some(Vec3::new(0.05, 0.0, 0.0)));
    }

    #[test]
    fn test_serial_without_sample_still_blocks_rotation() {
        let mut frame = input(InteractionMode::Rotate, Vec3::ONE);
        frame.serial_connected = true;

        assert!(InputArbiter::default().decide(&frame).is_noop());
    }

    #[test]
    fn test_custom_gains() {
        let arbiter = InputArbiter::new(Gains {
            rotate: 0.1,
            pan: 2.0,
        });
        assert_eq!(arbiter.pan_delta(Vec3::new(0.5, 0.5, 0.5)), Vec3::new(1.0, -1.0, 1.0));
        assert_eq!(
            arbiter.rotate_delta(Vec3::new(1.0, 0.0, 1.0)),
            Vec3::new(0.1, 0.0, -0.1)
        );
    }
}
