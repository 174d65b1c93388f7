//! Input device polling for the pose controller
//!
//! This crate turns the raw state of external input devices into the
//! per-frame signals consumed by the `control` crate.
//!
//! # Modules
//!
//! - [`gamepad`]: Gamepad polling, interaction mode tracking and control vector
//! - [`backend`]: Device table trait with null and virtual implementations
//! - [`serial`]: Orientation sensor frame decoding and the framed serial link
//! - [`keyboard`]: Platform-independent key codes used for command dispatch
//!
//! # Feature Flags
//!
//! - `gilrs`: Enable the gilrs-based device table (native only)

pub mod backend;
pub mod gamepad;
pub mod keyboard;
pub mod serial;

// Re-export commonly used types at crate root
pub use backend::{DeviceEvent, DeviceTable, NullBackend, VirtualGamepads};
pub use gamepad::{
    AxisMapping, ControlVector, DeadZone, GamepadConfig, GamepadPoller, InteractionMode,
    RawDeviceState,
};
pub use keyboard::Key;
pub use serial::{
    decode_frame, FrameError, FramedLink, OrientationSample, SerialOrientationDecoder,
    SerialTransport,
};

#[cfg(feature = "gilrs")]
mod gilrs_backend;

#[cfg(feature = "gilrs")]
pub use gilrs_backend::GilrsBackend;

/// Create the default device table based on enabled features
///
/// Falls back to [`NullBackend`] when the platform offers no gamepad support,
/// which leaves the poller in its degraded, always-zero mode.
#[cfg(feature = "gilrs")]
pub fn create_device_table() -> Box<dyn DeviceTable> {
    match GilrsBackend::new() {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            tracing::warn!("Failed to initialize gilrs backend: {}", e);
            Box::new(NullBackend::new())
        }
    }
}

/// Create the default device table (no gamepad support compiled in)
#[cfg(not(feature = "gilrs"))]
pub fn create_device_table() -> Box<dyn DeviceTable> {
    Box::new(NullBackend::new())
}
