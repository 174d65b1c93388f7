//! Input fusion and transform control
//!
//! Every frame [`SceneController::update`] polls the gamepad, decodes the
//! latest orientation sensor record, lets the [`InputArbiter`] pick what to
//! do and applies the result to the active scene object.
//!
//! - [`arbiter`]: source priority and per-frame gains
//! - [`applier`]: mutation of the active object's transform
//! - [`command`]: key bindings and requests to the host
//! - [`config`]: TOML configuration
//! - [`controller`]: the public surface tying it all together

pub mod applier;
pub mod arbiter;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;

pub use arbiter::{FrameInput, Gains, InputArbiter, RotationOp, TransformOp};
pub use command::{Command, HostRequest, ImportRequest};
pub use config::{AppearanceConfig, ControlConfig, ExamplesConfig};
pub use controller::SceneController;
pub use error::{Error, Result};
