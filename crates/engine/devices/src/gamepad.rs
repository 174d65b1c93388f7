//! Gamepad polling and control vector processing
//!
//! This module reads the device table once per frame, tracks the persistent
//! pan/rotate interaction mode and turns the first device's axes into a
//! mode-dependent [`ControlVector`].

use crate::backend::{DeviceEvent, DeviceTable};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Recommended right stick deadzone for Xbox One controllers
pub const RIGHT_STICK_DEADZONE: f32 = 7849.0 / 32767.0;
/// Recommended left stick deadzone for Xbox One controllers
pub const LEFT_STICK_DEADZONE: f32 = 8689.0 / 32767.0;
/// Recommended trigger deadzone for Xbox One controllers
pub const TRIGGER_DEADZONE: f32 = 30.0 / 32767.0;
/// Deadzone for 3D mice reporting through the gamepad table
pub const SPACEMOUSE_DEADZONE: f32 = 5.0 / 32767.0;

/// Standard-layout button that toggles the interaction mode (left stick press)
pub const DEFAULT_MODE_BUTTON: usize = 10;

/// Per-frame (x, y, z) signal; pan offsets or rotation deltas depending on the mode
pub type ControlVector = Vec3;

/// Raw state of one device slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDeviceState {
    /// Axis values in [-1, 1]
    pub axes: Vec<f32>,
    /// Button pressed flags
    pub buttons: Vec<bool>,
    /// Monotonically increasing update stamp, 0 when the backend has none
    pub timestamp: u64,
}

impl RawDeviceState {
    /// Create a resting state with the given number of axes and buttons
    pub fn with_layout(axes: usize, buttons: usize) -> Self {
        Self {
            axes: vec![0.0; axes],
            buttons: vec![false; buttons],
            timestamp: 0,
        }
    }

    /// Axis value, 0.0 for axes the device does not have
    pub fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    /// Button state, released for buttons the device does not have
    pub fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }
}

/// What the control vector drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Translate the active object
    #[default]
    Pan,
    /// Rotate the active object
    Rotate,
}

impl InteractionMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            InteractionMode::Pan => InteractionMode::Rotate,
            InteractionMode::Rotate => InteractionMode::Pan,
        }
    }
}

/// Which raw axis feeds each control channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisMapping {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl AxisMapping {
    /// Left stick X/Y plus right stick X
    pub const PAN: Self = Self { x: 0, y: 1, z: 3 };
    /// Left stick Y/X plus right stick X on a standard pad
    pub const ROTATE: Self = Self { x: 1, y: 0, z: 2 };

    /// Read the mapped axes of `state` into a control vector
    pub fn read(&self, state: &RawDeviceState, dead_zone: &DeadZone) -> ControlVector {
        Vec3::new(
            dead_zone.filter(self.x, state.axis(self.x)),
            dead_zone.filter(self.y, state.axis(self.y)),
            dead_zone.filter(self.z, state.axis(self.z)),
        )
    }
}

/// Per-axis deadzone thresholds
///
/// Disabled by default: the control vector then carries raw axis values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadZone {
    pub enabled: bool,
    pub left_stick: f32,
    pub right_stick: f32,
    pub trigger: f32,
    pub spacemouse: f32,
}

impl Default for DeadZone {
    fn default() -> Self {
        Self {
            enabled: false,
            left_stick: LEFT_STICK_DEADZONE,
            right_stick: RIGHT_STICK_DEADZONE,
            trigger: TRIGGER_DEADZONE,
            spacemouse: SPACEMOUSE_DEADZONE,
        }
    }
}

impl DeadZone {
    /// Threshold for a raw axis index (axes 0 and 1 are the left stick)
    pub fn threshold_for_axis(&self, axis: usize) -> f32 {
        if axis < 2 {
            self.left_stick
        } else {
            self.right_stick
        }
    }

    /// Zero `value` when thresholds are enabled and it lies inside the deadzone
    pub fn filter(&self, axis: usize, value: f32) -> f32 {
        if self.enabled && value.abs() < self.threshold_for_axis(axis) {
            0.0
        } else {
            value
        }
    }
}

/// Device-specific layout of the gamepad controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadConfig {
    /// Button index whose release toggles the interaction mode
    pub mode_button: usize,
    /// Axis mapping in pan mode
    pub pan: AxisMapping,
    /// Axis mapping in rotate mode
    pub rotate: AxisMapping,
    pub dead_zone: DeadZone,
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            mode_button: DEFAULT_MODE_BUTTON,
            pan: AxisMapping::PAN,
            rotate: AxisMapping::ROTATE,
            dead_zone: DeadZone::default(),
        }
    }
}

/// Gamepad poller with edge-triggered mode switching
///
/// Call [`update`](GamepadPoller::update) once per frame. The control vector
/// is zeroed at the top of every update, so a missing device never leaves
/// motion from an earlier frame behind.
pub struct GamepadPoller {
    table: Box<dyn DeviceTable>,
    config: GamepadConfig,
    /// Result of the capability probe at construction
    supported: bool,
    polling: bool,
    /// Slots with a live connection, fed by device events
    tracked: BTreeSet<usize>,
    /// Compacted non-empty slots from the last poll
    devices: Vec<RawDeviceState>,
    control: ControlVector,
    mode: InteractionMode,
    last_switch_pressed: bool,
}

impl GamepadPoller {
    /// Create a poller over `table`
    pub fn new(table: Box<dyn DeviceTable>, config: GamepadConfig) -> Self {
        let supported = table.is_supported();
        let tracked: BTreeSet<usize> = table
            .snapshot()
            .iter()
            .enumerate()
            .filter_map(|(slot, state)| state.as_ref().map(|_| slot))
            .collect();

        let mut poller = Self {
            table,
            config,
            supported,
            polling: false,
            tracked,
            devices: Vec::new(),
            control: ControlVector::ZERO,
            mode: InteractionMode::default(),
            last_switch_pressed: false,
        };

        if !supported {
            tracing::info!("Gamepad API not supported or not detected");
        } else if !poller.tracked.is_empty() {
            poller.start_polling();
        }

        poller
    }

    /// Refresh devices, mode and control vector for this frame
    pub fn update(&mut self) {
        self.control = ControlVector::ZERO;

        if !self.supported {
            return;
        }

        for event in self.table.poll_events() {
            self.handle_event(event);
        }

        self.poll_status();

        if self.polling {
            self.poll_joysticks();
        }
    }

    fn handle_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::Connected { slot, name } => {
                tracing::info!("Gamepad '{}' connected in slot {}", name, slot);
                self.tracked.insert(slot);
                self.start_polling();
            }
            DeviceEvent::Disconnected { slot } => {
                tracing::info!("Gamepad in slot {} disconnected", slot);
                self.tracked.remove(&slot);
                if self.tracked.is_empty() {
                    self.stop_polling();
                }
            }
        }
    }

    fn start_polling(&mut self) {
        if !self.polling {
            tracing::debug!("Gamepad polling started");
            self.polling = true;
        }
    }

    fn stop_polling(&mut self) {
        if self.polling {
            tracing::debug!("Gamepad polling stopped");
            self.polling = false;
        }
    }

    /// Rebuild the compacted device list from a fresh snapshot
    ///
    /// Entries are never carried over between polls: a device that left its
    /// slot stops contributing on the very next update, even when the device
    /// shifting into its position reports the same timestamp.
    fn poll_status(&mut self) {
        self.devices = self.table.snapshot().into_iter().flatten().collect();
    }

    fn poll_joysticks(&mut self) {
        let Some(pad) = self.devices.first() else {
            return;
        };

        // Toggle on release only, once per press/release cycle
        let switch_pressed = pad.button(self.config.mode_button);
        if !switch_pressed && switch_pressed != self.last_switch_pressed {
            self.mode = self.mode.toggled();
            tracing::info!("Interaction mode switched to {:?}", self.mode);
        }
        self.last_switch_pressed = switch_pressed;

        let mapping = match self.mode {
            InteractionMode::Pan => &self.config.pan,
            InteractionMode::Rotate => &self.config.rotate,
        };
        self.control = mapping.read(pad, &self.config.dead_zone);
    }

    /// Control vector computed by the last update
    pub fn control(&self) -> ControlVector {
        self.control
    }

    /// Current interaction mode
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Whether the capability probe found gamepad support
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Whether per-frame joystick polling is active
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    /// Devices seen by the last update, compacted (empty slots removed)
    pub fn devices(&self) -> &[RawDeviceState] {
        &self.devices
    }

    pub fn config(&self) -> &GamepadConfig {
        &self.config
    }
}
