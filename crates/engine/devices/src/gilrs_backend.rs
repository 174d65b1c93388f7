//! Gilrs-based device table implementation

use crate::backend::{DeviceEvent, DeviceTable};
use crate::gamepad::RawDeviceState;
use gilrs::{Axis, Button, GamepadId, Gilrs};
use std::collections::HashMap;

/// Axes in W3C standard gamepad order
const STANDARD_AXES: [Axis; 4] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::RightStickX,
    Axis::RightStickY,
];

/// Buttons in W3C standard gamepad order (index 10 is the left stick press)
const STANDARD_BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

/// Gilrs-based device table
///
/// Slots are gilrs gamepad ids. Axis Y values are flipped so that down is
/// positive, matching the standard gamepad layout the mappings assume.
pub struct GilrsBackend {
    gilrs: Gilrs,
    /// Per-gamepad event counter used as the state timestamp
    stamps: HashMap<GamepadId, u64>,
}

impl GilrsBackend {
    /// Create a new gilrs backend
    pub fn new() -> Result<Self, gilrs::Error> {
        let gilrs = Gilrs::new()?;
        tracing::info!("Gilrs backend initialized");

        Ok(Self {
            gilrs,
            stamps: HashMap::new(),
        })
    }

    fn read_state(&self, id: GamepadId) -> RawDeviceState {
        let gamepad = self.gilrs.gamepad(id);
        let axes = STANDARD_AXES
            .iter()
            .map(|&axis| match axis {
                Axis::LeftStickY | Axis::RightStickY => -gamepad.value(axis),
                _ => gamepad.value(axis),
            })
            .collect();
        let buttons = STANDARD_BUTTONS
            .iter()
            .map(|&button| gamepad.is_pressed(button))
            .collect();

        RawDeviceState {
            axes,
            buttons,
            timestamp: self.stamps.get(&id).copied().unwrap_or(0),
        }
    }
}

impl DeviceTable for GilrsBackend {
    fn is_supported(&self) -> bool {
        true
    }

    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        let mut events = Vec::new();

        while let Some(event) = self.gilrs.next_event() {
            let slot = usize::from(event.id);
            match event.event {
                gilrs::EventType::Connected => {
                    let name = self.gilrs.gamepad(event.id).name().to_string();
                    events.push(DeviceEvent::Connected { slot, name });
                }
                gilrs::EventType::Disconnected => {
                    self.stamps.remove(&event.id);
                    events.push(DeviceEvent::Disconnected { slot });
                }
                _ => {
                    *self.stamps.entry(event.id).or_insert(0) += 1;
                }
            }
        }

        events
    }

    fn snapshot(&self) -> Vec<Option<RawDeviceState>> {
        let mut slots: Vec<Option<RawDeviceState>> = Vec::new();

        for (id, gamepad) in self.gilrs.gamepads() {
            if !gamepad.is_connected() {
                continue;
            }
            let slot = usize::from(id);
            if slots.len() <= slot {
                slots.resize(slot + 1, None);
            }
            slots[slot] = Some(self.read_state(id));
        }

        slots
    }
}
