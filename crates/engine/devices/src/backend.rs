//! Device table trait for platform-specific gamepad discovery
//!
//! This module defines the capability interface the [`GamepadPoller`] reads
//! every frame (e.g. gilrs on desktop, a scripted table in tests). Vendor and
//! platform quirks stay behind this trait; the poller only ever sees slots of
//! [`RawDeviceState`].
//!
//! [`GamepadPoller`]: crate::gamepad::GamepadPoller

use crate::gamepad::RawDeviceState;
use std::cell::RefCell;
use std::rc::Rc;

/// Connect/disconnect notification queued by a device table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A device appeared in `slot`
    Connected { slot: usize, name: String },
    /// The device in `slot` went away
    Disconnected { slot: usize },
}

impl DeviceEvent {
    /// Slot index the event refers to
    pub fn slot(&self) -> usize {
        match self {
            DeviceEvent::Connected { slot, .. } | DeviceEvent::Disconnected { slot } => *slot,
        }
    }
}

/// Trait for gamepad device tables (e.g., gilrs, Web Gamepad API, scripted)
///
/// Implementations provide:
/// - a one-time capability probe ([`is_supported`](DeviceTable::is_supported))
/// - a queue of connect/disconnect events drained once per frame
/// - a snapshot of every slot, `None` for empty slots
pub trait DeviceTable {
    /// Whether the platform exposes gamepads at all
    fn is_supported(&self) -> bool;

    /// Drain connect/disconnect events that happened since the last call
    ///
    /// Backends that need to pump an event loop do it here, so it must be
    /// called before [`snapshot`](DeviceTable::snapshot) each frame.
    fn poll_events(&mut self) -> Vec<DeviceEvent>;

    /// Current raw state of every slot
    fn snapshot(&self) -> Vec<Option<RawDeviceState>>;
}

/// A device table for platforms without gamepad support
///
/// Reports itself as unsupported so the poller stays in its degraded mode
/// instead of failing.
#[derive(Debug, Default)]
pub struct NullBackend;

impl NullBackend {
    /// Create a new null backend
    pub fn new() -> Self {
        Self
    }
}

impl DeviceTable for NullBackend {
    fn is_supported(&self) -> bool {
        false
    }

    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        Vec::new()
    }

    fn snapshot(&self) -> Vec<Option<RawDeviceState>> {
        Vec::new()
    }
}

#[derive(Debug, Default)]
struct VirtualTable {
    slots: Vec<Option<RawDeviceState>>,
    pending: Vec<DeviceEvent>,
}

impl VirtualTable {
    fn slot_mut(&mut self, slot: usize) -> Option<&mut RawDeviceState> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }
}

/// Scriptable in-memory device table
///
/// Cloning yields another handle onto the same table, so a test or replay
/// driver can keep one handle while the poller owns the other. Every state
/// change bumps the slot's timestamp the way a real device would.
#[derive(Debug, Clone, Default)]
pub struct VirtualGamepads {
    inner: Rc<RefCell<VirtualTable>>,
}

impl VirtualGamepads {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Plug a device into `slot` and queue a connect event
    pub fn connect(&self, slot: usize, state: RawDeviceState) {
        let mut table = self.inner.borrow_mut();
        if table.slots.len() <= slot {
            table.slots.resize(slot + 1, None);
        }
        table.slots[slot] = Some(state);
        table.pending.push(DeviceEvent::Connected {
            slot,
            name: format!("Virtual Gamepad {slot}"),
        });
    }

    /// Unplug the device in `slot` and queue a disconnect event
    pub fn disconnect(&self, slot: usize) {
        let mut table = self.inner.borrow_mut();
        if let Some(entry) = table.slots.get_mut(slot) {
            *entry = None;
        }
        table.pending.push(DeviceEvent::Disconnected { slot });
    }

    /// Overwrite axis values of a connected device
    pub fn set_axes(&self, slot: usize, axes: &[f32]) {
        if let Some(state) = self.inner.borrow_mut().slot_mut(slot) {
            state.axes = axes.to_vec();
            state.timestamp += 1;
        }
    }

    /// Set a single button of a connected device, growing the button list if needed
    pub fn set_button(&self, slot: usize, index: usize, pressed: bool) {
        if let Some(state) = self.inner.borrow_mut().slot_mut(slot) {
            if state.buttons.len() <= index {
                state.buttons.resize(index + 1, false);
            }
            state.buttons[index] = pressed;
            state.timestamp += 1;
        }
    }

    /// Number of occupied slots
    pub fn connected_count(&self) -> usize {
        self.inner.borrow().slots.iter().flatten().count()
    }
}

impl DeviceTable for VirtualGamepads {
    fn is_supported(&self) -> bool {
        true
    }

    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        std::mem::take(&mut self.inner.borrow_mut().pending)
    }

    fn snapshot(&self) -> Vec<Option<RawDeviceState>> {
        self.inner.borrow().slots.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_backend() {
        let mut backend = NullBackend::new();

        assert!(!backend.is_supported());
        assert!(backend.poll_events().is_empty()); // Should not panic
        assert!(backend.snapshot().is_empty());
    }

    #[test]
    fn test_virtual_connect_disconnect_events() {
        let mut pads = VirtualGamepads::new();
        pads.connect(1, RawDeviceState::with_layout(4, 16));

        let events = pads.poll_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].slot(), 1);
        assert!(pads.poll_events().is_empty());

        let snapshot = pads.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot[0].is_none());
        assert!(snapshot[1].is_some());

        pads.disconnect(1);
        assert_eq!(
            pads.poll_events(),
            vec![DeviceEvent::Disconnected { slot: 1 }]
        );
        assert_eq!(pads.connected_count(), 0);
    }

    #[test]
    fn test_virtual_handles_share_state() {
        let pads = VirtualGamepads::new();
        let mut owned: Box<dyn DeviceTable> = Box::new(pads.clone());

        pads.connect(0, RawDeviceState::with_layout(4, 16));
        pads.set_axes(0, &[0.5, -0.5, 0.0, 0.25]);
        pads.set_button(0, 10, true);

        assert_eq!(owned.poll_events().len(), 1);
        let state = owned.snapshot()[0].clone().unwrap();
        assert_eq!(state.axes, vec![0.5, -0.5, 0.0, 0.25]);
        assert!(state.button(10));
        assert_eq!(state.timestamp, 2);
    }
}
