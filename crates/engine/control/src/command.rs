//! Discrete commands and their key bindings

use devices::Key;

/// Discrete action triggered by the host (usually a key press)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Apply appearance preset by index (0 clears)
    SelectFilter(u8),
    /// Remove every object
    ResetScene,
    /// Freeze or resume per-frame input
    ToggleViewMode,
    /// Toggle the wireframe overlay
    ToggleTransparency,
    /// Replace the active object with the next example model
    NextExample,
    /// Ask the host to export the scene
    ExportScene,
}

impl Command {
    /// Command bound to `key`, if any
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Digit(n) => Some(Command::SelectFilter(n)),
            Key::X => Some(Command::ResetScene),
            Key::Space => Some(Command::ToggleViewMode),
            Key::D => Some(Command::ToggleTransparency),
            Key::Tab => Some(Command::NextExample),
            Key::O => Some(Command::ExportScene),
        }
    }
}

/// Model the host should load and hand back through `finish_import`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub path: String,
    /// Replace the active object instead of adding next to it
    pub replace: bool,
}

/// Work the controller cannot do itself and hands to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    Import(ImportRequest),
    ExportScene,
}
