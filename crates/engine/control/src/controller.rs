//! The controller's public surface

use crate::applier;
use crate::arbiter::{FrameInput, InputArbiter};
use crate::command::{Command, HostRequest, ImportRequest};
use crate::config::ControlConfig;
use devices::{
    ControlVector, DeviceTable, GamepadPoller, InteractionMode, Key, OrientationSample,
    SerialOrientationDecoder, SerialTransport,
};
use scene::{HeadlessScene, ObjectLifecycleManager, SceneGraph, SceneObject, TextureId, Transform};

/// Input fusion and transform control for the active scene object
///
/// Owns every piece of per-frame state (interaction mode, control vector,
/// latest orientation sample, object collection, appearance). Drive it from a
/// single thread: call [`update`](SceneController::update) once per displayed
/// frame and route discrete events through [`dispatch`](SceneController::dispatch).
pub struct SceneController<G: SceneGraph = HeadlessScene> {
    gamepad: GamepadPoller,
    serial: Option<Box<dyn SerialTransport>>,
    decoder: SerialOrientationDecoder,
    arbiter: InputArbiter,
    scene: ObjectLifecycleManager<G>,
    frozen: bool,
    transparency: bool,
    examples: Vec<String>,
    example_index: usize,
}

impl<G: SceneGraph> SceneController<G> {
    /// Create a controller reading gamepads from `devices` and rendering into `graph`
    pub fn new(config: &ControlConfig, devices: Box<dyn DeviceTable>, graph: G) -> Self {
        let mut controller = Self {
            gamepad: GamepadPoller::new(devices, config.gamepad.clone()),
            serial: None,
            decoder: SerialOrientationDecoder::new(),
            arbiter: InputArbiter::new(config.gains),
            scene: ObjectLifecycleManager::new(graph),
            frozen: false,
            transparency: false,
            examples: config.examples.paths.clone(),
            example_index: 0,
        };

        controller.select_filter(config.appearance.initial_filter);
        controller.set_transparency(config.appearance.transparency);
        controller
    }

    /// Attach an orientation sensor link (builder style)
    pub fn with_serial(mut self, transport: Box<dyn SerialTransport>) -> Self {
        self.serial = Some(transport);
        self
    }

    /// Per-frame tick: poll, decide, apply
    ///
    /// Does nothing while the view is frozen or the scene is empty.
    pub fn update(&mut self) {
        if self.frozen || self.scene.active().is_none() {
            return;
        }

        self.gamepad.update();

        let (serial_connected, orientation) = match &self.serial {
            Some(transport) => (
                transport.is_connected(),
                self.decoder.update(&**transport),
            ),
            None => (false, None),
        };

        let op = self.arbiter.decide(&FrameInput {
            mode: self.gamepad.mode(),
            control: self.gamepad.control(),
            serial_connected,
            orientation,
        });

        if let Some(active) = self.scene.active_mut() {
            applier::apply(&op, &mut active.transform);
        }
    }

    /// Run a discrete command, returning work for the host if any
    pub fn dispatch(&mut self, command: Command) -> Option<HostRequest> {
        tracing::debug!("Dispatching {:?}", command);
        match command {
            Command::SelectFilter(index) => {
                self.select_filter(index);
            }
            Command::ResetScene => self.reset(),
            Command::ToggleViewMode => self.set_view_mode(!self.frozen),
            Command::ToggleTransparency => self.set_transparency(!self.transparency),
            Command::NextExample => return self.next_example().map(HostRequest::Import),
            Command::ExportScene => return Some(HostRequest::ExportScene),
        }
        None
    }

    /// Dispatch the command bound to `key`
    pub fn key_down(&mut self, key: Key) -> Option<HostRequest> {
        Command::from_key(key).and_then(|command| self.dispatch(command))
    }

    /// Apply appearance preset `index` to every object (see [`scene::MaterialFilterPipeline`])
    pub fn select_filter(&mut self, index: u8) -> bool {
        self.scene.select_filter(index)
    }

    /// Remove every object from the scene
    pub fn reset(&mut self) {
        self.scene.reset();
    }

    /// Turn the wireframe overlay on or off
    pub fn set_transparency(&mut self, enabled: bool) {
        self.transparency = enabled;
        self.scene.set_wireframe_overlay(enabled);
    }

    /// Suspend (`true`) or resume per-frame input without touching objects
    pub fn set_view_mode(&mut self, frozen: bool) {
        tracing::info!("View mode {}", if frozen { "frozen" } else { "live" });
        self.frozen = frozen;
    }

    /// Add a loaded object; it becomes the active one
    pub fn add_object(&mut self, object: SceneObject) {
        self.scene.add(object);
    }

    /// Swap the active object for `object`, keeping its pose
    pub fn replace_object(&mut self, object: SceneObject) -> Option<SceneObject> {
        self.scene.replace(object)
    }

    /// Hand back an object loaded for an [`ImportRequest`]
    pub fn finish_import(&mut self, object: SceneObject, replace: bool) {
        if replace {
            self.replace_object(object);
        } else {
            self.add_object(object);
        }
    }

    /// Set `texture` as color map on every object
    pub fn apply_texture(&mut self, texture: TextureId) {
        self.scene.apply_texture(texture);
    }

    /// Advance to the next example model, wrapping around
    pub fn next_example(&mut self) -> Option<ImportRequest> {
        if self.examples.is_empty() {
            return None;
        }

        self.example_index = (self.example_index + 1) % self.examples.len();
        let path = self.examples[self.example_index].clone();
        tracing::info!("Loading next example {}", path);
        Some(ImportRequest {
            path,
            replace: true,
        })
    }

    pub fn mode(&self) -> InteractionMode {
        self.gamepad.mode()
    }

    pub fn control(&self) -> ControlVector {
        self.gamepad.control()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn transparency(&self) -> bool {
        self.transparency
    }

    /// Latest good sensor sample
    pub fn orientation(&self) -> Option<OrientationSample> {
        self.decoder.latest()
    }

    pub fn active_transform(&self) -> Option<Transform> {
        self.scene.active().map(|object| object.transform)
    }

    pub fn scene(&self) -> &ObjectLifecycleManager<G> {
        &self.scene
    }

    pub fn gamepad(&self) -> &GamepadPoller {
        &self.gamepad
    }
}
