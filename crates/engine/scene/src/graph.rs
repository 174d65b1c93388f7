//! Render collaborator interface

use crate::object::{ObjectId, SceneObject};

/// The render side of the scene
///
/// The lifecycle manager owns every object; the graph only keeps the id of
/// what it has to draw.
pub trait SceneGraph {
    fn attach(&mut self, object: &SceneObject);

    fn detach(&mut self, id: ObjectId);
}

/// Scene graph without a renderer, tracking attachment only
#[derive(Debug, Default)]
pub struct HeadlessScene {
    attached: Vec<ObjectId>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self, id: ObjectId) -> bool {
        self.attached.contains(&id)
    }

    /// Attached ids in attachment order
    pub fn attached(&self) -> &[ObjectId] {
        &self.attached
    }
}

impl SceneGraph for HeadlessScene {
    fn attach(&mut self, object: &SceneObject) {
        if !self.is_attached(object.id()) {
            tracing::debug!("Attaching '{}' ({:?})", object.name, object.id());
            self.attached.push(object.id());
        }
    }

    fn detach(&mut self, id: ObjectId) {
        tracing::debug!("Detaching {:?}", id);
        self.attached.retain(|&attached| attached != id);
    }
}
