//! Object lifecycle
//!
//! [`ObjectStack`] is the ordered collection whose last element is the active
//! object. [`ObjectLifecycleManager`] keeps that collection, the render
//! attachment and the appearance pipeline in step.

use crate::filter::MaterialFilterPipeline;
use crate::graph::SceneGraph;
use crate::material::TextureId;
use crate::object::SceneObject;

/// Ordered object collection; the active object is always the last one
#[derive(Debug, Default)]
pub struct ObjectStack {
    objects: Vec<SceneObject>,
}

impl ObjectStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The most recently added or replaced object
    pub fn active(&self) -> Option<&SceneObject> {
        self.objects.last()
    }

    pub fn active_mut(&mut self) -> Option<&mut SceneObject> {
        self.objects.last_mut()
    }

    pub fn as_slice(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn as_mut_slice(&mut self) -> &mut [SceneObject] {
        &mut self.objects
    }

    fn push(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    fn pop(&mut self) -> Option<SceneObject> {
        self.objects.pop()
    }

    fn take_all(&mut self) -> Vec<SceneObject> {
        std::mem::take(&mut self.objects)
    }
}

/// Owner of every scene object
pub struct ObjectLifecycleManager<G: SceneGraph> {
    objects: ObjectStack,
    graph: G,
    appearance: MaterialFilterPipeline,
}

impl<G: SceneGraph> ObjectLifecycleManager<G> {
    pub fn new(graph: G) -> Self {
        Self {
            objects: ObjectStack::new(),
            graph,
            appearance: MaterialFilterPipeline::new(),
        }
    }

    /// Append `object`, attach it and make it active
    pub fn add(&mut self, object: SceneObject) {
        tracing::info!("Adding object '{}'", object.name);
        self.graph.attach(&object);
        self.objects.push(object);
        self.appearance.reapply(self.objects.as_mut_slice());
    }

    /// Swap the active object for `object`, keeping the old pose
    ///
    /// The removed object's transform matrix is applied to the new one before
    /// it is attached. Returns the removed object, if there was one.
    pub fn replace(&mut self, mut object: SceneObject) -> Option<SceneObject> {
        let previous = self.objects.pop();
        if let Some(old) = &previous {
            tracing::info!("Replacing object '{}' with '{}'", old.name, object.name);
            self.graph.detach(old.id());
            object.transform.apply_matrix(old.transform.matrix());
        } else {
            tracing::info!("Adding object '{}' in place of nothing", object.name);
        }

        self.graph.attach(&object);
        self.objects.push(object);
        self.appearance.reapply(self.objects.as_mut_slice());
        previous
    }

    /// Detach and drop every object
    pub fn reset(&mut self) {
        let removed = self.objects.take_all();
        tracing::info!("Resetting scene ({} objects)", removed.len());
        for object in &removed {
            self.graph.detach(object.id());
        }
    }

    /// Select an appearance preset for every object
    pub fn select_filter(&mut self, index: u8) -> bool {
        self.appearance
            .select_filter(index, self.objects.as_mut_slice())
    }

    pub fn set_wireframe_overlay(&mut self, enabled: bool) {
        self.appearance
            .set_wireframe_overlay(enabled, self.objects.as_mut_slice());
    }

    pub fn apply_texture(&mut self, texture: TextureId) {
        self.appearance
            .apply_texture(texture, self.objects.as_mut_slice());
    }

    pub fn active(&self) -> Option<&SceneObject> {
        self.objects.active()
    }

    pub fn active_mut(&mut self) -> Option<&mut SceneObject> {
        self.objects.active_mut()
    }

    pub fn objects(&self) -> &ObjectStack {
        &self.objects
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn appearance(&self) -> &MaterialFilterPipeline {
        &self.appearance
    }
}
