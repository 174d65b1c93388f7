//! Appearance pipeline
//!
//! Keeps the selected preset and the wireframe overlay flag, and pushes both
//! onto every material-bearing part of every object. The preset is applied
//! first and the wireframe flag second, so a preset change never drops the
//! overlay.

use crate::material::{Material, MaterialFilter, TextureId};
use crate::object::SceneObject;

#[derive(Debug, Clone, Default)]
pub struct MaterialFilterPipeline {
    current: Option<MaterialFilter>,
    wireframe: bool,
}

impl MaterialFilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently remembered preset
    pub fn current(&self) -> Option<MaterialFilter> {
        self.current
    }

    /// Whether the wireframe overlay is on
    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    /// Select a preset by index and apply it to `objects`
    ///
    /// Index 0 forgets the remembered preset but leaves current materials
    /// alone. Indices above 6 change nothing. Returns whether a preset was
    /// applied.
    pub fn select_filter(&mut self, index: u8, objects: &mut [SceneObject]) -> bool {
        let applied = match (index, MaterialFilter::from_index(index)) {
            (_, Some(filter)) => {
                tracing::info!("Material filter {} ({:?}) selected", index, filter);
                self.current = Some(filter);
                apply_material(objects, &filter.material());
                true
            }
            (0, None) => {
                tracing::debug!("Material filter cleared");
                self.current = None;
                false
            }
            (_, None) => {
                tracing::debug!("Ignoring unknown material filter {}", index);
                false
            }
        };

        self.assert_wireframe(objects);
        applied
    }

    /// Turn the wireframe overlay on or off for `objects`
    pub fn set_wireframe_overlay(&mut self, enabled: bool, objects: &mut [SceneObject]) {
        self.wireframe = enabled;
        self.assert_wireframe(objects);
    }

    /// Bring `objects` in line with the current preset and overlay
    pub fn reapply(&self, objects: &mut [SceneObject]) {
        if let Some(filter) = self.current {
            apply_material(objects, &filter.material());
        }
        self.assert_wireframe(objects);
    }

    /// Set `texture` as color map on every material
    pub fn apply_texture(&self, texture: TextureId, objects: &mut [SceneObject]) {
        for material in objects.iter_mut().flat_map(|object| object.materials_mut()) {
            material.map = Some(texture);
        }
    }

    fn assert_wireframe(&self, objects: &mut [SceneObject]) {
        for material in objects.iter_mut().flat_map(|object| object.materials_mut()) {
            material.wireframe = self.wireframe;
        }
    }
}

fn apply_material(objects: &mut [SceneObject], material: &Material) {
    for part in objects.iter_mut().flat_map(|object| object.parts.iter_mut()) {
        if part.material.is_some() {
            part.material = Some(material.clone());
        }
    }
}
