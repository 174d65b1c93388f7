//! Loaded scene objects

use crate::material::Material;
use crate::transform::Transform;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable handle of a scene object, used by the renderer as a non-owning reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One node of an object hierarchy
///
/// Grouping nodes carry no material and are skipped by appearance changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePart {
    pub name: String,
    pub material: Option<Material>,
}

/// A loaded object attached to the scene
#[derive(Debug, Clone)]
pub struct SceneObject {
    id: ObjectId,
    pub name: String,
    pub transform: Transform,
    pub parts: Vec<ScenePart>,
}

impl SceneObject {
    /// Create an object with an identity transform and no parts
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::next(),
            name: name.into(),
            transform: Transform::IDENTITY,
            parts: Vec::new(),
        }
    }

    /// Add a part (builder style)
    pub fn with_part(mut self, name: impl Into<String>, material: Option<Material>) -> Self {
        self.parts.push(ScenePart {
            name: name.into(),
            material,
        });
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Materials of every material-bearing part
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.parts.iter().filter_map(|part| part.material.as_ref())
    }

    /// Mutable materials of every material-bearing part
    pub fn materials_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.parts.iter_mut().filter_map(|part| part.material.as_mut())
    }
}
