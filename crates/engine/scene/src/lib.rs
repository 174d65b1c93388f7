//! Scene-side state for the pose controller
//!
//! - [`transform`]: position/rotation/scale of an object and its matrix form
//! - [`object`]: loaded objects and their material-bearing parts
//! - [`material`]: material description and the six appearance presets
//! - [`filter`]: the pipeline applying presets and the wireframe overlay
//! - [`lifecycle`]: the ordered object collection and its render attachment
//! - [`graph`]: the render collaborator interface

pub mod filter;
pub mod graph;
pub mod lifecycle;
pub mod material;
pub mod object;
pub mod transform;

pub use filter::MaterialFilterPipeline;
pub use graph::{HeadlessScene, SceneGraph};
pub use lifecycle::{ObjectLifecycleManager, ObjectStack};
pub use material::{Material, MaterialFilter, Shading, TextureId};
pub use object::{ObjectId, SceneObject, ScenePart};
pub use transform::Transform;
