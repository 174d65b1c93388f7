//! Materials and appearance presets

/// Handle of a texture owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Shading model of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Whatever the model file carried
    Imported,
    Unlit,
    Normal,
    Matcap,
    Toon,
    Physical,
    Standard,
}

/// Appearance of one object part
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub shading: Shading,
    /// RGB color as 0xRRGGBB
    pub color: u32,
    pub emissive: u32,
    pub roughness: f32,
    /// Physically based metalness; presets may go above 1.0
    pub metalness: f32,
    pub wireframe: bool,
    /// Color map
    pub map: Option<TextureId>,
}

impl Material {
    /// Plain material with renderer defaults
    pub fn new(shading: Shading, color: u32) -> Self {
        Self {
            shading,
            color,
            emissive: 0x000000,
            roughness: 1.0,
            metalness: 0.0,
            wireframe: false,
            map: None,
        }
    }

    /// Material as loaded from a model file
    pub fn imported(color: u32) -> Self {
        Self::new(Shading::Imported, color)
    }

    fn with_surface(mut self, roughness: f32, metalness: f32) -> Self {
        self.roughness = roughness;
        self.metalness = metalness;
        self
    }
}

/// The six appearance presets selectable by index 1..=6
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialFilter {
    /// Flat white, unlit
    Silhouette,
    /// Surface normals as color
    Normals,
    Matcap,
    /// Orange cel shading
    Toon,
    /// White physical material with metalness 1.1
    Chrome,
    /// Teal metallic-rough standard material
    Teal,
}

impl MaterialFilter {
    pub const ALL: [MaterialFilter; 6] = [
        MaterialFilter::Silhouette,
        MaterialFilter::Normals,
        MaterialFilter::Matcap,
        MaterialFilter::Toon,
        MaterialFilter::Chrome,
        MaterialFilter::Teal,
    ];

    /// Preset for a filter index; `None` for 0 and anything above 6
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1..=6 => Some(Self::ALL[usize::from(index) - 1]),
            _ => None,
        }
    }

    /// Filter index of this preset (1..=6)
    pub fn index(self) -> u8 {
        match self {
            MaterialFilter::Silhouette => 1,
            MaterialFilter::Normals => 2,
            MaterialFilter::Matcap => 3,
            MaterialFilter::Toon => 4,
            MaterialFilter::Chrome => 5,
            MaterialFilter::Teal => 6,
        }
    }

    /// Fresh material for this preset
    pub fn material(self) -> Material {
        match self {
            MaterialFilter::Silhouette => Material::new(Shading::Unlit, 0xffffff),
            MaterialFilter::Normals => Material::new(Shading::Normal, 0xffffff),
            MaterialFilter::Matcap => Material::new(Shading::Matcap, 0xffffff),
            MaterialFilter::Toon => Material::new(Shading::Toon, 0xff4500),
            // Metalness above 1.0 is intended, it gives the overdriven chrome look
            MaterialFilter::Chrome => {
                Material::new(Shading::Physical, 0xffffff).with_surface(0.3, 1.1)
            }
            MaterialFilter::Teal => {
                Material::new(Shading::Standard, 0x00ffd5).with_surface(0.3, 0.8)
            }
        }
    }
}
