//! Provides the model representation consumed by the rasterizer.
//!
//! Generated models arrive as binary glTF blobs. Loading flattens the scene
//! graph into world-space triangles with their base color and optional
//! base-color texture.
//!
//! # Examples
//! ```
//! use shapecast::codec::Blob;
//! use shapecast::formats::{self, LoadError};
//!
//! let blob = Blob::new("image/png", vec![0; 4]);
//! assert!(matches!(formats::load_model(&blob), Err(LoadError::UnrecognizedFormat(_))));
//! ```

pub mod gltf;

use std::sync::Arc;

use crate::codec::{Blob, MODEL_GLTF_BINARY};

/// The media type of a JSON glTF model.
pub const MODEL_GLTF_JSON: &str = "model/gltf+json";

/// A 2D vector type used by the loader.
pub type Vec2 = [f32; 2];
/// A 3D vector type used by the loader.
pub type Vec3 = [f32; 3];
/// A column-major 4x4 matrix.
pub type Mat4 = [[f32; 4]; 4];

/// Represents decoded texture data for sampling.
///
/// # Examples
/// ```
/// use shapecast::formats::TextureData;
///
/// let tex = TextureData {
///     width: 1,
///     height: 1,
///     data: vec![255, 255, 255, 255],
/// };
/// assert_eq!(tex.sample(0.5, 0.5), [1.0, 1.0, 1.0, 1.0]);
/// ```
#[derive(Clone, Debug)]
pub struct TextureData {
    /// The texture width in pixels.
    pub width: u32,
    /// The texture height in pixels.
    pub height: u32,
    /// RGBA pixel data stored row-major.
    pub data: Vec<u8>,
}

impl TextureData {
    /// Samples the texture at UV coordinates, wrapping outside `[0, 1)`.
    pub fn sample(&self, u: f32, v: f32) -> [f32; 4] {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);

        let x = ((u * self.width as f32) as u32).min(self.width.saturating_sub(1));
        let y = ((v * self.height as f32) as u32).min(self.height.saturating_sub(1));
        let idx = ((y * self.width + x) * 4) as usize;

        match self.data.get(idx..idx + 4) {
            Some(px) => [
                px[0] as f32 / 255.0,
                px[1] as f32 / 255.0,
                px[2] as f32 / 255.0,
                px[3] as f32 / 255.0,
            ],
            None => [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// A world-space triangle with UVs, base color, and optional texture.
#[derive(Clone, Debug)]
pub struct Triangle {
    pub verts: [Vec3; 3],
    pub uvs: [Vec2; 3],
    /// Base RGB color, multiplied with the texture sample.
    pub color: [f32; 3],
    pub texture: Option<Arc<TextureData>>,
}

/// A loaded model ready for rasterization.
#[derive(Clone, Debug, Default)]
pub struct ModelData {
    pub triangles: Vec<Triangle>,
}

impl ModelData {
    /// Returns the axis-aligned bounds of all vertices, or `None` if empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut verts = self.triangles.iter().flat_map(|tri| tri.verts.iter());
        let first = *verts.next()?;
        Some(verts.fold((first, first), |(mut min, mut max), v| {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
            (min, max)
        }))
    }
}

/// The result type for model loading.
pub type LoadResult = Result<ModelData, LoadError>;

/// Errors that can occur during model loading.
///
/// # Examples
/// ```
/// use shapecast::formats::LoadError;
///
/// let err = LoadError::NoGeometry;
/// assert_eq!(format!("{}", err), "No geometry found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Represents invalid or corrupted model data.
    InvalidData(String),
    /// The blob's media type is not a model format.
    UnrecognizedFormat(String),
    /// Indicates no triangle geometry was found in the model.
    NoGeometry,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            LoadError::UnrecognizedFormat(mime) => write!(f, "Unrecognized format: {}", mime),
            LoadError::NoGeometry => write!(f, "No geometry found"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Loads a model blob according to its media type.
///
/// # Errors
/// Returns an error if the media type is not a glTF type, the data cannot be
/// parsed, or it contains no triangles.
pub fn load_model(blob: &Blob) -> LoadResult {
    match blob.mime() {
        MODEL_GLTF_BINARY | MODEL_GLTF_JSON => gltf::load_gltf(blob.bytes()),
        other => Err(LoadError::UnrecognizedFormat(other.to_string())),
    }
}
