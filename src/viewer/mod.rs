//! Provides the model viewer.
//!
//! The viewer takes a base64 model payload, decodes it into a GLB blob,
//! registers the blob under an object URL, and loads the scene through that
//! URL. Only the displayed scene holds a URL; replacing the model or dropping
//! the viewer revokes it.
//!
//! # Examples
//! ```
//! use shapecast::viewer::{ModelViewer, ViewerError};
//!
//! let mut viewer = ModelViewer::new();
//! let err = viewer.show("Z2xURg==").unwrap_err();
//! assert!(matches!(err, ViewerError::Load(_)));
//! assert!(viewer.render(16, 16).is_none());
//! ```

pub mod blob;
pub mod orbit;

use crate::codec::{self, DecodeError};
use crate::formats::{self, LoadError, ModelData};
use crate::renderer::{self, Camera, Frame, Lighting};

use self::blob::{BlobStore, ObjectUrl};
use self::orbit::OrbitControls;

/// Errors that can occur while displaying a model payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    /// The payload is not valid base64.
    Decode(DecodeError),
    /// The decoded bytes are not a loadable model.
    Load(LoadError),
    /// The object URL was revoked before the scene was loaded.
    Revoked(String),
}

impl std::fmt::Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerError::Decode(e) => write!(f, "Could not decode model: {}", e),
            ViewerError::Load(e) => write!(f, "Could not load model: {}", e),
            ViewerError::Revoked(url) => write!(f, "Object URL revoked: {}", url),
        }
    }
}

impl std::error::Error for ViewerError {}

impl From<DecodeError> for ViewerError {
    fn from(e: DecodeError) -> Self {
        ViewerError::Decode(e)
    }
}

impl From<LoadError> for ViewerError {
    fn from(e: LoadError) -> Self {
        ViewerError::Load(e)
    }
}

/// Loads the model behind an object URL.
///
/// # Errors
/// Returns an error if the URL is not live or the blob is not a model.
pub fn load_object_url(store: &BlobStore, url: &str) -> Result<ModelData, ViewerError> {
    let blob = store
        .resolve(url)
        .ok_or_else(|| ViewerError::Revoked(url.to_string()))?;
    Ok(formats::load_model(&blob)?)
}

/// The model currently on screen and the URL keeping its blob alive.
struct Scene {
    payload: String,
    url: ObjectUrl,
    model: ModelData,
}

/// An interactive, lit 3D canvas for generated models.
pub struct ModelViewer {
    store: BlobStore,
    scene: Option<Scene>,
    camera: Camera,
    lighting: Lighting,
    controls: OrbitControls,
}

impl Default for ModelViewer {
    fn default() -> Self {
        Self::with_store(BlobStore::new())
    }
}

impl ModelViewer {
    /// Creates a viewer with its own blob store and the default camera.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a viewer that registers its blobs in `store`.
    pub fn with_store(store: BlobStore) -> Self {
        let camera = Camera::default();
        Self {
            store,
            scene: None,
            controls: OrbitControls::new(camera.eye, camera.target),
            camera,
            lighting: Lighting::default(),
        }
    }

    /// Displays a base64 GLB payload, replacing the current model.
    ///
    /// Showing the payload already on screen does nothing. On error the
    /// current model stays on screen.
    ///
    /// # Errors
    /// Returns an error if the payload cannot be decoded or loaded.
    pub fn show(&mut self, payload: &str) -> Result<(), ViewerError> {
        if self.current_payload() == Some(payload) {
            return Ok(());
        }

        let blob = codec::decode_model_payload(payload)?;
        let url = self.store.create_object_url(blob);
        let model = load_object_url(&self.store, url.as_str())?;

        log::info!(
            "Showing {} ({} triangles)",
            url,
            model.triangles.len()
        );
        self.scene = Some(Scene {
            payload: payload.to_string(),
            url,
            model,
        });
        Ok(())
    }

    /// Removes the model from the canvas and revokes its URL.
    pub fn clear(&mut self) {
        self.scene = None;
    }

    /// Returns the payload of the displayed model.
    pub fn current_payload(&self) -> Option<&str> {
        self.scene.as_ref().map(|scene| scene.payload.as_str())
    }

    /// Returns the object URL of the displayed model.
    pub fn object_url(&self) -> Option<&str> {
        self.scene.as_ref().map(|scene| scene.url.as_str())
    }

    /// Returns the displayed model.
    pub fn model(&self) -> Option<&ModelData> {
        self.scene.as_ref().map(|scene| &scene.model)
    }

    /// Returns the store holding the viewer's object URLs.
    pub fn store(&self) -> &BlobStore {
        &self.store
    }

    /// Returns the orbit controls.
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    /// Returns the orbit controls for rotating, zooming, and panning.
    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    /// Returns the scene lighting for adjustment.
    pub fn lighting_mut(&mut self) -> &mut Lighting {
        &mut self.lighting
    }

    /// Returns the camera as currently positioned by the orbit controls.
    pub fn camera(&self) -> Camera {
        self.controls.apply(&self.camera)
    }

    /// Renders the displayed model, or `None` if nothing is displayed.
    pub fn render(&self, width: u32, height: u32) -> Option<Frame> {
        let scene = self.scene.as_ref()?;
        Some(renderer::render_scene(
            &scene.model,
            &self.camera(),
            &self.lighting,
            width,
            height,
        ))
    }
}
