//! Provides the shapecast image-to-3D client.
//!
//! A user drops an image, the image is sent to a remote generation endpoint,
//! and the returned GLB model is decoded and rendered by a software rasterizer
//! with an orbit camera. The pieces mirror the page they were designed for:
//!
//! - [`upload`]: the single-image drop target and its preview
//! - [`generation`] and [`client`]: the request lifecycle and the HTTP call
//! - [`session`]: the shared state tying the two together
//! - [`viewer`]: object references, model loading, and orbit controls
//!
//! # Build
//! ```text
//! SHAPECAST_ENDPOINT=http://my-host:8000 cargo build --release
//! ```
//!
//! # Examples
//! ```
//! use shapecast::codec;
//!
//! let blob = codec::decode_model_payload("Z2xURg==").unwrap();
//! assert_eq!(blob.bytes(), b"glTF");
//! assert_eq!(blob.mime(), codec::MODEL_GLTF_BINARY);
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod formats;
pub mod generation;
pub mod renderer;
pub mod session;
pub mod upload;
pub mod viewer;

pub use client::{GenerateError, GenerateRequest, GenerateResponse, GenerationBackend, HttpBackend};
pub use config::Config;
pub use generation::{GenerationState, Ticket, ViewerPanel};
pub use session::Session;
pub use upload::{DropRejection, Preview};
pub use viewer::{ModelViewer, ViewerError};
