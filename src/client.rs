//! Provides the wire types and transport for generation requests.
//!
//! `POST <endpoint>/generate-3d` with `{"image_data": "<base64>"}`; a 2xx
//! response carries `{"glb_data": "<base64 GLB>"}`. Anything else is a failure.
//!
//! # Examples
//! ```
//! use shapecast::client::GenerateRequest;
//!
//! let request = GenerateRequest::new("iVBORw==");
//! let body = serde_json::to_string(&request).unwrap();
//! assert_eq!(body, r#"{"image_data":"iVBORw=="}"#);
//! ```

use std::future::Future;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{Config, ConfigError};
use crate::upload::Preview;

/// The request body sent to the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Base64 image contents, without a data-URL prefix.
    pub image_data: String,
}

impl GenerateRequest {
    /// Creates a request from a bare base64 payload.
    pub fn new(image_data: impl Into<String>) -> Self {
        Self {
            image_data: image_data.into(),
        }
    }

    /// Builds a request from the preview's payload.
    pub fn from_preview(preview: &Preview) -> Self {
        Self::new(preview.payload())
    }
}

/// The body returned by a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Base64 GLB contents.
    pub glb_data: String,
}

/// Errors that can occur during a generation request.
#[derive(Debug)]
pub enum GenerateError {
    /// The server answered with a non-2xx status.
    Status(u16),
    /// The request never produced a response.
    Transport(reqwest::Error),
    /// A 2xx response whose body is not a generation result.
    InvalidResponse(serde_json::Error),
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::Status(_) => write!(f, "Generation failed"),
            GenerateError::Transport(e) => write!(f, "{}", e),
            GenerateError::InvalidResponse(e) => write!(f, "Invalid response: {}", e),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::Status(_) => None,
            GenerateError::Transport(e) => Some(e),
            GenerateError::InvalidResponse(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for GenerateError {
    fn from(e: reqwest::Error) -> Self {
        GenerateError::Transport(e)
    }
}

impl From<serde_json::Error> for GenerateError {
    fn from(e: serde_json::Error) -> Self {
        GenerateError::InvalidResponse(e)
    }
}

/// A service that turns an image into a GLB model.
pub trait GenerationBackend {
    /// Sends one generation request. Implementations must not retry.
    fn generate(
        &self,
        request: GenerateRequest,
    ) -> impl Future<Output = Result<GenerateResponse, GenerateError>> + Send;
}

/// The HTTP generation backend.
///
/// # Examples
/// ```
/// use shapecast::client::HttpBackend;
/// use shapecast::config::Config;
///
/// let config = Config::default().with_endpoint("http://127.0.0.1:8000");
/// let backend = HttpBackend::from_config(&config).unwrap();
/// assert_eq!(backend.url().as_str(), "http://127.0.0.1:8000/generate-3d");
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    url: Url,
}

impl HttpBackend {
    /// Creates a backend posting to the exact `url` given.
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// Creates a backend posting to the configured endpoint.
    ///
    /// # Errors
    /// Returns an error if the configured endpoint is not a valid URL.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.generate_url()?))
    }

    /// Returns the URL requests are posted to.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl GenerationBackend for HttpBackend {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, GenerateError> {
        log::info!(
            "POST {} ({} bytes of image data)",
            self.url,
            request.image_data.len()
        );

        let response = self.client.post(self.url.clone()).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Generation endpoint answered {}", status);
            return Err(GenerateError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let parsed: GenerateResponse = serde_json::from_slice(&body)?;
        log::info!("Received {} bytes of model data", parsed.glb_data.len());
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parses_and_ignores_extra_fields() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"glb_data":"Z2xURg==","seconds":12.5}"#).unwrap();
        assert_eq!(parsed.glb_data, "Z2xURg==");
    }

    #[test]
    fn test_response_without_model_is_invalid() {
        let err: GenerateError = serde_json::from_str::<GenerateResponse>(r#"{"detail":"oom"}"#)
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("Invalid response"));
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(GenerateError::Status(500).to_string(), "Generation failed");
    }

    #[test]
    fn test_request_from_preview_strips_prefix() {
        use crate::upload::{ImageKind, Preview};

        let preview = Preview::from_bytes("a.jpg", ImageKind::Jpeg, b"abc");
        let request = GenerateRequest::from_preview(&preview);
        assert_eq!(request.image_data, "YWJj");
    }
}
