//! Provides base64 and data-URL helpers.
//!
//! Model payloads travel as plain base64 text and become a [`Blob`] tagged
//! with the GLB media type. Images travel the other way as data URLs
//! (`data:<mime>;base64,<payload>`) whose prefix is stripped before sending.
//!
//! # Examples
//! ```
//! use shapecast::codec;
//!
//! let url = codec::encode_data_url("image/png", b"\x89PNG");
//! assert_eq!(codec::data_url_payload(&url), Some("iVBORw=="));
//! ```

use base64::Engine;

/// The media type of a binary glTF model.
pub const MODEL_GLTF_BINARY: &str = "model/gltf-binary";

/// An immutable binary object with a media type.
///
/// # Examples
/// ```
/// use shapecast::codec::Blob;
///
/// let blob = Blob::new("application/octet-stream", vec![1, 2, 3]);
/// assert_eq!(blob.len(), 3);
/// assert!(!blob.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    mime: String,
    bytes: Vec<u8>,
}

impl Blob {
    /// Creates a blob from raw bytes.
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Returns the media type this blob was tagged with.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Returns the blob contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the blob and returns its contents.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the blob has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Error returned when a payload is not valid base64.
///
/// # Examples
/// ```
/// use shapecast::codec;
///
/// let err = codec::decode_base64("not base64!").unwrap_err();
/// assert!(err.to_string().starts_with("Invalid base64 payload"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError(base64::DecodeError);

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid base64 payload: {}", self.0)
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<base64::DecodeError> for DecodeError {
    fn from(e: base64::DecodeError) -> Self {
        DecodeError(e)
    }
}

/// Decodes standard (padded) base64 text. Surrounding whitespace is ignored.
///
/// # Errors
/// Returns an error if the text contains invalid characters or padding.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(base64::engine::general_purpose::STANDARD.decode(encoded.trim())?)
}

/// Encodes bytes as standard (padded) base64 text.
pub fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decodes a base64 payload into a blob tagged with `mime`.
///
/// # Errors
/// Returns an error if the payload is not valid base64.
pub fn decode_blob(encoded: &str, mime: &str) -> Result<Blob, DecodeError> {
    Ok(Blob::new(mime, decode_base64(encoded)?))
}

/// Decodes a generated model payload into a `model/gltf-binary` blob.
///
/// # Errors
/// Returns an error if the payload is not valid base64.
///
/// # Examples
/// ```
/// use shapecast::codec;
///
/// assert!(codec::decode_model_payload("%%%").is_err());
/// ```
pub fn decode_model_payload(encoded: &str) -> Result<Blob, DecodeError> {
    decode_blob(encoded, MODEL_GLTF_BINARY)
}

/// Builds a `data:<mime>;base64,<payload>` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, encode_base64(bytes))
}

/// Returns the text after the first comma of a data URL.
///
/// Returns `None` for anything that does not start with `data:` or has no comma.
pub fn data_url_payload(url: &str) -> Option<&str> {
    if !url.starts_with("data:") {
        return None;
    }
    url.split_once(',').map(|(_, payload)| payload)
}

/// Returns the media type declared in a data URL header, if any.
///
/// # Examples
/// ```
/// use shapecast::codec;
///
/// assert_eq!(codec::data_url_mime("data:image/jpeg;base64,AAAA"), Some("image/jpeg"));
/// assert_eq!(codec::data_url_mime("data:,hello"), None);
/// ```
pub fn data_url_mime(url: &str) -> Option<&str> {
    let header = url.strip_prefix("data:")?.split_once(',')?.0;
    let mime = header.split(';').next()?;
    if mime.is_empty() {
        None
    } else {
        Some(mime)
    }
}

/// Decodes a base64 data URL to raw bytes.
///
/// Returns `None` if the source is not a base64 data URL or decoding fails.
pub fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let header = url.strip_prefix("data:")?.split_once(',')?.0;
    if !header.ends_with(";base64") {
        return None;
    }
    decode_base64(data_url_payload(url)?).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_length_and_content() {
        let bytes: Vec<u8> = (0..=255u8).chain(0..17).collect();
        let blob = decode_model_payload(&encode_base64(&bytes)).unwrap();
        assert_eq!(blob.len(), bytes.len());
        assert_eq!(blob.bytes(), bytes.as_slice());
        assert_eq!(blob.mime(), MODEL_GLTF_BINARY);
    }

    #[test]
    fn test_empty_payload_decodes_to_empty_blob() {
        let blob = decode_model_payload("").unwrap();
        assert!(blob.is_empty());
    }

    #[test]
    fn test_glb_magic_payload() {
        let blob = decode_model_payload("Z2xURg==").unwrap();
        assert_eq!(blob.into_bytes(), b"glTF".to_vec());
    }

    #[test]
    fn test_invalid_payload_is_rejected() {
        assert!(decode_model_payload("Z2xURg=").is_err());
        assert!(decode_model_payload("****").is_err());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(decode_base64("  Z2xURg==\n").unwrap(), b"glTF");
    }

    #[test]
    fn test_data_url_payload_splits_on_first_comma() {
        assert_eq!(data_url_payload("data:image/png;base64,AAAA"), Some("AAAA"));
        assert_eq!(data_url_payload("data:text/plain,a,b"), Some("a,b"));
        assert_eq!(data_url_payload("https://example.com/a.png"), None);
        assert_eq!(data_url_payload("data:no-comma"), None);
    }

    #[test]
    fn test_decode_data_url_requires_base64_marker() {
        assert_eq!(
            decode_data_url("data:application/octet-stream;base64,Z2xURg=="),
            Some(b"glTF".to_vec())
        );
        assert_eq!(decode_data_url("data:text/plain,glTF"), None);
        assert_eq!(decode_data_url("file:///model.bin"), None);
    }
}
