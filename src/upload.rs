//! Provides the single-image drop target and its preview.
//!
//! A drop carries a list of files. Exactly one file with an allowed image
//! extension is accepted; it is read asynchronously and turned into a data URL
//! that doubles as the displayable preview and the request payload.
//!
//! # Examples
//! ```
//! use std::path::Path;
//!
//! use shapecast::upload::ImageKind;
//!
//! assert_eq!(ImageKind::from_path(Path::new("photo.JPG")), Some(ImageKind::Jpeg));
//! assert_eq!(ImageKind::from_path(Path::new("photo.gif")), None);
//! ```

use std::path::{Path, PathBuf};

use crate::codec;

/// File extensions accepted by the drop target (lowercase, without dot).
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// The image types the drop target accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Classifies a file by its extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "png" => Some(ImageKind::Png),
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    /// Returns the media type used in the preview's data URL.
    pub fn mime(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }
}

/// The currently selected source image.
///
/// # Examples
/// ```
/// use shapecast::upload::{ImageKind, Preview};
///
/// let preview = Preview::from_bytes("dot.png", ImageKind::Png, b"\x89PNG");
/// assert_eq!(preview.data_url(), "data:image/png;base64,iVBORw==");
/// assert_eq!(preview.payload(), "iVBORw==");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preview {
    file_name: String,
    kind: ImageKind,
    data_url: String,
}

impl Preview {
    /// Builds a preview from the raw file contents.
    pub fn from_bytes(file_name: impl Into<String>, kind: ImageKind, bytes: &[u8]) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
            data_url: codec::encode_data_url(kind.mime(), bytes),
        }
    }

    /// Returns the name of the selected file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the image type.
    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// Returns the full `data:` URL.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Returns the base64 payload without the data-URL prefix.
    pub fn payload(&self) -> &str {
        codec::data_url_payload(&self.data_url).unwrap_or_default()
    }
}

/// Reasons a drop leaves the preview untouched.
#[derive(Debug)]
pub enum DropRejection {
    /// The drop carried no files.
    Empty,
    /// The drop carried more than one file.
    TooManyFiles(usize),
    /// The file is not one of the accepted image types.
    UnsupportedType(PathBuf),
    /// The file could not be read.
    Unreadable(PathBuf, std::io::Error),
}

impl std::fmt::Display for DropRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropRejection::Empty => write!(f, "No file dropped"),
            DropRejection::TooManyFiles(count) => {
                write!(f, "Only one file can be dropped (got {})", count)
            }
            DropRejection::UnsupportedType(path) => write!(
                f,
                "Unsupported file type: {} (expected .{})",
                path.display(),
                ACCEPTED_EXTENSIONS.join(", .")
            ),
            DropRejection::Unreadable(path, e) => {
                write!(f, "Could not read {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for DropRejection {}

/// Checks a drop against the single-file allowlist.
///
/// # Errors
/// Returns the reason the drop is rejected.
///
/// # Examples
/// ```
/// use std::path::PathBuf;
///
/// use shapecast::upload::{accept_single, DropRejection, ImageKind};
///
/// let files = vec![PathBuf::from("a.png")];
/// assert_eq!(accept_single(&files).unwrap().1, ImageKind::Png);
///
/// let files = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
/// assert!(matches!(accept_single(&files), Err(DropRejection::TooManyFiles(2))));
/// ```
pub fn accept_single(files: &[PathBuf]) -> Result<(&Path, ImageKind), DropRejection> {
    match files {
        [] => Err(DropRejection::Empty),
        [path] => ImageKind::from_path(path)
            .map(|kind| (path.as_path(), kind))
            .ok_or_else(|| DropRejection::UnsupportedType(path.clone())),
        many => Err(DropRejection::TooManyFiles(many.len())),
    }
}

/// Reads an accepted file into a preview.
///
/// # Errors
/// Returns [`DropRejection::Unreadable`] if the file cannot be read.
pub async fn read_preview(path: &Path, kind: ImageKind) -> Result<Preview, DropRejection> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| DropRejection::Unreadable(path.to_path_buf(), e))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    log::debug!("Read {} ({} bytes)", path.display(), bytes.len());
    Ok(Preview::from_bytes(file_name, kind, &bytes))
}

/// Validates a drop and reads its file.
///
/// # Errors
/// Returns the reason the drop is rejected.
pub async fn load_drop(files: &[PathBuf]) -> Result<Preview, DropRejection> {
    let (path, kind) = accept_single(files)?;
    read_preview(path, kind).await
}

/// What the upload panel displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadView<'a> {
    /// No image yet; the border is highlighted while a drag hovers.
    Placeholder { drag_active: bool },
    /// The selected image.
    Image(&'a Preview),
}

impl UploadView<'_> {
    /// Returns the prompt lines shown when no image is selected.
    pub fn prompt(&self) -> Option<[&'static str; 2]> {
        match self {
            UploadView::Placeholder { .. } => {
                Some(["Drag & drop image here", "or click to select"])
            }
            UploadView::Image(_) => None,
        }
    }
}

/// The drop target state: the preview slot and the drag highlight.
///
/// # Examples
/// ```
/// use shapecast::upload::{ImageKind, Preview, UploadPanel, UploadView};
///
/// let mut panel = UploadPanel::new();
/// panel.drag_enter();
/// assert_eq!(panel.view(), UploadView::Placeholder { drag_active: true });
///
/// let preview = Preview::from_bytes("dot.png", ImageKind::Png, b"\x89PNG");
/// assert!(panel.set_preview(preview).is_none());
/// assert!(!panel.is_drag_active());
/// assert_eq!(panel.preview().map(Preview::file_name), Some("dot.png"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct UploadPanel {
    preview: Option<Preview>,
    drag_active: bool,
}

impl UploadPanel {
    /// Creates an empty panel with no highlight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the selected image, if any.
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Whether a drag is hovering over the panel.
    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    /// Highlights the panel.
    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    /// Clears the highlight.
    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    /// Stores a new preview, returning the one it replaced.
    pub fn set_preview(&mut self, preview: Preview) -> Option<Preview> {
        self.drag_active = false;
        self.preview.replace(preview)
    }

    /// Returns what the panel displays.
    pub fn view(&self) -> UploadView<'_> {
        match &self.preview {
            Some(preview) => UploadView::Image(preview),
            None => UploadView::Placeholder {
                drag_active: self.drag_active,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_allowlist() {
        assert_eq!(ImageKind::from_path(Path::new("a.png")), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_path(Path::new("a.jpeg")), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_path(Path::new("a.PNG")), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_path(Path::new("a.webp")), None);
        assert_eq!(ImageKind::from_path(Path::new("png")), None);
    }

    #[test]
    fn test_accept_single_rejects_empty_and_unsupported() {
        assert!(matches!(accept_single(&[]), Err(DropRejection::Empty)));
        let files = vec![PathBuf::from("notes.txt")];
        assert!(matches!(
            accept_single(&files),
            Err(DropRejection::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_panel_replaces_preview_and_clears_highlight() {
        let mut panel = UploadPanel::new();
        assert_eq!(panel.view(), UploadView::Placeholder { drag_active: false });

        panel.drag_enter();
        assert_eq!(panel.view(), UploadView::Placeholder { drag_active: true });

        let first = Preview::from_bytes("a.png", ImageKind::Png, &[1, 2, 3]);
        assert!(panel.set_preview(first.clone()).is_none());
        assert!(!panel.is_drag_active());

        let second = Preview::from_bytes("b.jpg", ImageKind::Jpeg, &[4, 5, 6]);
        assert_eq!(panel.set_preview(second.clone()), Some(first));
        assert_eq!(panel.view(), UploadView::Image(&second));
        assert!(panel.view().prompt().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_file() {
        let files = vec![PathBuf::from("does_not_exist.png")];
        let err = load_drop(&files).await.unwrap_err();
        assert!(matches!(err, DropRejection::Unreadable(_, _)));
    }
}
