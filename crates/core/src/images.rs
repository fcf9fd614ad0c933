//! Station image slots and local-file checks.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Default upper bound for a selected image file (5 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Reference to a photo stored by the photo service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoRef {
    pub id: DbId,
}

/// A file the operator picked locally that has not been uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Local preview handle for image bytes. Never sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewHandle(String);

impl PreviewHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry in the station's image list.
///
/// A slot either points at a photo the service already stores or carries a
/// local file that must be uploaded before its id is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    Persisted { id: DbId, preview: PreviewHandle },
    Pending { file: LocalFile, preview: PreviewHandle },
}

impl ImageSlot {
    pub fn preview(&self) -> &PreviewHandle {
        match self {
            Self::Persisted { preview, .. } | Self::Pending { preview, .. } => preview,
        }
    }

    pub fn persisted_id(&self) -> Option<DbId> {
        match self {
            Self::Persisted { id, .. } => Some(*id),
            Self::Pending { .. } => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

// ---------------------------------------------------------------------------
// File checks
// ---------------------------------------------------------------------------

/// Why a selected file cannot become an image slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageFileError {
    #[error("File '{0}' is empty")]
    Empty(String),

    #[error("File '{name}' is {size} bytes, the limit is {limit}")]
    TooLarge {
        name: String,
        size: usize,
        limit: usize,
    },

    #[error("File '{0}' is not a PNG, JPEG or WebP image")]
    UnsupportedFormat(String),
}

const ACCEPTED_FORMATS: &[image::ImageFormat] = &[
    image::ImageFormat::Png,
    image::ImageFormat::Jpeg,
    image::ImageFormat::WebP,
];

/// Check that `file` is a non-empty PNG, JPEG or WebP image within
/// `max_bytes`. The format is sniffed from the content, not the file name.
pub fn validate_image_file(file: &LocalFile, max_bytes: usize) -> Result<(), ImageFileError> {
    if file.is_empty() {
        return Err(ImageFileError::Empty(file.name.clone()));
    }
    if file.len() > max_bytes {
        return Err(ImageFileError::TooLarge {
            name: file.name.clone(),
            size: file.len(),
            limit: max_bytes,
        });
    }
    match image::guess_format(&file.bytes) {
        Ok(format) if ACCEPTED_FORMATS.contains(&format) => Ok(()),
        _ => Err(ImageFileError::UnsupportedFormat(file.name.clone())),
    }
}
