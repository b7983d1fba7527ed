//! Image input: format detection and the per-scan request.

use base64::Engine;
use serde::Serialize;
use std::path::Path;

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Accepted still-image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    /// Match a file extension (`jpg`, `jpeg`, `png`), ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    /// Detect the format from leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&JPEG_MAGIC) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(&PNG_MAGIC) {
            Some(ImageFormat::Png)
        } else {
            None
        }
    }
}

/// One uploaded label image. Owned by a single scan and dropped after it.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl ScanRequest {
    pub fn new(bytes: Vec<u8>, format: ImageFormat) -> Self {
        Self { bytes, format }
    }

    /// Build a request from in-memory bytes, detecting the format from
    /// magic bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        let format = ImageFormat::sniff(&bytes)
            .ok_or_else(|| ImageError::UnsupportedFormat("unrecognized image data".into()))?;
        Ok(Self::new(bytes, format))
    }

    /// Read an image file. The extension decides the format; files with an
    /// unknown extension fall back to magic-byte detection.
    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ImageError::Read(format!("{}: {}", path.display(), e)))?;
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let by_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension);

        let format = by_ext.or_else(|| ImageFormat::sniff(&bytes)).ok_or_else(|| {
            ImageError::UnsupportedFormat(format!(
                "{} (only JPEG and PNG are accepted)",
                path.display()
            ))
        })?;

        Ok(Self::new(bytes, format))
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// Errors from loading an image.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Failed to read image: {0}")]
    Read(String),

    #[error("Image is empty")]
    Empty,

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
}
