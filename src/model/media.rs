//! Media (image) model structures.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where a medium's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Bytes held in memory
    Buffer(Vec<u8>),
    /// File read when the workbook is written
    Path(PathBuf),
}

/// One embedded binary asset, stored as `xl/media/{name}.{extension}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medium {
    /// Bare name, e.g. `image1`
    pub name: String,

    /// Extension without the dot, e.g. `png`
    pub extension: String,

    /// Binary data or a path to it
    #[serde(skip)]
    pub source: Option<MediaSource>,
}

impl Medium {
    /// Create a medium backed by an in-memory buffer.
    pub fn from_buffer(name: impl Into<String>, extension: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            source: Some(MediaSource::Buffer(data)),
        }
    }

    /// Create a medium read from `path` at write time; name and extension come from the path.
    ///
    /// A name other than ASCII letters and digits (`company-logo.png`) is
    /// stored as the next free `image{N}` and reads back under that name.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            extension,
            source: Some(MediaSource::Path(path.to_path_buf())),
        }
    }

    /// File name inside the package, e.g. `image1.png`.
    pub fn filename(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }

    /// In-memory bytes, if this medium is buffer-backed.
    pub fn buffer(&self) -> Option<&[u8]> {
        match &self.source {
            Some(MediaSource::Buffer(data)) => Some(data),
            _ => None,
        }
    }

    /// Content type for the `[Content_Types].xml` default entry.
    pub fn content_type(&self) -> &'static str {
        content_type_for_extension(&self.extension)
    }
}

/// Determine the content type from a media file extension.
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "svg" => "image/svg+xml",
        "wmf" => "image/x-wmf",
        "emf" => "image/x-emf",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}
