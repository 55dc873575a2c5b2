//! Embedded cover art as data URIs
//!
//! The first picture of the primary tag (else of any tag) becomes
//! `data:<mime>;base64,<bytes>`. Files without artwork get the placeholder.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use thiserror::Error;

/// 1x1 PNG used when the placeholder file cannot be read
const BUILTIN_PLACEHOLDER: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

#[derive(Debug, Error)]
pub enum TagError {
    #[error("Failed to read tags of {path}: {message}")]
    ReadError { path: String, message: String },
}

/// Reads embedded artwork from an audio file
pub trait TagReader: Send + Sync {
    /// Raw bytes of the first embedded picture, if any
    fn cover_image(&self, path: &Path) -> Result<Option<Vec<u8>>, TagError>;
}

/// [`TagReader`] backed by lofty
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn cover_image(&self, path: &Path) -> Result<Option<Vec<u8>>, TagError> {
        let read_error = |e: lofty::error::LoftyError| TagError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let tagged_file = Probe::open(path)
            .map_err(read_error)?
            .read()
            .map_err(read_error)?;

        let primary = tagged_file
            .primary_tag()
            .and_then(|tag| tag.pictures().first());
        let picture = primary.or_else(|| {
            tagged_file
                .tags()
                .iter()
                .find_map(|tag| tag.pictures().first())
        });

        Ok(picture.map(|p| p.data().to_vec()))
    }
}

/// MIME type of an image from its magic bytes
pub fn sniff_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        [b'B', b'M', ..] => "image/bmp",
        _ => "image/jpeg",
    }
}

pub fn to_data_uri(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_image_mime(bytes), STANDARD.encode(bytes))
}

/// Cover art source for one ingestion run
pub struct CoverArt {
    placeholder: String,
}

impl CoverArt {
    /// Read the placeholder image once
    pub fn load(placeholder_path: &Path) -> Self {
        let placeholder = match std::fs::read(placeholder_path) {
            Ok(bytes) if !bytes.is_empty() => to_data_uri(&bytes),
            Ok(_) => {
                tracing::warn!("Placeholder cover {} is empty, using built-in image", placeholder_path.display());
                BUILTIN_PLACEHOLDER.to_string()
            }
            Err(e) => {
                tracing::warn!(
                    "Placeholder cover {} unreadable ({}), using built-in image",
                    placeholder_path.display(),
                    e
                );
                BUILTIN_PLACEHOLDER.to_string()
            }
        };
        Self { placeholder }
    }

    pub fn builtin() -> Self {
        Self {
            placeholder: BUILTIN_PLACEHOLDER.to_string(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Data URI for an extracted picture, or the placeholder
    pub fn resolve(&self, image: Option<&[u8]>) -> String {
        match image {
            Some(bytes) if !bytes.is_empty() => to_data_uri(bytes),
            _ => self.placeholder.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sniff_image_mime() {
        assert_eq!(sniff_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_image_mime(b"\x89PNG\r\n\x1a\n"), "image/png");
        assert_eq!(sniff_image_mime(b"GIF89a"), "image/gif");
        assert_eq!(sniff_image_mime(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_image_mime(b"BM\0\0"), "image/bmp");
        assert_eq!(sniff_image_mime(b"??"), "image/jpeg");
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(to_data_uri(b"GIF89a"), "data:image/gif;base64,R0lGODlh");
    }

    #[test]
    fn test_missing_placeholder_falls_back_to_builtin() {
        let cover = CoverArt::load(Path::new("/nonexistent/placeholder.jpg"));
        assert_eq!(cover.placeholder(), BUILTIN_PLACEHOLDER);
        assert_eq!(cover.resolve(None), BUILTIN_PLACEHOLDER);
    }

    #[test]
    fn test_placeholder_file_is_encoded() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), [0xFF, 0xD8, 0xFF]).unwrap();
        let cover = CoverArt::load(file.path());
        assert_eq!(cover.placeholder(), "data:image/jpeg;base64,/9j/");
        assert_eq!(cover.resolve(Some(b"GIF89a")), "data:image/gif;base64,R0lGODlh");
    }

    #[test]
    fn test_lofty_rejects_non_audio() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not audio at all").unwrap();
        assert!(LoftyTagReader.cover_image(file.path()).is_err());
    }
}
