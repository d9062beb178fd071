//! Image source cache.
//!
//! Fetching is done by the host; the cache only records what came back.
//! Any URL whose load failed resolves to [`PLACEHOLDER_IMAGE_URL`].

use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat};
use std::collections::HashMap;
use std::sync::Arc;

/// Shown in place of any image that failed to load.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150?text=Error+loading+image";

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub data: ImageData,
}

/// Load state of one URL.
#[derive(Debug, Clone)]
pub enum ImageStatus {
    /// Not loaded yet; the URL is used as-is.
    Pending,
    Ready(DecodedImage),
    Failed,
}

/// Per-URL load results.
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<String, ImageStatus>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record fetched bytes for `url`. Bytes that do not decode mark the URL
    /// as failed.
    pub fn insert_bytes(&mut self, url: &str, bytes: &[u8]) -> bool {
        match ::image::load_from_memory(bytes) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                let (width, height) = rgba.dimensions();
                let data = ImageData {
                    data: Blob::new(Arc::new(rgba.into_vec())),
                    format: ImageFormat::Rgba8,
                    width,
                    height,
                    alpha_type: ImageAlphaType::Alpha,
                };
                self.entries
                    .insert(url.to_string(), ImageStatus::Ready(DecodedImage { width, height, data }));
                true
            }
            Err(e) => {
                log::warn!("Failed to decode image {}: {}", url, e);
                self.entries.insert(url.to_string(), ImageStatus::Failed);
                false
            }
        }
    }

    /// Record that fetching `url` failed.
    pub fn mark_failed(&mut self, url: &str) {
        log::warn!("Failed to load image {}", url);
        self.entries.insert(url.to_string(), ImageStatus::Failed);
    }

    pub fn status(&self, url: &str) -> ImageStatus {
        self.entries.get(url).cloned().unwrap_or(ImageStatus::Pending)
    }

    pub fn decoded(&self, url: &str) -> Option<&DecodedImage> {
        match self.entries.get(url) {
            Some(ImageStatus::Ready(image)) => Some(image),
            _ => None,
        }
    }

    /// URL a backend should display for `url`. Blank or failed URLs give
    /// the placeholder.
    pub fn source_for<'a>(&self, url: &'a str) -> &'a str {
        if url.trim().is_empty() || matches!(self.entries.get(url), Some(ImageStatus::Failed)) {
            PLACEHOLDER_IMAGE_URL
        } else {
            url
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = ::image::RgbaImage::from_pixel(3, 2, ::image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        ::image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ::image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let mut cache = ImageCache::new();
        assert!(cache.insert_bytes("https://example.com/a.png", &png_bytes()));
        let decoded = cache.decoded("https://example.com/a.png").unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(cache.source_for("https://example.com/a.png"), "https://example.com/a.png");
    }

    #[test]
    fn test_failures_resolve_to_placeholder() {
        let mut cache = ImageCache::new();
        assert!(!cache.insert_bytes("https://example.com/broken", b"not an image"));
        assert!(matches!(cache.status("https://example.com/broken"), ImageStatus::Failed));
        assert_eq!(cache.source_for("https://example.com/broken"), PLACEHOLDER_IMAGE_URL);

        cache.mark_failed("https://example.com/404");
        assert_eq!(cache.source_for("https://example.com/404"), PLACEHOLDER_IMAGE_URL);
        assert_eq!(cache.source_for(""), PLACEHOLDER_IMAGE_URL);

        assert!(matches!(cache.status("https://example.com/later"), ImageStatus::Pending));
        assert_eq!(cache.source_for("https://example.com/later"), "https://example.com/later");
    }
}
