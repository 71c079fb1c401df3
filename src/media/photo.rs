/// Profile photo assets and preview generation
///
/// A photo comes from one of two places: a file the user picked, or a
/// frame frozen from the camera. Both end up as the same `PhotoAsset`.
use image::{imageops::FilterType, DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task;
use tracing::{info, warn};

/// File name given to camera captures
pub const CAPTURE_FILE_NAME: &str = "photo.png";

/// MIME type given to camera captures
pub const CAPTURE_MIME_TYPE: &str = "image/png";

/// MIME type for files whose format can't be recognised
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    #[error("Could not read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Task join error: {0}")]
    Join(String),
}

/// Where a photo asset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoOrigin {
    File,
    Camera,
}

/// The single binary image submitted with the profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoAsset {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub origin: PhotoOrigin,
}

/// Downscaled RGBA pixels for on-screen display
#[derive(Clone, PartialEq, Eq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preview")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Preview {
    /// Scale an image to fit within `max_size` (aspect preserved)
    pub fn from_image(img: &DynamicImage, max_size: u32) -> Self {
        let scaled = if img.width() > max_size || img.height() > max_size {
            img.resize(max_size, max_size, FilterType::Lanczos3)
        } else {
            img.clone()
        };
        let rgba = scaled.to_rgba8();

        Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        }
    }
}

/// A photo asset together with its preview
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPhoto {
    pub asset: PhotoAsset,
    /// None when the bytes couldn't be decoded for display
    pub preview: Option<Preview>,
}

/// Load a user-selected photo file.
///
/// The file bytes are submitted as-is. Decoding only produces the
/// preview, so a file the decoder rejects is still accepted.
pub async fn load_photo_file(path: PathBuf, preview_size: u32) -> Result<LoadedPhoto, PhotoError> {
    // Spawn blocking because decoding large photos is CPU-intensive
    task::spawn_blocking(move || load_photo_file_blocking(&path, preview_size))
        .await
        .map_err(|e| PhotoError::Join(e.to_string()))?
}

fn load_photo_file_blocking(path: &Path, preview_size: u32) -> Result<LoadedPhoto, PhotoError> {
    let bytes = std::fs::read(path).map_err(|e| PhotoError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "photo".to_string());

    let loaded = photo_from_bytes(file_name, bytes, preview_size);
    info!(
        "📸 Loaded photo {} ({} bytes, {})",
        loaded.asset.file_name,
        loaded.asset.bytes.len(),
        loaded.asset.mime_type
    );
    Ok(loaded)
}

/// Build a file-origin photo from raw bytes
pub fn photo_from_bytes(file_name: String, bytes: Vec<u8>, preview_size: u32) -> LoadedPhoto {
    let format = image::guess_format(&bytes)
        .ok()
        .or_else(|| ImageFormat::from_path(&file_name).ok());

    let preview = match format.map(|f| image::load_from_memory_with_format(&bytes, f)) {
        Some(Ok(img)) => Some(Preview::from_image(&img, preview_size)),
        Some(Err(e)) => {
            warn!("⚠️  No preview for {}: {}", file_name, e);
            None
        }
        None => {
            warn!("⚠️  No preview for {}: unrecognised format", file_name);
            None
        }
    };

    LoadedPhoto {
        preview,
        asset: PhotoAsset {
            mime_type: format
                .map(|f| f.to_mime_type())
                .unwrap_or(FALLBACK_MIME_TYPE)
                .to_string(),
            file_name,
            bytes,
            origin: PhotoOrigin::File,
        },
    }
}

/// Encode a frozen camera frame as `photo.png`
pub fn photo_from_frame(frame: RgbaImage, preview_size: u32) -> Result<LoadedPhoto, image::ImageError> {
    let img = DynamicImage::ImageRgba8(frame);

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(LoadedPhoto {
        preview: Some(Preview::from_image(&img, preview_size)),
        asset: PhotoAsset {
            file_name: CAPTURE_FILE_NAME.to_string(),
            mime_type: CAPTURE_MIME_TYPE.to_string(),
            bytes,
            origin: PhotoOrigin::Camera,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 90])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg).unwrap();
        bytes
    }

    #[test]
    fn test_frame_becomes_png_asset() {
        let frame = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));
        let loaded = photo_from_frame(frame, 320).unwrap();

        assert_eq!(loaded.asset.file_name, "photo.png");
        assert_eq!(loaded.asset.mime_type, "image/png");
        assert_eq!(loaded.asset.origin, PhotoOrigin::Camera);
        assert_eq!(image::guess_format(&loaded.asset.bytes).unwrap(), ImageFormat::Png);
        let preview = loaded.preview.unwrap();
        assert_eq!((preview.width, preview.height), (4, 3));
    }

    #[test]
    fn test_preview_is_downscaled() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(800, 400));
        let preview = Preview::from_image(&img, 200);
        assert_eq!(preview.width, 200);
        assert_eq!(preview.height, 100);
        assert_eq!(preview.rgba.len(), 200 * 100 * 4);
    }

    #[test]
    fn test_unknown_bytes_kept_without_preview() {
        let loaded = photo_from_bytes("notes.bin".to_string(), b"not an image".to_vec(), 100);
        assert_eq!(loaded.asset.bytes, b"not an image");
        assert_eq!(loaded.asset.mime_type, FALLBACK_MIME_TYPE);
        assert_eq!(loaded.asset.origin, PhotoOrigin::File);
        assert!(loaded.preview.is_none());
    }

    #[tokio::test]
    async fn test_load_photo_file_keeps_original_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selfie.jpg");
        let bytes = jpeg_bytes(64, 48);
        std::fs::write(&path, &bytes).unwrap();

        let loaded = load_photo_file(path, 32).await.unwrap();
        assert_eq!(loaded.asset.bytes, bytes);
        assert_eq!(loaded.asset.file_name, "selfie.jpg");
        assert_eq!(loaded.asset.mime_type, "image/jpeg");
        assert_eq!(loaded.asset.origin, PhotoOrigin::File);
        assert_eq!(loaded.preview.unwrap().width, 32);
    }

    #[tokio::test]
    async fn test_truncated_jpeg_still_becomes_asset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        let bytes = b"\xff\xd8\xff truncated jpeg".to_vec();
        std::fs::write(&path, &bytes).unwrap();

        let loaded = load_photo_file(path, 32).await.unwrap();
        assert_eq!(loaded.asset.bytes, bytes);
        assert_eq!(loaded.asset.file_name, "broken.jpg");
        assert_eq!(loaded.asset.mime_type, "image/jpeg");
        assert!(loaded.preview.is_none());
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let result = load_photo_file(PathBuf::from("/nonexistent/photo.jpg"), 100).await;
        assert!(matches!(result, Err(PhotoError::Read { .. })));
    }
}
