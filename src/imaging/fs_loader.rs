//! Filesystem asset loader backed by the `image` crate.
//!
//! Formats are sniffed from file content, so a PNG saved as `photo.jpg`
//! still loads.

use super::backend::{AssetError, AssetLoader};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;
use std::sync::LazyLock;

const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Image file extensions with a decoder compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has one of the [`supported_input_extensions`].
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
}

/// Loads assets from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetLoader;

impl FsAssetLoader {
    pub fn new() -> Self {
        Self
    }
}

impl AssetLoader for FsAssetLoader {
    fn load(&self, path: &Path) -> Result<DynamicImage, AssetError> {
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| AssetError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn loads_png_from_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("front.png");
        RgbImage::from_pixel(5, 4, Rgb([10, 20, 30])).save(&path).unwrap();

        let loader = FsAssetLoader::new();
        assert!(loader.exists(&path));
        let img = loader.load(&path).unwrap();
        assert_eq!((img.width(), img.height()), (5, 4));
    }

    #[test]
    fn sniffs_format_from_content() {
        let tmp = TempDir::new().unwrap();
        let png = tmp.path().join("a.png");
        RgbImage::new(2, 2).save(&png).unwrap();
        let misnamed = tmp.path().join("a.jpg");
        std::fs::rename(&png, &misnamed).unwrap();

        let img = FsAssetLoader::new().load(&misnamed).unwrap();
        assert_eq!(img.width(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.jpg");
        let loader = FsAssetLoader::new();
        assert!(!loader.exists(&path));
        assert!(matches!(loader.load(&path), Err(AssetError::Io(_))));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        assert!(matches!(
            FsAssetLoader::new().load(&path),
            Err(AssetError::Decode { .. })
        ));
    }

    #[test]
    fn supported_extensions_cover_common_photo_formats() {
        let exts = supported_input_extensions();
        assert!(exts.contains(&"jpg"));
        assert!(exts.contains(&"png"));
        assert!(is_supported_image(Path::new("Ana.JPG")));
        assert!(!is_supported_image(Path::new("notes.txt")));
    }
}
