//! Asset loading capability.
//!
//! The compositor never touches the filesystem directly: it asks an
//! [`AssetLoader`] for decoded images. The production implementation is
//! [`FsAssetLoader`](super::fs_loader::FsAssetLoader); tests substitute the
//! in-memory [`tests::MockLoader`].

use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
}

/// Read access to template and photo images.
pub trait AssetLoader {
    /// Load and decode the image at `path`.
    fn load(&self, path: &Path) -> Result<DynamicImage, AssetError>;

    /// Whether an asset is present at `path`, without decoding it.
    fn exists(&self, path: &Path) -> bool;
}

impl<L: AssetLoader + ?Sized> AssetLoader for &L {
    fn load(&self, path: &Path) -> Result<DynamicImage, AssetError> {
        (**self).load(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}

impl<L: AssetLoader + ?Sized> AssetLoader for std::sync::Arc<L> {
    fn load(&self, path: &Path) -> Result<DynamicImage, AssetError> {
        (**self).load(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}
