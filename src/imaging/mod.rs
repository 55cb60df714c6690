//! Image handling for card composition.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Load** | `image::ImageReader` with content sniffing |
//! | **Template / photo scaling** | `resize_exact` / `imageops::resize`, Lanczos3 |
//! | **Blend** | `imageops::overlay` |
//! | **Text** | SVG layer via `usvg` (shaping, fonts) + `resvg` (raster) |
//!
//! The module is split into:
//! - **Backend**: [`AssetLoader`] trait, the seam tests replace
//! - **Filesystem loader**: [`FsAssetLoader`]
//! - **Operations**: pure raster helpers on an RGBA canvas
//! - **Text**: [`TextRenderer`]

pub mod backend;
pub mod fs_loader;
pub mod operations;
pub mod text;

pub use backend::{AssetError, AssetLoader};
pub use fs_loader::{FsAssetLoader, is_supported_image, supported_input_extensions};
pub use text::{TextError, TextRenderer, TextSpan};
