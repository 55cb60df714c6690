//! Shared test utilities.
//!
//! Unit tests render on a small card with solid-color templates, an
//! in-memory [`MockLoader`], and a font-less [`TextRenderer`], so pixel
//! assertions are exact and no system fonts are scanned.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (compositor, loader) = mock_compositor();
//! loader.remove(&compositor.workspace().template_path(Side::Front));
//! assert!(compositor.render_front(&MemberRecord::new("Ana")).is_err());
//! ```

use crate::compose::Compositor;
use crate::config::{CardConfig, CardSize, Rect};
use crate::document::tests::MemoryWriter;
use crate::imaging::TextRenderer;
use crate::imaging::backend::tests::MockLoader;
use crate::pipeline::CardPipeline;
use crate::types::{CellValue, MemberRecord, Side};
use crate::workspace::Workspace;
use image::{DynamicImage, Rgba, RgbaImage};
use std::sync::Arc;
use tempfile::TempDir;

pub const FRONT_COLOR: Rgba<u8> = Rgba([200, 30, 30, 255]);
pub const BACK_COLOR: Rgba<u8> = Rgba([30, 30, 200, 255]);
pub const PHOTO_COLOR: Rgba<u8> = Rgba([20, 160, 20, 255]);

// =========================================================================
// Configuration
// =========================================================================

/// A 120x80 card with every anchor inside it.
pub fn small_config() -> CardConfig {
    let mut config = CardConfig::default();
    config.card = CardSize {
        width: 120,
        height: 80,
    };
    config.front.photo = Rect {
        x: 4,
        y: 4,
        width: 20,
        height: 26,
    };
    config.front.name = [40, 50];
    config.front.role = [40, 70];
    config.front.text.size = 10;
    config.front.placeholder.label_position = [6, 16];
    config.front.placeholder.text.size = 4;
    config.back.tax_id = [70, 12];
    config.back.birth_date = [10, 12];
    config.back.baptism_date = [10, 30];
    config.back.congregation = [70, 30];
    config.back.valid_until = [10, 50];
    config.back.text.size = 8;
    config
}

/// A pixel of the front side that the photo rectangle does not cover.
pub fn outside_photo(config: &CardConfig) -> (u32, u32) {
    (config.card.width - 1, config.card.height - 1)
}

// =========================================================================
// Images and members
// =========================================================================

pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
}

/// A member with every field filled.
pub fn full_member(name: &str) -> MemberRecord {
    MemberRecord {
        name: name.to_string(),
        tax_id: Some(CellValue::Text("12345678901".into())),
        role: Some("Deacon".into()),
        birth_date: Some(CellValue::Number(32874.0)),
        congregation: Some("Central".into()),
        baptism_date: Some(CellValue::Text("05/06/2010".into())),
        valid_until: Some(CellValue::Number(46022.0)),
        photo_ref: None,
    }
}

// =========================================================================
// Mock setups
// =========================================================================

/// Compositor over a workspace at `/ws` whose templates exist only in the
/// returned loader. Photos are absent until inserted.
pub fn mock_compositor() -> (Compositor<Arc<MockLoader>>, Arc<MockLoader>) {
    mock_compositor_at(Workspace::new("/ws", &small_config().paths))
}

/// Pipeline over a real temp directory (so directory creation works) that
/// writes documents to memory.
pub fn mock_pipeline() -> (
    CardPipeline<Arc<MockLoader>, MemoryWriter>,
    Arc<MockLoader>,
    TempDir,
) {
    let tmp = TempDir::new().unwrap();
    let (compositor, loader) =
        mock_compositor_at(Workspace::new(tmp.path(), &small_config().paths));
    (CardPipeline::new(compositor, MemoryWriter::new()), loader, tmp)
}

/// Like [`mock_compositor`] with a custom config and text renderer.
pub fn mock_compositor_with(
    config: CardConfig,
    text: TextRenderer,
) -> (Compositor<Arc<MockLoader>>, Arc<MockLoader>) {
    let workspace = Workspace::new("/ws", &config.paths);
    mock_compositor_from(workspace, config, text)
}

fn mock_compositor_at(workspace: Workspace) -> (Compositor<Arc<MockLoader>>, Arc<MockLoader>) {
    mock_compositor_from(workspace, small_config(), TextRenderer::without_fonts())
}

fn mock_compositor_from(
    workspace: Workspace,
    config: CardConfig,
    text: TextRenderer,
) -> (Compositor<Arc<MockLoader>>, Arc<MockLoader>) {
    let loader = Arc::new(MockLoader::new());
    let CardSize { width, height } = config.card;
    loader.insert(workspace.template_path(Side::Front), solid(width, height, FRONT_COLOR));
    loader.insert(workspace.template_path(Side::Back), solid(width, height, BACK_COLOR));

    let compositor = Compositor::with_text_renderer(
        Arc::clone(&loader),
        config,
        workspace,
        text,
    );
    (compositor, loader)
}

#[test]
fn small_config_is_valid() {
    small_config().validate().unwrap();
}
