//! PDF card documents.
//!
//! A [`CardDocument`] is an ordered list of full-bleed pages, one rendered
//! card side per page. Page size equals the card's pixel dimensions read as
//! PDF points, so every pixel maps to exactly one point and nothing is
//! scaled or cropped.
//!
//! Documents are encoded fully in memory by [`CardDocument::finish`] and
//! handed to a [`DocumentWriter`]. [`FsDocumentWriter`] writes to a sibling
//! temp file and renames it into place, so a failed run never leaves a
//! truncated PDF behind.

use crate::compose::{Compositor, RenderError};
use crate::config::CardSize;
use crate::imaging::AssetLoader;
use crate::imaging::operations::flatten_to_rgb;
use crate::types::{MemberRecord, RenderedSide, Side};
use printpdf::{Image, ImageTransform, Mm, PdfDocument, PdfDocumentReference};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const MM_PER_POINT: f32 = 25.4 / 72.0;

/// Images are placed at this resolution so one pixel spans one point.
const POINTS_PER_INCH: f32 = 72.0;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF encoding failed: {0}")]
    Encode(String),
    #[error("{side} page is {actual_width}x{actual_height}, document pages are {width}x{height}")]
    PageSize {
        side: Side,
        actual_width: u32,
        actual_height: u32,
        width: u32,
        height: u32,
    },
}

/// One page of a [`CardDocument`]: whose card and which side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub member: String,
    pub side: Side,
}

/// An in-progress PDF with fixed page dimensions.
pub struct CardDocument {
    doc: PdfDocumentReference,
    size: CardSize,
    pages: Vec<PageEntry>,
}

impl CardDocument {
    /// An empty document. Pages are only added by [`push_page`](Self::push_page).
    pub fn new(title: &str, size: CardSize) -> Self {
        Self {
            doc: PdfDocument::empty(title),
            size,
            pages: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[PageEntry] {
        &self.pages
    }

    /// Append one side as a full-bleed page.
    pub fn push_page(&mut self, member: &str, rendered: &RenderedSide) -> Result<(), DocumentError> {
        self.check_size(rendered)?;

        let (width, height) = (self.size.width, self.size.height);
        let (page, layer) = self.doc.add_page(
            Mm(width as f32 * MM_PER_POINT),
            Mm(height as f32 * MM_PER_POINT),
            format!("{member} {}", rendered.side),
        );
        let layer = self.doc.get_page(page).get_layer(layer);

        let rgb = flatten_to_rgb(&rendered.image);
        let buffer = printpdf::image_crate::RgbImage::from_raw(width, height, rgb.into_raw())
            .ok_or_else(|| {
                DocumentError::Encode(format!("{} page buffer is truncated", rendered.side))
            })?;
        let image = Image::from_dynamic_image(&printpdf::image_crate::DynamicImage::ImageRgb8(
            buffer,
        ));
        image.add_to_layer(
            layer,
            ImageTransform {
                dpi: Some(POINTS_PER_INCH),
                ..Default::default()
            },
        );

        self.pages.push(PageEntry {
            member: member.to_string(),
            side: rendered.side,
        });
        Ok(())
    }

    /// Append a member's front and back as two consecutive pages.
    ///
    /// Both sides are checked before either is added, so a size mismatch
    /// leaves the document unchanged.
    pub fn push_card(
        &mut self,
        member: &str,
        front: &RenderedSide,
        back: &RenderedSide,
    ) -> Result<(), DocumentError> {
        self.check_size(front)?;
        self.check_size(back)?;
        self.push_page(member, front)?;
        self.push_page(member, back)
    }

    /// Encode the document.
    pub fn finish(self) -> Result<Vec<u8>, DocumentError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| DocumentError::Encode(format!("{e:?}")))
    }

    fn check_size(&self, side: &RenderedSide) -> Result<(), DocumentError> {
        if side.width() == self.size.width && side.height() == self.size.height {
            return Ok(());
        }
        Err(DocumentError::PageSize {
            side: side.side,
            actual_width: side.width(),
            actual_height: side.height(),
            width: self.size.width,
            height: self.size.height,
        })
    }
}

/// Persists finished documents.
pub trait DocumentWriter {
    /// Write `bytes` to `path`, replacing any existing file.
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), DocumentError>;
}

impl<W: DocumentWriter + ?Sized> DocumentWriter for &W {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), DocumentError> {
        (**self).write(path, bytes)
    }
}

/// Writes documents to disk through a temp file and rename.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDocumentWriter;

impl FsDocumentWriter {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentWriter for FsDocumentWriter {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), DocumentError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = path.with_file_name(tmp_name);

        if let Err(e) = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Render a member's card and encode it as a two-page document.
pub fn build_member_document<L: AssetLoader>(
    compositor: &Compositor<L>,
    member: &MemberRecord,
) -> Result<Vec<u8>, RenderError> {
    let (front, back) = compositor.render_card(member)?;
    let mut doc = CardDocument::new(&member.name, compositor.config().card);
    doc.push_card(&member.name, &front, &back)?;
    Ok(doc.finish()?)
}

/// Render a member's card and persist it at the member's card path.
///
/// Nothing is written unless both sides render.
pub fn assemble_member_card<L: AssetLoader, W: DocumentWriter>(
    compositor: &Compositor<L>,
    writer: &W,
    member: &MemberRecord,
) -> Result<PathBuf, RenderError> {
    let bytes = build_member_document(compositor, member)?;
    let path = compositor.workspace().card_path(member);
    writer.write(&path, &bytes)?;
    debug!(member = %member.name, bytes = bytes.len(), "encoded card");
    info!(member = %member.name, path = %path.display(), "wrote card");
    Ok(path)
}
