//! Text overlays, rasterized through an SVG text layer.
//!
//! Each card side's text is written as one SVG document the size of the
//! canvas, one `<text>` element per field, parsed with `usvg` (which does
//! font selection and shaping) and rendered with `resvg` into a transparent
//! pixmap. The pixmap is then alpha-blended over the canvas.
//!
//! Fonts come from the system font database plus an optional fonts
//! directory. A family that cannot be resolved falls back to the generic
//! sans-serif face; with no fonts at all the text is simply not drawn.

use crate::config::{Anchor, TextStyle};
use image::{Rgba, RgbaImage, imageops};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use usvg::fontdb;

/// Families tried, in order, as the generic sans-serif fallback.
const SANS_SERIF_CANDIDATES: &[&str] = &[
    "Arial",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "Helvetica",
    "FreeSans",
];

#[derive(Error, Debug)]
pub enum TextError {
    #[error("SVG text layer rejected: {0}")]
    Svg(#[from] usvg::Error),
    #[error("cannot allocate a {0}x{1} text layer")]
    Allocation(u32, u32),
}

/// One piece of text at a fixed position.
#[derive(Debug, Clone, Copy)]
pub struct TextSpan<'a> {
    pub text: &'a str,
    /// Left end of the baseline.
    pub anchor: Anchor,
    pub style: &'a TextStyle,
}

/// Draws [`TextSpan`]s onto canvases using a shared font database.
#[derive(Clone)]
pub struct TextRenderer {
    fontdb: Arc<fontdb::Database>,
}

impl TextRenderer {
    /// System fonts plus every font file directly inside `fonts_dir`.
    pub fn new(fonts_dir: Option<&Path>) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = fonts_dir {
            load_fonts_from_dir(&mut db, dir);
        }
        Self::with_database(db)
    }

    /// A renderer with no fonts. Spans are laid out but produce no glyphs.
    pub fn without_fonts() -> Self {
        Self::with_database(fontdb::Database::new())
    }

    pub fn with_database(mut db: fontdb::Database) -> Self {
        if let Some(family) = pick_sans_serif(&db) {
            db.set_sans_serif_family(family);
        }
        debug!(faces = db.len(), "font database ready");
        Self {
            fontdb: Arc::new(db),
        }
    }

    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Render `spans` and blend them over `canvas`.
    pub fn draw(&self, canvas: &mut RgbaImage, spans: &[TextSpan<'_>]) -> Result<(), TextError> {
        let spans: Vec<&TextSpan<'_>> = spans.iter().filter(|s| !s.text.is_empty()).collect();
        if spans.is_empty() {
            return Ok(());
        }
        let (width, height) = canvas.dimensions();
        let svg = build_svg(width, height, &spans);

        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts)?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or(TextError::Allocation(width, height))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        let mut layer = RgbaImage::new(width, height);
        for (dst, px) in layer.pixels_mut().zip(pixmap.pixels()) {
            let c = px.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        imageops::overlay(canvas, &layer, 0, 0);
        Ok(())
    }
}

fn build_svg(width: u32, height: u32, spans: &[&TextSpan<'_>]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    for span in spans {
        let [x, y] = span.anchor;
        let weight = if span.style.bold { "bold" } else { "normal" };
        let _ = write!(
            svg,
            r#"<text x="{x}" y="{y}" font-family="{family}, sans-serif" font-size="{size}" font-weight="{weight}" fill="{fill}" text-anchor="start" xml:space="preserve">{text}</text>"#,
            family = escape_xml(&span.style.font_family),
            size = span.style.size,
            fill = escape_xml(&span.style.color),
            text = escape_xml(span.text),
        );
    }
    svg.push_str("</svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn pick_sans_serif(db: &fontdb::Database) -> Option<&'static str> {
    SANS_SERIF_CANDIDATES.iter().copied().find(|candidate| {
        db.faces()
            .any(|face| face.families.iter().any(|(name, _)| name == candidate))
    })
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        debug!(dir = %dir.display(), "fonts directory not readable, skipping");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            debug!(font = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}
