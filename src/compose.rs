//! Card compositor: renders one side of one member's card.
//!
//! ## Front
//!
//! ```text
//! ┌───────────────────────────────────────┐
//! │ ┌──────┐                              │  template stretched to canvas
//! │ │photo │  (or grey fill + "No Photo") │  photo stretched into front.photo
//! │ └──────┘                              │
//! │           Name                        │  front.name, bold
//! │           Role                        │  front.role, bold
//! └───────────────────────────────────────┘
//! ```
//!
//! ## Back
//!
//! Birth date, tax ID, baptism date, congregation, and validity date, each
//! at its own anchor in `back.*`, formatted by [`crate::format`].
//!
//! ## Asset failures
//!
//! Loading goes through the [`AssetLoader`] and every failure is resolved
//! by [`policy::on_load_failure`]: a missing template fails the side with
//! [`RenderError::AssetLoad`], a missing photo becomes the placeholder.
//!
//! Templates are decoded and scaled once, then reused for every member
//! until [`Compositor::clear_template_cache`] is called. Failed loads are
//! not cached, so each member retries and reports the same error.

use crate::config::{Anchor, CardConfig, TextStyle};
use crate::document::DocumentError;
use crate::format::{format_date, format_tax_id, format_valid_until};
use crate::imaging::operations::{blank_canvas, draw_stretched, fill_rect, fit_to_canvas};
use crate::imaging::{AssetError, AssetLoader, TextError, TextRenderer, TextSpan};
use crate::policy::{self, AssetKind, FailureAction};
use crate::types::{MemberRecord, RenderedSide, Side};
use crate::workspace::Workspace;
use image::{DynamicImage, RgbaImage};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to load {kind} {}: {source}", path.display())]
    AssetLoad {
        kind: AssetKind,
        path: PathBuf,
        #[source]
        source: AssetError,
    },
    #[error("text rendering failed: {0}")]
    Text(#[from] TextError),
    #[error("document assembly failed: {0}")]
    Document(#[from] DocumentError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One line of card text and the baseline start it is drawn at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedText {
    pub text: String,
    pub anchor: Anchor,
}

impl PlacedText {
    fn new(text: impl Into<String>, anchor: Anchor) -> Self {
        Self {
            text: text.into(),
            anchor,
        }
    }
}

/// Name and role lines of the front. A blank role prints the configured
/// default role.
pub fn front_text(member: &MemberRecord, config: &CardConfig) -> [PlacedText; 2] {
    let role = member
        .role
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(config.defaults.role.as_str());
    [
        PlacedText::new(member.name.as_str(), config.front.name),
        PlacedText::new(role, config.front.role),
    ]
}

/// The back's lines in drawing order: tax ID, birth date, baptism date,
/// congregation, validity.
pub fn back_text(member: &MemberRecord, config: &CardConfig) -> [PlacedText; 5] {
    let back = &config.back;
    [
        PlacedText::new(format_tax_id(member.tax_id.as_ref()), back.tax_id),
        PlacedText::new(format_date(member.birth_date.as_ref()), back.birth_date),
        PlacedText::new(format_date(member.baptism_date.as_ref()), back.baptism_date),
        PlacedText::new(
            member.congregation.as_deref().unwrap_or_default(),
            back.congregation,
        ),
        PlacedText::new(
            format_valid_until(member.valid_until.as_ref(), &config.defaults.valid_until),
            back.valid_until,
        ),
    ]
}

/// The label drawn inside the photo rectangle when there is no photo.
pub fn placeholder_text(config: &CardConfig) -> PlacedText {
    let placeholder = &config.front.placeholder;
    PlacedText::new(placeholder.label.as_str(), placeholder.label_position)
}

fn spans<'a>(lines: &'a [PlacedText], style: &'a TextStyle) -> Vec<TextSpan<'a>> {
    lines
        .iter()
        .map(|line| TextSpan {
            text: &line.text,
            anchor: line.anchor,
            style,
        })
        .collect()
}

/// Renders card sides for one run.
pub struct Compositor<L> {
    loader: L,
    config: CardConfig,
    workspace: Workspace,
    text: TextRenderer,
    templates: RefCell<HashMap<Side, Rc<RgbaImage>>>,
}

impl<L: AssetLoader> Compositor<L> {
    /// Build a compositor with a font database from system fonts and the
    /// workspace's fonts directory.
    pub fn new(loader: L, config: CardConfig, workspace: Workspace) -> Self {
        let text = TextRenderer::new(workspace.fonts_dir().as_deref());
        if text.face_count() == 0 {
            warn!("no fonts found, card text will not be drawn");
        }
        Self::with_text_renderer(loader, config, workspace, text)
    }

    pub fn with_text_renderer(
        loader: L,
        config: CardConfig,
        workspace: Workspace,
        text: TextRenderer,
    ) -> Self {
        Self {
            loader,
            config,
            workspace,
            text,
            templates: RefCell::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Forget cached templates so the next render reloads them from the loader.
    pub fn clear_template_cache(&self) {
        self.templates.borrow_mut().clear();
    }

    /// Render the front: template, photo or placeholder, name, role.
    pub fn render_front(&self, member: &MemberRecord) -> Result<RenderedSide, RenderError> {
        let mut canvas = self.template_canvas(Side::Front)?;
        let front = &self.config.front;

        let photo_path = self.workspace.photo_path(member);
        match self.load_asset(AssetKind::Photo, &photo_path)? {
            Some(photo) => draw_stretched(&mut canvas, &photo, front.photo),
            None => self.draw_placeholder(&mut canvas)?,
        }

        let lines = front_text(member, &self.config);
        self.text.draw(&mut canvas, &spans(&lines, &front.text))?;

        Ok(RenderedSide {
            side: Side::Front,
            image: canvas,
        })
    }

    /// Render the back: formatted personal data at fixed anchors.
    pub fn render_back(&self, member: &MemberRecord) -> Result<RenderedSide, RenderError> {
        let mut canvas = self.template_canvas(Side::Back)?;
        let lines = back_text(member, &self.config);
        self.text
            .draw(&mut canvas, &spans(&lines, &self.config.back.text))?;

        Ok(RenderedSide {
            side: Side::Back,
            image: canvas,
        })
    }

    /// Render both sides, front first. Fails if either side fails.
    pub fn render_card(
        &self,
        member: &MemberRecord,
    ) -> Result<(RenderedSide, RenderedSide), RenderError> {
        let front = self.render_front(member)?;
        let back = self.render_back(member)?;
        Ok((front, back))
    }

    fn draw_placeholder(&self, canvas: &mut RgbaImage) -> Result<(), RenderError> {
        let placeholder = &self.config.front.placeholder;
        // Colors were checked by CardConfig::validate; fall back to grey if
        // the config was built in code and skipped validation.
        let fill = crate::config::parse_hex_color(&placeholder.fill).unwrap_or([0xCC; 3]);
        fill_rect(canvas, self.config.front.photo, fill);
        let label = [placeholder_text(&self.config)];
        self.text.draw(canvas, &spans(&label, &placeholder.text))?;
        Ok(())
    }

    /// A fresh canvas holding the side's template, from cache when possible.
    fn template_canvas(&self, side: Side) -> Result<RgbaImage, RenderError> {
        if let Some(template) = self.templates.borrow().get(&side) {
            return Ok(template.as_ref().clone());
        }

        let kind = match side {
            Side::Front => AssetKind::FrontTemplate,
            Side::Back => AssetKind::BackTemplate,
        };
        let path = self.workspace.template_path(side);
        let Some(image) = self.load_asset(kind, &path)? else {
            return Ok(blank_canvas(self.config.card));
        };

        let template = Rc::new(fit_to_canvas(&image, self.config.card));
        self.templates
            .borrow_mut()
            .insert(side, Rc::clone(&template));
        Ok(template.as_ref().clone())
    }

    /// Load an asset, resolving a failure through the policy table.
    ///
    /// `Ok(None)` means the policy chose a placeholder.
    fn load_asset(
        &self,
        kind: AssetKind,
        path: &Path,
    ) -> Result<Option<DynamicImage>, RenderError> {
        match self.loader.load(path) {
            Ok(image) => Ok(Some(image)),
            Err(source) => match policy::on_load_failure(kind) {
                FailureAction::Abort => Err(RenderError::AssetLoad {
                    kind,
                    path: path.to_path_buf(),
                    source,
                }),
                FailureAction::Placeholder => {
                    debug!(%kind, path = %path.display(), error = %source, "asset unavailable, using placeholder");
                    Ok(None)
                }
            },
        }
    }
}
