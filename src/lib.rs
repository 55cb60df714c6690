//! # Member Cards
//!
//! Renders personalized two-sided member ID cards. Each member record is
//! combined with a front and a back template image and the member's photo,
//! and written out as print-ready PDF: one document per member, or a single
//! batch document holding everyone.
//!
//! # Architecture: Render, Assemble, Persist
//!
//! ```text
//! MemberRecord ──► Compositor ──► RenderedSide (front, back)
//!                     │                 │
//!              AssetLoader        CardDocument ──► DocumentWriter ──► cards/*.pdf
//!       (templates, photos)     (full-bleed pages)
//! ```
//!
//! 1. **Render**: the [`compose::Compositor`] draws one side on a canvas the
//!    size of the card: template, photo or placeholder, then text.
//! 2. **Assemble**: [`document::CardDocument`] turns rendered sides into PDF
//!    pages, one pixel per point, no margins.
//! 3. **Persist**: a [`document::DocumentWriter`] stores the finished bytes.
//!
//! [`pipeline::CardPipeline`] runs these steps for a member list, either one
//! file per member or one batch file.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | The two entry points: individual cards and the batch document |
//! | [`batch`] | Batch assembly and the per-member fold that tolerates failures |
//! | [`document`] | PDF pages, document writers, single-member assembly |
//! | [`compose`] | Front and back rendering for one member |
//! | [`imaging`] | Asset loading, raster operations, text layer |
//! | [`policy`] | What a failed asset load means for each asset kind |
//! | [`format`] | Display formatting for dates and tax IDs |
//! | [`members`] | JSON member list loading and normalization |
//! | [`config`] | `cards.toml` loading, stock defaults, validation |
//! | [`workspace`] | Directory layout, status, reset |
//! | [`naming`] | Output and photo file names |
//! | [`types`] | Shared types: `MemberRecord`, `CellValue`, `Side`, `RenderedSide` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Partial Tolerance
//!
//! One member's failure never stops a run. Every per-member step goes
//! through [`batch::fold_members`], which logs the failure with the member's
//! name and keeps going. The caller gets both lists back.
//!
//! ## Asymmetric Asset Failures
//!
//! A missing template makes a card impossible; a missing photo only makes it
//! incomplete. The difference lives in one table, [`policy::LOAD_FAILURE_POLICY`],
//! rather than in scattered error handling.
//!
//! ## Whole Documents Only
//!
//! Documents are encoded in memory and written once. The filesystem writer
//! renames a temp file into place, so an interrupted run leaves either the
//! previous file or the new one, never half of one.
//!
//! ## Capabilities, Not Paths
//!
//! Rendering reads through [`imaging::AssetLoader`] and persisting goes
//! through [`document::DocumentWriter`]. The filesystem versions are the
//! defaults; tests swap in memory-backed ones.

pub mod batch;
pub mod compose;
pub mod config;
pub mod document;
pub mod format;
pub mod imaging;
pub mod members;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod policy;
pub mod types;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_helpers;
