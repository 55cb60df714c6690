//! Pipeline orchestrator: the two entry points a caller runs.
//!
//! | Operation | Output | Per-member failure |
//! |---|---|---|
//! | [`generate_all_cards`](CardPipeline::generate_all_cards) | one PDF per member | logged, member skipped |
//! | [`generate_batch_pdf`](CardPipeline::generate_batch_pdf) | one PDF for everyone | logged, pages omitted |
//!
//! Both create the workspace directories first, take the member list as an
//! explicit parameter, and overwrite previous output at the same paths.
//! Templates are reloaded at the start of every operation so replaced
//! template files are picked up between runs.

use crate::batch::{self, BatchReport, Tally, fold_members};
use crate::compose::Compositor;
use crate::config::CardConfig;
use crate::document::{DocumentError, DocumentWriter, FsDocumentWriter, assemble_member_card};
use crate::imaging::{AssetLoader, FsAssetLoader};
use crate::types::MemberRecord;
use crate::workspace::Workspace;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("batch document failed: {0}")]
    Document(#[from] DocumentError),
}

/// Individual card paths written, plus members skipped.
pub type CardsReport = Tally<PathBuf>;

pub struct CardPipeline<L, W> {
    compositor: Compositor<L>,
    writer: W,
}

impl CardPipeline<FsAssetLoader, FsDocumentWriter> {
    /// A pipeline reading and writing the workspace rooted at `root`.
    pub fn open(root: &Path, config: CardConfig) -> Self {
        let workspace = Workspace::new(root, &config.paths);
        let compositor = Compositor::new(FsAssetLoader::new(), config, workspace);
        Self::new(compositor, FsDocumentWriter::new())
    }
}

impl<L: AssetLoader, W: DocumentWriter> CardPipeline<L, W> {
    pub fn new(compositor: Compositor<L>, writer: W) -> Self {
        Self { compositor, writer }
    }

    pub fn workspace(&self) -> &Workspace {
        self.compositor.workspace()
    }

    pub fn compositor(&self) -> &Compositor<L> {
        &self.compositor
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Write one two-page PDF per member.
    ///
    /// Only failing to create the workspace directories is an error.
    pub fn generate_all_cards(
        &self,
        members: &[MemberRecord],
    ) -> Result<CardsReport, PipelineError> {
        self.begin_run()?;
        if members.is_empty() {
            info!("no members, nothing to generate");
            return Ok(Tally::default());
        }

        let tally = fold_members(members, |member| {
            assemble_member_card(&self.compositor, &self.writer, member)
        });
        info!(
            written = tally.success_count(),
            failed = tally.failure_count(),
            "individual cards done"
        );
        Ok(tally)
    }

    /// Write every member's card into one PDF.
    ///
    /// `Ok(None)` for an empty member list; nothing is written.
    pub fn generate_batch_pdf(
        &self,
        members: &[MemberRecord],
    ) -> Result<Option<BatchReport>, PipelineError> {
        self.begin_run()?;
        if members.is_empty() {
            info!("no members, batch document not written");
        }
        Ok(batch::assemble_batch(
            &self.compositor,
            &self.writer,
            members,
        )?)
    }

    fn begin_run(&self) -> Result<(), PipelineError> {
        self.workspace().ensure_dirs()?;
        self.compositor.clear_template_cache();
        Ok(())
    }
}
