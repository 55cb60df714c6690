//! Batch document assembly.
//!
//! Every member's front and back go into one document, in input order. A
//! member whose card cannot be rendered is skipped and recorded; the rest of
//! the batch carries on. The document is finalized and written once, after
//! the last member, so it always holds exactly `2 × successes` pages.

use crate::compose::{Compositor, RenderError};
use crate::document::{CardDocument, DocumentError, DocumentWriter, PageEntry};
use crate::imaging::AssetLoader;
use crate::types::MemberRecord;
use std::path::PathBuf;
use tracing::{info, warn};

/// Title of the batch PDF.
pub const BATCH_TITLE: &str = "Member cards";

/// Outcome of a per-member fold.
#[derive(Debug)]
pub struct Tally<T> {
    pub successes: Vec<T>,
    pub failures: Vec<MemberFailure>,
}

impl<T> Default for Tally<T> {
    fn default() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Tally<T> {
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// A member that did not make it into the output.
#[derive(Debug)]
pub struct MemberFailure {
    /// Position in the input list.
    pub index: usize,
    pub name: String,
    pub error: RenderError,
}

/// Apply `step` to each member in order, collecting successes and failures.
///
/// A failing step is logged with the member's identity and never stops the
/// fold.
pub fn fold_members<'m, T, F>(members: &'m [MemberRecord], mut step: F) -> Tally<T>
where
    F: FnMut(&'m MemberRecord) -> Result<T, RenderError>,
{
    members
        .iter()
        .enumerate()
        .fold(Tally::default(), |mut tally, (index, member)| {
            match step(member) {
                Ok(value) => tally.successes.push(value),
                Err(error) => {
                    warn!(index, member = %member.name, %error, "card not generated");
                    tally.failures.push(MemberFailure {
                        index,
                        name: member.name.clone(),
                        error,
                    });
                }
            }
            tally
        })
}

/// Result of a batch run.
#[derive(Debug)]
pub struct BatchReport {
    pub path: PathBuf,
    pub page_count: usize,
    pub pages: Vec<PageEntry>,
    /// Names of the members included, in page order.
    pub tally: Tally<String>,
}

/// Render every member into one document and persist it at the batch path.
///
/// Returns `Ok(None)` without writing anything when `members` is empty.
/// Only encoding or writing the finished document is fatal.
pub fn assemble_batch<L: AssetLoader, W: DocumentWriter>(
    compositor: &Compositor<L>,
    writer: &W,
    members: &[MemberRecord],
) -> Result<Option<BatchReport>, DocumentError> {
    if members.is_empty() {
        return Ok(None);
    }

    let mut doc = CardDocument::new(BATCH_TITLE, compositor.config().card);
    let tally = fold_members(members, |member| {
        let (front, back) = compositor.render_card(member)?;
        doc.push_card(&member.name, &front, &back)?;
        Ok(member.name.clone())
    });

    let page_count = doc.page_count();
    let pages = doc.pages().to_vec();
    let bytes = doc.finish()?;
    let path = compositor.workspace().batch_path();
    writer.write(&path, &bytes)?;

    info!(
        path = %path.display(),
        pages = page_count,
        included = tally.success_count(),
        skipped = tally.failure_count(),
        "wrote batch document"
    );
    Ok(Some(BatchReport {
        path,
        page_count,
        pages,
        tally,
    }))
}
