//! Workspace directory layout.
//!
//! A workspace is one root directory holding everything a run reads and
//! writes. Locations come from [`PathsConfig`](crate::config::PathsConfig):
//!
//! ```text
//! <root>/
//! ├── cards.toml           # optional config
//! ├── templates/
//! │   ├── front.png
//! │   └── back.png
//! ├── photos/
//! │   └── Ana Souza.jpg    # <name>.jpg unless the record names a file
//! └── cards/
//!     ├── Ana_Souza.pdf    # one per member
//!     └── all_cards.pdf    # batch document
//! ```
//!
//! Directories are created on demand. Missing templates are not detected
//! here up front; they surface as per-member render failures.
//! [`Workspace::missing_templates`] exists for callers that want an early
//! check anyway.

use crate::config::PathsConfig;
use crate::imaging::{AssetLoader, is_supported_image};
use crate::naming::{DOCUMENT_EXTENSION, card_filename, photo_filename};
use crate::types::{MemberRecord, Side};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Resolved absolute-or-root-relative paths for one workspace.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    paths: PathsConfig,
}

/// What [`Workspace::reset`] removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// Generated card documents only.
    Output,
    /// Generated documents, uploaded photos, and both templates.
    All,
}

/// Snapshot of what is present in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceStatus {
    pub front_template: bool,
    pub back_template: bool,
    pub photo_count: usize,
    /// Individual card documents, excluding the batch document.
    pub card_count: usize,
    pub batch_exists: bool,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, paths: &PathsConfig) -> Self {
        Self {
            root: root.into(),
            paths: paths.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(&self.paths.templates_dir)
    }

    pub fn template_path(&self, side: Side) -> PathBuf {
        let file = match side {
            Side::Front => &self.paths.front_template,
            Side::Back => &self.paths.back_template,
        };
        self.templates_dir().join(file)
    }

    pub fn photos_dir(&self) -> PathBuf {
        self.root.join(&self.paths.photos_dir)
    }

    /// Where the member's photo is expected.
    pub fn photo_path(&self, member: &MemberRecord) -> PathBuf {
        self.photos_dir().join(photo_filename(member))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.paths.output_dir)
    }

    /// Where the member's individual card is written.
    pub fn card_path(&self, member: &MemberRecord) -> PathBuf {
        self.output_dir().join(card_filename(member))
    }

    pub fn batch_path(&self) -> PathBuf {
        self.output_dir().join(&self.paths.batch_filename)
    }

    pub fn fonts_dir(&self) -> Option<PathBuf> {
        self.paths.fonts_dir.as_ref().map(|d| self.root.join(d))
    }

    /// Create the templates, photos, and output directories if absent.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [self.templates_dir(), self.photos_dir(), self.output_dir()] {
            if !dir.is_dir() {
                fs::create_dir_all(&dir)?;
                info!(dir = %dir.display(), "created directory");
            }
        }
        Ok(())
    }

    /// Templates the loader cannot find right now.
    pub fn missing_templates<L: AssetLoader>(&self, loader: &L) -> Vec<(Side, PathBuf)> {
        [Side::Front, Side::Back]
            .into_iter()
            .map(|side| (side, self.template_path(side)))
            .filter(|(_, path)| !loader.exists(path))
            .collect()
    }

    pub fn status(&self) -> io::Result<WorkspaceStatus> {
        let photo_count = list_files(&self.photos_dir())?
            .iter()
            .filter(|p| is_supported_image(p))
            .count();
        let batch = self.batch_path();
        let card_count = list_files(&self.output_dir())?
            .iter()
            .filter(|p| *p != &batch)
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
            })
            .count();

        Ok(WorkspaceStatus {
            front_template: self.template_path(Side::Front).is_file(),
            back_template: self.template_path(Side::Back).is_file(),
            photo_count,
            card_count,
            batch_exists: batch.is_file(),
        })
    }

    /// Delete files according to `scope`, keeping the directories.
    ///
    /// Returns the removed paths.
    pub fn reset(&self, scope: ResetScope) -> io::Result<Vec<PathBuf>> {
        let mut targets = list_files(&self.output_dir())?;
        if scope == ResetScope::All {
            targets.extend(list_files(&self.photos_dir())?);
            targets.extend(
                [Side::Front, Side::Back]
                    .into_iter()
                    .map(|side| self.template_path(side))
                    .filter(|p| p.is_file()),
            );
            // Directories may be configured to overlap
            targets.sort();
            targets.dedup();
        }
        for path in &targets {
            fs::remove_file(path)?;
            info!(file = %path.display(), "removed");
        }
        Ok(targets)
    }
}

/// Regular files directly inside `dir`, sorted. A missing directory is empty.
fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let rd = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut files = Vec::new();
    for entry in rd {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
