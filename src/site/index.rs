// src/site/index.rs
// =============================================================================
// Builds the anchor index: every site file -> the anchor ids it defines.
//
// This is phase 1 of a run and must finish before any link is checked,
// because a link on the very first page may point at the very last one.
//
// How it works:
// 1. Walk the root to list every file
// 2. Parse pages on tokio's blocking thread pool, at most N at a time
// 3. A single loop collects each finished file into the index
//
// Workers never touch the index; they just return their result. So there's
// no locking, and the order files finish in doesn't matter (BTreeMap).
// =============================================================================

use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::anchors::{extract_anchors, AnchorSet};
use super::walk::{discover_files, FileKind, SiteFile};
use crate::config::ValidateOptions;
use crate::error::SiteError;

/// Index entry for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub kind: FileKind,
    pub anchors: AnchorSet,
}

/// Map from site file to the anchors it defines
///
/// Built once per run by `build_index`, read-only afterwards.
#[derive(Debug, Default)]
pub struct AnchorIndex {
    files: BTreeMap<PathBuf, IndexEntry>,
}

impl AnchorIndex {
    pub fn get(&self, file: &Path) -> Option<&IndexEntry> {
        self.files.get(file)
    }

    pub fn contains(&self, file: &Path) -> bool {
        self.files.contains_key(file)
    }

    /// Looks up the target of a link, with fallbacks
    ///
    /// Tries, in order:
    /// 1. the exact file
    /// 2. `<file>/index.html` when the last segment has no extension
    ///    (a link to a directory written without the trailing slash)
    /// 3. `<file>.html` when `clean_urls` is on ("/guide/intro" served
    ///    from "guide/intro.html")
    pub fn lookup(&self, file: &Path, clean_urls: bool) -> Option<&IndexEntry> {
        if let Some(entry) = self.files.get(file) {
            return Some(entry);
        }

        if file.extension().is_none() {
            if let Some(entry) = self.files.get(&file.join("index.html")) {
                return Some(entry);
            }
        }

        if clean_urls && file.extension().map_or(true, |ext| ext != "html") {
            let mut with_ext = file.as_os_str().to_os_string();
            with_ext.push(".html");
            return self.files.get(Path::new(&with_ext));
        }

        None
    }

    /// Pages in the index, in path order
    pub fn pages(&self) -> impl Iterator<Item = &Path> + '_ {
        self.files
            .iter()
            .filter(|(_, entry)| entry.kind == FileKind::Page)
            .map(|(path, _)| path.as_path())
    }

    /// Files that define the same id more than once
    pub fn duplicates(&self) -> impl Iterator<Item = (&Path, &AnchorSet)> + '_ {
        self.files
            .iter()
            .filter(|(_, entry)| !entry.anchors.duplicates.is_empty())
            .map(|(path, entry)| (path.as_path(), &entry.anchors))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub(crate) fn insert(&mut self, path: PathBuf, entry: IndexEntry) {
        self.files.insert(path, entry);
    }
}

/// Builds the anchor index for every file under `root`
///
/// Fails if the root or any file can't be read: validating against a
/// partial index would report links as broken when they aren't.
pub async fn build_index(root: &Path, options: &ValidateOptions) -> Result<AnchorIndex, SiteError> {
    let walk_root = root.to_path_buf();
    let extensions = options.page_extensions.clone();
    let files = tokio::task::spawn_blocking(move || discover_files(&walk_root, &extensions)).await??;

    info!(root = %root.display(), files = files.len(), "indexing site");

    let mut results = stream::iter(files)
        .map(|file| tokio::task::spawn_blocking(move || index_file(file)))
        .buffer_unordered(options.concurrency.max(1));

    let mut index = AnchorIndex::default();
    while let Some(joined) = results.next().await {
        let (path, entry) = joined??;
        index.insert(path, entry);
    }

    for (path, anchors) in index.duplicates() {
        warn!(file = %path.display(), ids = ?anchors.duplicates, "duplicate anchor ids");
    }

    Ok(index)
}

// Reads one file and turns it into an index entry
fn index_file(file: SiteFile) -> Result<(PathBuf, IndexEntry), SiteError> {
    let anchors = match file.kind {
        FileKind::Page => {
            let bytes = std::fs::read(&file.path).map_err(|err| SiteError::read(&file.path, err))?;
            extract_anchors(&String::from_utf8_lossy(&bytes))
        }
        FileKind::Asset => {
            // Only needs to exist and be readable; no point loading images
            std::fs::File::open(&file.path).map_err(|err| SiteError::read(&file.path, err))?;
            AnchorSet::default()
        }
    };

    debug!(file = %file.path.display(), anchors = anchors.ids.len(), "indexed");

    Ok((
        file.path,
        IndexEntry {
            kind: file.kind,
            anchors,
        },
    ))
}
