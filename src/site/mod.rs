// src/site/mod.rs
// =============================================================================
// This module reads the rendered site from disk.
//
// Submodules:
// - walk: finds every file under the site root
// - anchors: pulls anchor ids (id="..." and <a name="...">) out of a page
// - links: pulls hrefs out of a page, skipping external URLs
// - index: builds the file -> anchor ids map for the whole site
// =============================================================================

mod anchors;
mod index;
mod links;
mod walk;

pub use anchors::{extract_anchors, AnchorSet};
pub use index::{build_index, AnchorIndex, IndexEntry};
pub use links::{extract_links, is_external, ExtractedLink, LinkLocation, PageLinks};
pub use walk::{discover_files, FileKind, SiteFile};
