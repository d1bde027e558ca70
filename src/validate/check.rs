// src/validate/check.rs
// =============================================================================
// Checks a single extracted link against the finished anchor index.
//
//   self link   -> anchor must exist in the page that contains the link
//   other link  -> file must exist; if there's an anchor, it must exist there
//   malformed   -> always reported
//
// This is a pure function of its inputs, so pages can be checked on any
// thread in any order.
// =============================================================================

use std::path::Path;

use super::report::{Violation, ViolationKind};
use crate::resolve::{resolve_link, Link, ResolveContext};
use crate::site::{AnchorIndex, AnchorSet, ExtractedLink, FileKind};

/// Checks one link found in `source`
///
/// Returns `None` when the link is fine.
pub fn check_link(
    ctx: &ResolveContext,
    index: &AnchorIndex,
    clean_urls: bool,
    source: &Path,
    link: &ExtractedLink,
) -> Option<Violation> {
    let resolved = match resolve_link(ctx, source, &link.href) {
        Ok(resolved) => resolved,
        Err(reason) => {
            return Some(Violation {
                source: relative_source(&ctx.root, source),
                href: link.href.clone(),
                location: link.location,
                kind: ViolationKind::MalformedHref,
                resolved: None,
                reason: Some(reason),
                hint: None,
            });
        }
    };

    let (kind, hint) = match &resolved {
        Link::SelfAnchor { anchor } => {
            let empty = AnchorSet::default();
            let anchors = index.get(source).map_or(&empty, |entry| &entry.anchors);
            (ViolationKind::MissingAnchor, missing_anchor(anchors, anchor)?)
        }
        Link::OtherFile { file, anchor } => match index.lookup(file, clean_urls) {
            None => (ViolationKind::MissingFile, None),
            // Fragments on images/PDFs/SVG sprites aren't element ids we can see
            Some(entry) if entry.kind == FileKind::Asset => return None,
            Some(entry) => (
                ViolationKind::MissingAnchor,
                missing_anchor(&entry.anchors, anchor.as_deref()?)?,
            ),
        },
    };

    Some(Violation {
        source: relative_source(&ctx.root, source),
        href: link.href.clone(),
        location: link.location,
        kind,
        resolved: Some(resolved),
        reason: None,
        hint,
    })
}

/// Path of `source` relative to the root, with '/' separators
pub fn relative_source(root: &Path, source: &Path) -> String {
    source
        .strip_prefix(root)
        .unwrap_or(source)
        .to_string_lossy()
        .replace('\\', "/")
}

// Some(hint) when `anchor` is missing, None when the link is fine.
// An empty anchor ("page.html#") means the top of the page.
fn missing_anchor(anchors: &AnchorSet, anchor: &str) -> Option<Option<String>> {
    if anchor.is_empty() || anchors.contains(anchor) {
        return None;
    }
    let hint = anchors
        .find_case_insensitive(anchor)
        .map(|candidate| format!("did you mean \"#{candidate}\"?"));
    Some(hint)
}
