// src/resolve/parse.rs
// =============================================================================
// The link resolver: (context, source file, href) -> Link
//
// How an href is resolved:
// 1. "#anchor" -> SelfAnchor, anchor copied exactly (emoji included)
// 2. Split off "#fragment" (the anchor) and "?query" (ignored)
// 3. Pick the base directory:
//      - href starts with the public path -> strip it, resolve from root
//      - href starts with "/"             -> resolve from root
//      - anything else                    -> resolve from the source's folder
// 4. Percent-decode and collapse "." / ".." segments
// 5. Empty path, trailing "/", "." or ".." -> that directory's index.html
// 6. If we landed back on the source file it's a SelfAnchor, else OtherFile
//
// Examples (root = /root, source = /root/foo/bar.html, public path = /pub/):
//   "#intro"         -> self  { anchor: "intro" }
//   "/pub/baz.html"  -> other { file: /root/baz.html }
//   "/pub/#zzz"      -> other { file: /root/index.html, anchor: "zzz" }
//   "../a/b.html#x"  -> other { file: /root/a/b.html, anchor: "x" }
// =============================================================================

use percent_encoding::percent_decode_str;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use super::link::{Link, MalformedHref, ResolveContext};

const INDEX_FILE: &str = "index.html";

/// Resolves `href`, found in `source`, into a link descriptor
///
/// Pure function: the file system is never touched. Hrefs that can't be
/// classified come back as `Err(MalformedHref)` for the caller to record.
///
/// External links (with a scheme like `https:`) are expected to be filtered
/// out before calling this; see `site::links`.
pub fn resolve_link(
    ctx: &ResolveContext,
    source: &Path,
    href: &str,
) -> Result<Link, MalformedHref> {
    // Browsers ignore leading/trailing whitespace in URLs, so do we
    let href = href.trim_start_matches(is_url_padding);

    // Step 1: same-page anchor, taken verbatim after the '#'
    if let Some(anchor) = href.strip_prefix('#') {
        return Ok(Link::SelfAnchor {
            anchor: anchor.to_string(),
        });
    }

    let href = href.trim_end_matches(is_url_padding);

    if href.is_empty() {
        return Err(MalformedHref::Empty);
    }
    if href.chars().any(char::is_control) {
        return Err(MalformedHref::ControlCharacter);
    }

    // Step 2: split off the fragment, then the query
    let (path, anchor) = match href.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (href, None),
    };
    let path = path.split_once('?').map_or(path, |(path, _query)| path);

    // Not starting with '#' means the only way to get here with an empty
    // path is "?query" or "?query#frag"
    if path.is_empty() {
        return Err(MalformedHref::QueryOnly);
    }

    // Step 3: choose the base
    let (mut segments, rest) = if let Some(rest) = ctx.strip_public_path(path) {
        (Vec::new(), rest)
    } else if let Some(rest) = path.strip_prefix('/') {
        (Vec::new(), rest)
    } else {
        (source_dir_segments(&ctx.root, source), path)
    };

    // Step 5 (decided up front, before segments are consumed)
    let points_at_directory = matches!(rest.rsplit('/').next(), Some("" | "." | ".."));

    // Step 4: decode and normalize
    for raw in rest.split('/') {
        let segment = percent_decode_str(raw)
            .decode_utf8()
            .map_err(|_| MalformedHref::InvalidEncoding)?;

        match &*segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(MalformedHref::EscapesRoot);
                }
            }
            name => segments.push(OsString::from(name)),
        }
    }

    let mut file = ctx.root.clone();
    file.extend(&segments);
    if points_at_directory {
        file.push(INDEX_FILE);
    }

    // Step 6
    let anchor = anchor.map(str::to_string);
    if file == normalize_path(source) {
        return Ok(Link::SelfAnchor {
            anchor: anchor.unwrap_or_default(),
        });
    }

    Ok(Link::OtherFile { file, anchor })
}

/// Collapses "." and ".." in a path without touching the file system
///
/// Unlike `fs::canonicalize` this works for paths that don't exist and never
/// follows symlinks. A ".." at the start of a relative path is kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // "/.." is still "/"
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    out
}

fn is_url_padding(c: char) -> bool {
    c.is_ascii_whitespace() || c.is_ascii_control()
}

// Directory of `source`, as segments relative to `root`.
//
// A source outside the root has no meaningful position in the site, so its
// relative links are resolved from the root itself.
fn source_dir_segments(root: &Path, source: &Path) -> Vec<OsString> {
    let source = normalize_path(source);

    let Ok(relative) = source.strip_prefix(root) else {
        return Vec::new();
    };

    relative
        .parent()
        .map(|dir| dir.iter().map(|s| s.to_os_string()).collect())
        .unwrap_or_default()
}
