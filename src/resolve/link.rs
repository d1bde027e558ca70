// src/resolve/link.rs
// =============================================================================
// Types produced and consumed by the link resolver.
//
// A Link is either:
// - SelfAnchor: "#section" on the current page (no file involved)
// - OtherFile: another file under the site root, maybe with "#section"
//
// Because it's an enum, a SelfAnchor simply has no `file` field. Every place
// that consumes a Link has to `match` both variants, and the compiler checks
// that we never forget one.
// =============================================================================

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::parse::normalize_path;

/// A resolved link descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Link {
    /// Anchor on the page that contains the link
    #[serde(rename = "self")]
    SelfAnchor { anchor: String },

    /// Another file under the root, optionally with an anchor inside it
    #[serde(rename = "other")]
    OtherFile {
        file: PathBuf,
        #[serde(skip_serializing_if = "Option::is_none")]
        anchor: Option<String>,
    },
}

impl Link {
    /// The anchor requested by this link, if any
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Link::SelfAnchor { anchor } => Some(anchor),
            Link::OtherFile { anchor, .. } => anchor.as_deref(),
        }
    }
}

/// Reasons an href can't be turned into a Link at all
///
/// These are not failures of the resolver; the validator records them as
/// `MalformedHref` violations and keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedHref {
    #[error("href is empty")]
    Empty,

    #[error("href has a query but no path or anchor to check")]
    QueryOnly,

    #[error("href climbs above the site root")]
    EscapesRoot,

    #[error("href path is not valid percent-encoded UTF-8")]
    InvalidEncoding,

    #[error("href contains control characters")]
    ControlCharacter,
}

// Everything the resolver needs to know about the run.
//
// Built once from configuration (see config.rs) and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveContext {
    /// Site output directory, lexically normalized
    pub root: PathBuf,
    /// Deployed base path such as "/docs/", always with leading and trailing '/'
    pub public_path: Option<String>,
}

impl ResolveContext {
    /// Creates a context, normalizing the root and the public path
    ///
    /// A public path of "docs", "/docs" or "/docs/" all become "/docs/".
    /// Blank public paths are treated as not configured.
    pub fn new(root: impl AsRef<Path>, public_path: Option<&str>) -> Self {
        let public_path = public_path
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                let mut normalized = String::with_capacity(p.len() + 2);
                if !p.starts_with('/') {
                    normalized.push('/');
                }
                normalized.push_str(p);
                if !normalized.ends_with('/') {
                    normalized.push('/');
                }
                normalized
            });

        ResolveContext {
            root: normalize_path(root.as_ref()),
            public_path,
        }
    }

    // Strips the public path from the front of `path`.
    //
    // Only the whole prefix counts: with "/pub/", "/pub/a.html" and "/pub"
    // match, "/public/a.html" does not.
    pub(crate) fn strip_public_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        let prefix = self.public_path.as_deref()?;
        if let Some(rest) = path.strip_prefix(prefix) {
            return Some(rest);
        }
        if path == prefix.trim_end_matches('/') {
            return Some("");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_path_is_normalized() {
        for raw in ["pub", "/pub", "pub/", "/pub/", "  /pub/ "] {
            let ctx = ResolveContext::new("/root", Some(raw));
            assert_eq!(ctx.public_path.as_deref(), Some("/pub/"), "input {raw:?}");
        }
    }

    #[test]
    fn test_blank_public_path_is_ignored() {
        let ctx = ResolveContext::new("/root", Some("   "));
        assert_eq!(ctx.public_path, None);
    }

    #[test]
    fn test_strip_public_path_matches_whole_prefix_only() {
        let ctx = ResolveContext::new("/root", Some("/pub/"));
        assert_eq!(ctx.strip_public_path("/pub/a.html"), Some("a.html"));
        assert_eq!(ctx.strip_public_path("/pub"), Some(""));
        assert_eq!(ctx.strip_public_path("/public/a.html"), None);
        assert_eq!(ctx.strip_public_path("/pu"), None);
    }

    #[test]
    fn test_link_serializes_with_type_tag() {
        let link = Link::OtherFile {
            file: PathBuf::from("/root/a.html"),
            anchor: None,
        };
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "other", "file": "/root/a.html" }));

        let link = Link::SelfAnchor { anchor: "top".to_string() };
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "self", "anchor": "top" }));
    }
}
