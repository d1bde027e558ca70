// src/site/links.rs
// =============================================================================
// Extracts outgoing links from a rendered page.
//
// We use `scraper` to find every <a href> and <area href>, then drop links
// that leave the site (anything with a scheme like https:, mailto:,
// javascript:, or protocol-relative "//cdn.example.com/..."). Checking those
// is a different job.
//
// PageLinks keeps the parsed document around and hands out a fresh iterator
// every time you call iter(), so the same page can be walked more than once
// without re-reading or re-parsing it.
// =============================================================================

use scraper::{Html, Selector};
use serde::Serialize;
use url::Url;

/// Where a link was found inside its page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LinkLocation {
    /// 0-based position among all links of the page, in document order
    pub index: usize,
    /// 1-based line of the href in the raw file, when it can be located
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// An internal link found in a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    pub href: String,
    pub location: LinkLocation,
}

/// The links of one parsed page
pub struct PageLinks<'a> {
    content: &'a str,
    document: Html,
    selector: Selector,
}

/// Parses `content` for links
///
/// Parsing happens once here; the actual link list is produced lazily by
/// `PageLinks::iter`.
pub fn extract_links(content: &str) -> PageLinks<'_> {
    PageLinks {
        content,
        document: Html::parse_document(content),
        // Constant selector, known to be valid
        selector: Selector::parse("a[href], area[href]").expect("link selector is valid"),
    }
}

impl<'a> PageLinks<'a> {
    /// Iterates over the internal links of the page, in document order
    pub fn iter(&self) -> impl Iterator<Item = ExtractedLink> + '_ {
        let mut cursor = LineCursor::default();

        self.all_hrefs()
            .enumerate()
            .filter_map(move |(index, href)| {
                // Locate every href (external ones too) so the cursor stays
                // in step with the document
                let line = cursor.locate(self.content, href);
                if is_external(href) {
                    return None;
                }
                Some(ExtractedLink {
                    href: href.to_string(),
                    location: LinkLocation { index, line },
                })
            })
    }

    /// Number of links skipped because they point outside the site
    pub fn external_count(&self) -> usize {
        self.all_hrefs().filter(|href| is_external(href)).count()
    }

    fn all_hrefs(&self) -> impl Iterator<Item = &str> + '_ {
        self.document
            .select(&self.selector)
            .filter_map(|element| element.value().attr("href"))
    }
}

/// Returns true for links that leave the site
///
/// Examples:
///   "https://rust-lang.org"  -> true
///   "mailto:me@example.com"  -> true
///   "//cdn.example.com/x.js" -> true
///   "/guide/"                -> false
///   "../a.html#b"            -> false
///   "#top"                   -> false
///
/// Anything shaped like `scheme:rest` counts as external, the same way a
/// browser reads it. So "c:foo.html" is a link with scheme "c" and is not
/// checked.
pub fn is_external(href: &str) -> bool {
    let href = href.trim();
    // Url::parse only succeeds for absolute URLs, i.e. ones with a scheme
    href.starts_with("//") || Url::parse(href).is_ok()
}

// Walks forward through the raw text to find which line each href sits on.
//
// Hrefs come out of the parser in document order, so each search starts
// where the previous match ended. The search looks for the whole attribute
// (href="..."), not the bare value, so "/" doesn't match inside "</title>".
// If the raw text differs from the parsed value (e.g. "&amp;" entities) the
// line is unknown and the cursor stays put.
#[derive(Debug, Default)]
struct LineCursor {
    offset: usize,
    line: usize,
}

impl LineCursor {
    fn locate(&mut self, content: &str, href: &str) -> Option<usize> {
        if href.is_empty() {
            return None;
        }

        let rest = content.get(self.offset..)?;
        let (found, len) = find_href_attribute(rest, href)?;

        self.line += rest[..found].matches('\n').count();
        self.offset += found + len;

        Some(self.line + 1)
    }
}

// First `href="value"`, `href='value'` or unquoted `href=value` in `text`,
// as (offset, length)
fn find_href_attribute(text: &str, value: &str) -> Option<(usize, usize)> {
    let quoted = [format!("href=\"{value}\""), format!("href='{value}'")];
    let mut best = quoted
        .iter()
        .filter_map(|pattern| text.find(pattern.as_str()).map(|at| (at, pattern.len())))
        .min();

    // Unquoted values end at whitespace or '>'
    let bare = format!("href={value}");
    let mut from = 0;
    while let Some(at) = text[from..].find(bare.as_str()) {
        let at = from + at;
        if best.is_some_and(|(best_at, _)| best_at < at) {
            break;
        }
        let end = at + bare.len();
        let terminated = text[end..]
            .chars()
            .next()
            .map_or(true, |c| c.is_ascii_whitespace() || c == '>');
        if terminated {
            best = Some((at, bare.len()));
            break;
        }
        from = at + 1;
    }

    best
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `impl Iterator<Item = ExtractedLink> + '_` mean?
//    - "Some iterator type; you don't need its exact name"
//    - The `'_` says it borrows from self, so PageLinks must outlive it
//
// 2. Why does Url::parse tell us a link is external?
//    - Url::parse only accepts absolute URLs, and those always have a scheme
//    - "guide.html" or "/docs/" fail to parse on their own
// -----------------------------------------------------------------------------
