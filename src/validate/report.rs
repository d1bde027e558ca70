// src/validate/report.rs
// =============================================================================
// The validation report: every broken link found in the site.
//
// Violations are sorted by (source file, position in the file), so two runs
// over the same site print the same report no matter which worker finished
// first.
// =============================================================================

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::resolve::{Link, MalformedHref};
use crate::site::LinkLocation;

/// What's wrong with a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The target file doesn't exist in the site
    MissingFile,
    /// The target file exists but has no element with that id
    MissingAnchor,
    /// The href couldn't be understood at all
    MalformedHref,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ViolationKind::MissingFile => "missing file",
            ViolationKind::MissingAnchor => "missing anchor",
            ViolationKind::MalformedHref => "malformed href",
        };
        f.write_str(label)
    }
}

/// A single broken link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Page containing the link, relative to the site root
    pub source: String,
    /// The href exactly as written
    pub href: String,
    pub location: LinkLocation,
    pub kind: ViolationKind,
    /// What the href resolved to (absent for malformed hrefs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<Link>,
    /// Why a malformed href was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<MalformedHref>,
    /// A likely fix, e.g. an anchor that only differs in case
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Ids defined more than once in the same page
///
/// Reported for information only; a link to a duplicated id still works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateIds {
    pub source: String,
    pub ids: Vec<String>,
}

/// Counters for the summary line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Files in the anchor index (pages and assets)
    pub files_indexed: usize,
    /// Pages whose links were checked
    pub pages_scanned: usize,
    /// Internal links checked
    pub links_checked: usize,
    /// Links pointing outside the site, not checked
    pub external_skipped: usize,
    /// Links matching a skip prefix, not checked
    pub prefix_skipped: usize,
}

/// The result of validating a whole site
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    pub duplicate_ids: Vec<DuplicateIds>,
    pub stats: ScanStats,
}

impl ValidationReport {
    /// True when no link is broken
    ///
    /// Duplicate ids don't count; they are warnings.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    /// Number of pages with at least one broken link
    pub fn broken_page_count(&self) -> usize {
        self.violations
            .iter()
            .map(|v| v.source.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    // Puts violations into presentation order, once all workers are done
    pub(crate) fn finish(&mut self) {
        self.violations.sort_by(|a, b| {
            (&a.source, a.location, &a.href, a.kind).cmp(&(&b.source, b.location, &b.href, b.kind))
        });
        self.duplicate_ids.sort_by(|a, b| a.source.cmp(&b.source));
    }

    /// Prints the report as a table on stdout
    pub fn print_table(&self) {
        if !self.violations.is_empty() {
            println!("{:<40} {:<40} {:<16} {}", "SOURCE", "HREF", "PROBLEM", "DETAIL");
            println!("{}", "=".repeat(110));

            for violation in &self.violations {
                let source = match violation.location.line {
                    Some(line) => format!("{}:{}", violation.source, line),
                    None => violation.source.clone(),
                };
                println!(
                    "{:<40} {:<40} {:<16} {}",
                    truncate(&source, 40),
                    truncate(&violation.href, 40),
                    violation.kind.to_string(),
                    detail(violation)
                );
            }
            println!();
        }

        if !self.duplicate_ids.is_empty() {
            println!("⚠️  Duplicate ids:");
            for dup in &self.duplicate_ids {
                println!("   {}: {}", dup.source, dup.ids.join(", "));
            }
            println!();
        }

        println!("📊 Summary:");
        println!("   📄 Files indexed: {}", self.stats.files_indexed);
        println!("   🔗 Links checked: {}", self.stats.links_checked);
        println!("   🌐 External (skipped): {}", self.stats.external_skipped);
        if self.stats.prefix_skipped > 0 {
            println!("   ⏭️  Ignored by prefix: {}", self.stats.prefix_skipped);
        }
        println!("   ❌ Missing files: {}", self.count(ViolationKind::MissingFile));
        println!("   ❌ Missing anchors: {}", self.count(ViolationKind::MissingAnchor));
        println!("   ❌ Malformed hrefs: {}", self.count(ViolationKind::MalformedHref));
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            write!(f, "all {} internal links valid", self.stats.links_checked)
        } else {
            write!(
                f,
                "found {} broken link{} in {} page{}",
                self.violations.len(),
                plural_s(self.violations.len()),
                self.broken_page_count(),
                plural_s(self.broken_page_count())
            )
        }
    }
}

fn detail(violation: &Violation) -> String {
    if let Some(reason) = violation.reason {
        return reason.to_string();
    }
    let mut text = match &violation.resolved {
        Some(Link::OtherFile { file, .. }) if violation.kind == ViolationKind::MissingFile => {
            format!("no file {}", file.display())
        }
        Some(link) => match link.anchor() {
            Some(anchor) => format!("no id \"{anchor}\""),
            None => String::new(),
        },
        None => String::new(),
    };
    if let Some(hint) = &violation.hint {
        text.push_str(&format!(" ({hint})"));
    }
    text
}

// Truncate on a char boundary so multi-byte hrefs don't panic
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn plural_s(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
