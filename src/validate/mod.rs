// src/validate/mod.rs
// =============================================================================
// Site-wide validation: the two phases of a run.
//
// Phase 1: build the anchor index for the WHOLE site (site::build_index)
// Phase 2: for every page, extract its links, resolve them, and check them
//          against the finished index
//
// Phase 2 never starts before phase 1 is done: a link on the first page may
// point to the last file indexed. Within phase 2 every page is an independent
// task; each returns its own list of violations and one loop appends them
// to the report.
//
// Only I/O failures stop a run. Broken links are collected, never thrown.
// =============================================================================

mod check;
mod report;

pub use check::{check_link, relative_source};
pub use report::{DuplicateIds, ScanStats, ValidationReport, Violation, ViolationKind};

use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ValidateOptions;
use crate::error::SiteError;
use crate::resolve::ResolveContext;
use crate::site::{build_index, extract_links, AnchorIndex};

/// Validates every internal link of the site under `ctx.root`
///
/// Builds the anchor index first, then checks all pages against it.
pub async fn run(ctx: &ResolveContext, options: &ValidateOptions) -> Result<ValidationReport, SiteError> {
    let index = build_index(&ctx.root, options).await?;
    info!(files = index.len(), "anchor index complete");

    validate_site(ctx, Arc::new(index), options).await
}

/// Checks every page in `index` against `index`
///
/// The index must be complete; pass the result of `site::build_index`.
pub async fn validate_site(
    ctx: &ResolveContext,
    index: Arc<AnchorIndex>,
    options: &ValidateOptions,
) -> Result<ValidationReport, SiteError> {
    let ctx = Arc::new(ctx.clone());
    let options = Arc::new(options.clone());

    let mut report = ValidationReport::default();
    report.stats.files_indexed = index.len();
    report.duplicate_ids = index
        .duplicates()
        .map(|(path, anchors)| DuplicateIds {
            source: relative_source(&ctx.root, path),
            ids: anchors.duplicates.iter().cloned().collect(),
        })
        .collect();

    let pages: Vec<PathBuf> = index.pages().map(Path::to_path_buf).collect();
    info!(pages = pages.len(), "checking links");

    let mut results = stream::iter(pages)
        .map(|page| {
            let ctx = Arc::clone(&ctx);
            let index = Arc::clone(&index);
            let options = Arc::clone(&options);
            tokio::task::spawn_blocking(move || check_page(&ctx, &index, &options, &page))
        })
        .buffer_unordered(options.concurrency.max(1));

    while let Some(joined) = results.next().await {
        let outcome = joined??;

        report.stats.pages_scanned += 1;
        report.stats.links_checked += outcome.links_checked;
        report.stats.external_skipped += outcome.external_skipped;
        report.stats.prefix_skipped += outcome.prefix_skipped;
        report.violations.extend(outcome.violations);
    }

    report.finish();
    Ok(report)
}

// What checking one page produced
#[derive(Debug, Default)]
struct PageOutcome {
    violations: Vec<Violation>,
    links_checked: usize,
    external_skipped: usize,
    prefix_skipped: usize,
}

fn check_page(
    ctx: &ResolveContext,
    index: &AnchorIndex,
    options: &ValidateOptions,
    page: &Path,
) -> Result<PageOutcome, SiteError> {
    let bytes = std::fs::read(page).map_err(|err| SiteError::read(page, err))?;
    let content = String::from_utf8_lossy(&bytes);
    let links = extract_links(&content);

    let mut outcome = PageOutcome {
        external_skipped: links.external_count(),
        ..PageOutcome::default()
    };

    for link in links.iter() {
        if options
            .skip_prefixes
            .iter()
            .any(|prefix| link.href.starts_with(prefix.as_str()))
        {
            outcome.prefix_skipped += 1;
            continue;
        }

        outcome.links_checked += 1;
        if let Some(violation) = check_link(ctx, index, options.clean_urls, page, &link) {
            outcome.violations.push(violation);
        }
    }

    debug!(
        page = %page.display(),
        links = outcome.links_checked,
        broken = outcome.violations.len(),
        "checked page"
    );

    Ok(outcome)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why spawn_blocking instead of plain async?
//    - Parsing HTML is CPU work, not waiting on the network
//    - spawn_blocking runs it on tokio's thread pool for blocking jobs,
//      so several pages really are parsed at the same time
//
// 2. What does `joined??` mean?
//    - The first ? handles the task itself failing (it panicked)
//    - The second ? handles the page failing (the file couldn't be read)
//
// 3. Why Arc?
//    - Every task needs the index, but tasks must own what they use
//    - Arc::clone only bumps a reference count; the index isn't copied
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{Link, MalformedHref};
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn write_file(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn site(files: &[(&str, &str)]) -> TempDir {
        let temp = tempdir().unwrap();
        for (path, content) in files {
            write_file(temp.path(), path, content);
        }
        temp
    }

    async fn validate(temp: &TempDir, public_path: Option<&str>, options: ValidateOptions) -> ValidationReport {
        let ctx = ResolveContext::new(temp.path(), public_path);
        run(&ctx, &options).await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_anchor_in_other_file() {
        let temp = site(&[
            ("a.html", r#"<a href="b.html#missing">b</a>"#),
            ("b.html", r#"<h1 id="title">B</h1><p id="other">x</p>"#),
        ]);

        let report = validate(&temp, None, ValidateOptions::default()).await;

        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.count(ViolationKind::MissingAnchor), 1);
        assert_eq!(report.count(ViolationKind::MissingFile), 0);

        let v = &report.violations[0];
        assert_eq!(v.source, "a.html");
        assert_eq!(v.href, "b.html#missing");
        assert_eq!(v.location.line, Some(1));
    }

    #[tokio::test]
    async fn test_missing_file_does_not_stop_the_scan() {
        let temp = site(&[
            ("a.html", r#"<a href="c.html">c</a>"#),
            ("b.html", r##"<a href="#nowhere">x</a>"##),
            ("d/e.html", r#"<a href="../a.html">a</a>"#),
        ]);

        let report = validate(&temp, None, ValidateOptions::default()).await;

        assert_eq!(report.count(ViolationKind::MissingFile), 1);
        assert_eq!(report.count(ViolationKind::MissingAnchor), 1);
        assert_eq!(report.stats.pages_scanned, 3);
        assert_eq!(report.stats.links_checked, 3);

        let sources: Vec<_> = report.violations.iter().map(|v| v.source.as_str()).collect();
        assert_eq!(sources, vec!["a.html", "b.html"]);
    }

    #[tokio::test]
    async fn test_clean_site_with_public_path() {
        let temp = site(&[
            (
                "index.html",
                r##"<h1 id="welcome">Hi</h1>
                <a href="/docs/guide/">Guide</a>
                <a href="/docs/#welcome">Top</a>
                <a href="#welcome">Self</a>
                <a href="https://example.com/missing">External</a>"##,
            ),
            (
                "guide/index.html",
                r#"<h2 id="🆕">New</h2><a href="/docs/guide/#🆕">new</a><a href="../img/logo.png">logo</a>"#,
            ),
            ("img/logo.png", "png"),
        ]);

        let report = validate(&temp, Some("/docs/"), ValidateOptions::default()).await;

        assert!(report.is_clean(), "unexpected violations: {:?}", report.violations);
        assert_eq!(report.stats.files_indexed, 3);
        assert_eq!(report.stats.links_checked, 5);
        assert_eq!(report.stats.external_skipped, 1);
    }

    #[tokio::test]
    async fn test_malformed_hrefs_are_reported() {
        let temp = site(&[("index.html", r#"<a href="?page=2">next</a><a href="../../x.html">up</a>"#)]);

        let report = validate(&temp, None, ValidateOptions::default()).await;

        let reasons: Vec<_> = report.violations.iter().map(|v| v.reason).collect();
        assert_eq!(
            reasons,
            vec![Some(MalformedHref::QueryOnly), Some(MalformedHref::EscapesRoot)]
        );
        assert_eq!(report.count(ViolationKind::MalformedHref), 2);
    }

    #[tokio::test]
    async fn test_report_is_independent_of_concurrency() {
        let mut files = Vec::new();
        for i in 0..20 {
            files.push((
                format!("p{i:02}.html"),
                format!(
                    r##"<h2 id="s{i}">S</h2><a href="p{next:02}.html#s{next}">ok</a><a href="gone{i}.html">gone</a><a href="#x{i}">bad</a>"##,
                    next = (i + 1) % 20
                ),
            ));
        }
        let borrowed: Vec<(&str, &str)> = files.iter().map(|(p, c)| (p.as_str(), c.as_str())).collect();
        let temp = site(&borrowed);

        let serial = validate(
            &temp,
            None,
            ValidateOptions { concurrency: 1, ..ValidateOptions::default() },
        )
        .await;
        let parallel = validate(
            &temp,
            None,
            ValidateOptions { concurrency: 8, ..ValidateOptions::default() },
        )
        .await;

        assert_eq!(serial.violations, parallel.violations);
        assert_eq!(serial.violations.len(), 40);
        assert_eq!(serial.violations[0].source, "p00.html");
    }

    #[tokio::test]
    async fn test_directory_links_and_clean_urls() {
        let temp = site(&[
            ("index.html", r#"<a href="guide">g</a><a href="guide/intro">i</a>"#),
            ("guide/index.html", ""),
            ("guide/intro.html", ""),
        ]);

        let report = validate(&temp, None, ValidateOptions::default()).await;
        assert_eq!(report.count(ViolationKind::MissingFile), 1);
        assert_eq!(report.violations[0].href, "guide/intro");

        let options = ValidateOptions {
            clean_urls: true,
            ..ValidateOptions::default()
        };
        let report = validate(&temp, None, options).await;
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_skip_prefixes() {
        let temp = site(&[("index.html", r#"<a href="/api/generated.html">api</a><a href="/nope.html">x</a>"#)]);
        let options = ValidateOptions {
            skip_prefixes: vec!["/api/".to_string()],
            ..ValidateOptions::default()
        };

        let report = validate(&temp, None, options).await;

        assert_eq!(report.stats.prefix_skipped, 1);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].href, "/nope.html");
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_reported_but_not_violations() {
        let temp = site(&[("index.html", r##"<h2 id="a">1</h2><h2 id="a">2</h2><a href="#a">a</a>"##)]);

        let report = validate(&temp, None, ValidateOptions::default()).await;

        assert!(report.is_clean());
        assert_eq!(
            report.duplicate_ids,
            vec![DuplicateIds {
                source: "index.html".to_string(),
                ids: vec!["a".to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn test_resolved_target_is_recorded() {
        let temp = site(&[("docs/a.html", r#"<a href="../b.html#top">b</a>"#)]);
        let ctx = ResolveContext::new(temp.path(), None);

        let report = run(&ctx, &ValidateOptions::default()).await.unwrap();

        assert_eq!(
            report.violations[0].resolved,
            Some(Link::OtherFile {
                file: ctx.root.join("b.html"),
                anchor: Some("top".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_missing_root_is_fatal() {
        let temp = tempdir().unwrap();
        let ctx = ResolveContext::new(temp.path().join("not-built-yet"), None);

        let result = run(&ctx, &ValidateOptions::default()).await;

        assert!(matches!(result, Err(SiteError::RootNotFound(_))));
    }
}
