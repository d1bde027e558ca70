// src/config.rs
// =============================================================================
// Turns command-line arguments into the settings for one run.
//
// Two things come out of here:
// - ResolveContext: root + public path, used by the link resolver
// - ValidateOptions: how the site is scanned and what gets checked
//
// Both are built once at start-up and passed around by reference; nothing
// changes them afterwards.
// =============================================================================

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use url::Url;

use crate::cli::CheckArgs;
use crate::resolve::{normalize_path, ResolveContext};

/// Options for scanning and validating a site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOptions {
    /// File extensions treated as pages (parsed for anchors and links)
    pub page_extensions: Vec<String>,
    /// Maximum number of files processed at the same time
    pub concurrency: usize,
    /// Accept "/guide/intro" as a link to "guide/intro.html"
    pub clean_urls: bool,
    /// Hrefs starting with any of these are not checked
    pub skip_prefixes: Vec<String>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        ValidateOptions {
            page_extensions: vec!["html".to_string(), "htm".to_string()],
            concurrency: default_concurrency(),
            clean_urls: false,
            skip_prefixes: Vec::new(),
        }
    }
}

/// Everything a `check` run needs
#[derive(Debug, Clone)]
pub struct Settings {
    pub context: ResolveContext,
    pub options: ValidateOptions,
}

impl Settings {
    pub fn from_check_args(args: &CheckArgs) -> Result<Self> {
        let context = build_context(&args.root, args.public_path.as_deref())?;

        let mut options = ValidateOptions {
            clean_urls: args.clean_urls,
            skip_prefixes: args.skip.clone(),
            ..ValidateOptions::default()
        };
        if let Some(concurrency) = args.concurrency {
            options.concurrency = concurrency.max(1);
        }
        if !args.ext.is_empty() {
            options.page_extensions = args
                .ext
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect();
        }

        Ok(Settings { context, options })
    }
}

/// Builds the resolution context from a root directory and public path
///
/// The root is made absolute (relative to the current directory) so that
/// every path in the index and in the report shares the same base.
pub fn build_context(root: &Path, public_path: Option<&str>) -> Result<ResolveContext> {
    let root = absolute_path(root)?;
    let public_path = public_path.map(public_path_from);
    Ok(ResolveContext::new(root, public_path.as_deref()))
}

/// Makes `path` absolute against the current directory and normalizes it
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize_path(path));
    }
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    Ok(normalize_path(&cwd.join(path)))
}

// Accepts both "/docs/" and a full deployment URL like
// "https://example.com/docs/"; only the path part matters for links.
fn public_path_from(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => raw.to_string(),
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
