// src/site/walk.rs
// =============================================================================
// Discovers every file in the site output directory.
//
// Pages (by extension, usually .html) get parsed for anchors and links.
// Everything else (images, PDFs, CSS...) is still recorded so that a link to
// "/logo.svg" isn't reported as a missing file.
// =============================================================================

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::SiteError;
use crate::resolve::normalize_path;

/// What we do with a discovered file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Rendered page: has anchors and outgoing links
    Page,
    /// Any other file: can be linked to, but has no anchors
    Asset,
}

/// A file found under the site root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteFile {
    pub path: PathBuf,
    pub kind: FileKind,
}

/// Lists every file under `root`, sorted by path
///
/// Symlinks to files are listed under their own path; symlinked
/// directories are not walked. Any directory that can't be read aborts the
/// walk, since an incomplete file list would produce false "missing file"
/// reports later.
pub fn discover_files(root: &Path, page_extensions: &[String]) -> Result<Vec<SiteFile>, SiteError> {
    // normalize_path(".") is empty, but the file system wants "."
    let root = if root.as_os_str().is_empty() {
        Path::new(".")
    } else {
        root
    };

    let metadata = std::fs::metadata(root).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            SiteError::RootNotFound(root.to_path_buf())
        } else {
            SiteError::read(root, err)
        }
    })?;
    if !metadata.is_dir() {
        return Err(SiteError::RootNotDirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|source| SiteError::Walk {
            path: root.to_path_buf(),
            source,
        })?;

        // A symlink to a file is served like the file itself. Symlinked
        // directories are not descended into.
        if !entry.path().is_file() {
            continue;
        }

        let kind = if is_page(entry.path(), page_extensions) {
            FileKind::Page
        } else {
            FileKind::Asset
        };

        files.push(SiteFile {
            path: normalize_path(entry.path()),
            kind,
        });
    }

    Ok(files)
}

// Extension match is case-insensitive: "INDEX.HTML" is still a page
fn is_page(path: &Path, page_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| page_extensions.iter().any(|p| p.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn html_exts() -> Vec<String> {
        vec!["html".to_string(), "htm".to_string()]
    }

    #[test]
    fn test_discover_files_classifies_and_sorts() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("guide")).unwrap();
        fs::write(temp.path().join("index.html"), "<h1>Hi</h1>").unwrap();
        fs::write(temp.path().join("guide/intro.HTML"), "").unwrap();
        fs::write(temp.path().join("logo.svg"), "<svg/>").unwrap();

        let files = discover_files(temp.path(), &html_exts()).unwrap();
        let root = normalize_path(temp.path());

        assert_eq!(
            files,
            vec![
                SiteFile { path: root.join("guide/intro.HTML"), kind: FileKind::Page },
                SiteFile { path: root.join("index.html"), kind: FileKind::Page },
                SiteFile { path: root.join("logo.svg"), kind: FileKind::Asset },
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_are_listed() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("shared")).unwrap();
        fs::write(temp.path().join("shared/faq.html"), "<h1 id=\"faq\">FAQ</h1>").unwrap();
        std::os::unix::fs::symlink(temp.path().join("shared/faq.html"), temp.path().join("faq.html")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("shared"), temp.path().join("mirror")).unwrap();

        let files = discover_files(temp.path(), &html_exts()).unwrap();
        let root = normalize_path(temp.path());
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();

        assert_eq!(paths, vec![root.join("faq.html"), root.join("shared/faq.html")]);
        assert!(files.iter().all(|f| f.kind == FileKind::Page));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp = tempdir().unwrap();
        let result = discover_files(&temp.path().join("nope"), &html_exts());
        assert!(matches!(result, Err(SiteError::RootNotFound(_))));
    }

    #[test]
    fn test_root_must_be_a_directory() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("index.html");
        fs::write(&file, "").unwrap();
        let result = discover_files(&file, &html_exts());
        assert!(matches!(result, Err(SiteError::RootNotDirectory(_))));
    }
}
