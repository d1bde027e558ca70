// Changes the working directory, so it lives in its own test binary.

use site_link_guardian::{run, ResolveContext, ValidateOptions, ViolationKind};
use std::fs;
use tempfile::tempdir;

#[tokio::test]
async fn current_directory_as_root() {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join("guide")).unwrap();
    fs::write(
        temp.path().join("index.html"),
        r##"<h1 id="top">Home</h1><a href="guide/">guide</a><a href="guide/#missing">bad</a>"##,
    )
    .unwrap();
    fs::write(temp.path().join("guide/index.html"), r##"<a href="../#top">home</a>"##).unwrap();

    std::env::set_current_dir(temp.path()).unwrap();

    let report = run(&ResolveContext::new(".", None), &ValidateOptions::default())
        .await
        .unwrap();

    assert_eq!(report.stats.files_indexed, 2);
    assert_eq!(report.stats.pages_scanned, 2);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].source, "index.html");
    assert_eq!(report.violations[0].kind, ViolationKind::MissingAnchor);
}
