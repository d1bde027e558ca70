// src/lib.rs
// =============================================================================
// site-link-guardian: validate internal links in a generated static site.
//
// The library does the work and returns a ValidationReport; the binary in
// main.rs only parses arguments, prints the report and picks an exit code.
//
//   let ctx = ResolveContext::new("dist", Some("/docs/"));
//   let report = validate::run(&ctx, &ValidateOptions::default()).await?;
//   if !report.is_clean() { ... }
// =============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod resolve;
pub mod site;
pub mod validate;

pub use config::ValidateOptions;
pub use error::SiteError;
pub use resolve::{resolve_link, Link, MalformedHref, ResolveContext};
pub use validate::{run, ValidationReport, Violation, ViolationKind};
