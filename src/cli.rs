// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - check:   validate every internal link in a built site
// - resolve: show how a single href would be resolved (handy for debugging
//            public path setups)
//
// Most flags can also come from environment variables, which is convenient
// in CI where the site build already exports its base path.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "site-link-guardian",
    version,
    about = "Validate internal links and anchors in a generated static site",
    long_about = "site-link-guardian scans the output directory of a static site build and checks \
                  that every internal link points to an existing file and, when it has a #fragment, \
                  to an anchor that exists in that file. Run it after the build, before publishing."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every internal link in a built site
    ///
    /// Example: site-link-guardian check dist --public-path /docs/
    Check(CheckArgs),

    /// Resolve a single href and print the result
    ///
    /// Example: site-link-guardian resolve dist dist/guide/intro.html ../api.html#client
    Resolve {
        /// Site output directory
        root: PathBuf,

        /// Page that contains the href
        source: PathBuf,

        /// The href, exactly as written in the page
        href: String,

        /// Deployed base path of the site (e.g. /docs/)
        #[arg(long, env = "LINK_GUARDIAN_PUBLIC_PATH")]
        public_path: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Site output directory (e.g. dist/ or public/)
    pub root: PathBuf,

    /// Deployed base path of the site, stripped from absolute links
    ///
    /// Either a path ("/docs/") or a full URL ("https://example.com/docs/")
    #[arg(long, env = "LINK_GUARDIAN_PUBLIC_PATH")]
    pub public_path: Option<String>,

    /// Output the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Maximum number of files processed at once (default: number of CPUs)
    #[arg(long, env = "LINK_GUARDIAN_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Accept extensionless links to .html files ("/guide/intro")
    #[arg(long)]
    pub clean_urls: bool,

    /// Don't check hrefs starting with this prefix (repeatable)
    #[arg(long, value_name = "PREFIX")]
    pub skip: Vec<String>,

    /// File extension treated as a page (repeatable, default: html, htm)
    #[arg(long, value_name = "EXT")]
    pub ext: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from([
            "site-link-guardian",
            "check",
            "dist",
            "--public-path",
            "/docs/",
            "--skip",
            "/api/",
            "--skip",
            "/changelog",
            "--json",
        ])
        .unwrap();

        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.root, PathBuf::from("dist"));
        assert_eq!(args.public_path.as_deref(), Some("/docs/"));
        assert_eq!(args.skip, vec!["/api/", "/changelog"]);
        assert!(args.json);
        assert!(!args.clean_urls);
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "site-link-guardian",
            "resolve",
            "dist",
            "dist/a.html",
            "#top",
        ])
        .unwrap();

        match cli.command {
            Commands::Resolve { href, .. } => assert_eq!(href, "#top"),
            Commands::Check(_) => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
