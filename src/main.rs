// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (RUST_LOG controls the level, default: warn)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the report
// 5. Exit with proper code (0 = all links valid, 1 = broken links, 2 = error)
//
// All the real work lives in the library (src/lib.rs); this file is only
// the command-line wrapper around it.
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use site_link_guardian::cli::{CheckArgs, Cli, Commands};
use site_link_guardian::config::{absolute_path, build_context, Settings};
use site_link_guardian::{resolve_link, validate, ValidationReport};

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain: "Failed to ...: cause"
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so that `--json` output on stdout stays parseable
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Returns:
//   Ok(0) = every internal link is valid
//   Ok(1) = broken links found (or, for `resolve`, a malformed href)
//   Err   = the run could not complete (main turns this into exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => handle_check(&args).await,
        Commands::Resolve {
            root,
            source,
            href,
            public_path,
        } => {
            let ctx = build_context(&root, public_path.as_deref())?;
            let source = absolute_path(&source)?;

            match resolve_link(&ctx, &source, &href) {
                Ok(link) => {
                    println!("{}", serde_json::to_string_pretty(&link)?);
                    Ok(0)
                }
                Err(reason) => {
                    println!("malformed href: {}", reason);
                    Ok(1)
                }
            }
        }
    }
}

// Handles the 'check' subcommand
async fn handle_check(args: &CheckArgs) -> Result<i32> {
    let settings = Settings::from_check_args(args)?;

    if !args.json {
        println!("🔍 Checking site: {}", settings.context.root.display());
        if let Some(public_path) = &settings.context.public_path {
            println!("🌐 Public path: {}", public_path);
        }
    }

    let report = validate::run(&settings.context, &settings.options)
        .await
        .with_context(|| format!("Failed to validate {}", settings.context.root.display()))?;

    print_report(&report, args.json)?;

    if report.is_clean() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Prints the report either as a table or JSON
fn print_report(report: &ValidationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!();
        report.print_table();
        println!();
        if report.is_clean() {
            println!("✅ {}", report);
        } else {
            println!("❌ {}", report);
        }
    }
    Ok(())
}
