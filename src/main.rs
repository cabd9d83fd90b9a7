use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use humansize::{format_size, BINARY};
use keepengine::{clean_tree_with, explain, CleanOptions, CleanReport, Mode, RuleSet, RulesConfig};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "keepengine",
    author,
    version,
    about = "Parses a .keep rules file and deletes everything in a folder that the rules do not protect",
    long_about = None
)]
struct Args {
    /// Mode of operation: clean the base template tree or a user tree derived from it
    #[arg(value_name = "MODE", value_enum)]
    mode: Mode,

    /// Path to the .keep file that should be applied
    #[arg(value_name = "KEEP_RULES_FILE")]
    keep_rules_file: PathBuf,

    /// Folder the rules are applied to (base user or normal user home)
    #[arg(value_name = "FOLDER")]
    folder: PathBuf,

    /// Print what would be deleted, but don't delete anything
    #[arg(long, visible_alias = "dry-run")]
    dryrun: bool,

    /// Log every decision and deletion to stderr
    #[arg(long, short)]
    verbose: bool,

    /// Calculate the size of everything that is deleted
    #[arg(long, short)]
    sizes: bool,

    /// TOML file with additional rules
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Print the decision for a single relative path and exit
    #[arg(long, value_name = "PATH")]
    explain: Option<String>,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("keepengine=debug")
        } else {
            EnvFilter::new("keepengine=warn")
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

fn print_report(report: &CleanReport, args: &Args) {
    if args.dryrun {
        if args.sizes {
            println!(
                "Total Size Found: {}",
                format_size(report.total_size(), BINARY).bold()
            );
        }
        println!("Dry run mode: No files were deleted.");
        return;
    }

    println!(
        "{}",
        format!("Removed {} paths", report.removed_count()).green()
    );
    if args.sizes {
        println!(
            "Total Size Removed: {}",
            format_size(report.total_size(), BINARY).bold().red()
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => RulesConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RulesConfig::default(),
    };

    let rules = RuleSet::from_path(&args.keep_rules_file, &config).with_context(|| {
        format!(
            "Failed to load keep rules from {}",
            args.keep_rules_file.display()
        )
    })?;
    let policy = args.mode.policy(&rules);

    if let Some(path) = &args.explain {
        let decision = explain(policy.as_ref(), path);
        println!("keep={} descend={}", decision.keep, decision.descend);
        return Ok(());
    }

    let options = CleanOptions {
        dry_run: args.dryrun,
        calculate_sizes: args.sizes,
    };
    // Lines go out as the walk runs, so a failed run still shows what it deleted
    let list_removals = args.dryrun || args.verbose;
    let report = clean_tree_with(&args.folder, policy.as_ref(), options, &mut |removal| {
        if list_removals {
            println!("{}", removal.describe());
        }
    })
    .with_context(|| format!("Failed to clean {}", args.folder.display()))?;

    print_report(&report, &args);

    Ok(())
}
