use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use listmatch::{run_files, ListmatchConfig, PolicyKind, Traversal};
use tracing_subscriber::EnvFilter;

/// Link marketplace listings to catalog products.
#[derive(Parser, Debug)]
#[command(name = "listmatch", version, about)]
struct Cli {
    /// YAML configuration file; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Products, one JSON object per line [default: products.txt]
    #[arg(short, long, value_name = "FILE")]
    products: Option<PathBuf>,

    /// Listings, one JSON object per line [default: listings.txt]
    #[arg(short, long, value_name = "FILE")]
    listings: Option<PathBuf>,

    /// Results output [default: results.txt]
    #[arg(short, long, value_name = "FILE")]
    results: Option<PathBuf>,

    /// Acceptance policy [default: tight]
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Leave listings with more candidates than this unresolved [default: 2]
    #[arg(long, value_name = "N")]
    max_candidates: Option<usize>,

    /// Shard product-major matching across threads
    #[arg(long)]
    parallel: bool,

    /// Check every listing against every product instead of using the index
    #[arg(long)]
    listing_major: bool,

    /// Keep near-duplicate products
    #[arg(long)]
    no_dedupe: bool,

    /// Write listings.html and js/data.js into this directory
    #[arg(short = 'w', long = "webviewer", value_name = "VIEWER_DIR")]
    viewer_dir: Option<PathBuf>,

    /// Write a standalone data.js file
    #[arg(long, value_name = "FILE")]
    data_js: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Loose,
    Tight,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Loose => PolicyKind::Loose,
            PolicyArg::Tight => PolicyKind::Tight,
        }
    }
}

impl Cli {
    fn into_config(self) -> Result<(ListmatchConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => ListmatchConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ListmatchConfig::default(),
        };
        let paths = &mut config.paths;
        if let Some(products) = self.products {
            paths.products = products;
        }
        if let Some(listings) = self.listings {
            paths.listings = listings;
        }
        if let Some(results) = self.results {
            paths.results = results;
        }
        if self.viewer_dir.is_some() {
            paths.viewer_dir = self.viewer_dir;
        }
        if self.data_js.is_some() {
            paths.data_js = self.data_js;
        }

        let matcher = &mut config.matcher;
        if let Some(policy) = self.policy {
            matcher.policy = policy.into();
        }
        if let Some(max) = self.max_candidates {
            matcher.max_candidates = max;
        }
        if self.parallel {
            matcher.parallel = true;
        }
        if self.listing_major {
            matcher.traversal = Traversal::ListingMajor;
        }
        if self.no_dedupe {
            matcher.dedupe = false;
        }
        config.validate().context("invalid configuration")?;
        Ok((config, self.json_logs))
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn main() -> Result<()> {
    let (config, json_logs) = Cli::parse().into_config()?;
    init_tracing(&config.log_level, json_logs);

    let outcome = run_files(&config).with_context(|| {
        format!(
            "matching {} against {}",
            config.paths.listings.display(),
            config.paths.products.display()
        )
    })?;

    let summary = outcome.summary();
    println!(
        "{} products ({} duplicates dropped), {} listings, {} resolved",
        summary.products_kept,
        summary.duplicates_dropped(),
        summary.listings,
        summary.resolved
    );
    print!("{}", summary.candidate_counts);
    Ok(())
}
