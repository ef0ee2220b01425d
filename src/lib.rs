//! Workspace umbrella crate for listmatch.
//!
//! This crate stitches the record loaders, the matcher and the output sinks
//! together so callers can run a whole product/listing linkage from one
//! entry point.
//!
//! ```no_run
//! use listmatch::{run_files, ListmatchConfig};
//!
//! let config = ListmatchConfig::from_file("listmatch.yaml").unwrap();
//! let outcome = run_files(&config).unwrap();
//! print!("{}", outcome.summary().candidate_counts);
//! ```

pub mod config;
pub mod report;
pub mod results;

pub use canonical::{contains, find_all, find_first, strip_key, tokenize, Token, TokenClass};
pub use index::TokenIndex;
pub use ingest::{
    load_listings, load_products, read_listings, read_products, IngestError, ListingRecord,
    ProductRecord, RawRecord, RecordKind,
};
pub use matcher::{
    set_match_metrics, CandidateCounts, Listing, ListingId, ListingSlot, MatchConfig, MatchError,
    MatchMetrics, MatchOutcome, MatchPolicy, Matcher, PolicyKind, Product, ProductId, RunSummary,
    Traversal,
};

pub use crate::config::{ConfigLoadError, ListmatchConfig, PathsConfig};
pub use crate::report::{write_data_js, write_viewer_dir, write_viewer_html, ViewerGroup};
pub use crate::results::write_results;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, Level};

/// Errors that can occur while running the pipeline end to end.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("ingest failure: {0}")]
    Ingest(#[from] IngestError),

    #[error("match failure: {0}")]
    Match(#[from] MatchError),

    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    fn output(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| PipelineError::Output {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Match already-loaded records.
pub fn run_pipeline(
    products: Vec<ProductRecord>,
    listings: Vec<ListingRecord>,
    config: &MatchConfig,
) -> Result<MatchOutcome, PipelineError> {
    let matcher = Matcher::new(config.clone())?;
    let products = products.into_iter().map(Product::from).collect();
    let listings = listings.into_iter().map(Listing::from).collect();
    Ok(matcher.run(products, listings))
}

/// Load both inputs, match them and write every configured output.
///
/// Both inputs are fully validated before matching starts, so a malformed
/// record never leaves a partial results file behind.
pub fn run_files(config: &ListmatchConfig) -> Result<MatchOutcome, PipelineError> {
    let span = tracing::span!(Level::INFO, "listmatch.run_files");
    let _guard = span.enter();

    let paths = &config.paths;
    let products = load_products(&paths.products)?;
    let listings = load_listings(&paths.listings)?;
    let outcome = run_pipeline(products, listings, &config.matcher)?;

    write_outputs(&outcome, paths)?;
    Ok(outcome)
}

/// Write the results file plus the optional viewer and `data.js` outputs.
pub fn write_outputs(outcome: &MatchOutcome, paths: &PathsConfig) -> Result<(), PipelineError> {
    let results = &paths.results;
    let file = File::create(results).map_err(PipelineError::output(results))?;
    let lines = write_results(outcome, BufWriter::new(file)).map_err(PipelineError::output(results))?;
    info!(path = %results.display(), products = lines, "results_written");

    if let Some(data_js) = &paths.data_js {
        let file = File::create(data_js).map_err(PipelineError::output(data_js))?;
        write_data_js(outcome, BufWriter::new(file)).map_err(PipelineError::output(data_js))?;
        info!(path = %data_js.display(), "data_js_written");
    }
    if let Some(dir) = &paths.viewer_dir {
        let page = write_viewer_dir(outcome, dir).map_err(PipelineError::output(dir))?;
        info!(path = %page.display(), "viewer_written");
    }
    Ok(())
}
