//! The pipeline object: sources, cache, parsed datasets and the last good report.

mod report;
mod selection;

pub use report::*;
pub use selection::*;

use std::sync::Arc;

use crate::{
    error::Result,
    io::{self, LoadOptions},
    source::{Fetch, SourceCache, Sources},
    types::Datasets,
};

/// Fetch (or reuse) both archives and parse them.
pub fn load_datasets<F: Fetch>(cache: &SourceCache<F>, sources: &Sources, load: &LoadOptions) -> Result<Datasets> {
    log::info!("[dashboard] loading results from {}", sources.results.url);
    let archive = cache.get(&sources.results.url)?;
    let csv = io::zip::read_zip_member(&archive, &sources.results.member)?;
    let (votes, stats) = io::csv::read_votes(&csv, load)?;
    if stats.without_party > 0 {
        log::info!("[dashboard] ignored {} vote row(s) without a party (blank or void ballots)", stats.without_party);
    }

    log::info!("[dashboard] loading circuits from {}", sources.circuits.url);
    let archive = cache.get(&sources.circuits.url)?;
    let geojson = io::zip::read_zip_member(&archive, &sources.circuits.member)?;
    let (circuits, _) = io::geojson::read_circuits(&geojson)?;

    log::info!("[dashboard] {} vote rows, {} circuit boundaries", votes.len(), circuits.len());
    Ok(Datasets { votes, circuits })
}

/// Recomputes a [`Report`] for each selection, reusing downloaded archives and
/// parsed datasets until the sources change.
pub struct Dashboard<F: Fetch> {
    sources: Sources,
    load: LoadOptions,
    cache: Arc<SourceCache<F>>,
    data: Option<(Arc<Datasets>, Options)>,
    last: Option<Report>,
}

impl<F: Fetch> Dashboard<F> {
    pub fn new(sources: Sources, load: LoadOptions, cache: Arc<SourceCache<F>>) -> Self {
        Self { sources, load, cache, data: None, last: None }
    }

    pub fn sources(&self) -> &Sources { &self.sources }

    pub fn cache(&self) -> &Arc<SourceCache<F>> { &self.cache }

    /// Point at different archives. Parsed data is dropped if anything changed;
    /// downloads already in the cache are kept.
    pub fn set_sources(&mut self, sources: Sources) {
        if sources != self.sources {
            log::debug!("[dashboard] sources changed; invalidating parsed datasets");
            self.sources = sources;
            self.data = None;
        }
    }

    /// Change how the results CSV is read; parsed data is dropped if anything changed.
    pub fn set_load_options(&mut self, load: LoadOptions) {
        if load != self.load {
            self.load = load;
            self.data = None;
        }
    }

    /// Parsed datasets, loading them on first use.
    pub fn datasets(&mut self) -> Result<Arc<Datasets>> {
        Ok(self.loaded()?.0.clone())
    }

    /// Values available for each selection control.
    pub fn options(&mut self) -> Result<Options> {
        Ok(self.loaded()?.1.clone())
    }

    /// Recompute for `selection`. On failure the previous report is kept.
    pub fn render(&mut self, selection: &Selection) -> Result<&Report> {
        let (data, options) = self.loaded()?;
        let report = Report::build(data, selection, options)?;
        Ok(self.last.insert(report))
    }

    /// The most recent successful report.
    pub fn last_report(&self) -> Option<&Report> { self.last.as_ref() }

    fn loaded(&mut self) -> Result<&(Arc<Datasets>, Options)> {
        let loaded = match self.data.take() {
            Some(loaded) => loaded,
            None => {
                let data = load_datasets(&self.cache, &self.sources, &self.load)?;
                let options = Options::from_datasets(&data);
                (Arc::new(data), options)
            }
        };
        Ok(self.data.insert(loaded))
    }
}
