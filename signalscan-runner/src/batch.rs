//! Batch scan across many instruments.
//!
//! Every instrument is loaded, augmented and scanned independently. A
//! failure on one instrument becomes an [`InstrumentWarning`] and the batch
//! carries on; only catalog structure errors abort the run, and those are
//! caught before any data is fetched.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use signalscan_core::data::DataProvider;
use signalscan_core::{
    aggregate, scan_instrument, CatalogError, IndicatorRegistry, InstrumentId, Occurrence,
    SignalCatalog,
};

use crate::config::{ConfigError, ScanConfig, DEFAULT_HISTORY_BUFFER_DAYS};
use crate::data_loader::{load_series, LoadWindow};

// ─── Request / report ────────────────────────────────────────────────

/// What to scan and over which dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub instruments: Vec<InstrumentId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub history_buffer_days: u32,
    pub parallel: bool,
    pub threads: Option<usize>,
    /// Hash of the configuration this request came from.
    pub config_hash: String,
}

impl ScanRequest {
    /// A parallel request with the default history buffer. The hash covers
    /// the request itself.
    pub fn new(instruments: Vec<InstrumentId>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let mut request = Self {
            instruments,
            start_date,
            end_date,
            history_buffer_days: DEFAULT_HISTORY_BUFFER_DAYS,
            parallel: true,
            threads: None,
            config_hash: String::new(),
        };
        let json = serde_json::to_vec(&request).unwrap_or_default();
        request.config_hash = blake3::hash(&json).to_hex().to_string();
        request
    }

    /// Validate `config` and expand its instrument list.
    pub fn from_config(config: &ScanConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            instruments: config.resolve_instruments()?,
            start_date: config.start_date,
            end_date: config.end_date,
            history_buffer_days: config.history_buffer_days,
            parallel: config.parallel,
            threads: config.threads,
            config_hash: config.config_hash(),
        })
    }

    pub fn window(&self) -> LoadWindow {
        LoadWindow::new(self.start_date, self.end_date, self.history_buffer_days)
    }
}

/// An instrument that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentWarning {
    pub instrument_id: InstrumentId,
    pub reason: String,
}

/// Outcome of a batch scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Aggregated occurrences, newest first.
    pub events: Vec<Occurrence>,
    pub warnings: Vec<InstrumentWarning>,
    /// Instruments that were loaded and scanned without error.
    pub instruments_scanned: usize,
    pub config_hash: String,
}

// ─── Progress ────────────────────────────────────────────────────────

/// Callbacks for reporting batch progress. Called from worker threads when
/// the scan runs in parallel, so completion order is not input order.
pub trait ScanProgress: Send + Sync {
    fn on_start(&self, instrument: &InstrumentId, index: usize, total: usize);

    /// `result` carries the number of in-range occurrences, or the warning.
    fn on_complete(
        &self,
        instrument: &InstrumentId,
        index: usize,
        total: usize,
        result: &Result<usize, InstrumentWarning>,
    );

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress lines on stderr, keeping stdout free for results.
pub struct StderrProgress;

impl ScanProgress for StderrProgress {
    fn on_start(&self, instrument: &InstrumentId, index: usize, total: usize) {
        eprintln!("[{}/{}] Scanning {instrument}...", index + 1, total);
    }

    fn on_complete(
        &self,
        instrument: &InstrumentId,
        index: usize,
        total: usize,
        result: &Result<usize, InstrumentWarning>,
    ) {
        match result {
            Ok(n) => eprintln!("[{}/{}] {instrument}: {n} events", index + 1, total),
            Err(w) => eprintln!("[{}/{}] {instrument}: skipped ({})", index + 1, total, w.reason),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        eprintln!("Scan complete: {succeeded}/{total} scanned, {failed} skipped");
    }
}

// ─── Batch ───────────────────────────────────────────────────────────

type InstrumentResult = Result<Vec<Occurrence>, InstrumentWarning>;

/// Scan every instrument in `request` against `catalog`.
///
/// The catalog is validated against `registry` up front; that is the only
/// error this returns. Output is identical whether or not the instruments
/// are processed in parallel.
pub fn run_scan(
    request: &ScanRequest,
    provider: &dyn DataProvider,
    catalog: &SignalCatalog,
    registry: &IndicatorRegistry,
    progress: Option<&dyn ScanProgress>,
) -> Result<ScanReport, CatalogError> {
    catalog.validate(registry)?;

    let total = request.instruments.len();
    let window = request.window();
    info!(
        instruments = total,
        signals = catalog.len(),
        start = %request.start_date,
        end = %request.end_date,
        provider = provider.name(),
        config_hash = %request.config_hash,
        "starting scan"
    );

    let visit = |(index, instrument): (usize, &InstrumentId)| -> Result<InstrumentResult, CatalogError> {
        if let Some(p) = progress {
            p.on_start(instrument, index, total);
        }
        let result = scan_one(provider, catalog, registry, instrument, &window)?;
        if let Some(p) = progress {
            let summary = result.as_ref().map(Vec::len).map_err(Clone::clone);
            p.on_complete(instrument, index, total, &summary);
        }
        Ok(result)
    };

    let results: Vec<InstrumentResult> = if request.parallel {
        let run = || {
            request
                .instruments
                .par_iter()
                .enumerate()
                .map(visit)
                .collect::<Result<Vec<_>, CatalogError>>()
        };
        match request.threads.map(build_pool) {
            Some(Some(pool)) => pool.install(run)?,
            _ => run()?,
        }
    } else {
        request
            .instruments
            .iter()
            .enumerate()
            .map(visit)
            .collect::<Result<Vec<_>, CatalogError>>()?
    };

    let mut per_instrument = Vec::with_capacity(results.len());
    let mut warnings = Vec::new();
    for result in results {
        match result {
            Ok(events) => per_instrument.push(events),
            Err(warning) => warnings.push(warning),
        }
    }
    let instruments_scanned = per_instrument.len();
    let events = aggregate(per_instrument);

    if let Some(p) = progress {
        p.on_batch_complete(instruments_scanned, warnings.len(), total);
    }
    info!(
        events = events.len(),
        scanned = instruments_scanned,
        skipped = warnings.len(),
        "scan finished"
    );

    Ok(ScanReport {
        events,
        warnings,
        instruments_scanned,
        config_hash: request.config_hash.clone(),
    })
}

fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => Some(pool),
        Err(e) => {
            warn!(threads, error = %e, "could not build worker pool, using the global pool");
            None
        }
    }
}

/// Load, augment and scan one instrument. The outer error is fatal; the
/// inner one is a per-instrument warning.
fn scan_one(
    provider: &dyn DataProvider,
    catalog: &SignalCatalog,
    registry: &IndicatorRegistry,
    instrument: &InstrumentId,
    window: &LoadWindow,
) -> Result<InstrumentResult, CatalogError> {
    let series = match load_series(provider, instrument, window) {
        Ok(series) => series,
        Err(e) => {
            warn!(instrument = %instrument, error = %e, "skipping instrument");
            return Ok(Err(InstrumentWarning {
                instrument_id: instrument.clone(),
                reason: e.to_string(),
            }));
        }
    };

    let events: Vec<Occurrence> = scan_instrument(series, catalog, registry)?
        .into_iter()
        .filter(|o| window.reports(o.occurrence_date))
        .collect();
    debug!(instrument = %instrument, events = events.len(), "instrument scanned");
    Ok(Ok(events))
}
