//! Catalog sweep: fetch → extract → validate → append, one security at a time.
//!
//! A failed lookup never aborts the sweep. The security gets a degraded
//! [`Stock::unavailable`] record so the snapshot always carries every sector
//! and every leader listed in the catalog, in catalog order.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogSector};
use crate::data_source::SourceAdapter;
use crate::extraction::extract;
use crate::fetcher::FetchClient;
use crate::validation::{plausibility_warnings, validate, PlausibilityBounds};
use crate::{SecurityId, Sector, Snapshot, Stock};

/// Counters collected during one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub sectors: usize,
    pub securities: usize,
    /// Pages retrieved successfully.
    pub fetched: usize,
    /// Pages that could not be retrieved.
    pub failed: usize,
    /// Retrieved pages on which no metric was found.
    pub empty: usize,
    /// Metrics above their plausibility bound.
    pub warnings: usize,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.empty == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub snapshot: Snapshot,
    pub report: RunReport,
}

pub struct Aggregator {
    catalog: Catalog,
    adapter: Arc<dyn SourceAdapter>,
    fetcher: FetchClient,
    bounds: PlausibilityBounds,
}

impl Aggregator {
    pub fn new(catalog: Catalog, adapter: Arc<dyn SourceAdapter>, fetcher: FetchClient) -> Self {
        Self {
            catalog,
            adapter,
            fetcher,
            bounds: PlausibilityBounds::default(),
        }
    }

    pub fn with_bounds(mut self, bounds: PlausibilityBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Sweeps the whole catalog sequentially.
    pub async fn run(&self) -> RunOutcome {
        let mut report = RunReport::default();
        let mut sectors = Vec::with_capacity(self.catalog.sectors().len());

        info!(
            source = %self.adapter.id(),
            strategy = %self.adapter.strategy(),
            sectors = self.catalog.sectors().len(),
            securities = self.catalog.security_count(),
            "starting catalog sweep"
        );

        for entry in self.catalog.sectors() {
            sectors.push(self.collect_sector(entry, &mut report).await);
        }

        info!(
            sectors = report.sectors,
            securities = report.securities,
            fetched = report.fetched,
            failed = report.failed,
            empty = report.empty,
            warnings = report.warnings,
            "catalog sweep finished"
        );

        RunOutcome {
            snapshot: Snapshot::new(sectors),
            report,
        }
    }

    async fn collect_sector(&self, entry: &CatalogSector, report: &mut RunReport) -> Sector {
        let mut stocks = Vec::with_capacity(entry.leaders.len());
        for code in &entry.leaders {
            stocks.push(self.collect_stock(code, report).await);
        }

        report.sectors += 1;
        debug!(sector = %entry.code, name = %entry.name, "sector collected");

        Sector {
            code: entry.code.clone(),
            name: entry.name.clone(),
            stocks,
        }
    }

    async fn collect_stock(&self, code: &SecurityId, report: &mut RunReport) -> Stock {
        report.securities += 1;
        let url = self.adapter.url_for(code);

        let document = match self.fetcher.fetch(&url).await {
            Ok(document) => document,
            Err(failure) => {
                report.failed += 1;
                warn!(code = %code, url = %failure.url, "{}", failure.message);
                return Stock::unavailable(code.clone());
            }
        };
        report.fetched += 1;

        let partial = extract(self.adapter.as_ref(), &document);
        if partial.is_empty() {
            report.empty += 1;
            warn!(code = %code, url = %url, "no metrics found on page");
        }

        let stock = validate(code, partial, &self.bounds);
        report.warnings += plausibility_warnings(&stock, &self.bounds).len();

        info!(
            code = %stock.code,
            name = %stock.name,
            pbr = ?stock.pbr,
            per = ?stock.per,
            dividend_yield = ?stock.dividend_yield,
            trend = %stock.trend,
            "security collected"
        );

        stock
    }
}
