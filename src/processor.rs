use crate::{
    catalog::load_catalogs,
    config::Config,
    ledger::aggregate,
    report::{write_product_report, write_sales_report},
};
use anyhow::{Context, Result};
use getset::CopyGetters;
use log::info;

/// Counts describing a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct RunSummary {
    salespeople: usize,
    products: usize,
    files_processed: usize,
    files_skipped: usize,
}

pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Loads both catalogs, folds in every sales file and writes the two
    /// reports. The first fatal error stops the run.
    pub fn run(&self) -> Result<RunSummary> {
        let catalogs = load_catalogs(&self.config).context("loading catalogs")?;
        info!("catalogs ready, aggregating {}", self.config.sales_dir().display());

        let (totals, stats) =
            aggregate(self.config.sales_dir(), &catalogs).context("aggregating sales")?;

        write_sales_report(
            self.config.sales_report(),
            catalogs.salespeople(),
            totals.sales(),
        )?;
        write_product_report(
            self.config.product_report(),
            catalogs.products(),
            totals.units(),
        )?;

        Ok(RunSummary {
            salespeople: catalogs.salespeople().len(),
            products: catalogs.products().len(),
            files_processed: stats.files_processed(),
            files_skipped: stats.files_skipped(),
        })
    }
}
