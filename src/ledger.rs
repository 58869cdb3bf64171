use crate::{
    catalog::{Catalogs, Salespeople},
    errors::SalesError,
    models::{SaleLine, SalespersonKey},
    records::{open_file, read_fields},
    traits::Aggregating,
};
use anyhow::{Context, Result};
use getset::{CopyGetters, Getters};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::{
    collections::HashMap,
    fs,
    io::Read,
    path::{Path, PathBuf},
};

pub const SALES_FILE_EXTENSION: &str = ".txt";

pub type SalesTotals = HashMap<SalespersonKey, Decimal>;
pub type ProductUnitsTotals = HashMap<String, u64>;

/// Revenue per salesperson and units per product.
#[derive(Debug, Clone, Default, PartialEq, Getters)]
pub struct Totals {
    #[getset(get = "pub")]
    sales: SalesTotals,
    #[getset(get = "pub")]
    units: ProductUnitsTotals,
}

impl Totals {
    /// Every known salesperson starts at zero so idle ones still show up in
    /// the report.
    pub fn seeded(salespeople: &Salespeople) -> Self {
        Totals {
            sales: salespeople.keys().map(|k| (k.clone(), Decimal::ZERO)).collect(),
            units: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Owner was found; `lines` sales were counted.
    Applied { lines: usize },
    UnknownSalesperson,
    /// No two-field line at all.
    NoHeader,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, CopyGetters)]
pub struct ScanStats {
    #[getset(get_copy = "pub")]
    files_processed: usize,
    #[getset(get_copy = "pub")]
    files_skipped: usize,
}

pub struct Ledger<'a> {
    catalogs: &'a Catalogs,
    totals: Totals,
    stats: ScanStats,
}

impl<'a> Ledger<'a> {
    pub fn new(catalogs: &'a Catalogs) -> Self {
        Self {
            catalogs,
            totals: Totals::seeded(catalogs.salespeople()),
            stats: ScanStats::default(),
        }
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn into_parts(self) -> (Totals, ScanStats) {
        (self.totals, self.stats)
    }

    fn record_sale(&mut self, owner: &SalespersonKey, line: &SaleLine) -> Result<(), SalesError> {
        let product = self
            .catalogs
            .products()
            .get(line.product_id())
            .ok_or_else(|| SalesError::UnknownProduct(line.product_id().clone()))?;

        let revenue = Decimal::from(*line.quantity())
            .checked_mul(*product.unit_price())
            .ok_or(SalesError::ValueOverflow)?;

        let total = self.totals.sales.entry(owner.clone()).or_default();
        *total = total.checked_add(revenue).ok_or(SalesError::ValueOverflow)?;

        let units = self
            .totals
            .units
            .entry(line.product_id().clone())
            .or_default();
        *units = units
            .checked_add(u64::from(*line.quantity()))
            .ok_or(SalesError::ValueOverflow)?;

        Ok(())
    }

    fn count(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Applied { .. } => self.stats.files_processed += 1,
            FileOutcome::UnknownSalesperson | FileOutcome::NoHeader => {
                self.stats.files_skipped += 1
            }
        }
    }
}

impl Aggregating for Ledger<'_> {
    fn apply_sales_file<R: Read>(&mut self, source: &str, reader: R) -> Result<FileOutcome> {
        let mut owner: Option<SalespersonKey> = None;
        let mut lines = 0;

        for rec in read_fields(reader) {
            let rec = rec.with_context(|| format!("reading sales file {source}"))?;

            let Some(key) = &owner else {
                if let Some(key) = SalespersonKey::from_record(&rec) {
                    if !self.catalogs.salespeople().contains_key(&key) {
                        warn!("{source}: {}", SalesError::UnknownSalesperson(key));
                        self.count(FileOutcome::UnknownSalesperson);
                        return Ok(FileOutcome::UnknownSalesperson);
                    }
                    owner = Some(key);
                }
                continue;
            };

            let Some(line) = SaleLine::from_record(&rec)
                .with_context(|| format!("reading sales file {source}"))?
            else {
                continue;
            };

            match self.record_sale(key, &line) {
                Ok(()) => lines += 1,
                Err(e) if e.is_recoverable() => warn!("{source}: {e}"),
                Err(e) => return Err(e).with_context(|| format!("in sales file {source}")),
            }
        }

        let outcome = match owner {
            Some(_) => FileOutcome::Applied { lines },
            None => FileOutcome::NoHeader,
        };
        self.count(outcome);
        Ok(outcome)
    }
}

/// Lists the sales files of `dir` in path order.
pub fn sales_files(dir: &Path) -> Result<Vec<PathBuf>, SalesError> {
    let metadata = fs::metadata(dir).map_err(|e| SalesError::io(dir, e))?;
    if !metadata.is_dir() {
        return Err(SalesError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| SalesError::io(dir, e))? {
        let path = entry.map_err(|e| SalesError::io(dir, e))?.path();
        let is_sales_file = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(SALES_FILE_EXTENSION));
        if is_sales_file && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Folds every sales file of `dir` into fresh totals.
pub fn aggregate(dir: &Path, catalogs: &Catalogs) -> Result<(Totals, ScanStats)> {
    let files = sales_files(dir)?;
    info!("found {} sales files in {}", files.len(), dir.display());

    let mut ledger = Ledger::new(catalogs);
    for path in files {
        let file = open_file(&path)?;
        let outcome = ledger.apply_sales_file(&path.display().to_string(), file)?;
        debug!("{}: {outcome:?}", path.display());
    }

    Ok(ledger.into_parts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{read_products, read_salespeople};
    use rust_decimal::prelude::*;
    use tempfile::TempDir;

    fn catalogs() -> Result<Catalogs> {
        let salespeople = read_salespeople(
            "11111111;0001;Juan;Perez\n22222222;0002;Ana;Garcia\n".as_bytes(),
        )?;
        let products = read_products("001;Laptop;10.00\n002;Mouse;5.00\n".as_bytes())?;
        Ok(Catalogs::new(salespeople, products))
    }

    fn juan() -> SalespersonKey {
        SalespersonKey::new("11111111", "0001")
    }

    #[test]
    fn test_totals_seeded_with_zero() -> Result<()> {
        let catalogs = catalogs()?;
        let ledger = Ledger::new(&catalogs);
        assert_eq!(ledger.totals().sales().len(), 2);
        assert!(ledger.totals().sales().values().all(|v| v.is_zero()));
        assert!(ledger.totals().units().is_empty());
        Ok(())
    }

    #[test]
    fn test_apply_sales_file() -> Result<()> {
        let catalogs = catalogs()?;
        let mut ledger = Ledger::new(&catalogs);

        let outcome =
            ledger.apply_sales_file("v1.txt", "11111111;0001\n001;3\n002;2\n".as_bytes())?;

        assert_eq!(outcome, FileOutcome::Applied { lines: 2 });
        assert_eq!(ledger.totals().sales()[&juan()], dec!(40.00));
        assert_eq!(ledger.totals().units()["001"], 3);
        assert_eq!(ledger.totals().units()["002"], 2);
        Ok(())
    }

    #[test]
    fn test_unknown_product_skips_only_that_line() -> Result<()> {
        let catalogs = catalogs()?;
        let mut ledger = Ledger::new(&catalogs);

        let outcome = ledger
            .apply_sales_file("v1.txt", "11111111;0001\n001;1\n999;50\n002;1\n".as_bytes())?;

        assert_eq!(outcome, FileOutcome::Applied { lines: 2 });
        assert_eq!(ledger.totals().sales()[&juan()], dec!(15.00));
        assert!(!ledger.totals().units().contains_key("999"));
        Ok(())
    }

    #[test]
    fn test_unknown_salesperson_contributes_nothing() -> Result<()> {
        let catalogs = catalogs()?;
        let mut ledger = Ledger::new(&catalogs);

        let outcome =
            ledger.apply_sales_file("v9.txt", "99999999;9999\n001;3\nnot;a;number\n".as_bytes())?;

        assert_eq!(outcome, FileOutcome::UnknownSalesperson);
        assert!(ledger.totals().sales().values().all(|v| v.is_zero()));
        assert!(ledger.totals().units().is_empty());
        Ok(())
    }

    #[test]
    fn test_lines_with_other_field_counts_are_ignored() -> Result<()> {
        let catalogs = catalogs()?;
        let mut ledger = Ledger::new(&catalogs);

        let input = "header line\n11111111;0001\n001;2;extra\n001;1\nnoise\n";
        let outcome = ledger.apply_sales_file("v1.txt", input.as_bytes())?;

        assert_eq!(outcome, FileOutcome::Applied { lines: 1 });
        assert_eq!(ledger.totals().sales()[&juan()], dec!(10.00));
        Ok(())
    }

    #[test]
    fn test_trailing_delimiters_in_sales_file() -> Result<()> {
        let catalogs = catalogs()?;
        let mut ledger = Ledger::new(&catalogs);

        let outcome = ledger.apply_sales_file("v1.txt", "11111111;0001;\n001;3;\n".as_bytes())?;

        assert_eq!(outcome, FileOutcome::Applied { lines: 1 });
        assert_eq!(ledger.totals().sales()[&juan()], dec!(30.00));
        Ok(())
    }

    #[test]
    fn test_latin1_product_id_is_an_unknown_product() -> Result<()> {
        let catalogs = catalogs()?;
        let mut ledger = Ledger::new(&catalogs);

        let outcome =
            ledger.apply_sales_file("v1.txt", &b"11111111;0001\n0\xe91;3\n002;1\n"[..])?;

        assert_eq!(outcome, FileOutcome::Applied { lines: 1 });
        assert_eq!(ledger.totals().sales()[&juan()], dec!(5.00));
        Ok(())
    }

    fn max_price_catalogs() -> Result<Catalogs> {
        let salespeople = read_salespeople("11111111;0001;Juan;Perez\n".as_bytes())?;
        let products = read_products("999;Yacht;79228162514264337593543950335\n".as_bytes())?;
        Ok(Catalogs::new(salespeople, products))
    }

    #[test]
    fn test_revenue_multiplication_overflow_is_fatal() -> Result<()> {
        let catalogs = max_price_catalogs()?;
        let mut ledger = Ledger::new(&catalogs);

        let res = ledger.apply_sales_file("v1.txt", "11111111;0001\n999;2\n".as_bytes());

        let err = res.expect_err("overflow must fail");
        assert!(matches!(
            err.downcast_ref::<SalesError>(),
            Some(SalesError::ValueOverflow)
        ));
        assert_eq!(ledger.totals().sales()[&juan()], Decimal::ZERO);
        assert!(ledger.totals().units().is_empty());
        Ok(())
    }

    #[test]
    fn test_revenue_total_overflow_is_fatal() -> Result<()> {
        let catalogs = max_price_catalogs()?;
        let mut ledger = Ledger::new(&catalogs);

        let res = ledger.apply_sales_file("v1.txt", "11111111;0001\n999;1\n999;1\n".as_bytes());

        let err = res.expect_err("overflow must fail");
        assert!(matches!(
            err.downcast_ref::<SalesError>(),
            Some(SalesError::ValueOverflow)
        ));
        assert_eq!(ledger.totals().sales()[&juan()], Decimal::MAX);
        assert_eq!(ledger.totals().units()["999"], 1);
        Ok(())
    }

    #[test]
    fn test_file_without_owner_line() -> Result<()> {
        let catalogs = catalogs()?;
        let mut ledger = Ledger::new(&catalogs);
        let outcome = ledger.apply_sales_file("empty.txt", "just one field\n".as_bytes())?;
        assert_eq!(outcome, FileOutcome::NoHeader);
        Ok(())
    }

    #[test]
    fn test_bad_quantity_is_fatal() -> Result<()> {
        let catalogs = catalogs()?;
        let mut ledger = Ledger::new(&catalogs);
        let res = ledger.apply_sales_file("v1.txt", "11111111;0001\n001;three\n".as_bytes());
        let err = res.expect_err("bad quantity must fail");
        assert!(matches!(
            err.downcast_ref::<SalesError>(),
            Some(SalesError::InvalidQuantity { line: 2, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_files_accumulate_for_same_salesperson() -> Result<()> {
        let catalogs = catalogs()?;
        let mut ledger = Ledger::new(&catalogs);
        ledger.apply_sales_file("a.txt", "11111111;0001\n001;1\n".as_bytes())?;
        ledger.apply_sales_file("b.txt", "11111111;0001\n001;2\n".as_bytes())?;
        assert_eq!(ledger.totals().sales()[&juan()], dec!(30.00));
        assert_eq!(ledger.totals().units()["001"], 3);
        Ok(())
    }

    #[test]
    fn test_aggregate_directory() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("v1.txt"), "11111111;0001\n001;3\n")?;
        fs::write(dir.path().join("v2.txt"), "22222222;0002\n002;4\n")?;
        fs::write(dir.path().join("v3.txt"), "33333333;0003\n002;4\n")?;
        fs::write(dir.path().join("notes.csv"), "11111111;0001\n001;100\n")?;
        fs::create_dir(dir.path().join("nested.txt"))?;

        let catalogs = catalogs()?;
        let (totals, stats) = aggregate(dir.path(), &catalogs)?;

        assert_eq!(totals.sales()[&juan()], dec!(30.00));
        assert_eq!(totals.sales()[&SalespersonKey::new("22222222", "0002")], dec!(20.00));
        assert_eq!(totals.units()["001"], 3);
        assert_eq!(stats.files_processed(), 2);
        assert_eq!(stats.files_skipped(), 1);
        Ok(())
    }

    #[test]
    fn test_aggregate_missing_directory() -> Result<()> {
        let dir = TempDir::new()?;
        let catalogs = catalogs()?;
        let err = aggregate(&dir.path().join("ventas"), &catalogs).expect_err("must fail");
        assert!(matches!(
            err.downcast_ref::<SalesError>(),
            Some(SalesError::Io { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_aggregate_not_a_directory() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("ventas");
        fs::write(&file, "")?;
        let catalogs = catalogs()?;
        let err = aggregate(&file, &catalogs).expect_err("must fail");
        assert!(matches!(
            err.downcast_ref::<SalesError>(),
            Some(SalesError::NotADirectory(_))
        ));
        Ok(())
    }
}
