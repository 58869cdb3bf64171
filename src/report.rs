use crate::{
    catalog::{Products, Salespeople},
    csv_writer::FileCSVWriter,
    ledger::{ProductUnitsTotals, SalesTotals},
    models::{ProductReportRow, SalesReportRow},
    traits::{ReportExport, ReportWrite},
};
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Revenue per salesperson, highest first. Equal revenue falls back to key
/// order.
pub struct SalesReport<'a> {
    salespeople: &'a Salespeople,
    totals: &'a SalesTotals,
}

impl<'a> SalesReport<'a> {
    pub fn new(salespeople: &'a Salespeople, totals: &'a SalesTotals) -> Self {
        Self {
            salespeople,
            totals,
        }
    }

    pub fn rows(&self) -> Vec<SalesReportRow> {
        let mut entries: Vec<_> = self.totals.iter().collect();
        entries.sort_by(|(ka, ra), (kb, rb)| rb.cmp(ra).then_with(|| ka.cmp(kb)));
        entries
            .into_iter()
            .filter_map(|(key, revenue)| {
                self.salespeople
                    .get(key)
                    .map(|person| SalesReportRow::new(person, *revenue))
            })
            .collect()
    }
}

impl ReportExport for SalesReport<'_> {
    fn export(&self, writer: &mut impl ReportWrite) -> Result<()> {
        for row in self.rows() {
            writer.write_record(&row)?;
        }
        writer.finish()
    }
}

/// Units sold per product, highest first. Equal counts fall back to id order.
pub struct ProductReport<'a> {
    products: &'a Products,
    totals: &'a ProductUnitsTotals,
}

impl<'a> ProductReport<'a> {
    pub fn new(products: &'a Products, totals: &'a ProductUnitsTotals) -> Self {
        Self { products, totals }
    }

    pub fn rows(&self) -> Vec<ProductReportRow> {
        let mut entries: Vec<_> = self.totals.iter().collect();
        entries.sort_by(|(ia, ua), (ib, ub)| ub.cmp(ua).then_with(|| ia.cmp(ib)));
        entries
            .into_iter()
            .filter_map(|(id, units)| {
                self.products
                    .get(id)
                    .map(|product| ProductReportRow::new(product, *units))
            })
            .collect()
    }
}

impl ReportExport for ProductReport<'_> {
    fn export(&self, writer: &mut impl ReportWrite) -> Result<()> {
        for row in self.rows() {
            writer.write_record(&row)?;
        }
        writer.finish()
    }
}

pub fn write_sales_report(
    path: &Path,
    salespeople: &Salespeople,
    totals: &SalesTotals,
) -> Result<()> {
    let mut writer = FileCSVWriter::create(path)?;
    SalesReport::new(salespeople, totals)
        .export(&mut writer)
        .with_context(|| format!("writing sales report {}", path.display()))?;
    info!("wrote {} salespeople to {}", totals.len(), path.display());
    Ok(())
}

pub fn write_product_report(
    path: &Path,
    products: &Products,
    totals: &ProductUnitsTotals,
) -> Result<()> {
    let mut writer = FileCSVWriter::create(path)?;
    ProductReport::new(products, totals)
        .export(&mut writer)
        .with_context(|| format!("writing product report {}", path.display()))?;
    info!("wrote {} products to {}", totals.len(), path.display());
    Ok(())
}
