use clap::Parser;
use getset::Getters;
use std::path::{Path, PathBuf};

pub const SALESPEOPLE_FILE: &str = "vendedores.txt";
pub const PRODUCTS_FILE: &str = "productos.txt";
pub const SALES_DIR: &str = "ventas";
pub const SALES_REPORT_FILE: &str = "reporte_vendedores.csv";
pub const PRODUCT_REPORT_FILE: &str = "reporte_productos.csv";

/// Input and output locations of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Parser, Getters)]
#[command(version, about = "Builds sales and product reports from flat sales files")]
pub struct Config {
    /// Salesperson catalog: documentType;documentNumber;firstNames;lastNames
    #[arg(long, env = "SALES_SALESPEOPLE_FILE", default_value = SALESPEOPLE_FILE)]
    #[getset(get = "pub")]
    salespeople: PathBuf,

    /// Product catalog: id;name;unitPrice
    #[arg(long, env = "SALES_PRODUCTS_FILE", default_value = PRODUCTS_FILE)]
    #[getset(get = "pub")]
    products: PathBuf,

    /// Directory holding one .txt file per salesperson
    #[arg(long, env = "SALES_DIR", default_value = SALES_DIR)]
    #[getset(get = "pub")]
    sales_dir: PathBuf,

    /// Output for revenue per salesperson
    #[arg(long, env = "SALES_REPORT_FILE", default_value = SALES_REPORT_FILE)]
    #[getset(get = "pub")]
    sales_report: PathBuf,

    /// Output for units sold per product
    #[arg(long, env = "PRODUCT_REPORT_FILE", default_value = PRODUCT_REPORT_FILE)]
    #[getset(get = "pub")]
    product_report: PathBuf,
}

impl Config {
    /// Uses the default file names under `base`.
    pub fn rooted_at(base: &Path) -> Self {
        Config {
            salespeople: base.join(SALESPEOPLE_FILE),
            products: base.join(PRODUCTS_FILE),
            sales_dir: base.join(SALES_DIR),
            sales_report: base.join(SALES_REPORT_FILE),
            product_report: base.join(PRODUCT_REPORT_FILE),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            salespeople: PathBuf::from(SALESPEOPLE_FILE),
            products: PathBuf::from(PRODUCTS_FILE),
            sales_dir: PathBuf::from(SALES_DIR),
            sales_report: PathBuf::from(SALES_REPORT_FILE),
            product_report: PathBuf::from(PRODUCT_REPORT_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::parse_from([
            "sales-reports",
            "--sales-dir",
            "/tmp/other",
            "--product-report",
            "out.csv",
        ]);
        assert_eq!(config.sales_dir(), Path::new("/tmp/other"));
        assert_eq!(config.product_report(), Path::new("out.csv"));
    }

    #[test]
    fn test_rooted_at() {
        let config = Config::rooted_at(Path::new("data"));
        assert_eq!(config.sales_dir(), Path::new("data/ventas"));
        assert_eq!(config.sales_report(), Path::new("data/reporte_vendedores.csv"));
    }
}
