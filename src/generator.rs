//! Writes pseudorandom input files in the same line format the pipeline
//! reads.

use crate::{
    config::{PRODUCTS_FILE, SALES_DIR, SALESPEOPLE_FILE},
    csv_writer::report_writer,
    errors::SalesError,
    models::{Salesperson, SalespersonKey, format_amount},
};
use anyhow::{Context, Result};
use getset::{CopyGetters, Getters};
use log::info;
use rand::Rng;
use rust_decimal::Decimal;
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

const FIRST_NAMES: [&str; 6] = ["Juan", "Ana", "Luis", "Marta", "Carlos", "Laura"];
const LAST_NAMES: [&str; 6] = [
    "Pérez",
    "García",
    "Rodríguez",
    "Martínez",
    "Hernández",
    "López",
];
const PRODUCT_NAMES: [&str; 5] = ["Laptop", "Mouse", "Teclado", "Monitor", "Impresora"];

const MAX_QUANTITY: u32 = 10;

#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct GeneratorConfig {
    #[getset(get = "pub")]
    base_dir: PathBuf,
    #[getset(get_copy = "pub")]
    salespeople: usize,
    #[getset(get_copy = "pub")]
    products: usize,
    #[getset(get_copy = "pub")]
    sales_per_file: usize,
}

impl GeneratorConfig {
    pub fn new(
        base_dir: PathBuf,
        salespeople: usize,
        products: usize,
        sales_per_file: usize,
    ) -> Self {
        Self {
            base_dir,
            salespeople,
            products,
            sales_per_file,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("."), 10, 5, 20)
    }
}

fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

fn product_id(n: usize) -> String {
    format!("{n:03}")
}

fn write_lines<I>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let file = File::create(path).map_err(|e| SalesError::io(path, e))?;
    let mut writer = report_writer(file);
    for fields in lines {
        writer
            .write_record(&fields)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer.flush().map_err(|e| SalesError::io(path, e))?;
    Ok(())
}

/// Writes `count` salespeople with random document numbers and names.
pub fn create_salespeople_file<R: Rng>(
    path: &Path,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Salesperson>> {
    let salespeople: Vec<Salesperson> = (0..count)
        .map(|_| {
            let key = SalespersonKey::new(
                format!("{:08}", rng.gen_range(0..100_000_000)),
                format!("{:04}", rng.gen_range(0..10_000)),
            );
            Salesperson::new(key, pick(rng, &FIRST_NAMES), pick(rng, &LAST_NAMES))
        })
        .collect();

    write_lines(
        path,
        salespeople.iter().map(|p| {
            vec![
                p.key().document_type().clone(),
                p.key().document_number().clone(),
                p.first_names().clone(),
                p.last_names().clone(),
            ]
        }),
    )?;
    Ok(salespeople)
}

/// Writes products `001..=count`, each priced between 1 and 101.
pub fn create_products_file<R: Rng>(path: &Path, count: usize, rng: &mut R) -> Result<()> {
    let lines: Vec<Vec<String>> = (1..=count)
        .map(|n| {
            let cents = rng.gen_range(100..10_100);
            vec![
                product_id(n),
                pick(rng, &PRODUCT_NAMES).to_string(),
                format_amount(&Decimal::new(cents, 2)),
            ]
        })
        .collect();
    write_lines(path, lines)
}

/// Writes one sales file owned by `owner` with `sales` random lines over
/// products `001..=product_count`.
pub fn create_sales_file<R: Rng>(
    path: &Path,
    owner: &SalespersonKey,
    sales: usize,
    product_count: usize,
    rng: &mut R,
) -> Result<()> {
    let header = vec![owner.document_type().clone(), owner.document_number().clone()];
    let lines: Vec<Vec<String>> = (0..sales)
        .map(|_| {
            vec![
                product_id(rng.gen_range(1..=product_count.max(1))),
                rng.gen_range(1..=MAX_QUANTITY).to_string(),
            ]
        })
        .collect();
    write_lines(path, std::iter::once(header).chain(lines))
}

/// Writes a complete data set under `config.base_dir()`.
pub fn generate<R: Rng>(config: &GeneratorConfig, rng: &mut R) -> Result<()> {
    let base = config.base_dir();
    let sales_dir = base.join(SALES_DIR);
    fs::create_dir_all(&sales_dir).map_err(|e| SalesError::io(&sales_dir, e))?;

    let salespeople =
        create_salespeople_file(&base.join(SALESPEOPLE_FILE), config.salespeople(), rng)?;
    create_products_file(&base.join(PRODUCTS_FILE), config.products(), rng)?;

    for person in &salespeople {
        let key = person.key();
        let path = sales_dir.join(format!(
            "ventas_{}_{}.txt",
            key.document_type(),
            key.document_number()
        ));
        create_sales_file(
            &path,
            key,
            config.sales_per_file(),
            config.products(),
            rng,
        )?;
    }

    info!(
        "generated {} salespeople with one sales file each and {} products in {}",
        salespeople.len(),
        config.products(),
        base.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{load_products, load_salespeople};
    use rand::{SeedableRng, rngs::StdRng};
    use tempfile::TempDir;

    #[test]
    fn test_generated_catalogs_load() -> Result<()> {
        let dir = TempDir::new()?;
        let mut rng = StdRng::seed_from_u64(7);

        let people = create_salespeople_file(&dir.path().join("v.txt"), 4, &mut rng)?;
        create_products_file(&dir.path().join("p.txt"), 5, &mut rng)?;

        let loaded = load_salespeople(&dir.path().join("v.txt"))?;
        assert!(people.iter().all(|p| loaded.contains_key(p.key())));

        let products = load_products(&dir.path().join("p.txt"))?;
        assert_eq!(products.len(), 5);
        assert!(products.contains_key("001") && products.contains_key("005"));
        assert!(
            products
                .values()
                .all(|p| *p.unit_price() >= Decimal::ONE && *p.unit_price() < Decimal::from(101))
        );
        Ok(())
    }

    #[test]
    fn test_sales_file_layout() -> Result<()> {
        let dir = TempDir::new()?;
        let mut rng = StdRng::seed_from_u64(42);
        let path = dir.path().join("ventas_0001.txt");

        create_sales_file(&path, &SalespersonKey::new("11111111", "0001"), 20, 5, &mut rng)?;

        let content = fs::read_to_string(&path)?;
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("11111111;0001"));
        let rest: Vec<_> = lines.collect();
        assert_eq!(rest.len(), 20);
        for line in rest {
            let (id, qty) = line.split_once(';').expect("two fields");
            let id: usize = id.parse()?;
            let qty: u32 = qty.parse()?;
            assert!((1..=5).contains(&id));
            assert!((1..=MAX_QUANTITY).contains(&qty));
        }
        Ok(())
    }
}
