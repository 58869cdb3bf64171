use crate::{
    config::Config,
    models::{Product, Salesperson, SalespersonKey},
    records::{open_file, read_fields},
};
use anyhow::{Context, Result};
use getset::Getters;
use log::info;
use std::{collections::HashMap, io::Read, path::Path};

pub type Salespeople = HashMap<SalespersonKey, Salesperson>;
pub type Products = HashMap<String, Product>;

/// Read-only lookup tables built before any sale is counted.
#[derive(Debug, Clone, Default, Getters)]
pub struct Catalogs {
    #[getset(get = "pub")]
    salespeople: Salespeople,
    #[getset(get = "pub")]
    products: Products,
}

impl Catalogs {
    pub fn new(salespeople: Salespeople, products: Products) -> Self {
        Self {
            salespeople,
            products,
        }
    }
}

/// Reads salesperson records. Lines without exactly four fields are
/// skipped; a repeated key replaces the earlier entry.
pub fn read_salespeople<R: Read>(reader: R) -> Result<Salespeople> {
    let mut salespeople = HashMap::new();
    for rec in read_fields(reader) {
        if let Some(person) = Salesperson::from_record(&rec?) {
            salespeople.insert(person.key().clone(), person);
        }
    }
    Ok(salespeople)
}

/// Reads product records. A malformed price aborts the whole read.
pub fn read_products<R: Read>(reader: R) -> Result<Products> {
    let mut products = HashMap::new();
    for rec in read_fields(reader) {
        if let Some(product) = Product::from_record(&rec?)? {
            products.insert(product.id().clone(), product);
        }
    }
    Ok(products)
}

pub fn load_salespeople(path: &Path) -> Result<Salespeople> {
    read_salespeople(open_file(path)?)
        .with_context(|| format!("loading salespeople from {}", path.display()))
}

pub fn load_products(path: &Path) -> Result<Products> {
    read_products(open_file(path)?)
        .with_context(|| format!("loading products from {}", path.display()))
}

pub fn load_catalogs(config: &Config) -> Result<Catalogs> {
    let salespeople = load_salespeople(config.salespeople())?;
    info!(
        "loaded {} salespeople from {}",
        salespeople.len(),
        config.salespeople().display()
    );
    let products = load_products(config.products())?;
    info!(
        "loaded {} products from {}",
        products.len(),
        config.products().display()
    );
    Ok(Catalogs::new(salespeople, products))
}
