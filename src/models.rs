use crate::{errors::SalesError, records::Fields};
use getset::Getters;
use rust_decimal::prelude::*;
use serde::Serialize;
use std::fmt;

pub const SALESPERSON_FIELDS: usize = 4;
pub const PRODUCT_FIELDS: usize = 3;
pub const SALE_FIELDS: usize = 2;

const AMOUNT_DECIMALS: u32 = 2;

/// Formats an amount with exactly two decimals, rounding half away from zero.
pub fn format_amount(x: &Decimal) -> String {
    let rounded =
        x.round_dp_with_strategy(AMOUNT_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

fn round_two_decimals<S>(x: &Decimal, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&format_amount(x))
}

/// Identity of a salesperson: document type plus document number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Getters)]
pub struct SalespersonKey {
    #[getset(get = "pub")]
    document_type: String,
    #[getset(get = "pub")]
    document_number: String,
}

impl SalespersonKey {
    pub fn new(document_type: impl Into<String>, document_number: impl Into<String>) -> Self {
        SalespersonKey {
            document_type: document_type.into(),
            document_number: document_number.into(),
        }
    }

    /// Reads the owner line of a sales file. Returns `None` unless the
    /// record has exactly two fields.
    pub fn from_record(record: &Fields) -> Option<Self> {
        if record.len() != SALE_FIELDS {
            return None;
        }
        Some(SalespersonKey::new(&record[0], &record[1]))
    }
}

impl fmt::Display for SalespersonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.document_type, self.document_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Salesperson {
    #[getset(get = "pub")]
    key: SalespersonKey,
    #[getset(get = "pub")]
    first_names: String,
    #[getset(get = "pub")]
    last_names: String,
}

impl Salesperson {
    pub fn new(
        key: SalespersonKey,
        first_names: impl Into<String>,
        last_names: impl Into<String>,
    ) -> Self {
        Salesperson {
            key,
            first_names: first_names.into(),
            last_names: last_names.into(),
        }
    }

    /// Parses `documentType;documentNumber;firstNames;lastNames`.
    /// Any other field count yields `None`.
    pub fn from_record(record: &Fields) -> Option<Self> {
        if record.len() != SALESPERSON_FIELDS {
            return None;
        }
        Some(Salesperson::new(
            SalespersonKey::new(&record[0], &record[1]),
            &record[2],
            &record[3],
        ))
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_names, self.last_names)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Product {
    #[getset(get = "pub")]
    id: String,
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    unit_price: Decimal,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: Decimal) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            unit_price,
        }
    }

    /// Parses `id;name;unitPrice`. The price accepts either `.` or `,` as
    /// the decimal separator.
    ///
    /// # Returns
    /// `Ok(None)` when the field count is wrong, an error when the price is
    /// not a non-negative decimal.
    pub fn from_record(record: &Fields) -> Result<Option<Self>, SalesError> {
        if record.len() != PRODUCT_FIELDS {
            return Ok(None);
        }
        let raw = &record[2];
        let invalid = || SalesError::InvalidPrice {
            line: record.line(),
            value: raw.to_string(),
        };
        let unit_price = Decimal::from_str(&raw.replace(',', ".")).map_err(|_| invalid())?;
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(invalid());
        }
        Ok(Some(Product::new(&record[0], &record[1], unit_price)))
    }
}

/// One `productId;quantity` line of a sales file.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct SaleLine {
    #[getset(get = "pub")]
    product_id: String,
    #[getset(get = "pub")]
    quantity: u32,
}

impl SaleLine {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        SaleLine {
            product_id: product_id.into(),
            quantity,
        }
    }

    pub fn from_record(record: &Fields) -> Result<Option<Self>, SalesError> {
        if record.len() != SALE_FIELDS {
            return Ok(None);
        }
        let raw = &record[1];
        let quantity = raw.parse::<u32>().map_err(|_| SalesError::InvalidQuantity {
            line: record.line(),
            value: raw.to_string(),
        })?;
        Ok(Some(SaleLine::new(&record[0], quantity)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct SalesReportRow {
    #[getset(get = "pub")]
    full_name: String,
    #[getset(get = "pub")]
    #[serde(serialize_with = "round_two_decimals")]
    revenue: Decimal,
}

impl SalesReportRow {
    pub fn new(salesperson: &Salesperson, revenue: Decimal) -> Self {
        SalesReportRow {
            full_name: salesperson.full_name(),
            revenue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct ProductReportRow {
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    #[serde(serialize_with = "round_two_decimals")]
    unit_price: Decimal,
    #[getset(get = "pub")]
    units_sold: u64,
}

impl ProductReportRow {
    pub fn new(product: &Product, units_sold: u64) -> Self {
        ProductReportRow {
            name: product.name().clone(),
            unit_price: *product.unit_price(),
            units_sold,
        }
    }
}
