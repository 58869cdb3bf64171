use std::path::PathBuf;

use thiserror::Error;

use crate::models::SalespersonKey;

#[derive(Debug, Error)]
pub enum SalesError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("invalid price {value:?} on line {line}")]
    InvalidPrice { line: u64, value: String },

    #[error("invalid quantity {value:?} on line {line}")]
    InvalidQuantity { line: u64, value: String },

    #[error("salesperson {0} not found")]
    UnknownSalesperson(SalespersonKey),

    #[error("product {0} not found")]
    UnknownProduct(String),

    #[error("value overflow")]
    ValueOverflow,
}

impl SalesError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SalesError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the run can carry on after logging this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SalesError::UnknownSalesperson(_) | SalesError::UnknownProduct(_)
        )
    }
}
