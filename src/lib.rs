pub mod catalog;
pub mod config;
pub mod csv_writer;
pub mod errors;
pub mod generator;
pub mod ledger;
pub mod models;
pub mod processor;
pub mod records;
pub mod report;
pub mod traits;

pub use config::Config;
pub use errors::SalesError;
pub use processor::{Pipeline, RunSummary};
