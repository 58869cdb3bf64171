use clap::Parser;
use env_logger::Env;
use log::info;
use sales_reports::{Config, Pipeline};

const DEFAULT_LOG_FILTER: &str = "warn";

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOG_FILTER)).init();

    let config = Config::parse();
    let pipeline = Pipeline::new(config);

    match pipeline.run() {
        Ok(summary) => {
            info!(
                "{} salespeople, {} products, {} sales files processed, {} skipped",
                summary.salespeople(),
                summary.products(),
                summary.files_processed(),
                summary.files_skipped()
            );
            println!("Reports generated successfully.");
        }
        Err(e) => {
            eprintln!("Error processing files: {e:#}");
            std::process::exit(1);
        }
    }
}
