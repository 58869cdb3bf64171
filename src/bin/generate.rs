use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use rand::{SeedableRng, rngs::StdRng};
use sales_reports::generator::{GeneratorConfig, generate};

/// Writes pseudorandom salesperson, product and sales files for testing
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Directory receiving vendedores.txt, productos.txt and ventas/
    #[arg(long, default_value = ".")]
    dir: PathBuf,
    #[arg(long, default_value_t = 10)]
    salespeople: usize,
    #[arg(long, default_value_t = 5)]
    products: usize,
    /// Sale lines per salesperson file
    #[arg(long, default_value_t = 20)]
    sales: usize,
    /// Fixed seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = GeneratorConfig::new(args.dir, args.salespeople, args.products, args.sales);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if let Err(e) = generate(&config, &mut rng) {
        eprintln!("Error generating files: {e:#}");
        std::process::exit(1);
    }
    println!("Test files generated successfully.");
}
