//! # stock-sampler
//!
//! Reads a daily stock file, prints per-store statistics and distribution
//! summaries, then the sample size needed to estimate each store's mean
//! stock within the requested margins of error.
//!
//! ```bash
//! stock-sampler                          # estoque.csv, 2% and 10% margins
//! stock-sampler -i stock.csv -m 0.05     # custom file and margin
//! stock-sampler --format json > out.json
//! RUST_LOG=debug stock-sampler           # per-store details on stderr
//! ```

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    stock_sampler::logging::init(cli.log_dir.as_deref())?;
    cli::run(&cli)
}
