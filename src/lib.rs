//! # stock-sampler
//!
//! Exploratory statistics for daily store inventory, and the sample size
//! needed to estimate each store's mean stock within a margin of error.
//!
//! ## Quick Start
//!
//! ```no_run
//! use stock_sampler::analyser::run_analysis;
//! use stock_sampler::config::AnalysisConfig;
//!
//! # fn example() -> stock_sampler::error::Result<()> {
//! let report = run_analysis(&AnalysisConfig::default())?;
//! for estimate in &report.estimates {
//!     println!("{:?}", estimate.sample_size);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`analyser`]: the pipeline and report
//!   - [`analyser::logic`]: loading, grouping, distributions, sample sizes
//! - [`config`]: run settings, JSON config files
//! - [`error`]: error types and handling utilities
//! - [`logging`]: tracing subscriber setup
//! - [`utils`]: number formatting helpers
//!
//! ## Sample size
//!
//! For margin `m`, significance `a` and sigma estimate `s`, the required
//! sample size is `round((z(a/2) · s / m)²)`. Sigma comes from either the
//! range rule (`range / 4`) or the sample standard deviation:
//!
//! ```
//! use stock_sampler::analyser::logic::{required_sample_size, z_critical};
//!
//! let z = z_critical(0.05).unwrap();
//! assert_eq!(required_sample_size(z, 7.5, 0.10), Some(21_608));
//! ```

#![warn(clippy::all, rust_2018_idioms)]

pub mod analyser;
pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
