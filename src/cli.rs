use anyhow::{Context as _, Result};
use clap::Parser;
use std::io::Write as _;
use std::path::PathBuf;
use stock_sampler::analyser::run_analysis;
use stock_sampler::config::{AnalysisConfig, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "stock-sampler",
    version,
    about = "Per-store stock statistics and required sample sizes for estimating mean stock"
)]
pub struct Cli {
    /// Semicolon-delimited stock file with date, store and stock columns [default: estoque.csv]
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Field delimiter of the input file [default: ;]
    #[arg(long)]
    pub separator: Option<char>,

    /// Significance level; confidence is 1 - alpha [default: 0.05]
    #[arg(short, long)]
    pub alpha: Option<f64>,

    /// Margin of error as an absolute fraction. Repeat for several [default: 0.02 0.10]
    #[arg(short, long = "margin")]
    pub margins: Vec<f64>,

    /// Bins of the all-stores histogram [default: 40]
    #[arg(long)]
    pub bins: Option<usize>,

    /// Bins of each per-store histogram [default: chosen from the data]
    #[arg(long)]
    pub store_bins: Option<usize>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// JSON config file; command-line flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also write logs to daily rolling files in this directory
    #[arg(long, env = "STOCK_SAMPLER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Defaults, then the config file, then command-line flags.
    pub fn resolve_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input.clone_from(input);
        }
        if let Some(separator) = self.separator {
            config.separator = separator;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if !self.margins.is_empty() {
            config.margins.clone_from(&self.margins);
        }
        if let Some(bins) = self.bins {
            config.histogram_bins = bins;
        }
        if self.store_bins.is_some() {
            config.store_histogram_bins = self.store_bins;
        }
        if let Some(format) = self.format {
            config.format = format;
        }

        config.validate().context("Invalid settings")?;
        Ok(config)
    }
}

pub fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    tracing::info!(input = %config.input.display(), "starting analysis");

    let report = run_analysis(&config)
        .with_context(|| format!("Analysis of {} failed", config.input.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let written = match config.format {
        OutputFormat::Text => report.write_text(&mut out),
        OutputFormat::Json => report.write_json(&mut out),
    };
    written.context("Failed to write report")?;
    out.flush().context("Failed to flush report")?;
    Ok(())
}
