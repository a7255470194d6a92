use super::types::Record;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result, ResultExt as _};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::Path;

/// Date layouts accepted in the date column, tried in order.
///
/// Slash dates are month first, the same default the source spreadsheet
/// tooling applies to ambiguous dates.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Reads a delimited file with a header row into a `DataFrame`.
///
/// Every column is read as text. Typing and validation happen in
/// [`records_from_df`], so a bad cell anywhere in the file is reported with
/// its row and column.
pub fn load_df(path: &Path, separator: u8) -> Result<DataFrame> {
    std::fs::metadata(path)
        .with_context(|| format!("Failed to open input file {}", path.display()))?;

    // No inference rows: all columns come back as String
    let df = LazyCsvReader::new(path)
        .with_separator(separator)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()
        .context("Failed to read CSV")?;

    tracing::debug!(rows = df.height(), columns = df.width(), "input loaded");
    Ok(df)
}

/// Parses one date cell.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(Column::as_materialized_series)
        .map_err(|_| AnalysisError::MissingColumn(name.to_owned()))
}

fn invalid(row: usize, column: &str, message: String) -> AnalysisError {
    AnalysisError::InvalidRecord {
        row,
        column: column.to_owned(),
        message,
    }
}

fn describe_bad_cell(raw: Option<&str>, expected: &str) -> String {
    match raw {
        Some(value) => format!("expected {expected}, got '{value}'"),
        None => "missing value".to_owned(),
    }
}

/// Converts the loaded frame into validated records.
///
/// Rows are numbered from 1 (the first line after the header). The first
/// invalid cell aborts the conversion.
///
/// # Errors
///
/// - [`AnalysisError::MissingColumn`] if a configured column is absent
/// - [`AnalysisError::InvalidRecord`] for a null, unparseable or negative cell
/// - [`AnalysisError::EmptyDataset`] if the frame has no rows
pub fn records_from_df(df: &DataFrame, config: &AnalysisConfig) -> Result<Vec<Record>> {
    let date_col = required_column(df, &config.date_column)?;
    let store_col = required_column(df, &config.store_column)?;
    let stock_col = required_column(df, &config.stock_column)?;

    if df.height() == 0 {
        return Err(AnalysisError::EmptyDataset);
    }

    let dates = date_col.cast(&DataType::String)?;
    let dates = dates.str()?;
    let store_raw = store_col.cast(&DataType::String)?;
    let store_raw = store_raw.str()?;
    let stores = store_col.cast(&DataType::Float64)?;
    let stores = stores.f64()?;
    let stock_raw = stock_col.cast(&DataType::String)?;
    let stock_raw = stock_raw.str()?;
    let stocks = stock_col.cast(&DataType::Float64)?;
    let stocks = stocks.f64()?;

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let row = idx + 1;

        let raw_date = dates.get(idx);
        let date = raw_date.and_then(parse_date).ok_or_else(|| {
            invalid(row, &config.date_column, describe_bad_cell(raw_date, "a date"))
        })?;

        let store_id = stores
            .get(idx)
            .filter(|v| v.is_finite() && v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(u32::MAX))
            .map(|v| v as u32)
            .ok_or_else(|| {
                invalid(
                    row,
                    &config.store_column,
                    describe_bad_cell(store_raw.get(idx), "a non-negative integer store id"),
                )
            })?;

        let stock = stocks.get(idx).ok_or_else(|| {
            invalid(
                row,
                &config.stock_column,
                describe_bad_cell(stock_raw.get(idx), "a number"),
            )
        })?;
        if !stock.is_finite() || stock < 0.0 {
            return Err(invalid(
                row,
                &config.stock_column,
                format!("stock must be a non-negative number, got {stock}"),
            ));
        }

        records.push(Record {
            date,
            store_id,
            stock,
        });
    }

    Ok(records)
}

/// The loaded frame with the configured columns replaced by their parsed
/// values: a `date` column, `u32` store ids and `f64` stock.
///
/// `records` must come from [`records_from_df`] on the same frame, one per row.
pub fn typed_frame(df: &DataFrame, records: &[Record], config: &AnalysisConfig) -> Result<DataFrame> {
    if records.len() != df.height() {
        return Err(AnalysisError::DataProcessing(format!(
            "expected {} records, got {}",
            df.height(),
            records.len()
        )));
    }

    // `NaiveDate::default()` is the Unix epoch, day zero of a polars Date
    let epoch = NaiveDate::default();
    let days = records
        .iter()
        .map(|r| i32::try_from((r.date - epoch).num_days()))
        .collect::<std::result::Result<Vec<i32>, _>>()
        .map_err(|e| AnalysisError::DataProcessing(format!("date out of range: {e}")))?;
    let store_ids: Vec<u32> = records.iter().map(|r| r.store_id).collect();
    let stocks: Vec<f64> = records.iter().map(|r| r.stock).collect();

    let mut typed = df.clone();
    typed.with_column(Series::new(config.date_column.as_str().into(), days).cast(&DataType::Date)?)?;
    typed.with_column(Series::new(config.store_column.as_str().into(), store_ids))?;
    typed.with_column(Series::new(config.stock_column.as_str().into(), stocks))?;
    Ok(typed)
}

/// Loads and validates the configured input file.
///
/// Returns the typed frame (see [`typed_frame`]) alongside the records.
pub fn load_records(config: &AnalysisConfig) -> Result<(DataFrame, Vec<Record>)> {
    let df = load_df(&config.input, config.separator_byte()?)?;
    let records = records_from_df(&df, config)?;
    let typed = typed_frame(&df, &records, config)?;
    tracing::info!(
        path = %config.input.display(),
        records = records.len(),
        "records loaded"
    );
    Ok((typed, records))
}
