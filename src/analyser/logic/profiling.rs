//! Dataset-level profiling of the loaded frame.
//!
//! This is the first look at the data before any per-store work: which
//! columns arrived, with which parsed types and how many non-null cells,
//! plus a `describe`-style table for every numeric column.

use super::types::{ColumnDescription, ColumnInfo, DatasetOverview, Record};
use crate::error::Result;
use polars::prelude::*;

pub fn column_info(df: &DataFrame) -> Vec<ColumnInfo> {
    df.get_columns()
        .iter()
        .map(|col| ColumnInfo {
            name: col.name().to_string(),
            dtype: col.dtype().to_string(),
            non_null: col.len() - col.null_count(),
        })
        .collect()
}

pub fn describe_numeric(col: &Column) -> Result<ColumnDescription> {
    let series = col.as_materialized_series();
    let ca = series.cast(&DataType::Float64)?;
    let ca = ca.f64()?;

    Ok(ColumnDescription {
        name: col.name().to_string(),
        count: ca.len() - ca.null_count(),
        mean: ca.mean(),
        std_dev: ca.std(1),
        min: ca.min(),
        q1: ca.quantile(0.25, QuantileMethod::Linear).unwrap_or(None),
        median: ca.median(),
        q3: ca.quantile(0.75, QuantileMethod::Linear).unwrap_or(None),
        max: ca.max(),
    })
}

/// `describe` rows for the numeric columns, in column order.
pub fn describe(df: &DataFrame) -> Result<Vec<ColumnDescription>> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .map(describe_numeric)
        .collect()
}

pub fn overview(df: &DataFrame, records: &[Record], head_rows: usize) -> Result<DatasetOverview> {
    Ok(DatasetOverview {
        row_count: df.height(),
        columns: column_info(df),
        head: records.iter().take(head_rows).copied().collect(),
        describe: describe(df)?,
    })
}
