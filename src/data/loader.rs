//! CSV Data Loader Module
//! Reads the merged GDP/enrollment CSV with Polars and coerces column types.

use super::record::{
    BOTH_INCREASE, ENROLLMENT, ENROLLMENT_NUMERIC, ENROLLMENT_PCT_CHANGE, EXPECTED_COLUMNS, GDP,
    GDP_NUMERIC, GDP_PCT_CHANGE, YEAR,
};
use super::table::GdpTable;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("{} not found", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Handles CSV loading and type coercion.
pub struct DataLoader;

impl DataLoader {
    /// Load the merged CSV and coerce it into a `GdpTable`.
    ///
    /// Absent expected columns produce a warning and an all-null column; only a
    /// missing file is fatal.
    pub fn load_csv(path: &Path) -> Result<GdpTable, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        // Schema length 0 reads every column as text, coercion happens below
        let mut df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        let height = df.height();
        let mut missing_columns = Vec::new();
        for name in EXPECTED_COLUMNS {
            if df.column(name).is_err() {
                println!("Warning: column '{}' not present in merged file.", name);
                log::debug!("Filling missing column '{}' with {} nulls", name, height);
                missing_columns.push(name.to_string());
                df.with_column(Series::full_null(name.into(), height, &DataType::String))?;
            }
        }

        let mut df = df
            .lazy()
            .with_columns([
                Self::integral(YEAR).alias(YEAR),
                Self::numeric(GDP).alias(GDP_NUMERIC),
                Self::numeric(ENROLLMENT).alias(ENROLLMENT_NUMERIC),
                Self::numeric(GDP_PCT_CHANGE).alias(GDP_PCT_CHANGE),
                Self::numeric(ENROLLMENT_PCT_CHANGE).alias(ENROLLMENT_PCT_CHANGE),
            ])
            .collect()?;

        let flags: Vec<bool> = df
            .column(BOTH_INCREASE)?
            .str()?
            .into_iter()
            .map(|value| value.map(parse_flag).unwrap_or(false))
            .collect();
        df.with_column(Column::new(BOTH_INCREASE.into(), flags))?;

        let table = GdpTable::new(df, missing_columns);
        log::info!(
            "Loaded {} rows from {} ({} missing columns)",
            table.get_row_count(),
            path.display(),
            table.missing_columns().len()
        );

        Ok(table)
    }

    /// Text column to Float64; unparsable values become null.
    fn numeric(name: &str) -> Expr {
        col(name)
            .str()
            .strip_chars(lit(NULL))
            .cast(DataType::Float64)
    }

    /// Text column to Int64. Values with a fractional part become null rather
    /// than being truncated into a neighbouring year.
    fn integral(name: &str) -> Expr {
        let value = Self::numeric(name);
        when((value.clone() % lit(1.0)).eq(lit(0.0)))
            .then(value.cast(DataType::Int64))
            .otherwise(lit(NULL).cast(DataType::Int64))
    }
}

/// Interpret a textual truth value. Unknown non-numeric text is false.
fn parse_flag(raw: &str) -> bool {
    let value = raw.trim().to_ascii_lowercase();
    match value.as_str() {
        "true" | "t" | "yes" | "y" => true,
        "false" | "f" | "no" | "n" | "" => false,
        other => other
            .parse::<f64>()
            .map(|n| n != 0.0 && !n.is_nan())
            .unwrap_or(false),
    }
}
