//! Coerced GDP/enrollment table.
//! Wraps the loaded DataFrame and exposes per-year typed rows.

use super::record::{
    Record, BOTH_INCREASE, COUNTRY, ENROLLMENT_NUMERIC, ENROLLMENT_PCT_CHANGE, GDP_NUMERIC,
    GDP_PCT_CHANGE, YEAR,
};
use polars::prelude::*;
use std::collections::BTreeSet;

/// The merged dataset after coercion. Every expected column is present.
#[derive(Debug, Clone)]
pub struct GdpTable {
    df: DataFrame,
    missing_columns: Vec<String>,
}

impl GdpTable {
    pub(crate) fn new(df: DataFrame, missing_columns: Vec<String>) -> Self {
        Self {
            df,
            missing_columns,
        }
    }

    /// Columns that were absent in the source file and filled with nulls.
    pub fn missing_columns(&self) -> &[String] {
        &self.missing_columns
    }

    pub fn get_row_count(&self) -> usize {
        self.df.height()
    }

    /// Distinct non-null years, ascending.
    pub fn years(&self) -> PolarsResult<Vec<i64>> {
        let years: BTreeSet<i64> = self.df.column(YEAR)?.i64()?.into_iter().flatten().collect();
        Ok(years.into_iter().collect())
    }

    /// Rows whose year equals `year`, in file order.
    pub fn records_for_year(&self, year: i64) -> PolarsResult<Vec<Record>> {
        let filtered = self
            .df
            .clone()
            .lazy()
            .filter(col(YEAR).eq(lit(year)))
            .collect()?;
        Self::extract_records(&filtered)
    }

    /// Rows for each requested year, concatenated in the order given.
    pub fn records_for_years(&self, years: &[i64]) -> PolarsResult<Vec<Record>> {
        let mut records = Vec::new();
        for &year in years {
            records.extend(self.records_for_year(year)?);
        }
        Ok(records)
    }

    /// All rows in file order.
    #[cfg(test)]
    pub fn records(&self) -> PolarsResult<Vec<Record>> {
        Self::extract_records(&self.df)
    }

    fn extract_records(df: &DataFrame) -> PolarsResult<Vec<Record>> {
        let country = df.column(COUNTRY)?.str()?;
        let year = df.column(YEAR)?.i64()?;
        let gdp = df.column(GDP_NUMERIC)?.f64()?;
        let enrollment = df.column(ENROLLMENT_NUMERIC)?.f64()?;
        let gdp_pct = df.column(GDP_PCT_CHANGE)?.f64()?;
        let enrollment_pct = df.column(ENROLLMENT_PCT_CHANGE)?.f64()?;
        let both = df.column(BOTH_INCREASE)?.bool()?;

        let records = (0..df.height())
            .map(|i| Record {
                country: country.get(i).map(|s| s.to_string()),
                year: year.get(i),
                gdp_numeric: not_nan(gdp.get(i)),
                enrollment_numeric: not_nan(enrollment.get(i)),
                gdp_pct_change: not_nan(gdp_pct.get(i)),
                enrollment_pct_change: not_nan(enrollment_pct.get(i)),
                both_increase: both.get(i).unwrap_or(false),
            })
            .collect();

        Ok(records)
    }
}

// "nan" text parses to NaN; treat it like any other non-numeric value.
fn not_nan(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}
