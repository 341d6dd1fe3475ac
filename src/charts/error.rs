//! Chart error type shared by the static and interactive renderers.

use plotters::drawing::DrawingAreaErrorKind;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Failed to read table: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to encode figure: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),
}

impl<E> From<DrawingAreaErrorKind<E>> for ChartError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Drawing(err.to_string())
    }
}
