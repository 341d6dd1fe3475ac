//! GDP vs Enrollment Scatter
//!
//! Reads the merged GDP/enrollment CSV and writes a small-multiples PNG and an
//! interactive faceted HTML chart of year-over-year percent changes.

mod charts;
mod config;
mod data;
mod stats;

use anyhow::{Context, Result};
use charts::{ChartPlotter, StaticChartRenderer};
use config::PipelineConfig;
use data::{DataLoader, DataProcessor};
use env_logger::{Env, Target};

fn main() -> Result<()> {
    // Column warnings go to stdout alongside progress output
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    run(&PipelineConfig::default())
}

fn run(config: &PipelineConfig) -> Result<()> {
    let table = DataLoader::load_csv(&config.input_path)?;

    let years = DataProcessor::select_years(&table, config.years.as_deref(), config.max_panels)?;
    println!("Plotting years: {:?}", years);

    StaticChartRenderer::render_png(&table, &years, config).with_context(|| {
        format!("Failed to render {}", config.png_path.display())
    })?;
    println!("Saved static scatter PNG: {}", config.png_path.display());

    ChartPlotter::render_html(&table, &years, &config.html_path).with_context(|| {
        format!("Failed to render {}", config.html_path.display())
    })?;
    println!("Saved interactive scatter HTML: {}", config.html_path.display());

    println!("Done. Open the HTML in a browser for interactive exploration.");
    Ok(())
}
