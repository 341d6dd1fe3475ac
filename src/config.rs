//! Pipeline Configuration
//! Compile-time settings for input/output paths, year selection and sizing.

use std::path::PathBuf;

/// Merged dataset produced by the upstream pipeline.
pub const MERGED_CSV: &str = "merged_clean.csv";
pub const OUT_PNG: &str = "gdp_vs_enrollment_scatter.png";
pub const OUT_HTML: &str = "gdp_vs_enrollment_scatter.html";

/// Explicit years to plot. `None` auto-selects the most recent `MAX_PANELS`.
pub const YEARS: Option<&[i64]> = None;
pub const MAX_PANELS: usize = 6;

/// Multiplier from GDP to static marker area (pt²), before clamping.
pub const SIZE_SCALE: f64 = 0.00002;

/// Raster resolution of the static image.
pub const DPI: u32 = 150;

/// Resolved settings for one run of the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub png_path: PathBuf,
    pub html_path: PathBuf,
    pub years: Option<Vec<i64>>,
    pub max_panels: usize,
    pub size_scale: f64,
    pub dpi: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(MERGED_CSV),
            png_path: PathBuf::from(OUT_PNG),
            html_path: PathBuf::from(OUT_HTML),
            years: YEARS.map(|years| years.to_vec()),
            max_panels: MAX_PANELS,
            size_scale: SIZE_SCALE,
            dpi: DPI,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_path, PathBuf::from("merged_clean.csv"));
        assert_eq!(config.png_path, PathBuf::from("gdp_vs_enrollment_scatter.png"));
        assert_eq!(config.html_path, PathBuf::from("gdp_vs_enrollment_scatter.html"));
        assert!(config.years.is_none());
        assert_eq!(config.max_panels, 6);
        assert_eq!(config.size_scale, 0.00002);
        assert_eq!(config.dpi, 150);
    }
}
