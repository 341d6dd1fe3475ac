//! Statistics Calculator Module
//! Marker sizing and outlier ranking shared by the static and interactive charts.

use crate::data::Record;
use statrs::statistics::Statistics;

/// Static marker area bounds (pt²).
pub const MIN_MARKER_AREA: f64 = 10.0;
pub const MAX_MARKER_AREA: f64 = 400.0;

/// Interactive marker size range and fallbacks.
pub const MIN_MARKER_SIZE: f64 = 15.0;
pub const MAX_MARKER_SIZE: f64 = 100.0;
pub const UNIFORM_MARKER_SIZE: f64 = 35.0;
pub const DEFAULT_MARKER_SIZE: f64 = 25.0;

/// Number of countries labelled per panel.
pub const OUTLIER_LABELS: usize = 5;

/// Handles per-row derived quantities used for plotting.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Static marker area: |GDP| scaled and clamped to [10, 400] pt².
    pub fn static_marker_area(gdp: Option<f64>, size_scale: f64) -> f64 {
        let area = gdp.unwrap_or(0.0).abs() * size_scale;
        if area.is_nan() {
            return MIN_MARKER_AREA;
        }
        area.clamp(MIN_MARKER_AREA, MAX_MARKER_AREA)
    }

    /// Radius in pixels of a circle whose area is `area` pt² at `dpi`.
    pub fn marker_radius_px(area: f64, dpi: u32) -> u32 {
        let diameter_pt = area.max(0.0).sqrt();
        let radius_px = diameter_pt / 2.0 * dpi as f64 / 72.0;
        radius_px.round().max(1.0) as u32
    }

    /// Euclidean distance of the percent-change pair from the origin, nulls as zero.
    pub fn distance_from_origin(record: &Record) -> f64 {
        let x = record.gdp_pct_change.unwrap_or(0.0);
        let y = record.enrollment_pct_change.unwrap_or(0.0);
        x.hypot(y)
    }

    /// The `limit` rows furthest from the origin, dropping rows that cannot be
    /// placed on the chart. May return fewer than `limit`.
    pub fn top_outliers(records: &[Record], limit: usize) -> Vec<&Record> {
        let mut ranked: Vec<(f64, &Record)> = records
            .iter()
            .map(|r| (Self::distance_from_origin(r), r))
            .collect();
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        ranked
            .into_iter()
            .take(limit)
            .filter(|(_, r)| r.point().is_some())
            .map(|(_, r)| r)
            .collect()
    }

    /// Interactive marker sizes: GDP rescaled linearly into [15, 100].
    ///
    /// Nulls take the minimum. Equal non-null values give 35 everywhere and no
    /// non-null values give 25 everywhere.
    pub fn interactive_marker_sizes(gdp: &[Option<f64>]) -> Vec<f64> {
        let known: Vec<f64> = gdp.iter().flatten().copied().collect();
        if known.is_empty() {
            return vec![DEFAULT_MARKER_SIZE; gdp.len()];
        }

        let min = Statistics::min(&known);
        let max = Statistics::max(&known);
        if max <= min {
            return vec![UNIFORM_MARKER_SIZE; gdp.len()];
        }

        let span = MAX_MARKER_SIZE - MIN_MARKER_SIZE;
        gdp.iter()
            .map(|v| MIN_MARKER_SIZE + span * ((v.unwrap_or(min) - min) / (max - min)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, x: Option<f64>, y: Option<f64>) -> Record {
        Record {
            country: Some(country.to_string()),
            gdp_pct_change: x,
            enrollment_pct_change: y,
            ..Default::default()
        }
    }

    #[test]
    fn test_static_marker_area_clamps() {
        assert_eq!(StatsCalculator::static_marker_area(None, 0.00002), 10.0);
        assert_eq!(StatsCalculator::static_marker_area(Some(100.0), 0.00002), 10.0);
        assert_eq!(StatsCalculator::static_marker_area(Some(1e12), 0.00002), 400.0);
        let mid = StatsCalculator::static_marker_area(Some(-5e6), 0.00002);
        assert!((mid - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_marker_radius_px() {
        // 400 pt² is a 20 pt diameter; at 72 DPI that is a 10 px radius
        assert_eq!(StatsCalculator::marker_radius_px(400.0, 72), 10);
        assert_eq!(StatsCalculator::marker_radius_px(400.0, 144), 20);
        assert_eq!(StatsCalculator::marker_radius_px(0.0, 150), 1);
    }

    #[test]
    fn test_distance_from_origin() {
        let r = record("A", Some(3.0), Some(4.0));
        assert_eq!(StatsCalculator::distance_from_origin(&r), 5.0);

        let r = record("B", None, Some(-2.0));
        assert_eq!(StatsCalculator::distance_from_origin(&r), 2.0);
    }

    #[test]
    fn test_top_outliers_ranked_by_distance() {
        let rows = vec![
            record("Near", Some(1.0), Some(1.0)),
            record("Far", Some(3.0), Some(4.0)),
        ];
        let top = StatsCalculator::top_outliers(&rows, OUTLIER_LABELS);
        let names: Vec<_> = top.iter().filter_map(|r| r.country.as_deref()).collect();
        assert_eq!(names, vec!["Far", "Near"]);
    }

    #[test]
    fn test_top_outliers_capped_at_limit() {
        let rows: Vec<Record> = (0..12)
            .map(|i| record(&format!("C{i}"), Some(i as f64), Some(0.0)))
            .collect();
        let top = StatsCalculator::top_outliers(&rows, OUTLIER_LABELS);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].country.as_deref(), Some("C11"));
        assert_eq!(top[4].country.as_deref(), Some("C7"));
    }

    #[test]
    fn test_top_outliers_skip_null_coordinates() {
        // The null row still occupies a ranking slot
        let rows = vec![
            record("Null", None, Some(50.0)),
            record("A", Some(1.0), Some(0.0)),
            record("B", Some(2.0), Some(0.0)),
        ];
        let top = StatsCalculator::top_outliers(&rows, 2);
        let names: Vec<_> = top.iter().filter_map(|r| r.country.as_deref()).collect();
        assert_eq!(names, vec!["B"]);
    }

    #[test]
    fn test_interactive_sizes_linear() {
        let sizes = StatsCalculator::interactive_marker_sizes(&[Some(0.0), Some(50.0), Some(100.0)]);
        assert_eq!(sizes, vec![15.0, 57.5, 100.0]);
    }

    #[test]
    fn test_interactive_sizes_all_equal() {
        let sizes =
            StatsCalculator::interactive_marker_sizes(&[Some(100.0), Some(100.0), Some(100.0)]);
        assert_eq!(sizes, vec![35.0; 3]);
    }

    #[test]
    fn test_interactive_sizes_without_values() {
        assert_eq!(
            StatsCalculator::interactive_marker_sizes(&[None, None]),
            vec![25.0, 25.0]
        );
        assert!(StatsCalculator::interactive_marker_sizes(&[]).is_empty());
    }

    #[test]
    fn test_interactive_sizes_null_takes_minimum() {
        let sizes = StatsCalculator::interactive_marker_sizes(&[Some(10.0), None, Some(20.0)]);
        assert_eq!(sizes, vec![15.0, 15.0, 100.0]);
    }
}
