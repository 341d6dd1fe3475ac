//! Static Chart Renderer
//! Generates the small-multiples PNG: one GDP vs enrollment scatter per year.
//!
//! Layout:
//! 1. Grid of up to 3 columns, one 5x4 inch cell per year, row-major
//! 2. Each cell: scatter colored by both_increase, dashed zero lines,
//!    top-5 outliers labelled with their country
//! 3. Legend on the first panel only; unused cells stay blank

use crate::charts::ChartError;
use crate::config::PipelineConfig;
use crate::data::{GdpTable, Record};
use crate::stats::{StatsCalculator, OUTLIER_LABELS};
use plotters::coord::Shift;
use plotters::prelude::*;
use rayon::prelude::*;
use std::path::Path;

// Colors
const ACCENT: RGBColor = RGBColor(31, 119, 180); // both increased
const NEUTRAL: RGBColor = RGBColor(204, 204, 204);
const GRID: RGBColor = RGBColor(234, 234, 242);

const FONT: &str = "sans-serif";
const X_LABEL: &str = "GDP % change (YoY)";
const Y_LABEL: &str = "Enrollment % change (YoY)";

const MAX_COLS: usize = 3;
const CELL_WIDTH_IN: u32 = 5;
const CELL_HEIGHT_IN: u32 = 4;
const MARKER_ALPHA: f64 = 0.75;

/// Rows and columns of the panel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
}

impl GridLayout {
    /// Up to 3 columns, as many rows as needed. `None` for zero panels.
    pub fn for_panels(n: usize) -> Option<Self> {
        if n == 0 {
            return None;
        }
        let cols = n.min(MAX_COLS);
        let rows = n.div_ceil(cols);
        Some(Self { rows, cols })
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }
}

/// One plotted marker in pixel-independent data space.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub radius: u32,
    pub both_increase: bool,
}

/// Country label placed at its point.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Everything needed to draw one year's panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelPlan {
    NoData {
        year: i64,
    },
    Scatter {
        year: i64,
        points: Vec<ScatterPoint>,
        labels: Vec<OutlierLabel>,
        x_range: (f64, f64),
        y_range: (f64, f64),
    },
}

impl PanelPlan {
    /// Build the panel for `year` from that year's rows.
    pub fn build(year: i64, rows: &[Record], size_scale: f64, dpi: u32) -> Self {
        if rows.is_empty() {
            return PanelPlan::NoData { year };
        }

        let points: Vec<ScatterPoint> = rows
            .iter()
            .filter_map(|r| {
                let (x, y) = r.point()?;
                let area = StatsCalculator::static_marker_area(r.gdp_numeric, size_scale);
                Some(ScatterPoint {
                    x,
                    y,
                    radius: StatsCalculator::marker_radius_px(area, dpi),
                    both_increase: r.both_increase,
                })
            })
            .collect();

        let labels = StatsCalculator::top_outliers(rows, OUTLIER_LABELS)
            .into_iter()
            .filter_map(|r| {
                let (x, y) = r.point()?;
                Some(OutlierLabel {
                    text: r.country.clone().unwrap_or_default(),
                    x,
                    y,
                })
            })
            .collect();

        let x_range = axis_range(points.iter().map(|p| p.x));
        let y_range = axis_range(points.iter().map(|p| p.y));

        PanelPlan::Scatter {
            year,
            points,
            labels,
            x_range,
            y_range,
        }
    }

    pub fn year(&self) -> i64 {
        match self {
            PanelPlan::NoData { year } | PanelPlan::Scatter { year, .. } => *year,
        }
    }

    pub fn title(&self) -> String {
        match self {
            PanelPlan::NoData { year } => format!("{} (no data)", year),
            PanelPlan::Scatter { year, .. } => year.to_string(),
        }
    }
}

/// Data range padded by 5%, always containing the origin.
fn axis_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = max - min;
    if span <= 0.0 {
        return (-1.0, 1.0);
    }
    let pad = span * 0.05;
    (min - pad, max + pad)
}

/// Font sizes converted from points to pixels at the output DPI.
struct FontSizes {
    title: f64,
    axis: f64,
    tick: f64,
    legend: f64,
    annotation: f64,
}

impl FontSizes {
    fn at_dpi(dpi: u32) -> Self {
        let px = |pt: f64| pt * dpi as f64 / 72.0;
        Self {
            title: px(12.0),
            axis: px(10.0),
            tick: px(8.0),
            legend: px(8.0),
            annotation: px(7.0),
        }
    }
}

/// Renders the small-multiples scatter to a PNG file.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Prepare one panel per year. Years are independent so they are built in parallel.
    pub fn plan_panels(
        table: &GdpTable,
        years: &[i64],
        size_scale: f64,
        dpi: u32,
    ) -> Result<Vec<PanelPlan>, ChartError> {
        years
            .par_iter()
            .map(|&year| -> Result<PanelPlan, ChartError> {
                let rows = table.records_for_year(year)?;
                Ok(PanelPlan::build(year, &rows, size_scale, dpi))
            })
            .collect()
    }

    /// Render the selected years into `config.png_path`.
    pub fn render_png(
        table: &GdpTable,
        years: &[i64],
        config: &PipelineConfig,
    ) -> Result<(), ChartError> {
        let panels = Self::plan_panels(table, years, config.size_scale, config.dpi)?;
        log::debug!("Planned {} static panels", panels.len());
        Self::draw_panels(&config.png_path, &panels, config.dpi)
    }

    /// Draw prepared panels into a grid image at `path`.
    pub fn draw_panels(path: &Path, panels: &[PanelPlan], dpi: u32) -> Result<(), ChartError> {
        let fonts = FontSizes::at_dpi(dpi);
        let cell = (CELL_WIDTH_IN * dpi, CELL_HEIGHT_IN * dpi);

        let Some(layout) = GridLayout::for_panels(panels.len()) else {
            let root = BitMapBackend::new(path, cell).into_drawing_area();
            root.fill(&WHITE)?;
            root.titled("No years selected", (FONT, fonts.title).into_font())?;
            root.present()?;
            return Ok(());
        };

        log::debug!(
            "Static grid {}x{} ({} cells for {} panels)",
            layout.rows,
            layout.cols,
            layout.cells(),
            panels.len()
        );
        let size = (cell.0 * layout.cols as u32, cell.1 * layout.rows as u32);
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        // Cells past the last panel are left blank
        let cells = root.split_evenly((layout.rows, layout.cols));
        for (i, (area, panel)) in cells.iter().zip(panels).enumerate() {
            match panel {
                PanelPlan::NoData { .. } => {
                    log::info!("No rows for {}, leaving panel empty", panel.year());
                    area.titled(&panel.title(), (FONT, fonts.title).into_font())?;
                }
                PanelPlan::Scatter { .. } => {
                    Self::draw_scatter_panel(area, panel, &fonts, i == 0)?;
                }
            }
        }

        root.present()?;
        Ok(())
    }

    fn draw_scatter_panel(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        panel: &PanelPlan,
        fonts: &FontSizes,
        show_legend: bool,
    ) -> Result<(), ChartError> {
        let PanelPlan::Scatter {
            points,
            labels,
            x_range,
            y_range,
            ..
        } = panel
        else {
            return Ok(());
        };

        let label_area = (fonts.axis + fonts.tick * 2.0) as u32;
        let mut chart = ChartBuilder::on(area)
            .caption(panel.title(), (FONT, fonts.title))
            .margin((fonts.tick) as u32)
            .x_label_area_size(label_area)
            .y_label_area_size(label_area + fonts.tick as u32)
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

        chart
            .configure_mesh()
            .x_desc(X_LABEL)
            .y_desc(Y_LABEL)
            .axis_desc_style((FONT, fonts.axis))
            .label_style((FONT, fonts.tick))
            .bold_line_style(GRID)
            .light_line_style(WHITE)
            .draw()?;

        // Zero reference lines
        let dash = (fonts.tick / 2.0) as u32;
        let reference = BLACK.stroke_width(1);
        chart.draw_series(DashedLineSeries::new(
            vec![(0.0, y_range.0), (0.0, y_range.1)],
            dash,
            dash,
            reference,
        ))?;
        chart.draw_series(DashedLineSeries::new(
            vec![(x_range.0, 0.0), (x_range.1, 0.0)],
            dash,
            dash,
            reference,
        ))?;

        let outline = BLACK.mix(0.8).stroke_width(1);
        for (flag, color, name) in [(false, NEUTRAL, "False"), (true, ACCENT, "True")] {
            let fill = color.mix(MARKER_ALPHA).filled();
            chart
                .draw_series(points.iter().filter(|p| p.both_increase == flag).map(|p| {
                    EmptyElement::at((p.x, p.y))
                        + Circle::new((0, 0), p.radius, fill)
                        + Circle::new((0, 0), p.radius, outline)
                }))?
                .label(name)
                .legend(move |(x, y)| Circle::new((x, y), 5, fill));
        }

        chart.draw_series(labels.iter().map(|l| {
            Text::new(
                l.text.clone(),
                (l.x, l.y),
                (FONT, fonts.annotation).into_font(),
            )
        }))?;

        if show_legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .label_font((FONT, fonts.legend))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        Ok(())
    }
}
