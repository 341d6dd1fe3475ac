//! Chart Plotter Module
//! Creates the interactive faceted scatter as a plotly.js HTML document.
//!
//! The figure is serialized with serde and embedded in a page that loads
//! plotly.js from the CDN, so the output is a single self-contained file.

use crate::charts::ChartError;
use crate::data::{GdpTable, Record};
use crate::stats::StatsCalculator;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
pub const FIGURE_TITLE: &str = "GDP % change vs Enrollment % change (faceted by year)";
pub const LEGEND_TITLE: &str = "Both increased?";

const X_LABEL: &str = "GDP % change (YoY)";
const Y_LABEL: &str = "Enrollment % change (YoY)";
const DIV_ID: &str = "gdp-vs-enrollment-scatter";

const FIGURE_WIDTH: u32 = 1200;
const FIGURE_HEIGHT: u32 = 600;
const FACET_WRAP: usize = 3;
const FACET_COL_SPACING: f64 = 0.03;
const FACET_ROW_SPACING: f64 = 0.07;
/// Largest rendered marker diameter in px, used to derive `sizeref`.
const SIZE_MAX: f64 = 20.0;

/// Plotly's default qualitative palette
pub const PALETTE: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// country, year, gdp_numeric, enrollment_numeric, both_increase
type HoverData = (Option<String>, Option<i64>, Option<f64>, Option<f64>, bool);

#[derive(Debug, Serialize)]
pub struct Figure {
    pub data: Vec<ScatterTrace>,
    pub layout: Layout,
}

#[derive(Debug, Serialize)]
pub struct ScatterTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub legendgroup: String,
    pub showlegend: bool,
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    pub customdata: Vec<HoverData>,
    pub hovertemplate: String,
    pub marker: Marker,
    pub xaxis: String,
    pub yaxis: String,
}

#[derive(Debug, Serialize)]
pub struct Marker {
    pub color: String,
    pub size: Vec<f64>,
    pub sizemode: &'static str,
    pub sizeref: f64,
    pub opacity: f64,
    pub line: MarkerLine,
}

#[derive(Debug, Serialize)]
pub struct MarkerLine {
    pub width: f64,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Text {
    pub text: String,
}

impl Text {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct Legend {
    pub title: Text,
    pub tracegroupgap: u32,
    pub itemsizing: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Axis {
    pub anchor: String,
    pub domain: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Text>,
    pub showticklabels: bool,
}

#[derive(Debug, Serialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub xref: &'static str,
    pub yref: &'static str,
    pub xanchor: &'static str,
    pub yanchor: &'static str,
    pub showarrow: bool,
}

#[derive(Debug, Serialize)]
pub struct Layout {
    pub title: Text,
    pub legend: Legend,
    pub width: u32,
    pub height: u32,
    pub annotations: Vec<Annotation>,
    /// `xaxis`, `yaxis`, `xaxis2`, ... keyed by plotly's layout names.
    #[serde(flatten)]
    pub axes: BTreeMap<String, Axis>,
}

/// Placement of one facet in paper coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacetCell {
    pub row: usize,
    pub col: usize,
    pub x_domain: [f64; 2],
    pub y_domain: [f64; 2],
}

/// Builds and writes the interactive chart.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Render the selected years of `table` to an HTML file.
    pub fn render_html(table: &GdpTable, years: &[i64], path: &Path) -> Result<(), ChartError> {
        let records = table.records_for_years(years)?;
        let figure = Self::build_figure(&records);
        log::debug!(
            "Interactive figure: {} rows, {} traces",
            records.len(),
            figure.data.len()
        );
        fs::write(path, Self::to_html(&figure)?)?;
        Ok(())
    }

    /// Facet cells for `n` facets wrapped at 3 per row, filled from the top-left.
    pub fn facet_cells(n: usize) -> Vec<FacetCell> {
        if n == 0 {
            return Vec::new();
        }
        let cols = n.min(FACET_WRAP);
        let rows = n.div_ceil(cols);
        let width = (1.0 - (cols - 1) as f64 * FACET_COL_SPACING) / cols as f64;
        let height = (1.0 - (rows - 1) as f64 * FACET_ROW_SPACING) / rows as f64;

        (0..n)
            .map(|i| {
                let (row, col) = (i / cols, i % cols);
                let x0 = col as f64 * (width + FACET_COL_SPACING);
                let y1 = 1.0 - row as f64 * (height + FACET_ROW_SPACING);
                FacetCell {
                    row,
                    col,
                    x_domain: [x0, x0 + width],
                    y_domain: [y1 - height, y1],
                }
            })
            .collect()
    }

    /// Build the faceted scatter for rows already restricted to the selected years.
    ///
    /// One facet per distinct year in order of first appearance, one trace per
    /// color group and facet.
    pub fn build_figure(records: &[Record]) -> Figure {
        let mut years: Vec<i64> = Vec::new();
        for year in records.iter().filter_map(|r| r.year) {
            if !years.contains(&year) {
                years.push(year);
            }
        }

        let gdp: Vec<Option<f64>> = records.iter().map(|r| r.gdp_numeric).collect();
        let sizes = StatsCalculator::interactive_marker_sizes(&gdp);
        let max_size = sizes.iter().copied().fold(0.0f64, f64::max);
        let sizeref = if max_size > 0.0 {
            2.0 * max_size / (SIZE_MAX * SIZE_MAX)
        } else {
            1.0
        };

        // Color groups in order of first appearance
        let mut groups: Vec<&'static str> = Vec::new();
        for record in records {
            let label = record.both_increase_label();
            if !groups.contains(&label) {
                groups.push(label);
            }
        }

        let mut data = Vec::new();
        for (group_idx, group) in groups.iter().enumerate() {
            let color = PALETTE[group_idx % PALETTE.len()];
            let mut first = true;
            for (facet_idx, year) in years.iter().enumerate() {
                let rows: Vec<usize> = (0..records.len())
                    .filter(|&i| {
                        records[i].year == Some(*year) && records[i].both_increase_label() == *group
                    })
                    .collect();
                if rows.is_empty() {
                    continue;
                }
                data.push(Self::trace(records, &rows, &sizes, sizeref, group, color, facet_idx, first));
                first = false;
            }
        }

        Figure {
            data,
            layout: Self::layout(&years),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn trace(
        records: &[Record],
        rows: &[usize],
        sizes: &[f64],
        sizeref: f64,
        group: &str,
        color: &str,
        facet_idx: usize,
        showlegend: bool,
    ) -> ScatterTrace {
        let hovertemplate = format!(
            "country=%{{customdata[0]}}<br>year=%{{customdata[1]}}<br>\
             {X_LABEL}=%{{x}}<br>{Y_LABEL}=%{{y}}<br>size=%{{marker.size}}<br>\
             gdp_numeric=%{{customdata[2]}}<br>enrollment_numeric=%{{customdata[3]}}<br>\
             {LEGEND_TITLE}=%{{customdata[4]}}<extra></extra>"
        );

        ScatterTrace {
            kind: "scatter",
            mode: "markers",
            name: group.to_string(),
            legendgroup: group.to_string(),
            showlegend,
            x: rows.iter().map(|&i| records[i].gdp_pct_change).collect(),
            y: rows.iter().map(|&i| records[i].enrollment_pct_change).collect(),
            customdata: rows
                .iter()
                .map(|&i| {
                    let r = &records[i];
                    (
                        r.country.clone(),
                        r.year,
                        r.gdp_numeric,
                        r.enrollment_numeric,
                        r.both_increase,
                    )
                })
                .collect(),
            hovertemplate,
            marker: Marker {
                color: color.to_string(),
                size: rows.iter().map(|&i| sizes[i]).collect(),
                sizemode: "area",
                sizeref,
                opacity: 0.75,
                line: MarkerLine {
                    width: 0.3,
                    color: "black",
                },
            },
            xaxis: axis_id("x", facet_idx),
            yaxis: axis_id("y", facet_idx),
        }
    }

    fn layout(years: &[i64]) -> Layout {
        let cells = Self::facet_cells(years.len());
        let mut axes = BTreeMap::new();
        let mut annotations = Vec::new();

        for (i, (year, cell)) in years.iter().zip(&cells).enumerate() {
            // Bottom facet of its column carries the x title and ticks
            let bottom = !cells.iter().any(|c| c.col == cell.col && c.row > cell.row);
            let left = cell.col == 0;

            axes.insert(
                axis_id("xaxis", i),
                Axis {
                    anchor: axis_id("y", i),
                    domain: cell.x_domain,
                    matches: (i > 0).then(|| "x".to_string()),
                    title: bottom.then(|| Text::new(X_LABEL)),
                    showticklabels: bottom,
                },
            );
            axes.insert(
                axis_id("yaxis", i),
                Axis {
                    anchor: axis_id("x", i),
                    domain: cell.y_domain,
                    matches: (i > 0).then(|| "y".to_string()),
                    title: left.then(|| Text::new(Y_LABEL)),
                    showticklabels: left,
                },
            );
            annotations.push(Annotation {
                text: format!("year={}", year),
                x: (cell.x_domain[0] + cell.x_domain[1]) / 2.0,
                y: cell.y_domain[1],
                xref: "paper",
                yref: "paper",
                xanchor: "center",
                yanchor: "bottom",
                showarrow: false,
            });
        }

        Layout {
            title: Text::new(FIGURE_TITLE),
            legend: Legend {
                title: Text::new(LEGEND_TITLE),
                tracegroupgap: 0,
                itemsizing: "constant",
            },
            width: FIGURE_WIDTH,
            height: FIGURE_HEIGHT,
            annotations,
            axes,
        }
    }

    /// Standalone HTML page; plotly.js is referenced from the CDN, not inlined.
    pub fn to_html(figure: &Figure) -> Result<String, ChartError> {
        let data = script_safe(serde_json::to_string(&figure.data)?);
        let layout = script_safe(serde_json::to_string(&figure.layout)?);

        Ok(format!(
            r#"<html>
<head>
    <meta charset="utf-8" />
    <title>{FIGURE_TITLE}</title>
</head>
<body>
    <div>
        <script type="text/javascript">window.PlotlyConfig = {{MathJaxConfig: 'local'}};</script>
        <script charset="utf-8" src="{PLOTLY_CDN}"></script>
        <div id="{DIV_ID}" class="plotly-graph-div" style="height:{FIGURE_HEIGHT}px; width:{FIGURE_WIDTH}px;"></div>
        <script type="text/javascript">
            window.PLOTLYENV = window.PLOTLYENV || {{}};
            if (document.getElementById("{DIV_ID}")) {{
                Plotly.newPlot("{DIV_ID}", {data}, {layout}, {{"responsive": true}});
            }}
        </script>
    </div>
</body>
</html>
"#
        ))
    }
}

/// Plotly axis reference (`x`, `x2`, ...) or layout key (`xaxis`, `xaxis2`, ...).
fn axis_id(prefix: &str, facet_idx: usize) -> String {
    match facet_idx {
        0 => prefix.to_string(),
        i => format!("{}{}", prefix, i + 1),
    }
}

// Country names end up inside a <script> block
fn script_safe(json: String) -> String {
    json.replace("</", "<\\/")
}
