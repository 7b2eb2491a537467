//! Comparison plots of normalized path-loss curves.
//!
//! One PNG per [`Category`] overlays every expected output file of that
//! category found on disk. The legend sits in a column to the right of the
//! plotting area.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use thiserror::Error;

use crate::config::PlotConfig;
use crate::core::loaders::{load_curve, LoaderError};
use crate::processors::grouping::Category;

/// Errors that can occur during visualization.
#[derive(Error, Debug)]
pub enum VisualizationError {
    #[error("failed to load curve: {0}")]
    Load(#[from] LoaderError),

    #[error("Plotting error: {0}")]
    PlottingError(String),
}

/// Result type for visualization operations.
pub type Result<T> = std::result::Result<T, VisualizationError>;

const X_LABEL: &str = "Frequency (Hz)";
const Y_LABEL: &str = "Pathloss (dB)";

/// Legend layout inside the legend column, in pixels.
const LEGEND_LEFT: i32 = 16;
const LEGEND_TOP: i32 = 40;
const LEGEND_ROW_HEIGHT: i32 = 22;
const LEGEND_SWATCH: i32 = 30;

/// Curve colors, cycled by curve index.
const SERIES_COLORS: &[(u8, u8, u8)] = &[
    (31, 119, 180),  // Blue
    (255, 127, 14),  // Orange
    (44, 160, 44),   // Green
    (214, 39, 40),   // Red
    (148, 103, 189), // Purple
    (140, 86, 75),   // Brown
    (227, 119, 194), // Pink
    (127, 127, 127), // Gray
    (188, 189, 34),  // Olive
    (23, 190, 207),  // Cyan
];

/// A labeled curve to overlay on a comparison plot.
#[derive(Debug, Clone)]
pub struct Curve {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

fn plotting<E: std::fmt::Display>(e: E) -> VisualizationError {
    VisualizationError::PlottingError(e.to_string())
}

fn series_color(index: usize) -> RGBColor {
    let (r, g, b) = SERIES_COLORS[index % SERIES_COLORS.len()];
    RGBColor(r, g, b)
}

/// Load the curves of `category` that exist in `dir`, in channel order.
pub fn load_category_curves(dir: &Path, category: Category) -> Result<Vec<Curve>> {
    let mut curves = Vec::new();

    for name in category.expected_outputs() {
        let path = dir.join(&name);
        if !path.is_file() {
            continue;
        }
        curves.push(Curve {
            points: load_curve(&path)?,
            label: name,
        });
    }

    Ok(curves)
}

/// Render the comparison plot for one category into `dir`.
///
/// # Returns
///
/// The path of the written PNG, `{category}_comparison.png`.
pub fn plot_category(dir: &Path, category: Category, config: &PlotConfig) -> Result<PathBuf> {
    let curves = load_category_curves(dir, category)?;
    let output_path = dir.join(category.plot_file_name());
    let title = format!("{} Comparison", category);

    plot_curves(&output_path, &title, &curves, config)?;

    Ok(output_path)
}

/// Render one comparison plot per category, in [`Category::ALL`] order.
///
/// Each plot is driven by the category's fixed expected file set; a category
/// with no files on disk yields an empty plot.
pub fn plot_comparisons(dir: &Path, config: &PlotConfig) -> Result<Vec<PathBuf>> {
    Category::ALL
        .iter()
        .map(|&category| plot_category(dir, category, config))
        .collect()
}

/// Draw curves on a single chart and save it as PNG.
///
/// # Arguments
///
/// * `output_path` - Path to save the PNG image
/// * `title` - Chart caption
/// * `curves` - Curves to overlay; may be empty
/// * `config` - Image geometry and text options
pub fn plot_curves(
    output_path: &Path,
    title: &str,
    curves: &[Curve],
    config: &PlotConfig,
) -> Result<()> {
    let (x_range, y_range) = compute_bounds(curves);

    let root = BitMapBackend::new(output_path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plotting)?;

    let legend_width = config.legend_width.min(config.width / 2);
    let (chart_area, legend_area) = root.split_horizontally((config.width - legend_width) as i32);

    let mut builder = ChartBuilder::on(&chart_area);
    builder.margin(10);
    if config.draw_text {
        builder
            .caption(title, ("sans-serif", 24))
            .x_label_area_size(40)
            .y_label_area_size(60);
    }

    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(plotting)?;

    let mut mesh = chart.configure_mesh();
    if config.draw_text {
        mesh.x_desc(X_LABEL).y_desc(Y_LABEL);
    }
    mesh.draw().map_err(plotting)?;

    for (idx, curve) in curves.iter().enumerate() {
        chart
            .draw_series(LineSeries::new(
                curve.points.iter().copied(),
                series_color(idx).stroke_width(config.line_width),
            ))
            .map_err(plotting)?;
    }

    if config.draw_text && !curves.is_empty() {
        let rows = curves.len() as i32;
        let right = legend_width as i32 - LEGEND_LEFT / 2;
        legend_area
            .draw(&Rectangle::new(
                [
                    (LEGEND_LEFT / 2, LEGEND_TOP - LEGEND_ROW_HEIGHT / 2 - 4),
                    (right, LEGEND_TOP + (rows - 1) * LEGEND_ROW_HEIGHT + LEGEND_ROW_HEIGHT / 2 + 4),
                ],
                BLACK.mix(0.3).stroke_width(1),
            ))
            .map_err(plotting)?;

        for (idx, curve) in curves.iter().enumerate() {
            let y = LEGEND_TOP + idx as i32 * LEGEND_ROW_HEIGHT;
            legend_area
                .draw(&PathElement::new(
                    vec![(LEGEND_LEFT, y), (LEGEND_LEFT + LEGEND_SWATCH, y)],
                    series_color(idx).stroke_width(config.line_width),
                ))
                .map_err(plotting)?;
            legend_area
                .draw(&Text::new(
                    curve.label.clone(),
                    (LEGEND_LEFT + LEGEND_SWATCH + 8, y - 7),
                    ("sans-serif", 14).into_font(),
                ))
                .map_err(plotting)?;
        }
    }

    root.present().map_err(plotting)?;

    Ok(())
}

/// Axis ranges covering every finite point, padded by 5%.
///
/// Falls back to `0..1` on an axis with no data and widens degenerate ranges
/// by one unit on each side.
fn compute_bounds(curves: &[Curve]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let mut x_min = f64::MAX;
    let mut x_max = f64::MIN;
    let mut y_min = f64::MAX;
    let mut y_max = f64::MIN;

    for &(x, y) in curves.iter().flat_map(|c| c.points.iter()) {
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if x_min > x_max {
        return (0.0..1.0, 0.0..1.0);
    }

    if (x_max - x_min).abs() < f64::EPSILON {
        x_min -= 1.0;
        x_max += 1.0;
    }
    if (y_max - y_min).abs() < f64::EPSILON {
        y_min -= 1.0;
        y_max += 1.0;
    }

    let x_padding = (x_max - x_min) * 0.05;
    let y_padding = (y_max - y_min) * 0.05;

    (
        (x_min - x_padding)..(x_max + x_padding),
        (y_min - y_padding)..(y_max + y_padding),
    )
}
