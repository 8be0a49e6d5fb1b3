//! Segment charts rendered with Plotters
//!
//! Each chart is split into a pure data step (`proportion_slices`,
//! `snake_plot_data`) and a drawing step that writes a PNG.

use crate::data::ClusterSummaryRecord;
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Color palette for segments, in summary order
const SEGMENT_COLORS: [RGBColor; 5] = [RED, BLUE, GREEN, YELLOW, MAGENTA];

const REFERENCE_COLOR: RGBColor = RGBColor(128, 128, 128);

pub const PROPORTION_TITLE: &str = "Percentage of Customer Base by Segment";
pub const SNAKE_TITLE: &str = "Normalized RFM Values (1.0 = Average Customer)";
pub const REFERENCE_LABEL: &str = "Average Customer (1.0)";

/// Inner radius of the ring as a fraction of the outer radius
pub const DONUT_HOLE_RATIO: f64 = 0.4;

/// Axis names of the snake plot, in plotting order
pub const METRIC_NAMES: [&str; 3] = ["Recency_Mean", "Frequency_Mean", "Monetary_Mean"];

pub const PROPORTION_FILE: &str = "segment_proportions.png";
pub const SNAKE_FILE: &str = "snake_plot.png";

fn segment_color(index: usize) -> RGBColor {
    SEGMENT_COLORS.get(index).copied().unwrap_or(BLACK)
}

/// One ring slice
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionSlice {
    pub segment: String,
    pub percentage: f64,
}

impl ProportionSlice {
    /// Share of the ring in percent, relative to the sum of all slices
    pub fn share(&self, total: f64) -> f64 {
        if total > 0.0 {
            self.percentage / total * 100.0
        } else {
            0.0
        }
    }
}

/// One slice per summary row, sized by Percentage
pub fn proportion_slices(summary: &[ClusterSummaryRecord]) -> Vec<ProportionSlice> {
    summary
        .iter()
        .map(|s| ProportionSlice {
            segment: s.strategic_name.clone(),
            percentage: s.percentage,
        })
        .collect()
}

/// Normalized metric line for one segment
#[derive(Debug, Clone, PartialEq)]
pub struct SnakeSeries {
    pub segment: String,
    /// Recency, Frequency, Monetary divided by their cross-cluster mean
    pub values: [f64; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnakePlot {
    /// Cross-cluster mean of each metric column
    pub global_means: [f64; 3],
    pub series: Vec<SnakeSeries>,
}

impl SnakePlot {
    /// Largest normalized value, or 1.0 for an empty plot
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(1.0, f64::max)
    }
}

/// Divide each cluster's mean metrics by the cross-cluster average
///
/// A metric whose cross-cluster mean is zero normalizes to 0.0.
pub fn snake_plot_data(summary: &[ClusterSummaryRecord]) -> SnakePlot {
    let metrics = |s: &ClusterSummaryRecord| [s.recency_mean, s.frequency_mean, s.monetary_mean];

    let mut global_means = [0.0; 3];
    if !summary.is_empty() {
        for record in summary {
            for (sum, value) in global_means.iter_mut().zip(metrics(record)) {
                *sum += value;
            }
        }
        for mean in global_means.iter_mut() {
            *mean /= summary.len() as f64;
        }
    }

    let series = summary
        .iter()
        .map(|record| {
            let raw = metrics(record);
            let mut values = [0.0; 3];
            for i in 0..3 {
                values[i] = if global_means[i] != 0.0 {
                    raw[i] / global_means[i]
                } else {
                    0.0
                };
            }
            SnakeSeries {
                segment: record.strategic_name.clone(),
                values,
            }
        })
        .collect();

    SnakePlot {
        global_means,
        series,
    }
}

/// Axis tick text for the metric at position `x`
fn metric_axis_label(x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    METRIC_NAMES
        .get(index as usize)
        .map(|name| name.to_string())
        .unwrap_or_default()
}

/// Draw the ring chart of segment sizes
pub fn draw_proportion_chart(slices: &[ProportionSlice], output_path: &Path) -> crate::Result<()> {
    if slices.is_empty() {
        anyhow::bail!("Cannot draw a proportion chart without segments");
    }

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(PROPORTION_TITLE, ("sans-serif", 28))?;

    let (width, height) = root.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;

    let sizes: Vec<f64> = slices.iter().map(|s| s.percentage).collect();
    let colors: Vec<RGBColor> = (0..slices.len()).map(segment_color).collect();
    let labels: Vec<String> = slices.iter().map(|s| s.segment.clone()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 16).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 14).into_font().color(&WHITE));
    pie.donut_hole(radius * DONUT_HOLE_RATIO);
    root.draw(&pie)?;

    root.present()?;
    log::info!("Proportion chart saved to: {}", output_path.display());

    Ok(())
}

/// Draw the snake plot with one line per segment and the 1.0 reference line
pub fn draw_snake_plot(snake: &SnakePlot, output_path: &Path) -> crate::Result<()> {
    if snake.series.is_empty() {
        anyhow::bail!("Cannot draw a snake plot without segments");
    }

    let y_max = snake.max_value() * 1.15;
    let x_range = -0.25f64..2.25f64;

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(SNAKE_TITLE, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(3)
        .x_label_formatter(&|x| metric_axis_label(*x))
        .x_desc("RFM Metric")
        .y_desc("Normalized Value")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            vec![(x_range.start, 1.0), (x_range.end, 1.0)],
            REFERENCE_COLOR.stroke_width(1),
        ))?
        .label(REFERENCE_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], REFERENCE_COLOR.stroke_width(1)));

    for (i, series) in snake.series.iter().enumerate() {
        let color = segment_color(i);
        let points: Vec<(f64, f64)> = series
            .values
            .iter()
            .enumerate()
            .map(|(x, &y)| (x as f64, y))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(series.segment.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        chart.draw_series(points.into_iter().map(|p| Circle::new(p, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    log::info!("Snake plot saved to: {}", output_path.display());

    Ok(())
}

/// Paths of the two chart images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFiles {
    pub proportions: PathBuf,
    pub snake: PathBuf,
}

impl ChartFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            proportions: dir.join(PROPORTION_FILE),
            snake: dir.join(SNAKE_FILE),
        }
    }
}

/// Draw both charts for `summary` into `output_dir`
pub fn render_charts(summary: &[ClusterSummaryRecord], output_dir: &Path) -> crate::Result<ChartFiles> {
    std::fs::create_dir_all(output_dir)?;
    let files = ChartFiles::in_dir(output_dir);

    draw_proportion_chart(&proportion_slices(summary), &files.proportions)?;
    draw_snake_plot(&snake_plot_data(summary), &files.snake)?;

    Ok(files)
}
