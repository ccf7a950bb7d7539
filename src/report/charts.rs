//! PNG charts for the performance report
//!
//! Charts are drawn from shapes only (points, bars, axis lines) so that no font
//! backend is needed.

use super::{PerformanceSample, ReportError};
use plotters::prelude::*;
use std::fmt::Display;
use std::ops::Range;
use std::path::Path;

type Render = fn(&Path, &[PerformanceSample]) -> Result<(), ReportError>;

/// Chart file names and their renderers
pub(super) const CHARTS: [(&str, Render); 3] = [
    ("time_vs_size.png", time_vs_size),
    ("memory_usage.png", memory_usage),
    ("quality_metrics.png", quality_metrics),
];

const SIZE: (u32, u32) = (1000, 600);
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

fn chart_error(err: impl Display) -> ReportError {
    ReportError::Chart(err.to_string())
}

/// Axis range covering `lo..hi` and zero, padded by 10%
fn axis(lo: f64, hi: f64) -> Range<f64> {
    let lo = lo.min(0.0);
    let hi = hi.max(0.0);
    let pad = ((hi - lo) * 0.1).max(1e-3);
    let start = if lo < 0.0 { lo - pad } else { lo };
    start..hi + pad
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((0.0, 0.0), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Scatter of processing time (seconds) against file size (MB)
fn time_vs_size(path: &Path, samples: &[PerformanceSample]) -> Result<(), ReportError> {
    let points: Vec<(f64, f64)> = samples
        .iter()
        .map(|s| (s.file_size as f64 / BYTES_PER_MB, s.processing_time))
        .collect();
    let (_, x_max) = bounds(points.iter().map(|p| p.0));
    let (_, y_max) = bounds(points.iter().map(|p| p.1));
    let (x, y) = (axis(0.0, x_max), axis(0.0, y_max));

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .build_cartesian_2d(x.clone(), y.clone())
        .map_err(chart_error)?;

    chart
        .draw_series([
            PathElement::new(vec![(x.start, 0.0), (x.end, 0.0)], BLACK),
            PathElement::new(vec![(0.0, y.start), (0.0, y.end)], BLACK),
        ])
        .map_err(chart_error)?;
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, 6, BLUE.filled())))
        .map_err(chart_error)?;

    root.present().map_err(chart_error)
}

/// One bar per file with its memory delta in MB
fn memory_usage(path: &Path, samples: &[PerformanceSample]) -> Result<(), ReportError> {
    let values: Vec<f64> = samples
        .iter()
        .map(|s| s.memory_used as f64 / BYTES_PER_MB)
        .collect();
    bar_chart(path, &[(values, BLUE)])
}

/// Grouped bars per file: sentence length, keyword diversity, summary/keyword ratio
fn quality_metrics(path: &Path, samples: &[PerformanceSample]) -> Result<(), ReportError> {
    let series: [(Vec<f64>, RGBColor); 3] = [
        (
            samples
                .iter()
                .map(|s| s.quality_metrics.avg_sentence_length)
                .collect(),
            BLUE,
        ),
        (
            samples
                .iter()
                .map(|s| s.quality_metrics.keyword_diversity)
                .collect(),
            RED,
        ),
        (
            samples
                .iter()
                .map(|s| s.quality_metrics.summary_to_keyword_ratio)
                .collect(),
            GREEN,
        ),
    ];
    bar_chart(path, &series)
}

/// Bars for each file, one colored bar per series side by side
fn bar_chart(path: &Path, series: &[(Vec<f64>, RGBColor)]) -> Result<(), ReportError> {
    let files = series.first().map_or(0, |(values, _)| values.len());
    let (lo, hi) = bounds(series.iter().flat_map(|(values, _)| values.iter().copied()));
    let x = 0.0..files as f64;
    let y = axis(lo, hi);

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .build_cartesian_2d(x.clone(), y.clone())
        .map_err(chart_error)?;

    let width = 0.8 / series.len().max(1) as f64;
    for (index, (values, color)) in series.iter().enumerate() {
        chart
            .draw_series(values.iter().enumerate().map(|(file, &value)| {
                let left = file as f64 + 0.1 + index as f64 * width;
                Rectangle::new([(left, 0.0), (left + width, value)], color.filled())
            }))
            .map_err(chart_error)?;
    }

    chart
        .draw_series([
            PathElement::new(vec![(x.start, 0.0), (x.end, 0.0)], BLACK),
            PathElement::new(vec![(x.start, y.start), (x.start, y.end)], BLACK),
        ])
        .map_err(chart_error)?;

    root.present().map_err(chart_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_includes_zero_and_padding() {
        let range = axis(2.0, 10.0);
        assert_eq!(range.start, 0.0);
        assert!(range.end > 10.0);

        let range = axis(-4.0, 6.0);
        assert!(range.start < -4.0);
        assert!(range.end > 6.0);

        let range = axis(0.0, 0.0);
        assert!(range.end > range.start);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(bounds([3.0, -1.0, 2.0].into_iter()), (-1.0, 3.0));
        assert_eq!(bounds(std::iter::empty()), (0.0, 0.0));
    }
}
