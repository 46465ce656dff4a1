//! Bar charts of batch statistics as SVG.
//!
//! Bars only: labels live in the JSON statistics next to the chart, so the
//! drawing needs no font backend.

use crate::error::{ReportError, Result};
use crate::grading::score_color;
use crate::statistics::Statistics;
use plotters::prelude::*;

#[derive(Clone, Debug)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Space around the plot area, in pixels.
    pub margin: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            width: 640,
            height: 360,
            margin: 20,
        }
    }
}

fn parse_hex(color: &str) -> RGBColor {
    let channel = |range: std::ops::Range<usize>| {
        color
            .get(range)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .unwrap_or(0)
    };
    RGBColor(channel(1..3), channel(3..5), channel(5..7))
}

/// Draw `bars` (value, colour) scaled against `max_value`.
fn draw_bars(bars: &[(f64, RGBColor)], max_value: f64, options: &ChartOptions) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ReportError::Chart(e.to_string()))?;

        let margin = options.margin as i32;
        let plot_width = options.width as i32 - 2 * margin;
        let plot_height = options.height as i32 - 2 * margin;
        let baseline = margin + plot_height;

        if !bars.is_empty() && plot_width > 0 && plot_height > 0 {
            let slot = plot_width / bars.len() as i32;
            let gap = slot / 5;
            let scale = if max_value > 0.0 { max_value } else { 1.0 };

            for (i, (value, color)) in bars.iter().enumerate() {
                let bar_height = ((value / scale).clamp(0.0, 1.0) * plot_height as f64) as i32;
                let left = margin + i as i32 * slot + gap;
                let right = margin + (i as i32 + 1) * slot - gap;
                root.draw(&Rectangle::new(
                    [(left, baseline - bar_height), (right, baseline)],
                    color.filled(),
                ))
                .map_err(|e| ReportError::Chart(e.to_string()))?;
            }
        }

        root.draw(&PathElement::new(
            vec![(margin, baseline), (margin + plot_width, baseline)],
            BLACK.stroke_width(1),
        ))
        .map_err(|e| ReportError::Chart(e.to_string()))?;

        root.present()
            .map_err(|e| ReportError::Chart(e.to_string()))?;
    }
    Ok(svg)
}

/// One bar per subject, height proportional to the subject average out of 100,
/// coloured by the score ladder.
pub fn subject_average_svg(stats: &Statistics, options: &ChartOptions) -> Result<String> {
    let bars: Vec<(f64, RGBColor)> = stats
        .subject_stats
        .iter()
        .map(|s| (s.average, parse_hex(score_color(s.average))))
        .collect();
    draw_bars(&bars, 100.0, options)
}

/// One bar per grade band (excellent → fail), height proportional to the count.
pub fn grade_distribution_svg(stats: &Statistics, options: &ChartOptions) -> Result<String> {
    const BAND_SCORES: [f64; 5] = [90.0, 80.0, 70.0, 60.0, 0.0];

    let bands = stats.grade_distribution.bands();
    let max = bands.iter().map(|(_, count)| *count).max().unwrap_or(0) as f64;
    let bars: Vec<(f64, RGBColor)> = bands
        .iter()
        .zip(BAND_SCORES)
        .map(|((_, count), score)| (*count as f64, parse_hex(score_color(score))))
        .collect();
    draw_bars(&bars, max, options)
}
