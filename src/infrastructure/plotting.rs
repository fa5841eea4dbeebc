use std::path::Path;

use once_cell::sync::Lazy;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

use crate::domain::error::{AppError, Result};
use crate::domain::sentiment::{SentimentCounts, SentimentLabel};
use crate::infrastructure::config::PlotConfig;

const TITLE: &str = "Sentiment Distribution";
const X_DESC: &str = "Sentiment";
const Y_DESC: &str = "Count";

const FONT_FAMILY: &str = "sans-serif";
const FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

// Endpoints and midpoint of the cool-to-warm diverging palette.
const COOL: RGBColor = RGBColor(59, 76, 192);
const MID: RGBColor = RGBColor(170, 170, 170);
const WARM: RGBColor = RGBColor(180, 4, 38);
const GRID: RGBColor = RGBColor(230, 230, 230);

// Registered once per process; every chart shares the embedded face.
static FONT: Lazy<std::result::Result<(), String>> = Lazy::new(|| {
    register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES)
        .map_err(|_| "Failed to load chart font: InvalidFont".to_string())
});

fn plot_err(err: impl std::fmt::Display) -> AppError {
    AppError::PlotError(err.to_string())
}

fn ensure_font() -> Result<()> {
    (*FONT).clone().map_err(AppError::PlotError)
}

pub fn label_color(label: SentimentLabel) -> RGBColor {
    match label {
        SentimentLabel::Negative => COOL,
        SentimentLabel::Neutral => MID,
        SentimentLabel::Positive => WARM,
    }
}

/// Renders label counts as a titled bar chart, one labelled bar per entry
/// in the order of `counts`.
#[derive(Debug, Clone)]
pub struct SentimentChart {
    width: u32,
    height: u32,
}

impl SentimentChart {
    pub fn new(config: &PlotConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
        }
    }

    /// Draw the chart to `path`. The image format follows the extension.
    pub fn render(&self, counts: &SentimentCounts, path: &Path) -> Result<()> {
        ensure_font()?;

        let names: Vec<&str> = counts.entries().iter().map(|(l, _)| l.as_str()).collect();
        let slots = counts.entries().len().max(1) as i32;
        let top = counts.max_count() as u32 + 1;

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(TITLE, (FONT_FAMILY, 26))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d((0..slots).into_segmented(), 0u32..top)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(GRID.stroke_width(1))
            .x_labels(slots as usize)
            .x_label_formatter(&|value| match value {
                SegmentValue::CenterOf(slot) => names
                    .get(*slot as usize)
                    .map(|name| name.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc(X_DESC)
            .y_desc(Y_DESC)
            .label_style((FONT_FAMILY, 14))
            .axis_desc_style((FONT_FAMILY, 16))
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(counts.entries().iter().enumerate().map(|(slot, (label, count))| {
                let slot = slot as i32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(slot), 0u32),
                        (SegmentValue::Exact(slot + 1), *count as u32),
                    ],
                    label_color(*label).filled(),
                );
                bar.set_margin(0, 0, 12, 12);
                bar
            }))
            .map_err(plot_err)?;

        root.present().map_err(plot_err)?;
        Ok(())
    }
}
