// src/artifacts/png_writer.rs
//! Bitmap figures for visual inspection
//!
//! Three figures per task, rendered with `plotters` onto a bitmap backend:
//! - `Pearson_<task>.png`: lower triangle of the correlation matrix on a
//!   diverging blue-red scale over [-1, 1]
//! - `W_Synergies_<task>.png`: grouped bars of the per-synergy normalized
//!   weights, one group per channel, VAF in the caption
//! - `Ranking_<task>.png`: horizontal bars of the importance score, best on top

use crate::artifacts::ArtifactSink;
use crate::error::{SynergyError, SynergyResult};
use crate::processing::redundancy::CorrelationMatrix;
use crate::ranking::Ranking;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

const HEATMAP_SIZE: (u32, u32) = (1200, 1000);
const WEIGHTS_SIZE: (u32, u32) = (1200, 600);
const RANKING_SIZE: (u32, u32) = (1000, 600);
const CAPTION_FONT: (&str, f64) = ("sans-serif", 28.0);
const LABEL_AREA: u32 = 160;

/// Coolwarm anchors: strong negative, zero, strong positive
const COOL: RGBColor = RGBColor(59, 76, 192);
const NEUTRAL: RGBColor = RGBColor(221, 221, 221);
const WARM: RGBColor = RGBColor(180, 4, 38);
/// Undefined coefficients (constant channels)
const UNDEFINED: RGBColor = RGBColor(160, 160, 160);

/// Viridis anchors for the ranking bars
const VIRIDIS: [RGBColor; 3] = [RGBColor(68, 1, 84), RGBColor(33, 145, 140), RGBColor(253, 231, 37)];

/// Renders each artifact as a PNG under one directory
#[derive(Debug, Clone)]
pub struct PngArtifactWriter {
    output_dir: PathBuf,
}

impl PngArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn correlation_path(&self, task: &str) -> PathBuf {
        self.output_dir.join(format!("Pearson_{task}.png"))
    }

    pub fn activations_path(&self, task: &str) -> PathBuf {
        self.output_dir.join(format!("W_Synergies_{task}.png"))
    }

    pub fn ranking_path(&self, task: &str) -> PathBuf {
        self.output_dir.join(format!("Ranking_{task}.png"))
    }
}

impl ArtifactSink for PngArtifactWriter {
    fn correlation(&self, task: &str, correlation: &CorrelationMatrix) -> SynergyResult<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.correlation_path(task);
        let names = &correlation.channel_names;
        let n = names.len();
        let extent = n.max(1) as f64;

        let root = BitMapBackend::new(&path, HEATMAP_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| render_error(&path, e))?;
        {
            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .caption(format!("Functional redundancy - {task}"), CAPTION_FONT)
                .set_label_area_size(LabelAreaPosition::Left, LABEL_AREA)
                .set_label_area_size(LabelAreaPosition::Bottom, LABEL_AREA)
                .build_cartesian_2d(0.0..extent, 0.0..extent)
                .map_err(|e| render_error(&path, e))?;

            // row 0 is drawn at the top
            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(n)
                .y_labels(n)
                .x_label_formatter(&|x| label_at(names, *x))
                .y_label_formatter(&|y| label_at(names, extent - 1.0 - y.floor()))
                .draw()
                .map_err(|e| render_error(&path, e))?;

            let cells = (1..n).flat_map(|i| (0..i).map(move |j| (i, j))).map(|(i, j)| {
                let top = (n - i) as f64;
                let color = diverging_color(correlation.values[[i, j]]);
                Rectangle::new([(j as f64, top), (j as f64 + 1.0, top - 1.0)], color.filled())
            });
            chart.draw_series(cells).map_err(|e| render_error(&path, e))?;
        }
        root.present().map_err(|e| render_error(&path, e))?;

        debug!(path = %path.display(), "correlation heatmap rendered");
        Ok(())
    }

    fn activations(&self, task: &str, ranking: &Ranking, vaf: f64) -> SynergyResult<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.activations_path(task);
        let weights = ranking.normalized_activations();
        let names = ranking.channel_names();
        let (n_channels, n_synergies) = weights.dim();
        let width = 0.8 / n_synergies.max(1) as f64;

        let root = BitMapBackend::new(&path, WEIGHTS_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| render_error(&path, e))?;
        {
            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .caption(format!("Synergy structure ({task}) - VAF: {vaf:.1}%"), CAPTION_FONT)
                .set_label_area_size(LabelAreaPosition::Left, 60)
                .set_label_area_size(LabelAreaPosition::Bottom, LABEL_AREA)
                .build_cartesian_2d(0.0..n_channels.max(1) as f64, 0.0..1.1)
                .map_err(|e| render_error(&path, e))?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(n_channels)
                .x_label_formatter(&|x| label_at(names, *x))
                .y_desc("normalized weight")
                .draw()
                .map_err(|e| render_error(&path, e))?;

            for s in 0..n_synergies {
                let color = Palette99::pick(s).mix(0.9);
                let bars = (0..n_channels).map(|c| {
                    let left = c as f64 + 0.1 + s as f64 * width;
                    Rectangle::new([(left, 0.0), (left + width, weights[[c, s]])], color.filled())
                });
                chart
                    .draw_series(bars)
                    .map_err(|e| render_error(&path, e))?
                    .label(format!("Synergy {}", s + 1))
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
            }

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(|e| render_error(&path, e))?;
        }
        root.present().map_err(|e| render_error(&path, e))?;

        debug!(path = %path.display(), "synergy weights rendered");
        Ok(())
    }

    fn ranking(&self, task: &str, ranking: &Ranking) -> SynergyResult<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.ranking_path(task);
        let entries = ranking.entries();
        let n = entries.len();
        let extent = n.max(1) as f64;
        let best = entries.first().map(|e| e.score).filter(|s| *s > 0.0).unwrap_or(1.0);
        let ordered: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();

        let root = BitMapBackend::new(&path, RANKING_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| render_error(&path, e))?;
        {
            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .caption(format!("Sensor ranking - {task}"), CAPTION_FONT)
                .set_label_area_size(LabelAreaPosition::Left, LABEL_AREA)
                .set_label_area_size(LabelAreaPosition::Bottom, 50)
                .build_cartesian_2d(0.0..best * 1.1, 0.0..extent)
                .map_err(|e| render_error(&path, e))?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_labels(n)
                .y_label_formatter(&|y| label_at(&ordered, extent - 1.0 - y.floor()))
                .x_desc("score")
                .draw()
                .map_err(|e| render_error(&path, e))?;

            let bars = entries.iter().enumerate().map(|(rank, entry)| {
                let top = (n - rank) as f64 - 0.1;
                let shade = if n > 1 { rank as f64 / (n - 1) as f64 } else { 0.0 };
                Rectangle::new([(0.0, top), (entry.score, top - 0.8)], sequential_color(shade).filled())
            });
            chart.draw_series(bars).map_err(|e| render_error(&path, e))?;
        }
        root.present().map_err(|e| render_error(&path, e))?;

        debug!(path = %path.display(), "ranking chart rendered");
        Ok(())
    }

    fn name(&self) -> &str {
        "png"
    }
}

fn render_error(path: &Path, err: impl std::fmt::Display) -> SynergyError {
    SynergyError::Render {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// Name of the category cell containing `position`, empty outside the axis
fn label_at(names: &[String], position: f64) -> String {
    if !position.is_finite() || position < 0.0 {
        return String::new();
    }
    names.get(position.floor() as usize).cloned().unwrap_or_default()
}

fn lerp(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Blue below zero, red above, neutral at zero
fn diverging_color(r: f64) -> RGBColor {
    if !r.is_finite() {
        return UNDEFINED;
    }
    let r = r.clamp(-1.0, 1.0);
    if r < 0.0 {
        lerp(NEUTRAL, COOL, -r)
    } else {
        lerp(NEUTRAL, WARM, r)
    }
}

/// Piecewise-linear viridis over [0, 1]
fn sequential_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        lerp(VIRIDIS[0], VIRIDIS[1], t * 2.0)
    } else {
        lerp(VIRIDIS[1], VIRIDIS[2], (t - 0.5) * 2.0)
    }
}
