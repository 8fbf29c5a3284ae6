//! Render normalized series as line charts, to **SVG** or **PNG**.
//!
//! - [`plot_lines`]: one chart, one line per labeled series (country
//!   comparison view)
//! - [`plot_panels`]: vertically stacked charts in a single image (the
//!   GDP + GDP-per-capita overview)
//!
//! Y values are scaled to a readable magnitude (thousands/millions/billions/
//! trillions) and tick labels honor a locale tag for separators.

use crate::models::Series;
use anyhow::{Result, anyhow};
use num_format::{Locale, ToFormattedString};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;
use std::sync::Once;

/// One-time registration of a bundled fallback font for the `ab_glyph` text
/// path, which does not discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../assets/DejaVuSans.ttf"),
        );
    });
}

/// Series colors, picked from the Office chart palette.
const PALETTE: [RGBColor; 6] = [
    RGBColor(68, 114, 196),  // blue
    RGBColor(237, 125, 49),  // orange
    RGBColor(112, 173, 71),  // green
    RGBColor(255, 192, 0),   // gold
    RGBColor(165, 165, 165), // gray
    RGBColor(38, 68, 120),   // dark blue
];

fn series_color(idx: usize) -> RGBAColor {
    PALETTE[idx % PALETTE.len()].to_rgba()
}

/// A labeled line to draw. The label appears in the legend when a chart
/// holds more than one line.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    pub label: String,
    pub series: &'a Series,
}

/// One chart: title, Y-axis description, and its lines.
#[derive(Debug, Clone)]
pub struct Panel<'a> {
    pub title: String,
    pub y_desc: String,
    pub lines: Vec<Line<'a>>,
}

/// Map a user-provided locale tag to a num-format Locale.
/// Supported tags (case-insensitive): "en", "de", "fr", "es", "it"; anything
/// else falls back to "en".
fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        _ => &Locale::en,
    }
}

/// Pick a single Y-axis scale and its label based on the overall magnitude,
/// e.g. `(1e9, "billions")`.
fn choose_axis_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "trillions")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "billions")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "millions")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "thousands")
    } else {
        (1.0, "")
    }
}

/// Draw a single chart with one line per labeled series (default locale "en").
pub fn plot_lines<P: AsRef<Path>>(
    lines: &[Line<'_>],
    title: &str,
    y_desc: &str,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    plot_lines_locale(lines, title, y_desc, out_path, width, height, "en")
}

/// Same as [`plot_lines`] but with a locale tag for tick label formatting.
pub fn plot_lines_locale<P: AsRef<Path>>(
    lines: &[Line<'_>],
    title: &str,
    y_desc: &str,
    out_path: P,
    width: u32,
    height: u32,
    locale_tag: &str,
) -> Result<()> {
    let panel = Panel {
        title: title.to_string(),
        y_desc: y_desc.to_string(),
        lines: lines.to_vec(),
    };
    plot_panels_locale(&[panel], out_path, width, height, locale_tag)
}

/// Draw several charts stacked vertically in one image (default locale "en").
pub fn plot_panels<P: AsRef<Path>>(
    panels: &[Panel<'_>],
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    plot_panels_locale(panels, out_path, width, height, "en")
}

/// Same as [`plot_panels`] but with a locale tag for tick label formatting.
pub fn plot_panels_locale<P: AsRef<Path>>(
    panels: &[Panel<'_>],
    out_path: P,
    width: u32,
    height: u32,
    locale_tag: &str,
) -> Result<()> {
    if panels.is_empty() {
        return Err(anyhow!("no panels to plot"));
    }
    if panels
        .iter()
        .all(|p| p.lines.iter().all(|l| l.series.is_empty()))
    {
        return Err(anyhow!("no data to plot"));
    }

    ensure_fonts_registered();
    let num_locale = map_locale(locale_tag);

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_panels(root, panels, num_locale)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_panels(root, panels, num_locale)?;
    }

    Ok(())
}

/// Helper that draws to any Plotters backend.
fn draw_panels<DB>(
    root: DrawingArea<DB, Shift>,
    panels: &[Panel<'_>],
    num_locale: &'static Locale,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let areas = root.split_evenly((panels.len(), 1));
    for (panel, area) in panels.iter().zip(areas.into_iter()) {
        draw_panel(&area, panel, num_locale)?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel<'_>,
    num_locale: &'static Locale,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let years: Vec<i32> = panel
        .lines
        .iter()
        .flat_map(|l| l.series.years.iter().copied())
        .collect();
    let (mut min_year, mut max_year) = (
        *years.iter().min().ok_or_else(|| anyhow!("no data to plot"))?,
        *years.iter().max().ok_or_else(|| anyhow!("no data to plot"))?,
    );
    if min_year == max_year {
        min_year -= 1;
        max_year += 1;
    }

    let max_abs = panel
        .lines
        .iter()
        .flat_map(|l| l.series.values.iter())
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    let (scale, scale_word) = choose_axis_scale(max_abs);

    let scaled: Vec<Vec<(i32, f64)>> = panel
        .lines
        .iter()
        .map(|l| l.series.points().map(|(y, v)| (y, v / scale)).collect())
        .collect();

    let values: Vec<f64> = scaled.iter().flatten().map(|&(_, v)| v).collect();
    let (mut min_val, mut max_val) = (
        values.iter().cloned().fold(f64::INFINITY, f64::min),
        values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    );
    if (max_val - min_val).abs() < f64::EPSILON {
        min_val -= 1.0;
        max_val += 1.0;
    }

    let y_desc = if scale_word.is_empty() {
        panel.y_desc.clone()
    } else {
        format!("{} ({})", panel.y_desc, scale_word)
    };

    let mut chart = ChartBuilder::on(area)
        .margin(16)
        .caption(&panel.title, ("sans-serif", 22))
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(min_year..max_year, min_val..max_val)
        .map_err(|e| anyhow!("{:?}", e))?;

    // Y tick labels: whole numbers get locale thousands separators, small
    // scaled magnitudes keep one decimal.
    let y_label_fmt = move |v: &f64| {
        if v.abs() >= 1000.0 {
            ((*v).round() as i64).to_formatted_string(num_locale)
        } else {
            let s = format!("{:.1}", v);
            s.trim_end_matches(".0").to_string()
        }
    };
    let x_label_fmt = |y: &i32| y.to_string();

    let x_label_count = ((max_year - min_year + 1) as usize).min(12);

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(y_desc)
        .x_labels(x_label_count)
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style(("sans-serif", 13))
        .axis_desc_style(("sans-serif", 15))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    for (idx, (line, points)) in panel.lines.iter().zip(scaled.iter()).enumerate() {
        if points.is_empty() {
            continue;
        }
        let color = series_color(idx);
        let style = ShapeStyle {
            color: color.clone(),
            filled: false,
            stroke_width: 2,
        };
        chart
            .draw_series(LineSeries::new(points.clone(), style))
            .map_err(|e| anyhow!("{:?}", e))?
            .label(line.label.clone())
            // Move the color into the closure; clone for each legend glyph draw
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color.clone()));
    }

    if panel.lines.len() > 1 {
        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.85))
            .label_font(("sans-serif", 13))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    Ok(())
}
