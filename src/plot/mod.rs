use plotters::prelude::*;
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::style::FontStyle;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Serialize, Deserialize};
use std::iter;
use std::path::Path;
use nalgebra::DMatrix;
use crate::figure::Figure;
use crate::{Error, Result};

const STEEL_BLUE : RGBColor = RGBColor(70, 130, 180);
const NAVY : RGBColor = RGBColor(0, 0, 128);
const FOREST_GREEN : RGBColor = RGBColor(34, 139, 34);
const DARK_GREEN : RGBColor = RGBColor(0, 100, 0);
const ORANGE : RGBColor = RGBColor(255, 165, 0);
const GRAY : RGBColor = RGBColor(128, 128, 128);
const WHEAT : RGBColor = RGBColor(245, 222, 179);
const LIGHT_YELLOW : RGBColor = RGBColor(255, 255, 224);

/// Arrow head size, in data units.
const HEAD_LENGTH : f64 = 0.1;
const HEAD_WIDTH : f64 = 0.15;

const FONT : &str = "sans-serif";

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

type Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Physical dimensions of the figure, and the fixed geometry shared by both panels.
/// Font sizes and line widths are given in points and converted to pixels
/// at the configured resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width_in : f64,
    pub height_in : f64,
    pub dpi : u32,

    /// Display length of the principal direction arrows.
    pub arrow_scale : f64,

    /// Both axes span [-axis_limit, axis_limit].
    pub axis_limit : f64
}

impl Default for Layout {

    fn default() -> Self {
        Self {
            width_in : 14.0,
            height_in : 6.0,
            dpi : 300,
            arrow_scale : 2.5,
            axis_limit : 3.0
        }
    }

}

impl Layout {

    /// Figure size in pixels.
    pub fn pixels(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        ((self.width_in * dpi).round() as u32, (self.height_in * dpi).round() as u32)
    }

    fn pt(&self, points : f64) -> f64 {
        points * self.dpi as f64 / 72.
    }

    fn px(&self, points : f64) -> u32 {
        self.pt(points).round().max(1.) as u32
    }

    fn font(&self, points : f64) -> TextStyle<'static> {
        (FONT, self.pt(points)).into_font().color(&BLACK)
    }

    fn bold(&self, points : f64) -> TextStyle<'static> {
        (FONT, self.pt(points)).into_font().style(FontStyle::Bold).color(&BLACK)
    }

}

fn draw_err<E : std::fmt::Display>(e : E) -> Error {
    Error::Render(e.to_string())
}

/// Draws both panels side by side and writes the PNG to path. Missing parent
/// directories are created; any other failure to write is returned as is.
pub fn render(fig : &Figure, layout : &Layout, path : &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let (width, height) = layout.pixels();
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;
    let (left, right) = root.split_horizontally(width / 2);
    draw_original(&left, fig, layout)?;
    draw_projected(&right, fig, layout)?;
    root.present().map_err(draw_err)?;
    log::info!("Figure written to {} ({}x{} px)", path.display(), width, height);
    Ok(())
}

/// Panel A: standardized sample, with the principal directions drawn as arrows from the origin.
fn draw_original(area : &Panel<'_>, fig : &Figure, layout : &Layout) -> Result<()> {
    let area = titled(
        area,
        "Original Data with Principal Components",
        "(PC1 captures \"overall size\", PC2 captures \"body type\")",
        layout
    )?;
    let lim = layout.axis_limit;
    let mut chart = ChartBuilder::on(&area)
        .margin(layout.px(10.))
        .x_label_area_size(layout.px(36.))
        .y_label_area_size(layout.px(40.))
        .build_cartesian_2d(-lim..lim, -lim..lim)
        .map_err(draw_err)?;
    chart.configure_mesh()
        .x_desc("Height (standardized)")
        .y_desc("Weight (standardized)")
        .axis_desc_style(layout.bold(12.))
        .label_style(layout.font(10.))
        .bold_line_style(BLACK.mix(0.12).stroke_width(1))
        .light_line_style(WHITE.mix(0.0).stroke_width(0))
        .draw()
        .map_err(draw_err)?;

    let pts = points(&fig.standardized, lim);
    let radius = layout.px(3.5);
    chart.draw_series(pts.iter().map(|p| Circle::new(*p, radius, STEEL_BLUE.mix(0.6).filled()) ))
        .map_err(draw_err)?;
    chart.draw_series(pts.iter().map(|p| Circle::new(*p, radius, NAVY.mix(0.6).stroke_width(layout.px(0.5))) ))
        .map_err(draw_err)?;

    let axis_style = GRAY.mix(0.5).stroke_width(layout.px(1.));
    for (from, to) in [((-lim, 0.), (lim, 0.)), ((0., -lim), (0., lim))].iter() {
        chart.draw_series(dashed(*from, *to, 0.12, 0.06).into_iter().map(|s| PathElement::new(s, axis_style) ))
            .map_err(draw_err)?;
    }

    let arrow_width = layout.px(3.);
    let legend_len = layout.px(20.) as i32;
    let labels = ["PC1 (Max Variance)", "PC2 (Perpendicular)"];
    let colors = [RED, ORANGE];
    for k in 0..fig.pca.len().min(2) {
        let dir = fig.pca.component(k);
        let tip = (dir[0] * layout.arrow_scale, dir[1] * layout.arrow_scale);
        let (shaft, head) = arrow(tip, HEAD_LENGTH, HEAD_WIDTH);
        let color = colors[k];
        chart.draw_series(iter::once(PathElement::new(shaft, color.stroke_width(arrow_width))))
            .map_err(draw_err)?
            .label(labels[k])
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], color.stroke_width(arrow_width)) );
        let mut outline = head.clone();
        outline.push(head[0]);
        chart.draw_series(iter::once(Polygon::new(head, color.filled())))
            .map_err(draw_err)?;
        chart.draw_series(iter::once(PathElement::new(outline, color.stroke_width(arrow_width))))
            .map_err(draw_err)?;
    }

    let boxed = layout.font(10.).pos(Pos::new(HPos::Center, VPos::Center));
    let faded = (FONT, layout.pt(9.)).into_font()
        .color(&BLACK.mix(0.7))
        .pos(Pos::new(HPos::Center, VPos::Center));
    note(&mut chart, (1.8, 1.8), &["Tall &", "Heavy"], &boxed, Some(WHEAT.mix(0.5)), layout)?;
    note(&mut chart, (-1.8, -1.8), &["Short &", "Light"], &boxed, Some(WHEAT.mix(0.5)), layout)?;
    note(&mut chart, (1.5, -1.5), &["Tall &", "Slim"], &faded, None, layout)?;
    note(&mut chart, (-1.5, 1.5), &["Short &", "Stocky"], &faded, None, layout)?;

    chart.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .margin(layout.px(6.))
        .label_font(layout.font(11.))
        .background_style(WHITE.mix(0.9).filled())
        .border_style(BLACK.mix(0.4).stroke_width(1))
        .draw()
        .map_err(draw_err)?;
    Ok(())
}

/// Panel B: projected sample, where the principal directions are the coordinate axes.
fn draw_projected(area : &Panel<'_>, fig : &Figure, layout : &Layout) -> Result<()> {
    let area = titled(
        area,
        "Data Projected onto Principal Components",
        "(Rotated coordinate system)",
        layout
    )?;
    let lim = layout.axis_limit;
    let mut chart = ChartBuilder::on(&area)
        .margin(layout.px(10.))
        .x_label_area_size(layout.px(36.))
        .y_label_area_size(layout.px(40.))
        .build_cartesian_2d(-lim..lim, -lim..lim)
        .map_err(draw_err)?;
    chart.configure_mesh()
        .x_desc("PC1 (Overall Size)")
        .y_desc("PC2 (Body Type: Stocky ← → Slim)")
        .axis_desc_style(layout.bold(12.))
        .label_style(layout.font(10.))
        .bold_line_style(BLACK.mix(0.12).stroke_width(1))
        .light_line_style(WHITE.mix(0.0).stroke_width(0))
        .draw()
        .map_err(draw_err)?;

    let pts = points(&fig.projected, lim);
    let radius = layout.px(3.5);
    chart.draw_series(pts.iter().map(|p| Circle::new(*p, radius, FOREST_GREEN.mix(0.6).filled()) ))
        .map_err(draw_err)?;
    chart.draw_series(pts.iter().map(|p| Circle::new(*p, radius, DARK_GREEN.mix(0.6).stroke_width(layout.px(0.5))) ))
        .map_err(draw_err)?;

    let line_width = layout.px(2.);
    let legend_len = layout.px(20.) as i32;
    let axes = [
        ("PC2 axis", ORANGE, (-lim, 0.), (lim, 0.)),
        ("PC1 axis", RED, (0., -lim), (0., lim))
    ];
    for (label, color, from, to) in axes.iter() {
        let color = *color;
        let style = color.mix(0.7).stroke_width(line_width);
        chart.draw_series(dashed(*from, *to, 0.2, 0.08).into_iter().map(|s| PathElement::new(s, style) ))
            .map_err(draw_err)?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], color.mix(0.7).stroke_width(line_width)) );
    }

    let pct = fig.variance_percent();
    let lines : Vec<String> = pct.iter()
        .enumerate()
        .map(|(k, p)| format!("PC{} explains {:.1}% of variance", k + 1, p) )
        .collect();
    let offset = 0.02 * 2. * lim;
    variance_box(&mut chart, (-lim + offset, lim - offset), &lines, layout)?;

    chart.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .margin(layout.px(6.))
        .label_font(layout.font(11.))
        .background_style(WHITE.mix(0.9).filled())
        .border_style(BLACK.mix(0.4).stroke_width(1))
        .draw()
        .map_err(draw_err)?;
    Ok(())
}

/// Writes a bold title and a regular subtitle over the panel, returning the area below them.
fn titled<'a>(area : &Panel<'a>, title : &str, subtitle : &str, layout : &Layout) -> Result<Panel<'a>> {
    let inner = area.titled(title, layout.bold(13.)).map_err(draw_err)?;
    inner.titled(subtitle, layout.font(13.)).map_err(draw_err)
}

/// Rows of the first two columns of m, skipping those outside the plotted square.
fn points(m : &DMatrix<f64>, lim : f64) -> Vec<(f64, f64)> {
    m.row_iter()
        .map(|r| (r[0], r[1]) )
        .filter(|(x, y)| x.abs() <= lim && y.abs() <= lim )
        .collect()
}

/// Shaft (from the origin to the base of the head) and triangular head of an
/// arrow ending at tip. The head is included in the arrow length.
fn arrow(tip : (f64, f64), head_len : f64, head_width : f64) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let len = (tip.0.powi(2) + tip.1.powi(2)).sqrt();
    let (ux, uy) = (tip.0 / len, tip.1 / len);
    let base = (tip.0 - ux * head_len, tip.1 - uy * head_len);
    let half = head_width / 2.;
    let head = vec![
        tip,
        (base.0 - uy * half, base.1 + ux * half),
        (base.0 + uy * half, base.1 - ux * half)
    ];
    (vec![(0., 0.), base], head)
}

/// Splits the segment from -> to into dashes of the informed length, separated by gap.
fn dashed(from : (f64, f64), to : (f64, f64), dash : f64, gap : f64) -> Vec<Vec<(f64, f64)>> {
    let len = ((to.0 - from.0).powi(2) + (to.1 - from.1).powi(2)).sqrt();
    if len == 0.0 {
        return Vec::new();
    }
    let (ux, uy) = ((to.0 - from.0) / len, (to.1 - from.1) / len);
    let period = dash + gap;
    (0..(len / period).ceil() as usize)
        .map(|k| k as f64 * period )
        .filter(|start| *start < len )
        .map(|start| {
            let end = (start + dash).min(len);
            vec![(from.0 + ux * start, from.1 + uy * start), (from.0 + ux * end, from.1 + uy * end)]
        })
        .collect()
}

/// Multi-line text centered at pos, optionally over a filled box.
fn note(
    chart : &mut Chart<'_, '_>,
    pos : (f64, f64),
    lines : &[&str],
    style : &TextStyle<'static>,
    fill : Option<RGBAColor>,
    layout : &Layout
) -> Result<()> {
    let line_h = layout.pt(12.) as i32;
    let pad = layout.px(4.) as i32;
    let max_chars = lines.iter().map(|l| l.chars().count() ).max().unwrap_or(0);
    let half_w = (max_chars as f64 * layout.pt(10.) * 0.3) as i32 + pad;
    let half_h = (lines.len() as i32 * line_h) / 2 + pad;
    if let Some(fill) = fill {
        chart.draw_series(iter::once(
            EmptyElement::at(pos) + Rectangle::new([(-half_w, -half_h), (half_w, half_h)], fill.filled())
        )).map_err(draw_err)?;
    }
    let top = -((lines.len() as i32 - 1) * line_h) / 2;
    for (i, line) in lines.iter().enumerate() {
        chart.draw_series(iter::once(
            EmptyElement::at(pos) + Text::new(line.to_string(), (0, top + i as i32 * line_h), style.clone())
        )).map_err(draw_err)?;
    }
    Ok(())
}

/// Boxed variance report anchored by its upper-left corner at pos.
fn variance_box(
    chart : &mut Chart<'_, '_>,
    pos : (f64, f64),
    lines : &[String],
    layout : &Layout
) -> Result<()> {
    let line_h = layout.pt(12.) as i32;
    let pad = layout.px(5.) as i32;
    let max_chars = lines.iter().map(|l| l.chars().count() ).max().unwrap_or(0);
    let corner = (
        (max_chars as f64 * layout.pt(10.) * 0.55) as i32 + 2 * pad,
        lines.len() as i32 * line_h + 2 * pad
    );
    chart.draw_series(iter::once(
        EmptyElement::at(pos) + Rectangle::new([(0, 0), corner], LIGHT_YELLOW.mix(0.8).filled())
    )).map_err(draw_err)?;
    chart.draw_series(iter::once(
        EmptyElement::at(pos) + Rectangle::new([(0, 0), corner], BLACK.mix(0.3).stroke_width(1))
    )).map_err(draw_err)?;
    let style = layout.font(10.).pos(Pos::new(HPos::Left, VPos::Top));
    for (i, line) in lines.iter().enumerate() {
        chart.draw_series(iter::once(
            EmptyElement::at(pos) + Text::new(line.clone(), (pad, pad + i as i32 * line_h), style.clone())
        )).map_err(draw_err)?;
    }
    Ok(())
}
