use super::theme::Color;
use crate::prelude::*;
use image::RgbImage;
use plotters::{
  coord::Shift,
  prelude::*,
  style::{
    text_anchor::{HPos, Pos, VPos},
    Color as _, FontStyle,
  },
};
use std::{fs, ops::Range, path::Path};

pub const FONT_FAMILY: &str = "sans-serif";

/// A fixed height strip of centred text drawn above a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
  pub text: String,
  pub width: u32,
  pub height: u32,
  pub background: Color,
  pub color: Color,
  pub font_size: u32,
}

/// Turns declarative figures into pixels.
pub trait Renderer: Send + Sync {
  fn render(&self, figure: &Figure) -> Result<RgbImage>;
  fn render_banner(&self, banner: &Banner) -> Result<RgbImage>;
}

/// Draws with the `plotters` bitmap backend.
pub struct PlottersRenderer(());

impl PlottersRenderer {
  /// Loads the font at `path` and registers it for every later render.
  /// Registration is process wide, so call this once before serving.
  pub fn with_font(path: &Path) -> Result<Self> {
    let bytes = fs::read(path).map_err(|e| {
      ChartError::Render(format!("cannot read font {}: {}", path.display(), e))
    })?;
    // plotters keeps the font for the lifetime of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes)
      .map_err(|_| ChartError::Render(format!("invalid font {}", path.display())))?;
    info!("registered font {}", path.display());
    Ok(Self(()))
  }
}

fn rgb(c: Color) -> RGBColor { RGBColor(c.r, c.g, c.b) }
fn rgba(c: Color) -> RGBAColor { RGBAColor(c.r, c.g, c.b, c.a) }

fn canvas(width: u32, height: u32) -> Vec<u8> {
  vec![0u8; width as usize * height as usize * 3]
}

fn into_image(width: u32, height: u32, buf: Vec<u8>) -> Result<RgbImage> {
  RgbImage::from_raw(width, height, buf)
    .ok_or_else(|| ChartError::Render("pixel buffer does not match image size".into()))
}

fn label_size(height: u32) -> i32 { (height / 60).max(10) as i32 }

// consecutive indexes holding finite values
fn finite_runs(y: &[f64]) -> Vec<Range<usize>> {
  let mut runs = vec![];
  let mut start = None;
  for (i, v) in y.iter().enumerate() {
    match (v.is_finite(), start) {
      (true, None) => start = Some(i),
      (false, Some(s)) => {
        runs.push(s..i);
        start = None;
      }
      _ => (),
    }
  }
  if let Some(s) = start {
    runs.push(s..y.len());
  }
  runs
}

impl Renderer for PlottersRenderer {
  fn render(&self, figure: &Figure) -> Result<RgbImage> {
    let layout = &figure.layout;
    let (w, h) = (layout.width, layout.height);
    let mut buf = canvas(w, h);
    {
      let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
      root.fill(&rgb(layout.background)).map_err(ChartError::render)?;
      let m = layout.margin as i32;
      draw_panes(figure, &root.margin(m, m, m, m))?;
      if let Some(wm) = &layout.watermark {
        let style = (FONT_FAMILY, wm.size as f64)
          .into_font()
          .color(&rgba(wm.color.with_alpha(wm.opacity)))
          .pos(Pos::new(HPos::Center, VPos::Center));
        let center = ((w / 2) as i32, (h / 2) as i32);
        root
          .draw(&Text::new(wm.text.as_str(), center, style))
          .map_err(ChartError::render)?;
      }
      root.present().map_err(ChartError::render)?;
    }
    into_image(w, h, buf)
  }

  fn render_banner(&self, banner: &Banner) -> Result<RgbImage> {
    let (w, h) = (banner.width, banner.height);
    let mut buf = canvas(w, h);
    {
      let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
      root.fill(&rgb(banner.background)).map_err(ChartError::render)?;
      let style = (FONT_FAMILY, banner.font_size as f64)
        .into_font()
        .color(&rgb(banner.color))
        .pos(Pos::new(HPos::Center, VPos::Center));
      let center = ((w / 2) as i32, (h / 2) as i32);
      root
        .draw(&Text::new(banner.text.as_str(), center, style))
        .map_err(ChartError::render)?;
      root.present().map_err(ChartError::render)?;
    }
    into_image(w, h, buf)
  }
}

fn draw_panes<DB: DrawingBackend>(
  figure: &Figure,
  area: &DrawingArea<DB, Shift>,
) -> Result<()> {
  let panes = &figure.layout.panes;
  let total: f64 = panes.iter().map(|p| p.weight).sum();
  let height = area.dim_in_pixel().1 as f64;
  let mut rest = area.clone();
  for (i, pane) in panes.iter().enumerate() {
    let bottom = i + 1 == panes.len();
    let part = if bottom {
      rest.clone()
    } else {
      let px = (height * pane.weight / total).round() as i32;
      let (upper, lower) = rest.split_vertically(px);
      rest = lower;
      upper
    };
    draw_pane(figure, pane, &part, bottom)?;
  }
  Ok(())
}

fn draw_pane<DB: DrawingBackend>(
  figure: &Figure,
  pane: &PaneLayout,
  area: &DrawingArea<DB, Shift>,
  bottom: bool,
) -> Result<()> {
  let layout = &figure.layout;
  let font = label_size(layout.height);
  let text = rgb(layout.text);
  let (x0, x1) = figure.x_range();
  let (y0, y1) = figure.y_range(pane.pane);

  let mut chart = ChartBuilder::on(area)
    .margin(5)
    .x_label_area_size(if bottom { font * 2 } else { 0 })
    .y_label_area_size(font * 6)
    .build_cartesian_2d(x0..x1, y0..y1)
    .map_err(ChartError::render)?;

  let x_label = |x: &f64| figure.x_label(*x);
  let mut mesh = chart.configure_mesh();
  mesh
    .bold_line_style(rgba(layout.grid).stroke_width(1))
    .light_line_style(TRANSPARENT.stroke_width(0))
    .axis_style(rgb(layout.grid).stroke_width(1))
    .label_style((FONT_FAMILY, font as f64).into_font().color(&text))
    .axis_desc_style((FONT_FAMILY, font as f64).into_font().color(&text))
    .y_desc(pane.title.as_str())
    .x_labels(8)
    .x_label_formatter(&x_label);
  if !bottom {
    mesh.disable_x_axis();
  }
  mesh.draw().map_err(ChartError::render)?;

  let n = figure.dates.len().max(1);
  let slot = (x1 - x0) / n as f64;
  for series in figure.series_in(pane.pane) {
    let start = series.start;
    match &series.kind {
      SeriesKind::Line { y } => {
        let style = rgba(series.style.color).stroke_width(series.style.width);
        for run in finite_runs(y) {
          let points = run.map(|i| (figure.x_at(start + i), y[i]));
          chart
            .draw_series(LineSeries::new(points, style))
            .map_err(ChartError::render)?;
        }
      }
      SeriesKind::Candlestick {
        open,
        high,
        low,
        close,
        increasing,
        decreasing,
      } => {
        let width = ((area.dim_in_pixel().0 as f64 / n as f64) * 0.7).max(1.0) as u32;
        let (gain, loss) = (rgb(*increasing).filled(), rgb(*decreasing).filled());
        chart
          .draw_series((0..close.len()).map(|i| {
            CandleStick::new(
              figure.x_at(start + i),
              open[i],
              high[i],
              low[i],
              close[i],
              gain,
              loss,
              width,
            )
          }))
          .map_err(ChartError::render)?;
      }
      SeriesKind::Bars { y, colors } => {
        let half = slot * 0.35;
        chart
          .draw_series((0..y.len()).map(|i| {
            let x = figure.x_at(start + i);
            let v = if y[i].is_finite() { y[i] } else { 0.0 };
            let color = colors.get(i).copied().unwrap_or(series.style.color);
            Rectangle::new([(x - half, 0.0), (x + half, v)], rgb(color).filled())
          }))
          .map_err(ChartError::render)?;
      }
    }
  }

  for a in figure.annotations_in(pane.pane) {
    let style = (FONT_FAMILY, font as f64)
      .into_font()
      .color(&rgb(a.color))
      .pos(Pos::new(HPos::Left, VPos::Bottom));
    chart
      .draw_series(std::iter::once(Text::new(a.text.clone(), (x0, a.y), style)))
      .map_err(ChartError::render)?;
  }
  Ok(())
}
