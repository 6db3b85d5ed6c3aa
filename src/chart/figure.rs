use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pane {
  Price,
  Oscillator,
  Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum XAxis {
  /// Points placed by date; gaps in trading show as gaps.
  Time,
  /// Points placed one slot apart, labelled with their dates.
  Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineStyle {
  pub color: Color,
  pub width: u32,
}

impl LineStyle {
  pub fn new(color: Color, width: u32) -> Self { Self { color, width } }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SeriesKind {
  Line {
    y: Vec<f64>,
  },
  Candlestick {
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    increasing: Color,
    decreasing: Color,
  },
  Bars {
    y: Vec<f64>,
    colors: Vec<Color>,
  },
}

/// One plotted series. Point `i` sits at `Figure::dates[start + i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
  pub name: String,
  pub pane: Pane,
  pub start: usize,
  pub kind: SeriesKind,
  pub style: LineStyle,
  pub legend_group: Option<&'static str>,
  pub show_legend: bool,
}

impl Series {
  pub fn line(
    name: impl Into<String>,
    pane: Pane,
    y: Vec<f64>,
    style: LineStyle,
  ) -> Self {
    Self {
      name: name.into(),
      pane,
      start: 0,
      kind: SeriesKind::Line { y },
      style,
      legend_group: None,
      show_legend: true,
    }
  }
  pub fn starting_at(mut self, start: usize) -> Self {
    self.start = start;
    self
  }
  pub fn grouped(mut self, group: &'static str, show_legend: bool) -> Self {
    self.legend_group = Some(group);
    self.show_legend = show_legend;
    self
  }
  pub fn len(&self) -> usize {
    match &self.kind {
      SeriesKind::Line { y } | SeriesKind::Bars { y, .. } => y.len(),
      SeriesKind::Candlestick { close, .. } => close.len(),
    }
  }
  pub fn is_empty(&self) -> bool { self.len() == 0 }

  /// Smallest and largest finite values drawn by this series.
  fn bounds(&self) -> Option<(f64, f64)> {
    match &self.kind {
      SeriesKind::Line { y } => fold_bounds(y.iter().copied()),
      SeriesKind::Bars { y, .. } => fold_bounds(y.iter().copied().chain([0.0])),
      SeriesKind::Candlestick { high, low, .. } => {
        fold_bounds(high.iter().chain(low).copied())
      }
    }
  }
}

fn fold_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
  values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
    None => Some((v, v)),
    Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
  })
}

/// Text pinned to the left edge of a pane at height `y`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
  pub text: String,
  pub pane: Pane,
  pub y: f64,
  pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Watermark {
  pub text: String,
  pub color: Color,
  pub size: u32,
  pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaneLayout {
  pub pane: Pane,
  pub title: String,
  /// Share of the plot height, relative to the other panes.
  pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
  pub width: u32,
  pub height: u32,
  pub margin: u32,
  pub x_axis: XAxis,
  /// Top to bottom.
  pub panes: Vec<PaneLayout>,
  pub background: Color,
  pub text: Color,
  pub grid: Color,
  pub watermark: Option<Watermark>,
  pub show_legend: bool,
}

impl Layout {
  pub fn pane(&self, pane: Pane) -> Option<&PaneLayout> {
    self.panes.iter().find(|p| p.pane == pane)
  }
}

/// Declarative description of a chart, handed to a `Renderer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
  pub dates: Vec<DateTime<Utc>>,
  pub series: Vec<Series>,
  pub annotations: Vec<Annotation>,
  pub layout: Layout,
}

impl Figure {
  pub fn series_named(&self, name: &str) -> Option<&Series> {
    self.series.iter().find(|s| s.name == name)
  }
  pub fn series_in(&self, pane: Pane) -> impl Iterator<Item = &Series> {
    self.series.iter().filter(move |s| s.pane == pane)
  }
  pub fn annotations_in(&self, pane: Pane) -> impl Iterator<Item = &Annotation> {
    self.annotations.iter().filter(move |a| a.pane == pane)
  }

  /// Horizontal coordinate of the `index`th date.
  pub fn x_at(&self, index: usize) -> f64 {
    match self.layout.x_axis {
      XAxis::Category => index as f64,
      XAxis::Time => self
        .dates
        .get(index)
        .map(|d| d.timestamp_millis() as f64 / 1000.0)
        .unwrap_or(index as f64),
    }
  }

  pub fn x_range(&self) -> (f64, f64) {
    if self.dates.is_empty() {
      return (0.0, 1.0);
    }
    let (lo, hi) = (self.x_at(0), self.x_at(self.dates.len() - 1));
    match self.layout.x_axis {
      // half a slot either side so edge candles are not cut
      XAxis::Category => (lo - 0.5, hi + 0.5),
      XAxis::Time if hi > lo => (lo, hi),
      XAxis::Time => (lo - 1.0, hi + 1.0),
    }
  }

  /// Label for a horizontal coordinate produced by `x_at`.
  pub fn x_label(&self, x: f64) -> String {
    let (Some(first), Some(last)) = (self.dates.first(), self.dates.last()) else {
      return String::new();
    };
    let span = *last - *first;
    let date = match self.layout.x_axis {
      XAxis::Category => {
        let i = x.round();
        if i < 0.0 || i as usize >= self.dates.len() {
          return String::new();
        }
        Some(self.dates[i as usize])
      }
      XAxis::Time => DateTime::from_timestamp_millis((x * 1000.0) as i64),
    };
    date.map(|d| d.tick_label(span)).unwrap_or_default()
  }

  /// Vertical extent of everything in `pane`, padded by 5%.
  pub fn y_range(&self, pane: Pane) -> (f64, f64) {
    let bounds = self
      .series_in(pane)
      .filter_map(Series::bounds)
      .chain(self.annotations_in(pane).filter_map(|a| fold_bounds(std::iter::once(a.y))))
      .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)));
    match bounds {
      None => (0.0, 1.0),
      Some((lo, hi)) if hi > lo => {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
      }
      Some((v, _)) => {
        let pad = if v == 0.0 { 1.0 } else { v.abs() * 0.05 };
        (v - pad, v + pad)
      }
    }
  }
}
