use super::raster::{add_border, stack_vertically};
use crate::{
  config::ChartConfig,
  indicators::{bollinger_bands, edge_trim, fibonacci_bands, moving_average, rsi},
  prelude::*,
};
use image::RgbImage;

// sized for a 3200px wide canvas
const WATERMARK_SIZE: u32 = 100;
const WATERMARK_OPACITY: f64 = 0.1;
const PRICE_WIDTH: u32 = 3;

/// Border of the whole chart: "increase" when the series ended above where it
/// started.
pub fn border_color<P: TradePoint>(
  coll: &Collection<P>,
  theme: &Theme,
) -> Result<Color> {
  let (first, last) = (coll.first()?, coll.last()?);
  if last.reference_end() > first.reference_start() {
    Ok(theme.border_increase)
  } else {
    Ok(theme.border_decrease)
  }
}

/// Assembles figures from collections and composes the final raster.
pub struct ChartPainter<'a> {
  renderer: &'a dyn Renderer,
  config: &'a ChartConfig,
}

impl<'a> ChartPainter<'a> {
  pub fn new(renderer: &'a dyn Renderer, config: &'a ChartConfig) -> Self {
    Self { renderer, config }
  }

  pub fn line_figure(
    &self,
    coll: &Collection<SingleValuePoint>,
    meta: &AssetMeta,
    options: &ChartOptions,
  ) -> Result<Figure> {
    let theme = options.theme();
    let line = Series::line(
      meta.name.clone(),
      Pane::Price,
      coll.values(),
      LineStyle::new(theme.line, PRICE_WIDTH),
    );
    self.compose(coll, meta, options, vec![line], None)
  }

  pub fn candlestick_figure(
    &self,
    coll: &Collection<OhlcPoint>,
    meta: &AssetMeta,
    options: &ChartOptions,
  ) -> Result<Figure> {
    let theme = options.theme();
    let (highs, lows, closes) = (coll.highs(), coll.lows(), coll.closes());
    let candles = Series {
      name: meta.name.clone(),
      pane: Pane::Price,
      start: 0,
      kind: SeriesKind::Candlestick {
        open: coll.opens(),
        high: highs.clone(),
        low: lows.clone(),
        close: closes.clone(),
        increasing: theme.increasing,
        decreasing: theme.decreasing,
      },
      style: LineStyle::new(theme.line, 1),
      legend_group: None,
      show_legend: false,
    };
    let volume = volume_bars(coll, theme);
    self.compose(
      coll,
      meta,
      options,
      vec![candles, volume],
      Some((&highs, &lows, &closes)),
    )
  }

  pub fn paint_line_chart(
    &self,
    coll: &Collection<SingleValuePoint>,
    meta: &AssetMeta,
    options: &ChartOptions,
  ) -> Result<RgbImage> {
    let border = border_color(coll, options.theme())?;
    let figure = self.line_figure(coll, meta, options)?;
    self.finish(&figure, options, border, "line")
  }

  pub fn paint_candlestick(
    &self,
    coll: &Collection<OhlcPoint>,
    meta: &AssetMeta,
    options: &ChartOptions,
  ) -> Result<RgbImage> {
    let border = border_color(coll, options.theme())?;
    let figure = self.candlestick_figure(coll, meta, options)?;
    self.finish(&figure, options, border, "candlestick")
  }

  fn compose<P: TradePoint>(
    &self,
    coll: &Collection<P>,
    meta: &AssetMeta,
    options: &ChartOptions,
    mut series: Vec<Series>,
    hlc: Option<(&[f64], &[f64], &[f64])>,
  ) -> Result<Figure> {
    if coll.is_empty() {
      return Err(ChartError::EmptyCollection);
    }
    let theme = options.theme();
    let prices = coll.prices();
    let mut annotations = vec![];

    if options.average {
      series.push(average_series(&prices, theme)?);
    }
    if options.bollinger {
      let Some((highs, lows, closes)) = hlc else {
        return Err(ChartError::MalformedOptions(
          "bollinger bands need high, low and close prices".into(),
        ));
      };
      series.extend(bollinger_series(highs, lows, closes, theme)?);
    }
    if options.fibonacci {
      for level in fibonacci_bands(&prices)? {
        let style = match level.main {
          true => LineStyle::new(theme.fibonacci_main, 2),
          false => LineStyle::new(theme.fibonacci, 1),
        };
        let y = level.line(prices.len());
        series.push(
          Series::line(level.label.clone(), Pane::Price, y, style)
            .grouped("fibonacci", false),
        );
        annotations.push(Annotation {
          text: level.label,
          pane: Pane::Price,
          y: level.value,
          color: theme.text,
        });
      }
    }
    if options.rsi {
      series.extend(rsi_series(&prices, theme));
    }
    debug!(
      "overlays for {}: average={} bollinger={} fibonacci={} rsi={}",
      meta.name, options.average, options.bollinger, options.fibonacci, options.rsi
    );

    let volume = hlc.is_some();
    Ok(Figure {
      dates: coll.dates(),
      series,
      annotations,
      layout: self.layout(meta, options, volume),
    })
  }

  fn layout(&self, meta: &AssetMeta, options: &ChartOptions, volume: bool) -> Layout {
    let c = self.config;
    let theme = options.theme();
    let mut lower = vec![];
    if options.rsi {
      lower.push(PaneLayout {
        pane: Pane::Oscillator,
        title: "RSI".into(),
        weight: c.rsi_weight,
      });
    }
    if volume {
      lower.push(PaneLayout {
        pane: Pane::Volume,
        title: meta.volume_title(),
        weight: c.volume_weight,
      });
    }
    let taken: f64 = lower.iter().map(|p| p.weight).sum();
    let mut panes = vec![PaneLayout {
      pane: Pane::Price,
      title: meta.price_title(),
      weight: (1.0 - taken).max(0.2),
    }];
    panes.extend(lower);

    Layout {
      width: c.width,
      height: c.height,
      margin: c.margin,
      x_axis: if options.finance { XAxis::Category } else { XAxis::Time },
      panes,
      background: theme.background,
      text: theme.text,
      grid: theme.grid,
      watermark: options.watermark_text().map(|text| Watermark {
        text: text.into(),
        color: theme.watermark,
        size: WATERMARK_SIZE,
        opacity: WATERMARK_OPACITY,
      }),
      show_legend: true,
    }
  }

  fn finish(
    &self,
    figure: &Figure,
    options: &ChartOptions,
    border: Color,
    kind: &str,
  ) -> Result<RgbImage> {
    let theme = options.theme();
    let mut img = self.renderer.render(figure)?;
    if let Some(text) = options.banner_text() {
      let banner = self.renderer.render_banner(&Banner {
        text: text.into(),
        width: img.width(),
        height: self.config.banner_height,
        background: theme.banner_background,
        color: theme.banner_text,
        font_size: theme.banner_font_size,
      })?;
      img = stack_vertically(&banner, &img);
    }
    let img = add_border(&img, self.config.border_width, border);
    info!(
      "painted {} chart of {} points, {}x{}",
      kind,
      figure.dates.len(),
      img.width(),
      img.height()
    );
    Ok(img)
  }
}

fn volume_bars(coll: &Collection<OhlcPoint>, theme: &Theme) -> Series {
  let closes = coll.closes();
  let colors = (0..closes.len())
    .map(|i| match i > 0 && closes[i] > closes[i - 1] {
      true => theme.increasing,
      false => theme.decreasing,
    })
    .collect();
  let y = coll.volumes().into_iter().map(|v| v.unwrap_or(0.0)).collect();
  Series {
    name: "volume".into(),
    pane: Pane::Volume,
    start: 0,
    kind: SeriesKind::Bars { y, colors },
    style: LineStyle::new(theme.decreasing, 1),
    legend_group: None,
    show_legend: false,
  }
}

fn average_series(prices: &[f64], theme: &Theme) -> Result<Series> {
  let window = indicators::moving_average::DEFAULT_WINDOW;
  let avg = moving_average(prices, window)?;
  let trim = edge_trim(window);
  let start = trim.min(avg.len());
  let end = avg.len().saturating_sub(trim).max(start);
  Ok(
    Series::line(
      "average",
      Pane::Price,
      avg[start..end].to_vec(),
      LineStyle::new(theme.average, 2),
    )
    .starting_at(start)
    .grouped("average", true),
  )
}

fn bollinger_series(
  highs: &[f64],
  lows: &[f64],
  closes: &[f64],
  theme: &Theme,
) -> Result<Vec<Series>> {
  let bands = bollinger_bands(
    highs,
    lows,
    closes,
    indicators::bollinger::DEFAULT_PERIOD,
    indicators::bollinger::DEFAULT_STD_MULTIPLIER,
  )?;
  Ok(vec![
    Series::line(
      "bollinger middle",
      Pane::Price,
      bands.middle,
      LineStyle::new(theme.bollinger_middle, 2),
    )
    .grouped("bollinger", true),
    Series::line(
      "bollinger upper",
      Pane::Price,
      bands.upper,
      LineStyle::new(theme.bollinger_upper, 1),
    )
    .grouped("bollinger", false),
    Series::line(
      "bollinger lower",
      Pane::Price,
      bands.lower,
      LineStyle::new(theme.bollinger_lower, 1),
    )
    .grouped("bollinger", false),
  ])
}

fn rsi_series(prices: &[f64], theme: &Theme) -> Vec<Series> {
  let r = rsi(prices);
  let band = LineStyle::new(theme.rsi_band, 1);
  vec![
    Series::line("RSI", Pane::Oscillator, r.values, LineStyle::new(theme.rsi, 2))
      .grouped("rsi", true),
    Series::line("RSI lower", Pane::Oscillator, r.lower, band).grouped("rsi", false),
    Series::line("RSI upper", Pane::Oscillator, r.upper, band).grouped("rsi", false),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;

  const CHART: Rgb<u8> = Rgb([1, 2, 3]);
  const BANNER: Rgb<u8> = Rgb([9, 9, 9]);

  struct Solid;

  impl Renderer for Solid {
    fn render(&self, figure: &Figure) -> Result<RgbImage> {
      Ok(RgbImage::from_pixel(figure.layout.width, figure.layout.height, CHART))
    }
    fn render_banner(&self, banner: &Banner) -> Result<RgbImage> {
      Ok(RgbImage::from_pixel(banner.width, banner.height, BANNER))
    }
  }

  fn config() -> ChartConfig {
    ChartConfig {
      width: 40,
      height: 30,
      banner_height: 10,
      border_width: 2,
      margin: 0,
      ..Default::default()
    }
  }

  fn line(values: &[f64]) -> Collection<SingleValuePoint> {
    values
      .iter()
      .enumerate()
      .map(|(i, v)| SingleValuePoint::new(date(i as i64 * 60), *v, None))
      .collect()
  }

  fn candles(n: usize) -> Collection<OhlcPoint> {
    (0..n)
      .map(|i| {
        let base = 100.0 + (i as f64 * 0.7).sin() * 10.0;
        let volume = if i % 3 == 0 { None } else { Some(i as f64) };
        let (high, low, close) = (base + 2.0, base - 2.0, base + 1.0);
        OhlcPoint::new(date(i as i64 * 60), base, high, low, close, volume)
      })
      .collect()
  }

  fn all_overlays() -> ChartOptions {
    ChartOptions {
      average: true,
      bollinger: true,
      fibonacci: true,
      rsi: true,
      ..Default::default()
    }
  }

  #[test]
  fn increase_border_when_series_ends_higher() -> Result<()> {
    let theme = Theme::resolve("dark");
    assert_eq!(border_color(&line(&[10.0, 8.0, 12.0]), theme)?, theme.border_increase);
    assert_eq!(border_color(&line(&[10.0, 12.0, 10.0]), theme)?, theme.border_decrease);
    Ok(())
  }

  #[test]
  fn candle_border_compares_first_close_to_last_open() -> Result<()> {
    let theme = Theme::resolve("dark");
    // last close is higher, but its open is not
    let coll = Collection::from_points(vec![
      OhlcPoint::new(date(0), 9.0, 11.0, 8.0, 10.0, None),
      OhlcPoint::new(date(60), 10.0, 20.0, 9.0, 19.0, None),
    ]);
    assert_eq!(border_color(&coll, theme)?, theme.border_decrease);
    Ok(())
  }

  #[test]
  fn empty_collection_fails_before_rendering() {
    let config = config();
    let painter = ChartPainter::new(&Solid, &config);
    let res = painter.paint_line_chart(
      &Collection::new(),
      &AssetMeta::new("X"),
      &ChartOptions::default(),
    );
    assert!(matches!(res, Err(ChartError::EmptyCollection)));
  }

  #[test]
  fn line_chart_has_one_series_without_overlays() -> Result<()> {
    let config = config();
    let painter = ChartPainter::new(&Solid, &config);
    let fig = painter.line_figure(
      &line(&[1.0, 2.0, 3.0]),
      &AssetMeta::new("Coin"),
      &ChartOptions::default(),
    )?;
    assert_eq!(fig.series.len(), 1);
    assert_eq!(fig.series[0].name, "Coin");
    assert!(fig.annotations.is_empty());
    assert_eq!(fig.layout.panes.len(), 1);
    assert_eq!(fig.layout.panes[0].title, "Coin price ($)");
    assert_eq!(fig.layout.x_axis, XAxis::Time);
    assert_eq!(fig.layout.watermark, None);
    Ok(())
  }

  #[test]
  fn candlestick_figure_carries_every_overlay() -> Result<()> {
    let config = config();
    let painter = ChartPainter::new(&Solid, &config);
    let coll = candles(40);
    let options = ChartOptions {
      finance: true,
      watermark: Some("DEMO".into()),
      ..all_overlays()
    };
    let fig = painter.candlestick_figure(&coll, &AssetMeta::new("Coin"), &options)?;

    // candles, volume, average, 3 bollinger, 6 fibonacci, 3 rsi
    assert_eq!(fig.series.len(), 15);
    assert_eq!(fig.annotations.len(), 6);
    assert_eq!(fig.layout.x_axis, XAxis::Category);
    let panes: Vec<Pane> = fig.layout.panes.iter().map(|p| p.pane).collect();
    assert_eq!(panes, vec![Pane::Price, Pane::Oscillator, Pane::Volume]);
    assert_eq!(fig.layout.panes[2].title, "Volume ($)");
    assert_eq!(fig.series_in(Pane::Oscillator).count(), 3);

    let avg = fig.series_named("average").unwrap();
    assert_eq!(avg.start, 5);
    assert_eq!(avg.len(), 30);
    assert_eq!(avg.legend_group, Some("average"));

    let wm = fig.layout.watermark.as_ref().unwrap();
    assert_eq!(wm.text, "DEMO");
    assert_eq!(wm.opacity, 0.1);
    Ok(())
  }

  #[test]
  fn volume_bars_follow_close_direction() -> Result<()> {
    let config = config();
    let painter = ChartPainter::new(&Solid, &config);
    let coll = Collection::from_points(vec![
      OhlcPoint::new(date(0), 1.0, 2.0, 0.5, 1.5, Some(3.0)),
      OhlcPoint::new(date(60), 1.5, 3.0, 1.0, 2.5, None),
      OhlcPoint::new(date(120), 2.5, 2.6, 1.0, 1.2, Some(1.0)),
    ]);
    let theme = Theme::resolve("dark");
    let options = ChartOptions::default();
    let fig = painter.candlestick_figure(&coll, &AssetMeta::new("X"), &options)?;
    let bars = fig.series_named("volume").map(|s| &s.kind);
    let Some(SeriesKind::Bars { y, colors }) = bars else {
      panic!("no volume bars");
    };
    assert_eq!(y, &vec![3.0, 0.0, 1.0]);
    assert_eq!(colors, &vec![theme.decreasing, theme.increasing, theme.decreasing]);
    Ok(())
  }

  #[test]
  fn bollinger_on_line_chart_is_malformed() {
    let config = config();
    let painter = ChartPainter::new(&Solid, &config);
    let options = ChartOptions {
      bollinger: true,
      ..Default::default()
    };
    let res = painter.line_figure(&line(&[1.0, 2.0]), &AssetMeta::new("X"), &options);
    assert!(matches!(res, Err(ChartError::MalformedOptions(_))));
  }

  #[test]
  fn banner_and_border_grow_the_image() -> Result<()> {
    let config = config();
    let painter = ChartPainter::new(&Solid, &config);
    let theme = Theme::resolve("dark");
    let options = ChartOptions {
      banner: Some("Hello".into()),
      ..Default::default()
    };
    let coll = line(&[10.0, 8.0, 12.0]);
    let img = painter.paint_line_chart(&coll, &AssetMeta::new("X"), &options)?;
    assert_eq!(img.width(), 40 + 2 * 2);
    assert_eq!(img.height(), 30 + 10 + 2 * 2);
    assert_eq!(*img.get_pixel(0, 0), theme.border_increase.pixel());
    assert_eq!(*img.get_pixel(2, 2), BANNER);
    assert_eq!(*img.get_pixel(2, 12), CHART);
    Ok(())
  }

  #[test]
  fn no_banner_only_adds_border() -> Result<()> {
    let config = config();
    let painter = ChartPainter::new(&Solid, &config);
    let options = all_overlays();
    let img = painter.paint_candlestick(&candles(5), &AssetMeta::new("X"), &options)?;
    assert_eq!((img.width(), img.height()), (44, 34));
    assert_eq!(*img.get_pixel(2, 2), CHART);
    Ok(())
  }
}
