use crate::prelude::*;

/// A single price observation.
pub trait TradePoint: Clone {
  fn date(&self) -> DateTime<Utc>;
  fn volume(&self) -> Option<f64>;
  /// The value indicators are computed from.
  fn price(&self) -> f64;
  /// Compared against `reference_end` of the latest point to pick the
  /// border colour.
  fn reference_start(&self) -> f64;
  fn reference_end(&self) -> f64;
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct OhlcPoint {
  #[serde(deserialize_with = "deserialize_date")]
  pub date: DateTime<Utc>,
  #[serde(default)]
  pub volume: Option<f64>,
  #[serde(alias = "v_open")]
  pub open: f64,
  #[serde(alias = "v_high")]
  pub high: f64,
  #[serde(alias = "v_low")]
  pub low: f64,
  #[serde(alias = "v_close")]
  pub close: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SingleValuePoint {
  #[serde(deserialize_with = "deserialize_date")]
  pub date: DateTime<Utc>,
  #[serde(default)]
  pub volume: Option<f64>,
  pub value: f64,
}

impl OhlcPoint {
  pub fn new(
    date: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: Option<f64>,
  ) -> Self {
    Self {
      date,
      volume,
      open,
      high,
      low,
      close,
    }
  }
  pub fn is_increasing(&self) -> bool { self.close > self.open }
}

impl SingleValuePoint {
  pub fn new(date: DateTime<Utc>, value: f64, volume: Option<f64>) -> Self {
    Self {
      date,
      volume,
      value,
    }
  }
}

impl TradePoint for OhlcPoint {
  fn date(&self) -> DateTime<Utc> { self.date }
  fn volume(&self) -> Option<f64> { self.volume }
  fn price(&self) -> f64 { self.close }
  fn reference_start(&self) -> f64 { self.close }
  // the latest candle is compared by its open, not its close
  fn reference_end(&self) -> f64 { self.open }
}

impl TradePoint for SingleValuePoint {
  fn date(&self) -> DateTime<Utc> { self.date }
  fn volume(&self) -> Option<f64> { self.volume }
  fn price(&self) -> f64 { self.value }
  fn reference_start(&self) -> f64 { self.value }
  fn reference_end(&self) -> f64 { self.value }
}
