use crate::prelude::*;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STD_MULTIPLIER: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
  pub middle: Vec<f64>,
  pub upper: Vec<f64>,
  pub lower: Vec<f64>,
}

/// Bands around the rolling mean of the typical price `(h + l + c) / 3`,
/// `std_multiplier` sample standard deviations wide. The first
/// `period - 1` entries of every band are undefined.
pub fn bollinger_bands(
  highs: &[f64],
  lows: &[f64],
  closes: &[f64],
  period: usize,
  std_multiplier: f64,
) -> Result<BollingerBands> {
  if period == 0 {
    return Err(ChartError::InvalidWindow(period));
  }
  let n = closes.len();
  for len in [highs.len(), lows.len()] {
    if len != n {
      return Err(ChartError::LengthMismatch {
        expected: n,
        found: len,
      });
    }
  }

  let typical: Vec<f64> = (0..n)
    .map(|i| (highs[i] + lows[i] + closes[i]) / 3.0)
    .collect();

  let mut bands = BollingerBands {
    middle: vec![f64::NAN; n],
    upper: vec![f64::NAN; n],
    lower: vec![f64::NAN; n],
  };
  for end in period..=n {
    let window = &typical[end - period..end];
    let mean = window.iter().sum::<f64>() / period as f64;
    let std = sample_std(window, mean);
    let width = std * std_multiplier;
    let i = end - 1;
    bands.middle[i] = mean;
    bands.upper[i] = mean + width;
    bands.lower[i] = mean - width;
  }
  Ok(bands)
}

// n - 1 denominator; a single sample has no spread to measure
fn sample_std(window: &[f64], mean: f64) -> f64 {
  if window.len() < 2 {
    return f64::NAN;
  }
  let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
    / (window.len() - 1) as f64;
  variance.sqrt()
}
