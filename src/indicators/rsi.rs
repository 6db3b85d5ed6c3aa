pub const RSI_PERIOD: usize = 14;
pub const RSI_LOWER: f64 = 30.0;
pub const RSI_UPPER: f64 = 70.0;

// first index with a defined value
const RSI_WARMUP: usize = 15;
const LOSS_EPSILON: f64 = 0.00001;

#[derive(Debug, Clone, PartialEq)]
pub struct Rsi {
  pub values: Vec<f64>,
  pub lower: Vec<f64>,
  pub upper: Vec<f64>,
}

/// 14 period relative strength index with its 30/70 reference lines.
///
/// Averages are plain means over the last 14 movements, with no Wilder
/// smoothing. A window without any loss divides by a tiny epsilon instead of
/// zero.
pub fn rsi(closes: &[f64]) -> Rsi {
  let n = closes.len();
  let mut up = vec![0f64; n];
  let mut down = vec![0f64; n];
  for i in 1..n {
    let delta = closes[i] - closes[i - 1];
    match delta {
      d if d > 0.0 => up[i] = d,
      d => down[i] = d,
    }
  }

  let mut values = vec![f64::NAN; n];
  for i in RSI_WARMUP..n {
    let window = (i + 1 - RSI_PERIOD)..=i;
    let avg_gain = up[window.clone()].iter().sum::<f64>() / RSI_PERIOD as f64;
    let mut avg_loss =
      down[window].iter().map(|d| d.abs()).sum::<f64>() / RSI_PERIOD as f64;
    if avg_loss == 0.0 {
      avg_loss = LOSS_EPSILON;
    }
    values[i] = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
  }

  Rsi {
    values,
    lower: vec![RSI_LOWER; n],
    upper: vec![RSI_UPPER; n],
  }
}
