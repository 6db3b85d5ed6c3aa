use super::pretty_number;
use crate::prelude::*;

// fraction of the range below the high, with its label
const RETRACEMENTS: [(f64, &str); 4] =
  [(0.618, "62%"), (0.5, "50%"), (0.382, "38%"), (0.236, "23%")];

#[derive(Debug, Clone, PartialEq)]
pub struct FibonacciLevel {
  pub name: &'static str,
  pub value: f64,
  pub label: String,
  /// The lowest and top levels bound the range and are drawn heavier.
  pub main: bool,
}

impl FibonacciLevel {
  fn new(name: &'static str, value: f64, main: bool) -> Self {
    Self {
      name,
      value,
      label: format!("{}: {}", name, pretty_number(value)),
      main,
    }
  }
  /// The level repeated once per point of the charted series.
  pub fn line(&self, len: usize) -> Vec<f64> { vec![self.value; len] }
}

/// Retracement levels of `series`, from the lowest value up to the highest.
pub fn fibonacci_bands(series: &[f64]) -> Result<Vec<FibonacciLevel>> {
  if series.is_empty() {
    return Err(ChartError::EmptyCollection);
  }
  let lowest = series.iter().copied().fold(f64::INFINITY, f64::min);
  let highest = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
  let range = highest - lowest;

  let mut levels = Vec::with_capacity(RETRACEMENTS.len() + 2);
  levels.push(FibonacciLevel::new("lowest", lowest, true));
  for (fraction, name) in RETRACEMENTS {
    levels.push(FibonacciLevel::new(name, highest - range * fraction, false));
  }
  levels.push(FibonacciLevel::new("top", highest, true));
  Ok(levels)
}
