//! Indicator math over plain price slices. Every function is pure and
//! returns series aligned with its input, `f64::NAN` where a value is not
//! yet defined.

pub mod bollinger;
pub mod fibonacci;
pub mod moving_average;
pub mod pretty;
pub mod rsi;

pub use bollinger::{bollinger_bands, BollingerBands};
pub use fibonacci::{fibonacci_bands, FibonacciLevel};
pub use moving_average::{edge_trim, moving_average};
pub use pretty::pretty_number;
pub use rsi::{rsi, Rsi};

#[cfg(test)]
pub(crate) fn assert_close(a: f64, b: f64) {
  assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}
