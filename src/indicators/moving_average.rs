use crate::prelude::*;

pub const DEFAULT_WINDOW: usize = 10;

/// Centered simple moving average: a "same" length convolution of `values`
/// with `window` equal weights. Near both edges the kernel overhangs the
/// series and the missing samples count as zero, so the first and last
/// `edge_trim(window)` values are biased toward zero.
pub fn moving_average(values: &[f64], window: usize) -> Result<Vec<f64>> {
  if window == 0 {
    return Err(ChartError::InvalidWindow(window));
  }
  let n = values.len();
  let weight = 1.0 / window as f64;
  let offset = (window - 1) / 2;

  // running prefix sums make every output O(1)
  let mut prefix = Vec::with_capacity(n + 1);
  prefix.push(0f64);
  for v in values {
    prefix.push(prefix[prefix.len() - 1] + v);
  }

  let out = (0..n)
    .map(|i| {
      // full convolution index k covers values[k + 1 - window ..= k]
      let k = i + offset;
      let hi = (k + 1).min(n);
      let lo = (k + 1).saturating_sub(window).min(hi);
      (prefix[hi] - prefix[lo]) * weight
    })
    .collect();
  Ok(out)
}

/// Number of points to drop at each end of a moving average of `window`.
pub fn edge_trim(window: usize) -> usize { window / 2 }

#[cfg(test)]
mod tests {
  use super::*;
  use crate::indicators::assert_close;
  use quickcheck_macros::quickcheck;

  #[test]
  fn matches_same_mode_convolution() -> Result<()> {
    // numpy.convolve([1, 2, 3, 4, 5], [1/3] * 3, "same")
    let out = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3)?;
    let expected = [1.0, 2.0, 3.0, 4.0, 3.0];
    for (a, b) in out.iter().zip(expected) {
      assert_close(*a, b);
    }
    Ok(())
  }

  #[test]
  fn even_window_leans_left() -> Result<()> {
    // numpy.convolve([1, 2, 3, 4], [0.5, 0.5], "same")
    let out = moving_average(&[1.0, 2.0, 3.0, 4.0], 2)?;
    let expected = [0.5, 1.5, 2.5, 3.5];
    for (a, b) in out.iter().zip(expected) {
      assert_close(*a, b);
    }
    Ok(())
  }

  #[test]
  fn interior_of_constant_series_is_constant() -> Result<()> {
    let out = moving_average(&[4.0; 30], DEFAULT_WINDOW)?;
    let trim = edge_trim(DEFAULT_WINDOW);
    assert!(out[trim..30 - trim].iter().all(|v| (v - 4.0).abs() < 1e-9));
    assert!(out[0] < 4.0);
    assert!(out[29] < 4.0);
    Ok(())
  }

  #[test]
  fn zero_window_is_rejected() {
    assert!(matches!(
      moving_average(&[1.0], 0),
      Err(ChartError::InvalidWindow(0))
    ));
  }

  #[quickcheck]
  fn keeps_input_length(raw: Vec<i32>, window: u8) -> bool {
    let values: Vec<f64> = raw.iter().map(|v| *v as f64).collect();
    let window = window as usize % 32 + 1;
    matches!(moving_average(&values, window), Ok(out) if out.len() == values.len())
  }
}
