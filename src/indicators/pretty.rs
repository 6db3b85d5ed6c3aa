/// Formats a price for a chart label. Large magnitudes become space grouped
/// integers, everyday prices keep three decimals and tiny ones six.
pub fn pretty_number(num: f64) -> String {
  let rounded = num.round();
  if rounded.abs() > 10.0 {
    group_thousands(rounded as i64)
  } else if num > 0.01 && num < 10.01 {
    format!("{:.3}", num)
  } else {
    format!("{:.6}", num)
  }
}

// 1234567 => "1 234 567"
fn group_thousands(n: i64) -> String {
  let digits = n.unsigned_abs().to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
  if n < 0 {
    out.push('-');
  }
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(' ');
    }
    out.push(c);
  }
  out
}
