use crate::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: f64,
}

impl Color {
  pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Self { r, g, b, a: 1.0 } }
  pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self { Self { r, g, b, a } }
  pub const fn hex(hex: u32) -> Self {
    Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
  }
  pub fn with_alpha(self, a: f64) -> Self { Self { a, ..self } }
  pub fn pixel(&self) -> image::Rgb<u8> { image::Rgb([self.r, self.g, self.b]) }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
  pub name: &'static str,
  pub background: Color,
  pub text: Color,
  pub grid: Color,
  pub line: Color,
  pub banner_background: Color,
  pub banner_text: Color,
  pub banner_font_size: u32,
  pub increasing: Color,
  pub decreasing: Color,
  pub border_increase: Color,
  pub border_decrease: Color,
  pub watermark: Color,
  pub average: Color,
  pub bollinger_middle: Color,
  pub bollinger_upper: Color,
  pub bollinger_lower: Color,
  pub fibonacci: Color,
  pub fibonacci_main: Color,
  pub rsi: Color,
  pub rsi_band: Color,
}

const INCREASING: Color = Color::hex(0x228B22);
const DECREASING: Color = Color::hex(0xFF0000);

lazy_static! {
  static ref DARK: Theme = Theme {
    name: "dark",
    background: Color::rgb(17, 17, 17),
    text: Color::rgb(242, 245, 250),
    grid: Color::rgb(40, 52, 66),
    line: Color::hex(0x8246E5),
    banner_background: Color::rgb(36, 36, 36),
    banner_text: Color::rgb(255, 255, 255),
    banner_font_size: 40,
    increasing: INCREASING,
    decreasing: DECREASING,
    border_increase: INCREASING,
    border_decrease: DECREASING,
    watermark: Color::rgb(255, 255, 255),
    average: Color::hex(0xFFA500),
    bollinger_middle: Color::rgba(255, 20, 147, 0.5),
    bollinger_upper: Color::rgba(255, 0, 0, 0.5),
    bollinger_lower: Color::rgba(34, 139, 34, 0.5),
    fibonacci: Color::rgba(169, 169, 169, 0.5),
    fibonacci_main: Color::rgb(220, 220, 220),
    rsi: Color::hex(0x8246E5),
    rsi_band: Color::rgba(169, 169, 169, 0.7),
  };
  static ref WHITE: Theme = Theme {
    name: "white",
    background: Color::rgb(250, 250, 250),
    text: Color::rgb(42, 63, 95),
    grid: Color::rgb(223, 228, 234),
    line: Color::hex(0x8246E5),
    banner_background: Color::rgb(255, 255, 255),
    banner_text: Color::rgb(0, 0, 0),
    banner_font_size: 40,
    watermark: Color::rgb(40, 40, 40),
    fibonacci_main: Color::rgb(0, 0, 0),
    ..DARK.clone()
  };
  static ref THEMES: HashMap<&'static str, &'static Theme> = {
    let mut themes = HashMap::new();
    themes.insert(DARK.name, &*DARK);
    themes.insert(WHITE.name, &*WHITE);
    themes
  };
}

impl Theme {
  /// Looks a theme up by name, case-insensitively. Unknown names get the
  /// dark theme.
  pub fn resolve(name: &str) -> &'static Theme {
    THEMES
      .get(name.to_lowercase().as_str())
      .copied()
      .unwrap_or(&*DARK)
  }
}
