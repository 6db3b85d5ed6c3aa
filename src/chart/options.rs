use crate::prelude::*;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageKind {
  #[default]
  #[serde(rename = "PNG", alias = "png")]
  Png,
  #[serde(rename = "JPEG", alias = "jpeg", alias = "JPG", alias = "jpg")]
  Jpeg,
}

impl ImageKind {
  pub fn content_type(&self) -> &'static str {
    match self {
      Self::Png => "image/png",
      Self::Jpeg => "image/jpeg",
    }
  }
}

impl From<ImageKind> for image::ImageFormat {
  fn from(kind: ImageKind) -> Self {
    match kind {
      ImageKind::Png => image::ImageFormat::Png,
      ImageKind::Jpeg => image::ImageFormat::Jpeg,
    }
  }
}

/// Per request toggles. Field aliases accept the spellings older clients
/// send.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChartOptions {
  pub theme_name: String,
  #[serde(alias = "bollinger_bands", alias = "boillinger_bands")]
  pub bollinger: bool,
  #[serde(alias = "fibonacci_bands", alias = "fibonnaci_bands")]
  pub fibonacci: bool,
  pub rsi: bool,
  pub average: bool,
  pub finance: bool,
  #[serde(alias = "upper_part_text")]
  pub banner: Option<String>,
  pub watermark: Option<String>,
  #[serde(alias = "save_type", alias = "format")]
  pub image_format: ImageKind,
}

impl Default for ChartOptions {
  fn default() -> Self {
    Self {
      theme_name: "dark".into(),
      bollinger: false,
      fibonacci: false,
      rsi: false,
      average: false,
      finance: false,
      banner: None,
      watermark: None,
      image_format: ImageKind::Png,
    }
  }
}

fn non_blank(text: &Option<String>) -> Option<&str> {
  text.as_deref().filter(|t| !t.trim().is_empty())
}

impl ChartOptions {
  pub fn theme(&self) -> &'static Theme { Theme::resolve(&self.theme_name) }
  pub fn banner_text(&self) -> Option<&str> { non_blank(&self.banner) }
  pub fn watermark_text(&self) -> Option<&str> { non_blank(&self.watermark) }
}
