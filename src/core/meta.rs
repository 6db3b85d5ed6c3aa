use crate::prelude::*;

fn dollar() -> String { "$".into() }

/// Display details of the charted asset.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AssetMeta {
  pub name: String,
  #[serde(default)]
  pub ticker: Option<String>,
  #[serde(default = "dollar")]
  pub quote_currency: String,
  #[serde(default = "dollar")]
  pub volume_currency: String,
}

impl AssetMeta {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ticker: None,
      quote_currency: dollar(),
      volume_currency: dollar(),
    }
  }
  pub fn price_title(&self) -> String {
    format!("{} price ({})", self.name, self.quote_currency)
  }
  pub fn volume_title(&self) -> String {
    format!("Volume ({})", self.volume_currency)
  }
}
