use crate::prelude::*;
use serde::{
  de::{self, DeserializeOwned},
  Deserializer,
};
use serde_json::Value;

/// A paint request. Each part may be sent inline or as a string holding
/// its JSON.
#[derive(Deserialize, Debug)]
#[serde(bound(deserialize = "Collection<P>: DeserializeOwned"))]
pub struct ChartRequest<P> {
  #[serde(deserialize_with = "embedded")]
  pub datas: Collection<P>,
  #[serde(rename = "tokenInfo", alias = "token_info", deserialize_with = "embedded")]
  pub token_info: AssetMeta,
  #[serde(default, deserialize_with = "embedded")]
  pub options: ChartOptions,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Greeting {
  pub message: String,
}

fn embedded<'de, D, T>(d: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  match Value::deserialize(d)? {
    Value::String(raw) => serde_json::from_str(&raw).map_err(de::Error::custom),
    value => serde_json::from_value(value).map_err(de::Error::custom),
  }
}
