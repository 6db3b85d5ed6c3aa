mod range;
mod time;

pub use crate::{
  chart::*,
  core::*,
  error::{ChartError, Result},
  indicators,
};
pub use chrono::{DateTime, Duration, TimeZone, Utc};
pub use log::{debug, info, warn};
pub use range::*;
pub use serde::{Deserialize, Serialize};
pub use time::*;

#[cfg(test)]
pub fn date(secs: i64) -> DateTime<Utc> {
  DateTime::from_timestamp(secs, 0).expect("timestamp in range")
}
