use chrono::{prelude::*, Duration};
use serde::{de, Deserialize, Deserializer};

const DATETIME_FORMAT: &str = "%m/%d/%y %H:%M";
const NAIVE_FORMATS: [&str; 3] =
  ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d"];

pub trait AsSecs {
  fn secs(&self) -> i64;
}

impl AsSecs for i64 {
  fn secs(&self) -> i64 { *self }
}
impl AsSecs for DateTime<Utc> {
  fn secs(&self) -> i64 { self.timestamp() }
}

pub trait SecsExtra {
  fn to_datetime(&self) -> Option<DateTime<Utc>>;
  fn to_human(&self) -> String;
}

impl SecsExtra for i64 {
  fn to_datetime(&self) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(*self, 0)
  }
  fn to_human(&self) -> String {
    match self.to_datetime() {
      Some(d) => d.format(DATETIME_FORMAT).to_string(),
      None => self.to_string(),
    }
  }
}

pub trait DateExtra {
  fn is_whole_second(&self) -> bool;
  fn tick_label(&self, span: Duration) -> String;
}

impl DateExtra for DateTime<Utc> {
  fn is_whole_second(&self) -> bool { self.timestamp_subsec_nanos() == 0 }
  fn tick_label(&self, span: Duration) -> String {
    self.format(tick_format(span)).to_string()
  }
}

/// Picks a tick label format from the width of the plotted date range.
pub fn tick_format(span: Duration) -> &'static str {
  match span {
    s if s <= Duration::days(2) => "%H:%M",
    s if s <= Duration::days(60) => "%b %d",
    s if s <= Duration::days(730) => "%b %Y",
    _ => "%Y",
  }
}

/// Parses the date shapes seen on the wire: RFC 3339, a naive date-time
/// taken as UTC, or a unix timestamp in seconds.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
  if let Ok(d) = DateTime::parse_from_rfc3339(raw) {
    return Some(d.with_timezone(&Utc));
  }
  for fmt in NAIVE_FORMATS {
    if let Ok(d) = NaiveDateTime::parse_from_str(raw, fmt) {
      return Some(d.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
      return d.and_hms_opt(0, 0, 0).map(|d| d.and_utc());
    }
  }
  raw.parse::<i64>().ok().and_then(|s| s.to_datetime())
}

pub fn deserialize_date<'de, D>(d: D) -> Result<DateTime<Utc>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawDate {
    Secs(i64),
    Fractional(f64),
    Text(String),
  }

  let parsed = match RawDate::deserialize(d)? {
    RawDate::Secs(s) => s.to_datetime(),
    RawDate::Fractional(s) => {
      DateTime::from_timestamp_millis((s * 1000.0).round() as i64)
    }
    RawDate::Text(s) => parse_date(&s),
  };
  parsed.ok_or_else(|| de::Error::custom("unrecognized date"))
}
