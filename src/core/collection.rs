use crate::prelude::*;
use serde::Deserializer;
use std::ops::Index;

/// Sum of the known volumes of a collection. `Unknown` when no point
/// carries a volume at all, which is not the same as a zero volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TotalVolume {
  Known(f64),
  Unknown,
}

impl TotalVolume {
  pub fn known(self) -> Option<f64> {
    match self {
      Self::Known(v) => Some(v),
      Self::Unknown => None,
    }
  }
}

/// Points of a single kind, kept in ascending date order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection<P> {
  coll: Vec<P>,
}

impl<P> Default for Collection<P> {
  fn default() -> Self { Self { coll: vec![] } }
}

impl<P: TradePoint> Collection<P> {
  pub fn new() -> Self { Self::default() }

  /// Takes every point at once and sorts a single time. Equal dates keep
  /// their relative order.
  pub fn from_points(mut points: Vec<P>) -> Self {
    points.sort_by_key(|p| p.date());
    Self { coll: points }
  }

  /// Inserts after every point with an equal or earlier date.
  pub fn add(&mut self, point: P) {
    let date = point.date();
    let at = self.coll.partition_point(|p| p.date() <= date);
    self.coll.insert(at, point);
  }

  pub fn first(&self) -> Result<&P> {
    self.coll.first().ok_or(ChartError::EmptyCollection)
  }
  pub fn last(&self) -> Result<&P> {
    self.coll.last().ok_or(ChartError::EmptyCollection)
  }
  pub fn size(&self) -> usize { self.coll.len() }
  pub fn is_empty(&self) -> bool { self.coll.is_empty() }
  pub fn points(&self) -> &[P] { &self.coll }
  pub fn iter(&self) -> std::slice::Iter<'_, P> { self.coll.iter() }

  pub fn total_volume(&self) -> TotalVolume {
    total_volume(&self.coll)
  }
  pub fn volumes(&self) -> Vec<Option<f64>> {
    self.coll.iter().map(|p| p.volume()).collect()
  }
  pub fn dates(&self) -> Vec<DateTime<Utc>> {
    self.coll.iter().map(|p| p.date()).collect()
  }
  pub fn prices(&self) -> Vec<f64> {
    self.coll.iter().map(|p| p.price()).collect()
  }

  pub fn closest_to(&self, date: DateTime<Utc>) -> Result<&P> {
    let mut closest: Option<(&P, Duration)> = None;
    for p in &self.coll {
      let distance = (p.date() - date).abs();
      match closest {
        Some((_, best)) if best <= distance => (),
        _ => closest = Some((p, distance)),
      }
    }
    closest.map(|(p, _)| p).ok_or(ChartError::EmptyCollection)
  }

  /// The first point recorded exactly at `ts` seconds. Points carrying a
  /// sub-second part never match.
  pub fn matching_at(&self, ts: i64) -> Result<&P> {
    self
      .coll
      .iter()
      .find(|p| {
        let d = p.date();
        d.secs() == ts && d.is_whole_second()
      })
      .ok_or(ChartError::NotFound(ts))
  }
}

pub(crate) fn total_volume<P: TradePoint>(points: &[P]) -> TotalVolume {
  points
    .iter()
    .filter_map(|p| p.volume())
    .fold(TotalVolume::Unknown, |total, v| match total {
      TotalVolume::Known(t) => TotalVolume::Known(t + v),
      TotalVolume::Unknown => TotalVolume::Known(v),
    })
}

fn check_len(expected: usize, found: usize) -> Result<()> {
  if expected != found {
    return Err(ChartError::LengthMismatch { expected, found });
  }
  Ok(())
}

impl Collection<OhlcPoint> {
  pub fn from_raw_values(
    opens: &[f64],
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    volumes: &[Option<f64>],
    dates: &[DateTime<Utc>],
  ) -> Result<Self> {
    let n = opens.len();
    for len in [highs.len(), lows.len(), closes.len(), volumes.len(), dates.len()] {
      check_len(n, len)?;
    }
    let points = (0..n)
      .map(|i| {
        OhlcPoint::new(dates[i], opens[i], highs[i], lows[i], closes[i], volumes[i])
      })
      .collect();
    Ok(Self::from_points(points))
  }

  pub fn highest(&self) -> Result<&OhlcPoint> {
    self
      .coll
      .iter()
      .reduce(|best, p| if p.high > best.high { p } else { best })
      .ok_or(ChartError::EmptyCollection)
  }
  pub fn lowest(&self) -> Result<&OhlcPoint> {
    self
      .coll
      .iter()
      .reduce(|best, p| if p.low < best.low { p } else { best })
      .ok_or(ChartError::EmptyCollection)
  }
  pub fn opens(&self) -> Vec<f64> { self.coll.iter().map(|p| p.open).collect() }
  pub fn highs(&self) -> Vec<f64> { self.coll.iter().map(|p| p.high).collect() }
  pub fn lows(&self) -> Vec<f64> { self.coll.iter().map(|p| p.low).collect() }
  pub fn closes(&self) -> Vec<f64> { self.coll.iter().map(|p| p.close).collect() }
}

impl Collection<SingleValuePoint> {
  pub fn from_raw_values(
    values: &[f64],
    volumes: &[Option<f64>],
    dates: &[DateTime<Utc>],
  ) -> Result<Self> {
    check_len(values.len(), volumes.len())?;
    check_len(values.len(), dates.len())?;
    let points = (0..values.len())
      .map(|i| SingleValuePoint::new(dates[i], values[i], volumes[i]))
      .collect();
    Ok(Self::from_points(points))
  }

  pub fn values(&self) -> Vec<f64> { self.coll.iter().map(|p| p.value).collect() }
}

impl<P> Index<usize> for Collection<P> {
  type Output = P;
  fn index(&self, i: usize) -> &P { &self.coll[i] }
}

impl<'a, P> IntoIterator for &'a Collection<P> {
  type Item = &'a P;
  type IntoIter = std::slice::Iter<'a, P>;
  fn into_iter(self) -> Self::IntoIter { self.coll.iter() }
}

impl<P: TradePoint> FromIterator<P> for Collection<P> {
  fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
    Self::from_points(iter.into_iter().collect())
  }
}

impl<'de, P> Deserialize<'de> for Collection<P>
where
  P: TradePoint + Deserialize<'de>,
{
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<P> {
      Wrapped { coll: Option<Vec<P>> },
      Bare(Vec<P>),
    }

    let points = match Raw::<P>::deserialize(d)? {
      Raw::Wrapped { coll } => coll.unwrap_or_default(),
      Raw::Bare(points) => points,
    };
    Ok(Self::from_points(points))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ohlc(secs: i64, open: f64, high: f64, low: f64, close: f64) -> OhlcPoint {
    OhlcPoint::new(date(secs), open, high, low, close, Some(1.0))
  }

  #[test]
  fn first_on_empty_collection_fails() {
    let c = Collection::<SingleValuePoint>::new();
    assert!(matches!(c.first(), Err(ChartError::EmptyCollection)));
    assert!(matches!(c.last(), Err(ChartError::EmptyCollection)));
    assert!(matches!(c.closest_to(date(0)), Err(ChartError::EmptyCollection)));
    assert_eq!(c.total_volume(), TotalVolume::Unknown);
  }

  #[test]
  fn add_keeps_dates_ascending() -> Result<()> {
    let mut c = Collection::new();
    for secs in [30, 10, 20, 5, 25] {
      c.add(SingleValuePoint::new(date(secs), secs as f64, None));
    }
    let secs: Vec<i64> = c.dates().iter().map(|d| d.timestamp()).collect();
    assert_eq!(secs, vec![5, 10, 20, 25, 30]);
    assert_eq!(c.first()?.value, 5.0);
    assert_eq!(c.last()?.value, 30.0);
    assert_eq!(c.size(), 5);
    Ok(())
  }

  #[test]
  fn duplicate_dates_keep_insertion_order() {
    let mut c = Collection::new();
    c.add(SingleValuePoint::new(date(10), 1.0, None));
    c.add(SingleValuePoint::new(date(10), 2.0, None));
    c.add(SingleValuePoint::new(date(5), 0.0, None));
    c.add(SingleValuePoint::new(date(10), 3.0, None));
    assert_eq!(c.values(), vec![0.0, 1.0, 2.0, 3.0]);

    let sorted = Collection::from_points(vec![
      SingleValuePoint::new(date(10), 1.0, None),
      SingleValuePoint::new(date(5), 0.0, None),
      SingleValuePoint::new(date(10), 2.0, None),
    ]);
    assert_eq!(sorted.values(), vec![0.0, 1.0, 2.0]);
  }

  #[test]
  fn total_volume_distinguishes_unknown_from_zero() {
    let unknown = Collection::from_points(vec![
      SingleValuePoint::new(date(1), 1.0, None),
      SingleValuePoint::new(date(2), 1.0, None),
    ]);
    assert_eq!(unknown.total_volume(), TotalVolume::Unknown);

    let zero = Collection::from_points(vec![
      SingleValuePoint::new(date(1), 1.0, Some(0.0)),
      SingleValuePoint::new(date(2), 1.0, None),
    ]);
    assert_eq!(zero.total_volume(), TotalVolume::Known(0.0));

    let some = Collection::from_points(vec![
      SingleValuePoint::new(date(1), 1.0, Some(2.5)),
      SingleValuePoint::new(date(2), 1.0, None),
      SingleValuePoint::new(date(3), 1.0, Some(4.0)),
    ]);
    assert_eq!(some.total_volume(), TotalVolume::Known(6.5));
    assert_eq!(some.volumes(), vec![Some(2.5), None, Some(4.0)]);
  }

  #[test]
  fn closest_to_breaks_ties_by_sort_order() -> Result<()> {
    let c = Collection::from_points(vec![
      SingleValuePoint::new(date(10), 1.0, None),
      SingleValuePoint::new(date(20), 2.0, None),
      SingleValuePoint::new(date(40), 3.0, None),
    ]);
    assert_eq!(c.closest_to(date(15))?.value, 1.0);
    assert_eq!(c.closest_to(date(16))?.value, 2.0);
    assert_eq!(c.closest_to(date(1000))?.value, 3.0);
    assert_eq!(c.closest_to(date(-5))?.value, 1.0);
    Ok(())
  }

  #[test]
  fn matching_at_finds_exact_seconds() -> Result<()> {
    let c = Collection::from_points(vec![
      SingleValuePoint::new(date(10), 1.0, None),
      SingleValuePoint::new(date(20) + Duration::milliseconds(500), 2.0, None),
    ]);
    assert_eq!(c.matching_at(10)?.value, 1.0);
    assert!(matches!(c.matching_at(20), Err(ChartError::NotFound(20))));
    assert!(matches!(c.matching_at(11), Err(ChartError::NotFound(11))));
    Ok(())
  }

  #[test]
  fn ohlc_projections() -> Result<()> {
    let c = Collection::from_points(vec![
      ohlc(2, 2.0, 9.0, 1.5, 3.0),
      ohlc(1, 1.0, 4.0, 0.5, 2.0),
      ohlc(3, 3.0, 9.0, 0.5, 2.5),
    ]);
    assert_eq!(c.opens(), vec![1.0, 2.0, 3.0]);
    assert_eq!(c.highs(), vec![4.0, 9.0, 9.0]);
    assert_eq!(c.lows(), vec![0.5, 1.5, 0.5]);
    assert_eq!(c.closes(), vec![2.0, 3.0, 2.5]);
    assert_eq!(c.prices(), c.closes());
    // ties resolve to the earliest point
    assert_eq!(c.highest()?.date, date(2));
    assert_eq!(c.lowest()?.date, date(1));
    Ok(())
  }

  #[test]
  fn from_raw_values_checks_lengths() -> Result<()> {
    let dates = [date(2), date(1)];
    let c = Collection::<SingleValuePoint>::from_raw_values(
      &[20.0, 10.0],
      &[None, Some(1.0)],
      &dates,
    )?;
    assert_eq!(c.values(), vec![10.0, 20.0]);

    let err = Collection::<SingleValuePoint>::from_raw_values(&[1.0], &[], &dates);
    assert!(matches!(
      err,
      Err(ChartError::LengthMismatch {
        expected: 1,
        found: 0
      })
    ));

    let err = Collection::<OhlcPoint>::from_raw_values(
      &[1.0, 2.0],
      &[1.0, 2.0],
      &[1.0],
      &[1.0, 2.0],
      &[None, None],
      &dates,
    );
    assert!(matches!(err, Err(ChartError::LengthMismatch { .. })));
    Ok(())
  }

  #[test]
  fn deserializes_wrapped_and_bare() -> anyhow::Result<()> {
    let c: Collection<SingleValuePoint> = serde_json::from_str(
      r#"{"coll": [{"date": 20, "value": 2.0}, {"date": 10, "value": 1.0}]}"#,
    )?;
    assert_eq!(c.values(), vec![1.0, 2.0]);

    let c: Collection<SingleValuePoint> =
      serde_json::from_str(r#"[{"date": 10, "value": 1.0}]"#)?;
    assert_eq!(c.size(), 1);

    let c: Collection<OhlcPoint> = serde_json::from_str(r#"{"coll": null}"#)?;
    assert!(c.is_empty());
    let c: Collection<OhlcPoint> = serde_json::from_str("{}")?;
    assert!(c.is_empty());
    Ok(())
  }
}
