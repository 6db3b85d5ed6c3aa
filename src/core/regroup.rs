use super::collection::total_volume;
use crate::prelude::*;

/// Folds a non-empty run of consecutive points into one coarser point.
pub trait Aggregate: TradePoint {
  fn aggregate(chunk: &[Self]) -> Self;
}

impl Aggregate for OhlcPoint {
  fn aggregate(chunk: &[Self]) -> Self {
    let (first, last) = (&chunk[0], &chunk[chunk.len() - 1]);
    let mut high = first.high;
    let mut low = first.low;
    for p in &chunk[1..] {
      high = high.max(p.high);
      low = low.min(p.low);
    }
    OhlcPoint {
      date: first.date,
      volume: total_volume(chunk).known(),
      open: first.open,
      high,
      low,
      close: last.close,
    }
  }
}

impl Aggregate for SingleValuePoint {
  fn aggregate(chunk: &[Self]) -> Self {
    SingleValuePoint {
      date: chunk[0].date,
      volume: total_volume(chunk).known(),
      value: chunk[0].value,
    }
  }
}

impl<P: Aggregate> Collection<P> {
  /// Merges every `bucket_size` consecutive points into one. The last bucket
  /// holds the remainder.
  pub fn regroup(&self, bucket_size: usize) -> Result<Self> {
    if bucket_size == 0 {
      return Err(ChartError::InvalidBucketSize(bucket_size));
    }
    let points = self.points();
    let mut new_coll = Collection::new();
    for bucket in (0..points.len()).buckets(bucket_size) {
      new_coll.add(P::aggregate(&points[bucket]));
    }
    debug!(
      "regrouped {} points into {} buckets of {}",
      points.len(),
      new_coll.size(),
      bucket_size
    );
    Ok(new_coll)
  }
}
