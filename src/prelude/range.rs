use std::ops::Range;

pub trait BucketRange<T> {
  fn num_buckets(&self, size: usize) -> usize;
  fn buckets(&self, size: usize) -> Vec<T>;
}

impl BucketRange<Range<usize>> for Range<usize> {
  fn num_buckets(&self, size: usize) -> usize {
    if size == 0 {
      return 0;
    }
    self.len().div_ceil(size)
  }
  // the last bucket is cut short at `self.end`
  fn buckets(&self, size: usize) -> Vec<Range<usize>> {
    if size == 0 {
      return vec![];
    }
    let mut result = Vec::with_capacity(self.num_buckets(size));
    for i in self.clone().step_by(size) {
      result.push(i..(i + size).min(self.end))
    }
    result
  }
}
