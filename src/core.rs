pub mod collection;
pub use collection::{Collection, TotalVolume};
pub mod point;
pub use point::*;
pub mod regroup;
pub use regroup::Aggregate;
pub mod meta;
pub use meta::*;
