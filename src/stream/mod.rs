pub mod flat_map_latest;

pub use flat_map_latest::{FlatMapLatest, flat_map_latest};
