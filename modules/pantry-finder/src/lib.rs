//! Display-state derivation for the location list: availability, distance,
//! filtering, ordering and per-filter counts.

pub mod count;
pub mod dataset;
pub mod display;
pub mod timeline;

pub use count::approximate_count;
pub use dataset::{load_locations, parse_locations, resolve_data_path, EXAMPLE_DATA_PATH};
pub use display::*;
pub use timeline::*;
