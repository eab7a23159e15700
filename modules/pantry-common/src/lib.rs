pub mod config;
pub mod error;
pub mod file_config;
pub mod geo;
pub mod location;
pub mod region;
pub mod zip;

pub use config::Config;
pub use error::FinderError;
pub use geo::*;
pub use location::*;
pub use region::*;
pub use zip::*;
