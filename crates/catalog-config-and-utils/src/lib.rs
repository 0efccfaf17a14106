//! Configuration, paths, catalog files and logging setup for the catalog binaries.

mod catalog_file;
mod config;
mod error;
mod logging;
mod paths;

pub use catalog_file::{catalog_from_json, catalog_to_json, load_catalog};
pub use config::{Config, DEFAULT_LOG_LEVEL};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
