pub mod config;
pub mod loader;
pub mod schema;

pub use config::load_mixer_config;
pub use loader::{Catalog, DataLoadError, default_catalog, load_catalog};
