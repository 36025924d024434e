pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{FileConfig, OutputFormat, ProbeConfig, RunConfig, Stream};
