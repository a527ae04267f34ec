//! CLI command handlers, one per file.

mod checksum;
mod config;
mod decode;

pub use checksum::run_checksum;
pub use config::run_config;
pub use decode::run_decode;
