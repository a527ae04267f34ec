pub mod config;
pub mod logging;

pub mod checksum;
pub mod decode;
pub mod error;
pub mod fetcher;
pub mod pool;
pub mod record;
pub mod retry;
pub mod telemetry;
