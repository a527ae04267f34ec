//! Config command: print where the config lives and what it resolves to.

use anyhow::Result;
use mailfetch_core::config::{self, MailfetchConfig};

pub fn run_config(cfg: &MailfetchConfig) -> Result<()> {
    let settings = cfg.fetch.to_settings()?;
    println!("config file:        {}", config::config_path()?.display());
    println!("max timeout errors: {}", settings.max_timeout_errors);
    println!("base delay:         {:?}", settings.base_delay);
    println!("max delay:          {:?}", settings.max_delay);
    println!("decode buffer:      {} bytes", cfg.decode_buffer_bytes());
    Ok(())
}
