//! Compiled-in monitor configuration
//!
//! Feed names can be overridden at build time:
//!
//! ```text
//! INKSTAT_TEMP_FEED=office-temp INKSTAT_HUMIDITY_FEED=office-rh \
//!     cargo build -p inkstat-firmware --release --target thumbv6m-none-eabi
//! ```
//!
//! Network credentials live on the bridge and never pass through here.

use inkstat_core::config::{
    ConfigError, MonitorConfig, DEFAULT_HUMIDITY_FEED, DEFAULT_TEMPERATURE_FEED,
};

const TEMPERATURE_FEED: &str = match option_env!("INKSTAT_TEMP_FEED") {
    Some(name) => name,
    None => DEFAULT_TEMPERATURE_FEED,
};

const HUMIDITY_FEED: &str = match option_env!("INKSTAT_HUMIDITY_FEED") {
    Some(name) => name,
    None => DEFAULT_HUMIDITY_FEED,
};

/// Build the monitor configuration and check it against the panel
pub fn monitor_config(width: u32, height: u32) -> Result<MonitorConfig, ConfigError> {
    #[allow(unused_mut)]
    let mut config = MonitorConfig::default().with_feeds(TEMPERATURE_FEED, HUMIDITY_FEED)?;

    #[cfg(feature = "fast-refresh")]
    {
        config.render_interval_ms = inkstat_core::config::FAST_RENDER_INTERVAL_MS;
    }

    config.validate(width, height)?;
    Ok(config)
}
