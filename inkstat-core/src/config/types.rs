//! Configuration type definitions

use heapless::String;
use inkstat_protocol::{FeedId, MAX_FEED_NAME_LEN};

use crate::clock::{Interval, ONE_MINUTE, ONE_SECOND};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How often the remote session is serviced
pub const DEFAULT_PUMP_INTERVAL_MS: Interval = 5 * ONE_SECOND;

/// How often feed values are requested
pub const DEFAULT_POLL_INTERVAL_MS: Interval = ONE_MINUTE;

/// How often the display may refresh (e-paper wears with every refresh)
pub const DEFAULT_RENDER_INTERVAL_MS: Interval = 5 * ONE_MINUTE;

/// Render interval used while developing the layout
pub const FAST_RENDER_INTERVAL_MS: Interval = 20 * ONE_SECOND;

/// Delay between connection status checks at startup
pub const DEFAULT_CONNECT_RETRY_DELAY_MS: u32 = 2000;

/// Placeholder reading before any value arrives
///
/// A nearly impossible temperature and a definitely impossible humidity.
pub const DEFAULT_SENTINEL: f32 = -50.0;

/// Border width in pixels
pub const DEFAULT_BORDER_WIDTH: u16 = 3;

/// Text magnification (1 = 6x8 pixel character cells)
pub const DEFAULT_TEXT_SCALE: u8 = 5;

/// Default remote feed names
pub const DEFAULT_TEMPERATURE_FEED: &str = "temperature-c";
pub const DEFAULT_HUMIDITY_FEED: &str = "humidity";

// Defaults must pass `feed_name`
const _: () = assert!(
    !DEFAULT_TEMPERATURE_FEED.is_empty()
        && DEFAULT_TEMPERATURE_FEED.len() <= MAX_FEED_NAME_LEN
        && !DEFAULT_HUMIDITY_FEED.is_empty()
        && DEFAULT_HUMIDITY_FEED.len() <= MAX_FEED_NAME_LEN
);

/// Configuration problems detected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Border leaves no room inside the surface (needs `W, H > 2 * border`)
    BorderTooWide,
    /// Text scale of zero draws nothing
    ZeroTextScale,
    /// A feed name is empty
    EmptyFeedName,
    /// A feed name exceeds the protocol limit
    FeedNameTooLong,
}

/// Monitor configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorConfig {
    /// Service-pump interval (ms)
    pub pump_interval_ms: Interval,
    /// Feed poll interval (ms)
    pub poll_interval_ms: Interval,
    /// Display render interval (ms)
    pub render_interval_ms: Interval,
    /// Delay between startup connection checks (ms)
    pub connect_retry_delay_ms: u32,
    /// Reading value meaning "nothing received yet"
    pub sentinel: f32,
    /// Border width (px)
    pub border_width: u16,
    /// Text magnification
    pub text_scale: u8,
    /// Remote feed carrying the temperature
    pub temperature_feed: String<MAX_FEED_NAME_LEN>,
    /// Remote feed carrying the humidity
    pub humidity_feed: String<MAX_FEED_NAME_LEN>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            pump_interval_ms: DEFAULT_PUMP_INTERVAL_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            render_interval_ms: DEFAULT_RENDER_INTERVAL_MS,
            connect_retry_delay_ms: DEFAULT_CONNECT_RETRY_DELAY_MS,
            sentinel: DEFAULT_SENTINEL,
            border_width: DEFAULT_BORDER_WIDTH,
            text_scale: DEFAULT_TEXT_SCALE,
            temperature_feed: feed_name(DEFAULT_TEMPERATURE_FEED).unwrap_or_default(),
            humidity_feed: feed_name(DEFAULT_HUMIDITY_FEED).unwrap_or_default(),
        }
    }
}

impl MonitorConfig {
    /// Replace both feed names
    pub fn with_feeds(mut self, temperature: &str, humidity: &str) -> Result<Self, ConfigError> {
        self.temperature_feed = feed_name(temperature)?;
        self.humidity_feed = feed_name(humidity)?;
        Ok(self)
    }

    /// Remote feed name for a feed
    pub fn feed_name(&self, feed: FeedId) -> &str {
        match feed {
            FeedId::Temperature => self.temperature_feed.as_str(),
            FeedId::Humidity => self.humidity_feed.as_str(),
        }
    }

    /// Check the configuration against a surface of `width` x `height` px
    pub fn validate(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        let ring = 2 * self.border_width as u32;
        if width <= ring || height <= ring {
            return Err(ConfigError::BorderTooWide);
        }
        if self.text_scale == 0 {
            return Err(ConfigError::ZeroTextScale);
        }
        if self.temperature_feed.is_empty() || self.humidity_feed.is_empty() {
            return Err(ConfigError::EmptyFeedName);
        }
        Ok(())
    }
}

fn feed_name(name: &str) -> Result<String<MAX_FEED_NAME_LEN>, ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyFeedName);
    }
    let mut out = String::new();
    out.push_str(name)
        .map_err(|_| ConfigError::FeedNameTooLong)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_device() {
        let config = MonitorConfig::default();
        assert_eq!(config.pump_interval_ms, 5_000);
        assert_eq!(config.poll_interval_ms, 60_000);
        assert_eq!(config.render_interval_ms, 300_000);
        assert_eq!(config.connect_retry_delay_ms, 2_000);
        assert_eq!(config.sentinel, -50.0);
        assert_eq!(config.border_width, 3);
        assert_eq!(config.text_scale, 5);
        assert_eq!(config.feed_name(FeedId::Temperature), "temperature-c");
        assert_eq!(config.feed_name(FeedId::Humidity), "humidity");
    }

    #[test]
    fn test_default_feed_names_are_valid() {
        let config = MonitorConfig::default();
        assert_eq!(
            feed_name(DEFAULT_TEMPERATURE_FEED).as_ref(),
            Ok(&config.temperature_feed)
        );
        assert_eq!(
            feed_name(DEFAULT_HUMIDITY_FEED).as_ref(),
            Ok(&config.humidity_feed)
        );
        assert_eq!(
            config.clone().with_feeds(DEFAULT_TEMPERATURE_FEED, DEFAULT_HUMIDITY_FEED),
            Ok(config)
        );
    }

    #[test]
    fn test_with_feeds() {
        let config = MonitorConfig::default()
            .with_feeds("office.temp", "office.rh")
            .unwrap();
        assert_eq!(config.feed_name(FeedId::Temperature), "office.temp");
        assert_eq!(config.feed_name(FeedId::Humidity), "office.rh");
    }

    #[test]
    fn test_with_feeds_rejects_bad_names() {
        assert_eq!(
            MonitorConfig::default().with_feeds("", "rh"),
            Err(ConfigError::EmptyFeedName)
        );

        let long = core::str::from_utf8(&[b'f'; MAX_FEED_NAME_LEN + 1]).unwrap();
        assert_eq!(
            MonitorConfig::default().with_feeds("t", long),
            Err(ConfigError::FeedNameTooLong)
        );
    }

    #[test]
    fn test_validate_border_geometry() {
        let config = MonitorConfig::default();
        assert_eq!(config.validate(296, 128), Ok(()));
        assert_eq!(config.validate(7, 128), Ok(()));
        assert_eq!(config.validate(6, 128), Err(ConfigError::BorderTooWide));
        assert_eq!(config.validate(296, 6), Err(ConfigError::BorderTooWide));
    }

    #[test]
    fn test_validate_text_scale() {
        let config = MonitorConfig {
            text_scale: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(296, 128), Err(ConfigError::ZeroTextScale));
    }
}
