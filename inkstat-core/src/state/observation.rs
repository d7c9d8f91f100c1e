//! Latest readings and their change flags

use inkstat_protocol::{parse_value, FeedId};

use crate::traits::ValueSink;

/// Most recent readings from the remote feeds
///
/// Both readings start at the sentinel. A reading's changed flag is set
/// whenever a value arrives and cleared only by [`mark_rendered`].
///
/// [`mark_rendered`]: ObservationState::mark_rendered
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObservationState {
    /// "Never received" marker
    sentinel: f32,
    /// Last temperature (°C)
    last_temperature: f32,
    /// Last relative humidity (%)
    last_humidity: f32,
    /// Temperature arrived since the last render
    temperature_changed: bool,
    /// Humidity arrived since the last render
    humidity_changed: bool,
}

impl ObservationState {
    /// Create an empty observation state
    pub const fn new(sentinel: f32) -> Self {
        Self {
            sentinel,
            last_temperature: sentinel,
            last_humidity: sentinel,
            temperature_changed: false,
            humidity_changed: false,
        }
    }

    /// Store a new temperature reading
    pub fn update_temperature(&mut self, celsius: f32) {
        self.last_temperature = celsius;
        self.temperature_changed = true;
    }

    /// Store a new humidity reading
    pub fn update_humidity(&mut self, percent: f32) {
        self.last_humidity = percent;
        self.humidity_changed = true;
    }

    /// Parse a raw feed value message and store it
    ///
    /// No range validation: whatever the payload converts to is stored,
    /// including the sentinel itself.
    pub fn ingest(&mut self, feed: FeedId, payload: &[u8]) {
        let value = parse_value(payload);
        match feed {
            FeedId::Temperature => self.update_temperature(value),
            FeedId::Humidity => self.update_humidity(value),
        }
    }

    /// Last temperature (°C), or the sentinel
    pub fn last_temperature(&self) -> f32 {
        self.last_temperature
    }

    /// Last humidity (%), or the sentinel
    pub fn last_humidity(&self) -> f32 {
        self.last_humidity
    }

    /// True if a temperature arrived since the last render
    pub fn temperature_changed(&self) -> bool {
        self.temperature_changed
    }

    /// True if a humidity arrived since the last render
    pub fn humidity_changed(&self) -> bool {
        self.humidity_changed
    }

    /// The "never received" marker
    pub fn sentinel(&self) -> f32 {
        self.sentinel
    }

    /// True if at least one reading differs from the sentinel
    pub fn has_data(&self) -> bool {
        self.last_temperature != self.sentinel || self.last_humidity != self.sentinel
    }

    /// True if at least one reading arrived since the last render
    pub fn has_changes(&self) -> bool {
        self.temperature_changed || self.humidity_changed
    }

    /// True if drawing now would show something new
    pub fn is_render_worthy(&self) -> bool {
        self.has_data() && self.has_changes()
    }

    /// Clear both change flags after the display consumed them
    pub fn mark_rendered(&mut self) {
        self.temperature_changed = false;
        self.humidity_changed = false;
    }
}

impl ValueSink for ObservationState {
    fn deliver(&mut self, feed: FeedId, payload: &[u8]) {
        self.ingest(feed, payload);
    }
}
