//! Reading text

use core::fmt::Write;

use heapless::String;

/// Capacity of the formatted reading block
pub const READING_TEXT_CAPACITY: usize = 32;

/// Formatted reading block
pub type ReadingText = String<READING_TEXT_CAPACITY>;

/// Celsius to Fahrenheit
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    (9.0 / 5.0) * celsius + 32.0
}

/// Three-line reading block: Celsius, Fahrenheit, relative humidity
///
/// Readings too wide for the buffer yield an empty string.
pub fn format_readings(temperature: f32, humidity: f32) -> ReadingText {
    let fahrenheit = celsius_to_fahrenheit(temperature);
    let mut text = ReadingText::new();
    if write!(
        text,
        "{:.2} C\n{:.2} F\n{:.2} %",
        temperature, fahrenheit, humidity
    )
    .is_err()
    {
        text.clear();
    }
    text
}
