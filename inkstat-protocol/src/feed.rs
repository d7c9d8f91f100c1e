//! Feed identifiers and value payloads
//!
//! The remote service delivers feed values as short ASCII strings
//! (`"21.5"`, `" 47.25\r\n"`). They are converted to floats the way C's
//! `atof` does: the longest numeric prefix wins and garbage yields `0.0`.

/// Maximum length of a remote feed name
pub const MAX_FEED_NAME_LEN: usize = 64;

/// Maximum length of a feed value payload
pub const MAX_VALUE_LEN: usize = 32;

/// Feeds the monitor subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedId {
    /// Temperature in degrees Celsius
    Temperature,
    /// Relative humidity in percent
    Humidity,
}

// Wire format values
const FEED_TEMPERATURE: u8 = 0x01;
const FEED_HUMIDITY: u8 = 0x02;

impl FeedId {
    /// Every feed, in display order
    pub const ALL: [FeedId; 2] = [FeedId::Temperature, FeedId::Humidity];

    /// Parse a feed from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            FEED_TEMPERATURE => Some(FeedId::Temperature),
            FEED_HUMIDITY => Some(FeedId::Humidity),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            FeedId::Temperature => FEED_TEMPERATURE,
            FeedId::Humidity => FEED_HUMIDITY,
        }
    }
}

/// Convert a feed value payload to a float
///
/// Never fails: leading whitespace is skipped, the longest prefix that
/// forms a decimal number is converted, and `0.0` is returned when there
/// is no such prefix.
pub fn parse_value(payload: &[u8]) -> f32 {
    let start = payload
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(payload.len());
    let text = &payload[start..];
    let len = numeric_prefix_len(text);

    core::str::from_utf8(&text[..len])
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(0.0)
}

/// Length of the longest prefix matching `[+-]?digits[.digits][(e|E)[+-]?digits]`
fn numeric_prefix_len(text: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while i < text.len() && text[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(text.first(), Some(b'+' | b'-')) {
        i = 1;
    }

    let int_end = digits_from(i);
    let mut mantissa_digits = int_end - i;
    i = int_end;

    if text.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        mantissa_digits += frac_end - (i + 1);
        i = frac_end;
    }

    if mantissa_digits == 0 {
        return 0;
    }

    // The exponent only counts if at least one digit follows it
    if matches!(text.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(text.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }

    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_feed_byte_roundtrip() {
        for feed in FeedId::ALL {
            assert_eq!(FeedId::from_byte(feed.to_byte()), Some(feed));
        }
        assert_eq!(FeedId::from_byte(0x00), None);
        assert_eq!(FeedId::from_byte(0x7F), None);
    }

    #[test]
    fn test_parse_plain_values() {
        assert_eq!(parse_value(b"21.5"), 21.5);
        assert_eq!(parse_value(b"-50"), -50.0);
        assert_eq!(parse_value(b"+3.25"), 3.25);
        assert_eq!(parse_value(b".5"), 0.5);
        assert_eq!(parse_value(b"7."), 7.0);
    }

    #[test]
    fn test_parse_skips_whitespace_and_trailing_garbage() {
        assert_eq!(parse_value(b"  47.25\r\n"), 47.25);
        assert_eq!(parse_value(b"19.0C"), 19.0);
        assert_eq!(parse_value(b"1.5e2x"), 150.0);
        // Dangling exponent is not part of the number
        assert_eq!(parse_value(b"2e"), 2.0);
        assert_eq!(parse_value(b"2e+"), 2.0);
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_value(b""), 0.0);
        assert_eq!(parse_value(b"   "), 0.0);
        assert_eq!(parse_value(b"nan"), 0.0);
        assert_eq!(parse_value(b"-"), 0.0);
        assert_eq!(parse_value(b"."), 0.0);
        assert_eq!(parse_value(&[0xFF, 0xFE]), 0.0);
    }

    proptest! {
        #[test]
        fn test_parse_never_panics(payload in proptest::collection::vec(any::<u8>(), 0..MAX_VALUE_LEN)) {
            let _ = parse_value(&payload);
        }

        #[test]
        fn test_parse_matches_display_of_two_decimals(value in -1000.0f32..1000.0f32) {
            let mut buf = heapless::String::<32>::new();
            core::fmt::write(&mut buf, format_args!("{:.2}", value)).unwrap();
            let expected: f32 = buf.parse().unwrap();
            prop_assert_eq!(parse_value(buf.as_bytes()), expected);
        }
    }
}
