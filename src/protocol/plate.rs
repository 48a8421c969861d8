//! Plate validation and the weekday restriction table.

use std::fmt;

/// Weekday on which a plate is restricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

/// Single-byte bitmask with one bit set for the restricted weekday.
///
/// Monday is `0b0010_0000` and each following day shifts one bit right,
/// ending at Friday `0b0000_0010`. On the wire the byte is written as its
/// decimal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayIndicator(u8);

impl DayIndicator {
    pub const MONDAY: Self = Self(0b0010_0000);
    pub const TUESDAY: Self = Self(0b0001_0000);
    pub const WEDNESDAY: Self = Self(0b0000_1000);
    pub const THURSDAY: Self = Self(0b0000_0100);
    pub const FRIDAY: Self = Self(0b0000_0010);

    /// Look up the indicator for a plate's final digit.
    pub fn for_digit(digit: u8) -> Option<Self> {
        match digit {
            1 | 2 => Some(Self::MONDAY),
            3 | 4 => Some(Self::TUESDAY),
            5 | 6 => Some(Self::WEDNESDAY),
            7 | 8 => Some(Self::THURSDAY),
            9 | 0 => Some(Self::FRIDAY),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    pub fn weekday(&self) -> Weekday {
        match *self {
            Self::MONDAY => Weekday::Monday,
            Self::TUESDAY => Weekday::Tuesday,
            Self::WEDNESDAY => Weekday::Wednesday,
            Self::THURSDAY => Weekday::Thursday,
            _ => Weekday::Friday,
        }
    }
}

impl fmt::Display for DayIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated plate: three uppercase ASCII letters then four ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Plate(String);

impl Plate {
    pub const LEN: usize = 7;

    /// Validate `raw`, returning `None` when it does not match the pattern.
    pub fn parse(raw: &str) -> Option<Self> {
        let bytes = raw.as_bytes();
        if bytes.len() != Self::LEN {
            return None;
        }

        let (letters, digits) = bytes.split_at(3);
        if letters.iter().all(u8::is_ascii_uppercase) && digits.iter().all(u8::is_ascii_digit) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the final digit.
    pub fn last_digit(&self) -> u8 {
        self.0.as_bytes()[Self::LEN - 1] - b'0'
    }

    pub fn day_indicator(&self) -> DayIndicator {
        // Digits 0..=9 are all covered by the table.
        DayIndicator::for_digit(self.last_digit()).unwrap_or(DayIndicator::FRIDAY)
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_three_letters_four_digits() {
        let plate = Plate::parse("ABC1234").unwrap();
        assert_eq!(plate.as_str(), "ABC1234");
        assert_eq!(plate.last_digit(), 4);
    }

    #[test]
    fn rejects_malformed_plates() {
        for bad in [
            "", "AB1234", "ABCD1234", "ABC123", "ABC12345", "abc1234", "AbC1234", "ABC12A4",
            "1BC1234", "ABC 1234", "ÁBC1234", "ABC١٢٣٤",
        ] {
            assert!(Plate::parse(bad).is_none(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn indicator_table() {
        let expected = [
            ('0', 2u8, Weekday::Friday),
            ('1', 32, Weekday::Monday),
            ('2', 32, Weekday::Monday),
            ('3', 16, Weekday::Tuesday),
            ('4', 16, Weekday::Tuesday),
            ('5', 8, Weekday::Wednesday),
            ('6', 8, Weekday::Wednesday),
            ('7', 4, Weekday::Thursday),
            ('8', 4, Weekday::Thursday),
            ('9', 2, Weekday::Friday),
        ];

        for (digit, value, day) in expected {
            let plate = Plate::parse(&format!("PBX123{digit}")).unwrap();
            let indicator = plate.day_indicator();
            assert_eq!(indicator.as_u8(), value, "digit {digit}");
            assert_eq!(indicator.weekday(), day, "digit {digit}");
        }
    }

    #[test]
    fn indicator_renders_as_decimal() {
        assert_eq!(DayIndicator::TUESDAY.to_string(), "16");
        assert_eq!(DayIndicator::MONDAY.to_string(), "32");
    }

    #[test]
    fn unknown_digit_has_no_indicator() {
        assert_eq!(DayIndicator::for_digit(10), None);
    }
}
