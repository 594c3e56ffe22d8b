//! # Sri Lankan NIC Numbers
//!
//! Parser and domain type for Sri Lankan National Identity Card numbers.
//!
//! Two shapes are in circulation:
//!
//! | Format | Shape | Example | Day field |
//! |--------|-------|---------|-----------|
//! | Old | 9 digits + `V` | `856234567V` | serial chars 2..5 |
//! | New | 12 digits (year-prefixed) | `198523445678` | chars 4..7 |
//!
//! The day field holds the day of the birth year, offset by 500 for
//! women. Digit values are not range-checked: a code whose day field names
//! no real calendar day still parses.
//!
//! ## Validation
//!
//! Input is trimmed of ASCII space, tab, newline, carriage return, NUL and
//! vertical tab, then ASCII-uppercased, so `"  856234567v "` parses to the
//! same value as `"856234567V"`. Matching is full-string; any
//! other shape is rejected with [`NicError::InvalidFormat`]. Only `V` is
//! accepted as the old-format check letter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NicError;
use crate::sex::Sex;

/// Number of digits in an old-format serial.
pub const OLD_SERIAL_LEN: usize = 9;

/// Number of digits in a new-format NIC.
pub const NEW_DIGITS_LEN: usize = 12;

/// The only accepted old-format check letter.
pub const OLD_CHECK_LETTER: char = 'V';

/// Characters stripped from both ends of the input. Other Unicode
/// whitespace (NBSP, ideographic space) is kept and fails the match.
const TRIMMED: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Routes deserialization through [`Nic::parse`] so that malformed codes are
/// rejected when a payload is decoded, not later.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Which of the two NIC shapes a code has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NicFormat {
    /// Legacy 9 digits + check letter.
    Old,
    /// Current 12-digit, year-prefixed format.
    New,
}

impl NicFormat {
    /// Return the lowercase label used in logs and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }

    /// Byte range of the day field within the digit portion.
    fn day_field(&self) -> std::ops::Range<usize> {
        match self {
            Self::Old => 2..5,
            Self::New => 4..7,
        }
    }
}

impl fmt::Display for NicFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed, tagged view of a parsed NIC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NicShape<'a> {
    /// 9-digit serial followed by a check letter.
    OldFormat {
        /// The 9-digit serial.
        serial: &'a str,
        /// The check letter (always `V`).
        check_letter: char,
    },
    /// 12 digits, the first four being the birth year.
    NewFormat {
        /// All 12 digits.
        digits: &'a str,
    },
}

/// A validated Sri Lankan NIC number.
///
/// Stores only the digit portion and its format; the check letter of an
/// old-format code is implied. Construction goes through [`Nic::parse`],
/// so every value satisfies the digit-count invariant of its format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nic {
    format: NicFormat,
    digits: String,
}

impl_validating_deserialize!(Nic);

impl Nic {
    /// Parse a raw identity code.
    ///
    /// # Errors
    ///
    /// Returns [`NicError::InvalidFormat`] if the normalized input is neither
    /// 9 ASCII digits followed by `V` nor exactly 12 ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, NicError> {
        let normalized = raw.trim_matches(&TRIMMED[..]).to_ascii_uppercase();

        let parsed = match normalized.strip_suffix(OLD_CHECK_LETTER) {
            Some(serial) if is_ascii_digits(serial, OLD_SERIAL_LEN) => Some(Self {
                format: NicFormat::Old,
                digits: serial.to_string(),
            }),
            Some(_) => None,
            None if is_ascii_digits(&normalized, NEW_DIGITS_LEN) => Some(Self {
                format: NicFormat::New,
                digits: normalized,
            }),
            None => None,
        };

        parsed.ok_or_else(|| NicError::InvalidFormat {
            input: raw.to_string(),
        })
    }

    /// Which NIC shape this code has.
    pub fn format(&self) -> NicFormat {
        self.format
    }

    /// Tagged view of the code's parts.
    pub fn shape(&self) -> NicShape<'_> {
        match self.format {
            NicFormat::Old => NicShape::OldFormat {
                serial: &self.digits,
                check_letter: OLD_CHECK_LETTER,
            },
            NicFormat::New => NicShape::NewFormat {
                digits: &self.digits,
            },
        }
    }

    /// The digit portion: the 9-digit serial or all 12 digits.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Canonical form: uppercase, no surrounding whitespace.
    pub fn canonical(&self) -> String {
        match self.format {
            NicFormat::Old => format!("{}{}", self.digits, OLD_CHECK_LETTER),
            NicFormat::New => self.digits.clone(),
        }
    }

    /// The three-digit day field as an integer (leading zeros allowed).
    ///
    /// Not range-checked; any value from 0 to 999 is possible.
    pub fn day_value(&self) -> u16 {
        self.digits[self.format.day_field()]
            .bytes()
            .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'))
    }

    /// The sex encoded in the day field.
    pub fn sex(&self) -> Sex {
        Sex::from_day_value(self.day_value())
    }
}

fn is_ascii_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for Nic {
    type Err = NicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Nic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)?;
        if self.format == NicFormat::Old {
            write!(f, "{OLD_CHECK_LETTER}")?;
        }
        Ok(())
    }
}

impl Serialize for Nic {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Old format --

    #[test]
    fn old_format_parses() {
        let nic = Nic::parse("856234567V").unwrap();
        assert_eq!(nic.format(), NicFormat::Old);
        assert_eq!(
            nic.shape(),
            NicShape::OldFormat {
                serial: "856234567",
                check_letter: 'V'
            }
        );
        assert_eq!(nic.canonical(), "856234567V");
    }

    #[test]
    fn old_format_lowercase_letter_is_normalized() {
        let upper = Nic::parse("856234567V").unwrap();
        let lower = Nic::parse("856234567v").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let nic = Nic::parse("  856234567v  ").unwrap();
        assert_eq!(nic.canonical(), "856234567V");
        assert_eq!(nic.sex(), Sex::Female);
    }

    #[test]
    fn tabs_and_newlines_are_trimmed() {
        assert!(Nic::parse("\t198523445678\n").is_ok());
    }

    #[test]
    fn nul_and_vertical_tab_are_trimmed() {
        assert_eq!(Nic::parse("856234567V\0").unwrap().canonical(), "856234567V");
        assert_eq!(Nic::parse("\x0B\r198523445678").unwrap().canonical(), "198523445678");
    }

    #[test]
    fn non_ascii_whitespace_is_not_trimmed() {
        for raw in [
            "\u{a0}856234567V\u{a0}",
            "\u{3000}856234567V",
            "198523445678\u{2003}",
        ] {
            assert!(
                matches!(Nic::parse(raw), Err(NicError::InvalidFormat { .. })),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn nine_digits_plus_v_parses_even_with_sequential_digits() {
        // "123456789" is 9 digits, so this is a well-formed old-format code.
        let nic = Nic::parse("123456789V").unwrap();
        assert_eq!(nic.day_value(), 345);
        assert_eq!(nic.sex(), Sex::Male);
    }

    #[test]
    fn x_check_letter_is_rejected() {
        assert!(Nic::parse("856234567X").is_err());
        assert!(Nic::parse("856234567x").is_err());
    }

    // -- New format --

    #[test]
    fn new_format_parses() {
        let nic = Nic::parse("198523445678").unwrap();
        assert_eq!(nic.format(), NicFormat::New);
        assert_eq!(
            nic.shape(),
            NicShape::NewFormat {
                digits: "198523445678"
            }
        );
        assert_eq!(nic.canonical(), "198523445678");
    }

    #[test]
    fn new_format_with_letter_suffix_is_rejected() {
        assert!(Nic::parse("198523445678V").is_err());
    }

    // -- Rejections --

    #[test]
    fn rejects_malformed_shapes() {
        for raw in [
            "",
            "   ",
            "V",
            "12345678V",     // 8 digits + V
            "1234567890V",   // 10 digits + V
            "123456789",     // 9 digits, no letter
            "1234567890",    // 10 digits
            "12345678901",   // 11 digits
            "1234567890123", // 13 digits
            "8562345a7V",    // embedded letter
            "856234567VV",   // two letters
            "V856234567",    // letter prefix
            "85623 4567V",   // inner whitespace
            "19856234567a",
            "１２３４５６７８９V", // full-width digits
        ] {
            assert!(Nic::parse(raw).is_err(), "expected rejection for {raw:?}");
        }
    }

    #[test]
    fn error_carries_raw_input() {
        let err = Nic::parse(" bad ").unwrap_err();
        assert_eq!(
            err,
            NicError::InvalidFormat {
                input: " bad ".to_string()
            }
        );
    }

    // -- Day value --

    #[test]
    fn day_value_old_format_uses_serial_positions_2_to_4() {
        assert_eq!(Nic::parse("856234567V").unwrap().day_value(), 623);
    }

    #[test]
    fn day_value_new_format_skips_year() {
        assert_eq!(Nic::parse("198523445678").unwrap().day_value(), 234);
    }

    #[test]
    fn day_value_new_format_reads_index_4_to_6() {
        // "1985|623|45678": the day field starts right after the year.
        let nic = Nic::parse("198562345678").unwrap();
        assert_eq!(nic.day_value(), 623);
        assert_eq!(nic.sex(), Sex::Female);
    }

    #[test]
    fn day_value_leading_zeros() {
        assert_eq!(Nic::parse("850054567V").unwrap().day_value(), 5);
        assert_eq!(Nic::parse("199000012345").unwrap().day_value(), 0);
    }

    #[test]
    fn day_value_not_range_checked() {
        assert_eq!(Nic::parse("859994567V").unwrap().day_value(), 999);
        assert_eq!(Nic::parse("859994567V").unwrap().sex(), Sex::Female);
        assert_eq!(Nic::parse("854004567V").unwrap().sex(), Sex::Male);
    }

    // -- Trait impls --

    #[test]
    fn from_str_matches_parse() {
        let a: Nic = "198523445678".parse().unwrap();
        assert_eq!(a, Nic::parse("198523445678").unwrap());
    }

    #[test]
    fn display_is_canonical() {
        let nic = Nic::parse(" 856234567v").unwrap();
        assert_eq!(format!("{nic}"), "856234567V");
        assert_eq!(nic.to_string(), nic.canonical());
    }

    #[test]
    fn format_labels() {
        assert_eq!(NicFormat::Old.to_string(), "old");
        assert_eq!(serde_json::to_string(&NicFormat::New).unwrap(), "\"new\"");
    }

    #[test]
    fn serializes_as_canonical_string() {
        let nic = Nic::parse("856234567v").unwrap();
        assert_eq!(serde_json::to_string(&nic).unwrap(), "\"856234567V\"");
    }

    #[test]
    fn deserialize_validates() {
        let nic: Nic = serde_json::from_str("\"198523445678\"").unwrap();
        assert_eq!(nic.format(), NicFormat::New);
        assert!(serde_json::from_str::<Nic>("\"12345\"").is_err());
    }

    #[test]
    fn usable_as_hash_key() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Nic::parse("856234567V").unwrap());
        set.insert(Nic::parse("856234567v").unwrap());
        set.insert(Nic::parse("198523445678").unwrap());
        assert_eq!(set.len(), 2);
    }
}
