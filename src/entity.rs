//! HTML character references: the named entity table and numeric validity.
//!
//! The named table is generated at build time from the HTML5 entity list
//! and is immutable for the life of the process; lookups are plain reads of
//! a static perfect-hash map and are safe from any number of threads.

use std::sync::OnceLock;

use thiserror::Error;

mod entitydata {
    include!(concat!(env!("OUT_DIR"), "/entitydata.rs"));
}

/// Longest decimal numeric reference accepted (`1114111` is `0x10FFFF`).
pub const MAX_DECIMAL_DIGITS: usize = 7;
/// Longest hexadecimal numeric reference accepted.
pub const MAX_HEX_DIGITS: usize = 6;

/// A fault in the generated entity table, found by [`init`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityTableError {
    /// The table holds no entries at all.
    #[error("entity table is empty")]
    Empty,
    /// A name is not of the form `alnum+;`.
    #[error("malformed entity name {0:?}")]
    MalformedName(String),
    /// An entity maps to zero or more than two codepoints.
    #[error("entity {0:?} maps to {1} codepoints")]
    BadCodepointCount(String, usize),
    /// An entity maps to something that is not a Unicode scalar value.
    #[error("entity {0:?} maps to invalid codepoint U+{1:04X}")]
    InvalidCodepoint(String, u32),
}

static VALIDATED: OnceLock<Result<(), EntityTableError>> = OnceLock::new();

/// Validate the entity table once.
///
/// The first call checks every row; later calls return the cached outcome
/// without touching the table again. Rendering never calls this, so a
/// process that wants a start-up failure for a corrupt build should call it
/// before serving its first render.
pub fn init() -> Result<(), EntityTableError> {
    VALIDATED.get_or_init(validate).clone()
}

fn validate() -> Result<(), EntityTableError> {
    if entitydata::ENTITIES.is_empty() || entitydata::ENTITY_COUNT == 0 {
        return Err(EntityTableError::Empty);
    }

    for (name, codepoints) in entries() {
        let body = match name.strip_suffix(';') {
            Some(body) if !body.is_empty() => body,
            _ => return Err(EntityTableError::MalformedName(name.to_string())),
        };
        if !body.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(EntityTableError::MalformedName(name.to_string()));
        }
        if codepoints.is_empty() || codepoints.len() > 2 {
            return Err(EntityTableError::BadCodepointCount(
                name.to_string(),
                codepoints.len(),
            ));
        }
        if let Some(&bad) = codepoints.iter().find(|&&c| char::from_u32(c).is_none()) {
            return Err(EntityTableError::InvalidCodepoint(name.to_string(), bad));
        }
    }

    Ok(())
}

/// Look up a named entity, given its name with the trailing `;` and
/// without the leading `&`, e.g. `"amp;"`.
pub fn lookup(name: &[u8]) -> Option<&'static [u32]> {
    let name = std::str::from_utf8(name).ok()?;
    entitydata::ENTITIES.get(name).copied()
}

/// Every `(name, codepoints)` row of the table, in no particular order.
pub fn entries() -> impl Iterator<Item = (&'static str, &'static [u32])> {
    entitydata::ENTITIES.entries().map(|(k, v)| (*k, *v))
}

/// Whether `codepoint` may appear as a numeric character reference.
///
/// Rejects the C0 controls other than tab, line feed and carriage return,
/// the UTF-16 surrogates, the noncharacters U+FFFE and U+FFFF, and anything
/// beyond U+10FFFF.
pub fn is_valid_numeric(codepoint: u32) -> bool {
    !matches!(
        codepoint,
        0..=8 | 11..=12 | 14..=31 | 0xD800..=0xDFFF | 0xFFFE..=0xFFFF
    ) && codepoint <= 0x10FFFF
}

/// Parse the digits of a numeric reference (without `&#`, `x` or `;`).
///
/// Returns `None` when the digit string is empty, too long to name a legal
/// codepoint, or not made of digits of the right base.
pub fn parse_numeric(digits: &[u8], hex: bool) -> Option<u32> {
    let (radix, max) = if hex {
        (16, MAX_HEX_DIGITS)
    } else {
        (10, MAX_DECIMAL_DIGITS)
    };
    if digits.is_empty() || digits.len() > max {
        return None;
    }
    digits.iter().try_fold(0u32, |acc, &b| {
        let d = (b as char).to_digit(radix)?;
        Some(acc * radix + d)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sound() {
        assert_eq!(init(), Ok(()));
        assert_eq!(init(), Ok(()));
        assert_eq!(entries().count(), entitydata::ENTITY_COUNT);
    }

    #[test]
    fn table_errors_propagate_with_question_mark() {
        fn start() -> Result<(), Box<dyn std::error::Error>> {
            Err(EntityTableError::BadCodepointCount("amp;".into(), 3))?;
            Ok(())
        }
        assert_eq!(
            start().unwrap_err().to_string(),
            "entity \"amp;\" maps to 3 codepoints"
        );
    }

    #[test]
    fn lookups() {
        assert_eq!(lookup(b"amp;"), Some(&[38u32][..]));
        assert_eq!(lookup(b"thetasym;"), Some(&[0x3D1u32][..]));
        assert_eq!(lookup(b"amp"), None);
        assert_eq!(lookup(b"foobar;"), None);
        assert!(lookup(b"NotNestedGreaterGreater;").map_or(false, |c| c.len() == 2));
    }

    #[test]
    fn numeric_ranges() {
        for c in 0..9 {
            assert!(!is_valid_numeric(c), "{}", c);
        }
        assert!(is_valid_numeric(9));
        assert!(is_valid_numeric(10));
        assert!(!is_valid_numeric(11));
        assert!(!is_valid_numeric(12));
        assert!(is_valid_numeric(13));
        assert!(!is_valid_numeric(31));
        assert!(is_valid_numeric(32));
        assert!(!is_valid_numeric(0xD800));
        assert!(!is_valid_numeric(0xDFFF));
        assert!(is_valid_numeric(0xE000));
        assert!(!is_valid_numeric(0xFFFE));
        assert!(is_valid_numeric(0x10000));
        assert!(is_valid_numeric(0x10FFFF));
        assert!(!is_valid_numeric(0x110000));
    }

    #[test]
    fn numeric_parsing() {
        assert_eq!(parse_numeric(b"126", false), Some(126));
        assert_eq!(parse_numeric(b"7E", true), Some(126));
        assert_eq!(parse_numeric(b"7e", true), Some(126));
        assert_eq!(parse_numeric(b"", false), None);
        assert_eq!(parse_numeric(b"12a", false), None);
        assert_eq!(parse_numeric(b"99999999", false), None);
        assert_eq!(parse_numeric(b"1234567", true), None);
    }
}
