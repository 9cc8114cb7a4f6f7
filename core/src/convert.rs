//! Conversion of raw value tokens into slot values.
//!
//! Every slot type converts through [`FromStr`], which gives the required
//! precedence without any runtime probing:
//!
//! 1. `String` returns the token unchanged.
//! 2. `char` accepts a token of exactly one character.
//! 3. `f32`, `f64`, `i16`, `i32`, `i64` use the canonical numeric parse and
//!    reject overflow.
//! 4. Any other `FromStr` type (paths, user wrappers) is constructed from the
//!    token.

use std::fmt::Display;
use std::str::FromStr;

use crate::{ConversionError, TargetType};

/// Converts `raw` into a `V`.
///
/// # Errors
///
/// Returns [`ConversionError`] carrying the raw token, the semantic
/// [`TargetType`] of `V`, and the parse failure.
///
/// # Examples
///
/// ```
/// use argmap_core::convert;
/// use std::path::PathBuf;
///
/// assert_eq!(convert::<String>("-x").unwrap(), "-x");
/// assert_eq!(convert::<char>("q").unwrap(), 'q');
/// assert_eq!(convert::<i16>("-7").unwrap(), -7);
/// assert_eq!(convert::<PathBuf>(".").unwrap(), PathBuf::from("."));
/// assert!(convert::<char>("qq").is_err());
/// assert!(convert::<i16>("40000").is_err());
/// ```
pub fn convert<V>(raw: &str) -> Result<V, ConversionError>
where
    V: FromStr + 'static,
    V::Err: Display,
{
    raw.parse::<V>().map_err(|err| ConversionError {
        raw: raw.to_string(),
        target: TargetType::of::<V>(),
        reason: describe_failure(raw, &TargetType::of::<V>(), &err),
    })
}

fn describe_failure(raw: &str, target: &TargetType, err: &dyn Display) -> String {
    match target {
        TargetType::Char => format!(
            "expected exactly one character, found {}",
            raw.chars().count()
        ),
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_text_is_returned_unchanged() {
        assert_eq!(convert::<String>("").unwrap(), "");
        assert_eq!(convert::<String>("--not-an-option").unwrap(), "--not-an-option");
        assert_eq!(convert::<String>("  spaced ").unwrap(), "  spaced ");
    }

    #[test]
    fn test_char_requires_exactly_one_character() {
        assert_eq!(convert::<char>("é").unwrap(), 'é');

        let err = convert::<char>("ab").unwrap_err();
        assert_eq!(err.target, TargetType::Char);
        assert_eq!(err.reason, "expected exactly one character, found 2");

        let err = convert::<char>("").unwrap_err();
        assert_eq!(err.reason, "expected exactly one character, found 0");
    }

    #[test]
    fn test_numeric_kinds() {
        assert_eq!(convert::<f32>("1.5").unwrap(), 1.5);
        assert_eq!(convert::<f64>("-2.25e2").unwrap(), -225.0);
        assert_eq!(convert::<i32>("42").unwrap(), 42);
        assert_eq!(convert::<i64>("-9000000000").unwrap(), -9_000_000_000);
    }

    #[test]
    fn test_numeric_overflow_is_a_conversion_error() {
        let err = convert::<i16>("32768").unwrap_err();
        assert_eq!(err.raw, "32768");
        assert_eq!(err.target, TargetType::Int16);

        assert!(convert::<i32>("2147483648").is_err());
        assert!(convert::<i64>("9223372036854775808").is_err());
    }

    #[test]
    fn test_invalid_integer_names_raw_and_target() {
        let err = convert::<i32>("abc").unwrap_err();
        assert_eq!(err.raw, "abc");
        assert_eq!(err.target, TargetType::Int32);
        assert_eq!(
            err.to_string(),
            "cannot convert 'abc' to i32: invalid digit found in string"
        );
    }

    #[test]
    fn test_string_constructible_types() {
        assert_eq!(convert::<PathBuf>("a/b").unwrap(), PathBuf::from("a/b"));
        assert_eq!(
            convert::<Ipv4Addr>("127.0.0.1").unwrap(),
            Ipv4Addr::LOCALHOST
        );

        let err = convert::<Ipv4Addr>("localhost").unwrap_err();
        assert!(matches!(err.target, TargetType::Other(ref name) if name.ends_with("Ipv4Addr")));
    }
}
