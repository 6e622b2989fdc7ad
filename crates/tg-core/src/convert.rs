use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

/// Failure of a string to typed-value conversion. The messages are shown to
/// users after an `Attribute '<name>': ` prefix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("No number defined")]
    NumberMissing,
    #[error("Not a well formed number")]
    NumberMalformed,
    #[error("Number must be >= {0}")]
    NumberTooSmall(String),
    #[error("Number must be <= {0}")]
    NumberTooBig(String),
    #[error("Not a well formed bool value")]
    BoolMalformed,
    #[error("contains invalid hex number")]
    HexMalformed,
    #[error("wrong (possibly too big) hex number")]
    HexTooBig,
    #[error("must have format #RRGGBB where R,G and B are hex numbers (0123456789ABCDEF)")]
    HexColorFormat,
    #[error("malformed, format is '%r^g^b'")]
    RgbFormat,
    #[error("wrong unicode char")]
    UnicodeCharMalformed,
    #[error("contains invalid UTF8 character {0}")]
    UnicodeCodeInvalid(u32),
    #[error("Not a valid enum name!")]
    EnumNameInvalid,
}

const TRUE_SPELLINGS: [&str; 10] = ["T", "t", "TRUE", "True", "true", "Y", "y", "YES", "Yes", "yes"];
const FALSE_SPELLINGS: [&str; 10] = ["F", "f", "FALSE", "False", "false", "N", "n", "NO", "No", "no"];

pub fn str_to_bool(value: &str) -> Result<bool, ConversionError> {
    let value = value.trim();
    if TRUE_SPELLINGS.contains(&value) {
        return Ok(true);
    }
    if FALSE_SPELLINGS.contains(&value) {
        return Ok(false);
    }
    Err(ConversionError::BoolMalformed)
}

/// Parses a decimal number, tolerating surrounding whitespace, and checks
/// the optional inclusive bounds.
pub fn str_to_number<T>(value: &str, min: Option<T>, max: Option<T>) -> Result<T, ConversionError>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    let value = value.trim();
    if value.is_empty() {
        return Err(ConversionError::NumberMissing);
    }
    let number = value
        .parse::<T>()
        .map_err(|_| ConversionError::NumberMalformed)?;
    if let Some(min) = min {
        if number < min {
            return Err(ConversionError::NumberTooSmall(min.to_string()));
        }
    }
    if let Some(max) = max {
        if number > max {
            return Err(ConversionError::NumberTooBig(max.to_string()));
        }
    }
    Ok(number)
}

/// Like [`str_to_number`] but also accepts `0x`/`0X` prefixed hex numbers.
pub fn str_to_u32(value: &str, min: Option<u32>, max: Option<u32>) -> Result<u32, ConversionError> {
    let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    else {
        return str_to_number::<u32>(value, min, max);
    };
    if hex.is_empty() {
        return Err(ConversionError::HexMalformed);
    }
    let mut result: u64 = 0;
    for digit in hex.chars() {
        let Some(nibble) = digit.to_digit(16) else {
            return Err(ConversionError::HexMalformed);
        };
        result = (result << 4) | u64::from(nibble);
        let too_big = result > u64::from(u32::MAX) || max.is_some_and(|max| result > u64::from(max));
        if too_big {
            return Err(ConversionError::HexTooBig);
        }
    }
    let result = result as u32;
    if let Some(min) = min {
        if result < min {
            return Err(ConversionError::NumberTooSmall(min.to_string()));
        }
    }
    Ok(result)
}

/// Parses `#RRGGBB` (hex digits in either case).
pub fn str_hex_to_rgb(value: &str) -> Result<(u8, u8, u8), ConversionError> {
    let Some(digits) = value.strip_prefix('#') else {
        return Err(ConversionError::HexColorFormat);
    };
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConversionError::HexColorFormat);
    }
    let channel = |index: usize| {
        u8::from_str_radix(&digits[index..index + 2], 16).map_err(|_| ConversionError::HexColorFormat)
    };
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

/// Parses `%r^g^b` with three decimal components in `0..=255`.
pub fn str_percent_to_rgb(value: &str) -> Result<(u8, u8, u8), ConversionError> {
    let Some(body) = value.strip_prefix('%') else {
        return Err(ConversionError::RgbFormat);
    };
    let parts = body.split('^').collect::<Vec<_>>();
    let [red, green, blue] = parts.as_slice() else {
        return Err(ConversionError::RgbFormat);
    };
    Ok((
        str_to_number::<u8>(red, None, None)?,
        str_to_number::<u8>(green, None, None)?,
        str_to_number::<u8>(blue, None, None)?,
    ))
}

/// Splits `text` on `separator` and trims every token. Empty tokens are
/// kept so callers can reject them with a precise message.
pub fn tokenize<'s>(text: &'s str, separator: &str) -> Vec<&'s str> {
    if separator.is_empty() {
        return vec![text.trim()];
    }
    text.split(separator).map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_to_bool_accepts_documented_spellings() {
        for spelling in ["T", "true", " Yes ", "y"] {
            assert!(str_to_bool(spelling).expect("true spelling"));
        }
        for spelling in ["F", "False", "no", "N"] {
            assert!(!str_to_bool(spelling).expect("false spelling"));
        }
        assert_eq!(str_to_bool("1"), Err(ConversionError::BoolMalformed));
        assert_eq!(str_to_bool("tRUE"), Err(ConversionError::BoolMalformed));
    }

    #[test]
    fn str_to_number_checks_format_and_bounds() {
        assert_eq!(str_to_number::<i32>(" 42 ", None, None), Ok(42));
        assert_eq!(str_to_number::<i32>("", None, None), Err(ConversionError::NumberMissing));
        assert_eq!(str_to_number::<i32>("4x", None, None), Err(ConversionError::NumberMalformed));
        let error = str_to_number::<i32>("-1", Some(0), None).expect_err("below min");
        assert_eq!(error.to_string(), "Number must be >= 0");
        let error = str_to_number::<i32>("300", Some(0), Some(255)).expect_err("above max");
        assert_eq!(error.to_string(), "Number must be <= 255");
    }

    #[test]
    fn str_to_u32_reads_hex_and_decimal() {
        assert_eq!(str_to_u32("0xF2", None, None), Ok(0xF2));
        assert_eq!(str_to_u32("0Xff", None, None), Ok(255));
        assert_eq!(str_to_u32("121", Some(1), None), Ok(121));
        assert_eq!(str_to_u32("0x", None, None), Err(ConversionError::HexMalformed));
        assert_eq!(str_to_u32("0xZZ", None, None), Err(ConversionError::HexMalformed));
        assert_eq!(str_to_u32("0x100", None, Some(255)), Err(ConversionError::HexTooBig));
        assert_eq!(str_to_u32("0x1FFFFFFFF", None, None), Err(ConversionError::HexTooBig));
        assert!(matches!(
            str_to_u32("0x0", Some(1), None),
            Err(ConversionError::NumberTooSmall(_))
        ));
    }

    #[test]
    fn rgb_parsers_accept_hex_and_percent_forms() {
        assert_eq!(str_hex_to_rgb("#FF8000"), Ok((255, 128, 0)));
        assert_eq!(str_hex_to_rgb("#ff8000"), Ok((255, 128, 0)));
        assert_eq!(str_hex_to_rgb("#FFF"), Err(ConversionError::HexColorFormat));
        assert_eq!(str_hex_to_rgb("FF8000"), Err(ConversionError::HexColorFormat));
        assert_eq!(str_percent_to_rgb("%1^254^3"), Ok((1, 254, 3)));
        assert_eq!(str_percent_to_rgb("%1^2"), Err(ConversionError::RgbFormat));
        assert!(str_percent_to_rgb("%1^2^256").is_err());
    }

    #[test]
    fn tokenize_trims_tokens_and_keeps_empty_ones() {
        assert_eq!(tokenize(" a , b,c ", ","), vec!["a", "b", "c"]);
        assert_eq!(tokenize("a,,b", ","), vec!["a", "", "b"]);
        assert_eq!(tokenize("a::b", "::"), vec!["a", "b"]);
    }
}
