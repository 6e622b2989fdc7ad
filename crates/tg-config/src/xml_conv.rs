use std::fmt::Display;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use tg_core::convert::{str_hex_to_rgb, str_percent_to_rgb, str_to_u32};
use tg_core::tile::{CHAR_INDEX_MAX, CHAR_UCS4_MAX, CHAR_UCS4_MIN, COLOR_INDEX_MAX, COLOR_PAL_LAST};
use tg_core::{str_to_bool, str_to_number, ConfigError, ConversionError, TileChar, TileColor};
use tg_parser::XmlElementNode;

use crate::context::ParseContext;
use crate::errors::XML_ATTR_INVALID_VALUE;

/// The name that stands for any name where allowed.
pub const ANY_NAME: &str = "*";
const NAME_SEPARATORS: [char; 2] = [':', '-'];

pub fn to_bool(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    value: &str,
) -> Result<bool, ConfigError> {
    str_to_bool(value).map_err(|error| ctx.error_attr_conversion(element, attr, &error))
}

pub fn to_number<T>(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    value: &str,
    min: Option<T>,
    max: Option<T>,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    str_to_number(value, min, max).map_err(|error| ctx.error_attr_conversion(element, attr, &error))
}

/// Decimal or `0x` hex.
pub fn to_u32(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    value: &str,
    min: Option<u32>,
    max: Option<u32>,
) -> Result<u32, ConfigError> {
    str_to_u32(value, min, max).map_err(|error| ctx.error_attr_conversion(element, attr, &error))
}

/// `#RRGGBB` or `%r^g^b`.
pub fn to_rgb(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    value: &str,
) -> Result<TileColor, ConfigError> {
    let rgb = if value.starts_with('%') {
        str_percent_to_rgb(value)
    } else {
        str_hex_to_rgb(value)
    };
    rgb.map(|(r, g, b)| TileColor::rgb(r, g, b))
        .map_err(|error| ctx.error_attr_conversion(element, attr, &error))
}

/// A string holding exactly one character, returned as its code point.
pub fn to_unicode_char(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    value: &str,
) -> Result<u32, ConfigError> {
    let mut chars = value.chars();
    let (Some(single), None) = (chars.next(), chars.next()) else {
        return Err(ctx.error(
            element,
            attr,
            XML_ATTR_INVALID_VALUE,
            format!("attribute '{}' must be a valid unicode character", attr),
        ));
    };
    check_ucs4(ctx, element, attr, u32::from(single))
}

pub fn check_ucs4(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    code: u32,
) -> Result<u32, ConfigError> {
    if (CHAR_UCS4_MIN..=CHAR_UCS4_MAX).contains(&code) {
        return Ok(code);
    }
    Err(ctx.error(
        element,
        attr,
        XML_ATTR_INVALID_VALUE,
        format!("attribute '{}' contains invalid UTF8 character {}", attr, code),
    ))
}

/// Names start with a letter and contain letters, digits and the
/// separators `:` and `-`, but don't end with a separator.
fn name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^[\p{Alphabetic}\p{Nd}:\-]+$").expect("name regex must compile")
    })
}

pub fn validate_name(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    name: &str,
    allow_any: bool,
) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ctx.error_attr_empty(element, attr));
    }
    let invalid = |detail: &str| {
        ctx.error(
            element,
            attr,
            XML_ATTR_INVALID_VALUE,
            format!("Attribute '{}': {}", attr, detail),
        )
    };
    if name == ANY_NAME {
        if allow_any {
            return Ok(());
        }
        return Err(invalid("name cannot be any in this context"));
    }
    if !name.chars().next().is_some_and(char::is_alphabetic) {
        return Err(invalid("name must start with a letter"));
    }
    if !name_regex().is_match(name) {
        return Err(invalid("name can only contain letters, numbers and one of ':-'"));
    }
    if name.ends_with(NAME_SEPARATORS) {
        return Err(invalid("name cannot end with separator (':-')"));
    }
    Ok(())
}

/// One of `'c'`, a code point number or a character name.
pub fn to_tile_char(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    value: &str,
) -> Result<TileChar, ConfigError> {
    let Some(first) = value.chars().next() else {
        return Err(ctx.error_attr_empty(element, attr));
    };
    if first == '\'' {
        let chars = value.chars().collect::<Vec<_>>();
        let [_, quoted, '\''] = chars.as_slice() else {
            return Err(ctx.error_attr_conversion(
                element,
                attr,
                &ConversionError::UnicodeCharMalformed,
            ));
        };
        let code = check_ucs4(ctx, element, attr, u32::from(*quoted))?;
        return Ok(TileChar::Char(code));
    }
    if first.is_ascii_digit() {
        let code = to_u32(ctx, element, attr, value, Some(CHAR_UCS4_MIN), Some(CHAR_UCS4_MAX))?;
        return Ok(TileChar::Char(code));
    }
    to_char_name(ctx, element, attr, value)
}

pub fn to_char_name(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    name: &str,
) -> Result<TileChar, ConfigError> {
    validate_name(ctx, element, attr, name, false)?;
    let index = ctx.named_mut().chars.add_name(name);
    match u32::try_from(index) {
        Ok(index) if index <= CHAR_INDEX_MAX => Ok(TileChar::Index(index)),
        _ => Err(ctx.error_attr_too_many_names(element, attr)),
    }
}

/// One of `#RRGGBB`, `%r^g^b`, a palette number or a color name.
pub fn to_tile_color(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    value: &str,
) -> Result<TileColor, ConfigError> {
    let Some(first) = value.chars().next() else {
        return Err(ctx.error_attr_empty(element, attr));
    };
    if first == '#' || first == '%' {
        return to_rgb(ctx, element, attr, value);
    }
    if first.is_ascii_digit() {
        let pal = to_u32(ctx, element, attr, value, Some(0), Some(COLOR_PAL_LAST))?;
        return Ok(TileColor::Pal(pal));
    }
    to_color_name(ctx, element, attr, value)
}

pub fn to_color_name(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    name: &str,
) -> Result<TileColor, ConfigError> {
    validate_name(ctx, element, attr, name, false)?;
    let index = ctx.named_mut().colors.add_name(name);
    match u32::try_from(index) {
        Ok(index) if index <= COLOR_INDEX_MAX => Ok(TileColor::Index(index)),
        _ => Err(ctx.error_attr_too_many_names(element, attr)),
    }
}

#[cfg(test)]
mod tests {
    use tg_core::Named;
    use tg_parser::parse_xml_document;

    use super::*;

    fn element() -> XmlElementNode {
        parse_xml_document("<Tile/>").expect("parse").root
    }

    #[test]
    fn tile_char_accepts_quoted_code_and_name_forms() {
        let el = element();
        let mut named = Named::new();
        let mut ctx = ParseContext::new(&mut named);
        assert_eq!(to_tile_char(&mut ctx, &el, "char", "'A'").expect("quoted"), TileChar::Char(65));
        assert_eq!(to_tile_char(&mut ctx, &el, "char", "0x41").expect("hex"), TileChar::Char(65));
        assert_eq!(to_tile_char(&mut ctx, &el, "char", "9731").expect("decimal"), TileChar::Char(9731));
        assert_eq!(to_tile_char(&mut ctx, &el, "char", "BOMB").expect("name"), TileChar::Index(0));
        assert_eq!(to_tile_char(&mut ctx, &el, "char", "STAR").expect("name"), TileChar::Index(1));
        assert_eq!(to_tile_char(&mut ctx, &el, "char", "BOMB").expect("name"), TileChar::Index(0));
        assert_eq!(ctx.named().chars.len(), 2);
    }

    #[test]
    fn tile_char_rejects_malformed_values() {
        let el = element();
        let mut named = Named::new();
        let mut ctx = ParseContext::new(&mut named);
        let error = to_tile_char(&mut ctx, &el, "char", "'AB'").expect_err("two chars");
        assert_eq!(error.detail, "Attribute 'char': wrong unicode char");
        let error = to_tile_char(&mut ctx, &el, "char", "0").expect_err("below min");
        assert_eq!(error.detail, "Attribute 'char': Number must be >= 1");
        let error = to_tile_char(&mut ctx, &el, "char", "").expect_err("empty");
        assert_eq!(error.code, "XML_ATTR_EMPTY");
    }

    #[test]
    fn tile_color_accepts_all_forms() {
        let el = element();
        let mut named = Named::new();
        let mut ctx = ParseContext::new(&mut named);
        assert_eq!(
            to_tile_color(&mut ctx, &el, "color", "#FF0000").expect("hex"),
            TileColor::rgb(255, 0, 0)
        );
        assert_eq!(
            to_tile_color(&mut ctx, &el, "color", "%0^128^255").expect("percent"),
            TileColor::rgb(0, 128, 255)
        );
        assert_eq!(to_tile_color(&mut ctx, &el, "color", "7").expect("pal"), TileColor::Pal(7));
        assert_eq!(
            to_tile_color(&mut ctx, &el, "color", "sky-blue").expect("name"),
            TileColor::Index(0)
        );
        assert!(to_tile_color(&mut ctx, &el, "color", "#FF00").is_err());
        assert!(to_tile_color(&mut ctx, &el, "color", "16777216").is_err());
    }

    #[test]
    fn validate_name_rules() {
        let el = element();
        let mut named = Named::new();
        let ctx = ParseContext::new(&mut named);
        validate_name(&ctx, &el, "name", "Piece:Red-2", false).expect("valid name");
        validate_name(&ctx, &el, "name", "*", true).expect("any allowed");
        let detail = |name: &str| {
            validate_name(&ctx, &el, "name", name, false)
                .expect_err("invalid name")
                .detail
        };
        assert_eq!(detail("*"), "Attribute 'name': name cannot be any in this context");
        assert_eq!(detail("2x"), "Attribute 'name': name must start with a letter");
        assert_eq!(
            detail("a b"),
            "Attribute 'name': name can only contain letters, numbers and one of ':-'"
        );
        assert_eq!(detail("red-"), "Attribute 'name': name cannot end with separator (':-')");
        assert_eq!(detail(""), "attribute 'name' cannot be empty");
    }

    #[test]
    fn name_regex_is_compiled_once() {
        assert!(std::ptr::eq(name_regex(), name_regex()));
        assert!(name_regex().is_match("Gem:Blue-3"));
        assert!(!name_regex().is_match("gem blue"));
    }

    #[test]
    fn unicode_char_must_be_single() {
        let el = element();
        let mut named = Named::new();
        let ctx = ParseContext::new(&mut named);
        assert_eq!(to_unicode_char(&ctx, &el, "char", "é").expect("one char"), 0xE9);
        let error = to_unicode_char(&ctx, &el, "char", "ab").expect_err("two chars");
        assert_eq!(error.detail, "attribute 'char' must be a valid unicode character");
    }
}
