use tg_core::convert::tokenize;
use tg_core::{ConfigError, ConversionError, GameOption, Variant, VariantSet};
use tg_parser::XmlElementNode;

use crate::common::{get_plain_attribute, parse_separator};
use crate::context::ParseContext;
use crate::errors::{XML_ATTR_INVALID_VALUE, XML_ATTR_NOT_FOUND};

pub const VALUE_ATTR: &str = "value";
pub const FROM_ATTR: &str = "from";
pub const TO_ATTR: &str = "to";
pub const VALUES_ATTR: &str = "values";

fn conversion_error(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    error: &ConversionError,
) -> ConfigError {
    ctx.error(
        element,
        attr,
        XML_ATTR_INVALID_VALUE,
        format!("attribute '{}': {}", attr, error),
    )
}

fn convert(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    option: &GameOption,
    attr: &str,
    value: &str,
) -> Result<Variant, ConfigError> {
    option
        .value_from_string(value)
        .map_err(|error| conversion_error(ctx, element, attr, &error))
}

/// Parses the values an option is compared with: `value`, a `from`/`to`
/// range (integer options only) or a separated `values` list. Every value
/// is converted with the option's type.
pub fn parse_variant_set(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    option: &GameOption,
) -> Result<VariantSet, ConfigError> {
    let mut single = None;
    if let Some(value) = get_plain_attribute(ctx, element, VALUE_ATTR)? {
        let value = convert(ctx, element, option, VALUE_ATTR, value)?;
        if value.is_null() {
            return Err(ctx.error_attr_invalid_value(element, VALUE_ATTR));
        }
        single = Some(value);
    }

    let mut from = None;
    if let Some(value) = get_plain_attribute(ctx, element, FROM_ATTR)? {
        if single.is_some() {
            return Err(ctx.error_attr_already_defined_by(element, FROM_ATTR, VALUE_ATTR));
        }
        from = Some(convert(ctx, element, option, FROM_ATTR, value)?);
    }
    let mut to = None;
    if let Some(value) = get_plain_attribute(ctx, element, TO_ATTR)? {
        if single.is_some() {
            return Err(ctx.error_attr_already_defined_by(element, TO_ATTR, VALUE_ATTR));
        }
        // Conversion failures of `to` are reported on `from`.
        let value = convert(ctx, element, option, FROM_ATTR, value)?;
        if from.map_or(true, |from: Variant| from.is_null()) {
            from = Some(value);
        }
        to = Some(value);
    }
    if to.is_none() {
        to = from;
    }

    let mut range = None;
    if let (Some(from), Some(to)) = (from, to) {
        if !from.same_type(&option.default) {
            return Err(ctx.error(
                element,
                FROM_ATTR,
                XML_ATTR_INVALID_VALUE,
                format!("attribute '{}': wrong type", FROM_ATTR),
            ));
        }
        if !from.same_type(&to) {
            return Err(ctx.error(
                element,
                FROM_ATTR,
                XML_ATTR_INVALID_VALUE,
                format!("attributes '{}' and '{}' must have same type", FROM_ATTR, TO_ATTR),
            ));
        }
        if !option.allows_range() {
            return Err(ctx.error(
                element,
                FROM_ATTR,
                XML_ATTR_INVALID_VALUE,
                format!("attribute '{}': type doesn't allow range", FROM_ATTR),
            ));
        }
        range = Some(VariantSet::range(from, to));
    }

    let separator = parse_separator(ctx, element, "")?;
    let mut values = None;
    if let Some(list) = get_plain_attribute(ctx, element, VALUES_ATTR)? {
        if single.is_some() {
            return Err(ctx.error_attr_already_defined_by(element, VALUES_ATTR, VALUE_ATTR));
        }
        if range.is_some() {
            return Err(ctx.error_attr_already_defined_by_range(element, VALUES_ATTR, FROM_ATTR, TO_ATTR));
        }
        let mut converted: Vec<Variant> = Vec::new();
        for token in tokenize(list, &separator) {
            let value = convert(ctx, element, option, VALUES_ATTR, token)?;
            let mixed = converted.first().is_some_and(|first| !first.same_type(&value));
            if value.is_null() || mixed {
                return Err(ctx.error_attr_invalid_value(element, VALUES_ATTR));
            }
            converted.push(value);
        }
        values = Some(VariantSet::from_values(converted));
    }

    match (single, range, values) {
        (Some(single), _, _) => Ok(VariantSet::Single(single)),
        (_, Some(range), _) => Ok(range),
        (_, _, Some(values)) => Ok(values),
        _ => Err(ctx.error(
            element,
            "",
            XML_ATTR_NOT_FOUND,
            format!(
                "Either attribute '{}', '{}' or '{}' have to be defined",
                VALUE_ATTR, FROM_ATTR, TO_ATTR
            ),
        )),
    }
}

/// Declares the value set attributes without converting them, for
/// documents checked without an option definition at hand.
pub fn declare_variant_set_attrs(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<(), ConfigError> {
    for attr in [VALUE_ATTR, FROM_ATTR, TO_ATTR, VALUES_ATTR] {
        get_plain_attribute(ctx, element, attr)?;
    }
    Ok(())
}
