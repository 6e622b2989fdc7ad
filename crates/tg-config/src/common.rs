use tg_core::convert::tokenize;
use tg_core::{ConfigError, IntSet};
use tg_parser::XmlElementNode;

use crate::checker::IGNORE_ELEMENT_PREFIX;
use crate::conditional;
use crate::context::ParseContext;
use crate::errors::{XML_ATTR_EMPTY, XML_ATTR_INVALID_VALUE, XML_ATTR_NOT_FOUND};
use crate::xml_conv::to_number;

pub const SEPARATOR_ATTR: &str = "separator";
pub const DEFAULT_SEPARATOR: &str = ",";

/// How attribute values are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The element's own attribute.
    Plain,
    /// The element's attribute unless an active `AttrIf` block overrides it.
    Conditional,
}

impl Lookup {
    pub fn get<'d>(
        self,
        ctx: &mut ParseContext<'_>,
        element: &'d XmlElementNode,
        attr: &str,
    ) -> Result<Option<&'d str>, ConfigError> {
        match self {
            Self::Plain => get_plain_attribute(ctx, element, attr),
            Self::Conditional => conditional::get_attribute_value(ctx, element, attr),
        }
    }
}

/// Reads an attribute after declaring it legal on the element.
pub fn get_plain_attribute<'d>(
    ctx: &mut ParseContext<'_>,
    element: &'d XmlElementNode,
    attr: &str,
) -> Result<Option<&'d str>, ConfigError> {
    ctx.open(element);
    ctx.declare_attr(element, attr)?;
    ctx.close(element, false, false)?;
    Ok(element.attribute(attr))
}

/// Separator for multi value attributes: `separator_attr`, else
/// `separator`, else a comma.
pub fn parse_separator(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    separator_attr: &str,
) -> Result<String, ConfigError> {
    if separator_attr.is_empty() {
        return Ok(DEFAULT_SEPARATOR.to_string());
    }
    let own = get_plain_attribute(ctx, element, separator_attr)?;
    let shared = get_plain_attribute(ctx, element, SEPARATOR_ATTR)?;
    let (attr, value) = match (own, shared) {
        (Some(value), _) => (separator_attr, value),
        (None, Some(value)) => (SEPARATOR_ATTR, value),
        (None, None) => return Ok(DEFAULT_SEPARATOR.to_string()),
    };
    let separator = value.trim();
    if separator.is_empty() {
        return Err(ctx.error(
            element,
            attr,
            XML_ATTR_EMPTY,
            format!("Attribute '{}' cannot be a whitespace character", attr),
        ));
    }
    Ok(separator.to_string())
}

/// Attribute names of an integer set: a single value, a range with an
/// optional step, or a separated list. Empty names are not read.
#[derive(Debug, Clone, Copy)]
pub struct IntSetAttrs<'n> {
    pub single: &'n str,
    pub from: &'n str,
    pub to: &'n str,
    pub step: &'n str,
    pub multi: &'n str,
    pub separator: &'n str,
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl IntSetAttrs<'static> {
    /// `value` | `from`/`to` | `values`, no lower than zero.
    pub const COUNT: IntSetAttrs<'static> = IntSetAttrs {
        single: "value",
        from: "from",
        to: "to",
        step: "",
        multi: "values",
        separator: "",
        min: Some(0),
        max: None,
    };
}

/// Parses the integer set families of `attrs`. Only one family may be
/// given. `None` when no attribute is defined.
///
/// A range missing one end extends to `min` or `max` (or the `i32`
/// limits). A step without range applies to the whole bounded range.
pub fn parse_int_set_attrs(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    lookup: Lookup,
    attrs: &IntSetAttrs<'_>,
) -> Result<Option<IntSet>, ConfigError> {
    let mut set = None;
    let mut single_defined = false;
    if !attrs.single.is_empty() && attrs.single != attrs.multi {
        if let Some(value) = lookup.get(ctx, element, attrs.single)? {
            let value = to_number(ctx, element, attrs.single, value, attrs.min, attrs.max)?;
            set = Some(IntSet::single(value));
            single_defined = true;
        }
    }
    let from = read_bounded(ctx, element, lookup, attrs.from, attrs, single_defined)?;
    let to = read_bounded(ctx, element, lookup, attrs.to, attrs, single_defined)?;
    let mut step = None;
    if !attrs.step.is_empty() {
        if let Some(value) = lookup.get(ctx, element, attrs.step)? {
            if single_defined {
                return Err(ctx.error_attr_already_defined_by(element, attrs.step, attrs.single));
            }
            let value = to_number::<i32>(ctx, element, attrs.step, value, None, None)?;
            if value == 0 {
                return Err(ctx.error_attr_invalid_value(element, attrs.step));
            }
            step = Some(value);
        }
    }
    let range_defined = from.is_some() || to.is_some() || step.is_some();
    if range_defined {
        let from = from.unwrap_or(attrs.min.unwrap_or(i32::MIN));
        let to = to.unwrap_or(attrs.max.unwrap_or(i32::MAX));
        set = Some(IntSet::range_with_step(from, to, step.unwrap_or(1)));
    }
    if attrs.multi.is_empty() {
        return Ok(set);
    }
    let separator = parse_separator(ctx, element, attrs.separator)?;
    let Some(multi) = lookup.get(ctx, element, attrs.multi)? else {
        return Ok(set);
    };
    if single_defined {
        return Err(ctx.error_attr_already_defined_by(element, attrs.multi, attrs.single));
    }
    if range_defined {
        return Err(ctx.error_attr_already_defined_by_range(
            element,
            attrs.multi,
            attrs.from,
            attrs.to,
        ));
    }
    let mut values = Vec::new();
    for token in tokenize(multi, &separator) {
        values.push(to_number(ctx, element, attrs.multi, token, attrs.min, attrs.max)?);
    }
    Ok(Some(IntSet::from_values(values)))
}

fn read_bounded(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    lookup: Lookup,
    attr: &str,
    attrs: &IntSetAttrs<'_>,
    single_defined: bool,
) -> Result<Option<i32>, ConfigError> {
    if attr.is_empty() {
        return Ok(None);
    }
    let Some(value) = lookup.get(ctx, element, attr)? else {
        return Ok(None);
    };
    if single_defined {
        return Err(ctx.error_attr_already_defined_by(element, attr, attrs.single));
    }
    to_number(ctx, element, attr, value, attrs.min, attrs.max).map(Some)
}

/// Reads an interval from `single` or `from`/`to`. Returns `None` when no
/// attribute is defined and the interval is not mandatory.
#[allow(clippy::too_many_arguments)]
pub fn parse_attr_from_to(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    lookup: Lookup,
    single: &str,
    from: &str,
    to: &str,
    mandatory: bool,
    min: Option<i32>,
    max: Option<i32>,
) -> Result<Option<(i32, i32)>, ConfigError> {
    let mut low = min.unwrap_or(i32::MIN);
    let mut high = max.unwrap_or(i32::MAX);
    let single_value = lookup.get(ctx, element, single)?;
    if let Some(value) = single_value {
        low = to_number(ctx, element, single, value, min, max)?;
        high = low;
    }
    let from_value = lookup.get(ctx, element, from)?;
    if let Some(value) = from_value {
        if single_value.is_some() {
            return Err(ctx.error_attr_already_defined_by(element, from, single));
        }
        low = to_number(ctx, element, from, value, min, max)?;
    }
    let to_value = lookup.get(ctx, element, to)?;
    if let Some(value) = to_value {
        if single_value.is_some() {
            return Err(ctx.error_attr_already_defined_by(element, to, single));
        }
        high = to_number(ctx, element, to, value, min, max)?;
    }
    if low > high {
        return Err(ctx.error(
            element,
            "",
            XML_ATTR_INVALID_VALUE,
            format!("Attribute '{}' cannot be bigger than '{}'", from, to),
        ));
    }
    let defined = single_value.is_some() || from_value.is_some() || to_value.is_some();
    if !defined {
        if mandatory {
            return Err(ctx.error(
                element,
                "",
                XML_ATTR_NOT_FOUND,
                format!(
                    "Either attribute '{}', '{}' or '{}' have to be defined",
                    single, from, to
                ),
            ));
        }
        return Ok(None);
    }
    Ok(Some((low, high)))
}

/// Visits the children named `name`, or all children (except ignored
/// ones) when `name` is empty.
pub fn visit_named_element_children<'a, 'd, F>(
    ctx: &mut ParseContext<'a>,
    element: &'d XmlElementNode,
    name: &str,
    mut visitor: F,
) -> Result<(), ConfigError>
where
    F: FnMut(&mut ParseContext<'a>, &'d XmlElementNode) -> Result<(), ConfigError>,
{
    ctx.open(element);
    ctx.declare_child(element, name)?;
    for child in &element.children {
        let selected = if name.is_empty() {
            !child.name.starts_with(IGNORE_ELEMENT_PREFIX)
        } else {
            child.name == name
        };
        if selected {
            visitor(ctx, child)?;
        }
    }
    ctx.close(element, false, false)
}

pub fn visit_element_children<'a, 'd, F>(
    ctx: &mut ParseContext<'a>,
    element: &'d XmlElementNode,
    visitor: F,
) -> Result<(), ConfigError>
where
    F: FnMut(&mut ParseContext<'a>, &'d XmlElementNode) -> Result<(), ConfigError>,
{
    visit_named_element_children(ctx, element, "", visitor)
}

/// The only child named `name`, if any. A second one is an error, as is a
/// missing mandatory one.
pub fn parse_unique_element<'d>(
    ctx: &mut ParseContext<'_>,
    parent: &'d XmlElementNode,
    name: &str,
    mandatory: bool,
) -> Result<Option<&'d XmlElementNode>, ConfigError> {
    let mut found = None;
    visit_named_element_children(ctx, parent, name, |ctx, child| {
        if found.is_some() {
            return Err(ctx.error_element_too_many(child, name));
        }
        found = Some(child);
        Ok(())
    })?;
    if found.is_none() && mandatory {
        return Err(ctx.error_element_not_found(parent, name));
    }
    Ok(found)
}
