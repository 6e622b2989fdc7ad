use tg_core::convert::tokenize;
use tg_core::ConfigError;
use tg_parser::XmlElementNode;
use tracing::debug;

use crate::checker::{
    ATTR_IF_NODE, ATTR_IF_UNDEF_ATTR, ATTR_IF_UNDEF_SEPARATOR, EXIST_IF_NODE, IGNORE_ELEMENT_PREFIX,
    PASSTHROUGH_IF_NODE,
};
use crate::common::{self, get_plain_attribute};
use crate::condition::evaluate_condition;
use crate::context::ParseContext;
use crate::errors::{XML_ATTR_INVALID, XML_ATTR_INVALID_VALUE};
use crate::owner::parse_owner_exists;
use crate::xml_conv::to_bool;

type Visitor<'v, 'a, 'd> =
    dyn FnMut(&mut ParseContext<'a>, &'d XmlElementNode) -> Result<(), ConfigError> + 'v;

fn is_conditional_node(name: &str) -> bool {
    name == EXIST_IF_NODE || name == PASSTHROUGH_IF_NODE || name == ATTR_IF_NODE
}

/// Value of `attr` after applying the element's `AttrIf` blocks.
///
/// Only the first block whose condition holds is consulted: it either
/// defines the attribute, lists it in `_undef_` (the attribute is then
/// undefined) or leaves the element's own value in place.
pub fn get_attribute_value<'d>(
    ctx: &mut ParseContext<'_>,
    element: &'d XmlElementNode,
    attr: &str,
) -> Result<Option<&'d str>, ConfigError> {
    let mut active = None;
    common::visit_named_element_children(ctx, element, ATTR_IF_NODE, |ctx, attr_if| {
        if active.is_none() && evaluate_condition(ctx, attr_if)? {
            active = Some(attr_if);
        }
        Ok(())
    })?;
    if let Some(attr_if) = active {
        if let Some(value) = get_plain_attribute(ctx, attr_if, attr)? {
            debug!(element = %element.name, attr, value, "attribute overridden by AttrIf");
            declare_on(ctx, element, attr)?;
            return Ok(Some(value));
        }
        if let Some(undefined) = get_plain_attribute(ctx, attr_if, ATTR_IF_UNDEF_ATTR)? {
            if tokenize(undefined, ATTR_IF_UNDEF_SEPARATOR).contains(&attr) {
                debug!(element = %element.name, attr, "attribute undefined by AttrIf");
                declare_on(ctx, element, attr)?;
                return Ok(None);
            }
        }
    }
    get_plain_attribute(ctx, element, attr)
}

// The override is logically attached to the element itself.
fn declare_on(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
) -> Result<(), ConfigError> {
    ctx.open(element);
    ctx.declare_attr(element, attr)?;
    ctx.close(element, false, false)
}

/// Conditional boolean attribute.
pub fn get_bool_attribute(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
) -> Result<Option<bool>, ConfigError> {
    match get_attribute_value(ctx, element, attr)? {
        Some(value) => to_bool(ctx, element, attr, value).map(Some),
        None => Ok(None),
    }
}

/// Index of the attribute's value in `values`, `None` if undefined.
pub fn get_enum_attribute_value(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    values: &[&str],
) -> Result<Option<usize>, ConfigError> {
    let Some(value) = get_attribute_value(ctx, element, attr)? else {
        return Ok(None);
    };
    match values.iter().position(|candidate| *candidate == value) {
        Some(index) => Ok(Some(index)),
        None => Err(ctx.error(
            element,
            attr,
            XML_ATTR_INVALID_VALUE,
            format!("attribute {}: value not valid", attr),
        )),
    }
}

/// Visits `attr` and then `attr_0` .. `attr_<total - 1>`. The visitor
/// gets the attribute name, its value and the layout config number (`-1`
/// for the plain attribute).
pub fn visit_layout_config_named_attributes<'d, F>(
    ctx: &mut ParseContext<'_>,
    element: &'d XmlElementNode,
    attr: &str,
    total: usize,
    mut visitor: F,
) -> Result<(), ConfigError>
where
    F: FnMut(&str, &'d str, i32) -> Result<(), ConfigError>,
{
    if let Some(value) = get_attribute_value(ctx, element, attr)? {
        visitor(attr, value, -1)?;
    }
    for layout in 0..total {
        let name = format!("{}_{}", attr, layout);
        if let Some(value) = get_attribute_value(ctx, element, &name)? {
            let layout = i32::try_from(layout).unwrap_or(i32::MAX);
            visitor(&name, value, layout)?;
        }
    }
    Ok(())
}

/// Visits the children named `name` (all non conditional children when
/// empty) that currently exist.
///
/// A child is skipped when its owner is not in the roster or when its
/// `ExistIf` condition is false. A child whose `PassthroughIf` condition
/// holds is replaced by its own children with the same filter.
pub fn visit_named_element_children<'a, 'd, F>(
    ctx: &mut ParseContext<'a>,
    element: &'d XmlElementNode,
    name: &str,
    mut visitor: F,
) -> Result<(), ConfigError>
where
    F: FnMut(&mut ParseContext<'a>, &'d XmlElementNode) -> Result<(), ConfigError>,
{
    visit_existing(ctx, element, name, &mut visitor)
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

fn visit_existing<'a, 'd>(
    ctx: &mut ParseContext<'a>,
    element: &'d XmlElementNode,
    name: &str,
    visitor: &mut Visitor<'_, 'a, 'd>,
) -> Result<(), ConfigError> {
    ctx.open(element);
    ctx.declare_child(element, name)?;
    for child in &element.children {
        let selected = if name.is_empty() {
            !is_conditional_node(&child.name) && !child.name.starts_with(IGNORE_ELEMENT_PREFIX)
        } else {
            child.name == name
        };
        if !selected {
            continue;
        }
        // Keeps the owner attributes declared while the visitor runs.
        ctx.open(child);
        if !parse_owner_exists(ctx, child)?.exists || !eval_gate(ctx, child, EXIST_IF_NODE, true)? {
            ctx.close(child, false, false)?;
            continue;
        }
        if eval_gate(ctx, child, PASSTHROUGH_IF_NODE, false)? {
            visit_existing(ctx, child, name, visitor)?;
        } else {
            visitor(ctx, child)?;
        }
        ctx.close(child, false, false)?;
    }
    ctx.close(element, false, false)
}

fn eval_gate(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    gate_name: &str,
    absent: bool,
) -> Result<bool, ConfigError> {
    let Some(gate) = common::parse_unique_element(ctx, element, gate_name, false)? else {
        return Ok(absent);
    };
    if let Some(attr) = gate.attributes.keys().next() {
        return Err(ctx.error(gate, attr, XML_ATTR_INVALID, format!("Attribute {}: invalid", attr)));
    }
    evaluate_condition(ctx, gate)
}

/// Like [`common::parse_unique_element`] but only considers existing
/// children.
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
