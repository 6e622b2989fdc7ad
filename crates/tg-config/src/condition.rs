use tg_core::{AppPreferences, ConfigError, OwnerType};
use tg_parser::XmlElementNode;
use tracing::trace;

use crate::common::{self, get_plain_attribute, parse_int_set_attrs, IntSetAttrs, Lookup};
use crate::context::ParseContext;
use crate::owner::{parse_owner_exists, parse_owner_type, parse_team_exists};
use crate::variant_set::{declare_variant_set_attrs, parse_variant_set};
use crate::xml_conv::to_bool;

pub const OR_NODE: &str = "Or";
pub const AND_NODE: &str = "And";
pub const TRUE_NODE: &str = "True";
pub const FALSE_NODE: &str = "False";
pub const TEAMS_NODE: &str = "Teams";
pub const HUMAN_TEAMS_NODE: &str = "HumanTeams";
pub const AI_TEAMS_NODE: &str = "AITeams";
pub const PLAYERS_NODE: &str = "Players";
pub const HUMAN_PLAYERS_NODE: &str = "HumanPlayers";
pub const AI_PLAYERS_NODE: &str = "AIPlayers";
pub const MATES_NODE: &str = "Mates";
pub const OPTION_NODE: &str = "Option";

pub const NOT_ATTR: &str = "not";
pub const OPTION_NAME_ATTR: &str = "name";

pub const CONDITION_UNKNOWN: &str = "CONDITION_UNKNOWN";
pub const OWNER_UNDETERMINED: &str = "OWNER_UNDETERMINED";
pub const OPTION_NOT_FOUND: &str = "OPTION_NOT_FOUND";

/// Evaluates the children of `element` as a logical or.
///
/// This is how `AttrIf`, `ExistIf` and `PassthroughIf` blocks are
/// evaluated. Without preferences every child is still validated, and a
/// block is true when it has at least one condition.
pub fn evaluate_condition(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<bool, ConfigError> {
    evaluate_or(ctx, element, false)
}

fn evaluate_or(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    check_attrs: bool,
) -> Result<bool, ConfigError> {
    ctx.open(element);
    let live = ctx.preferences().is_some();
    let mut result = false;
    common::visit_element_children(ctx, element, |ctx, child| {
        let child_result = evaluate_node(ctx, child)?;
        result |= child_result || !live;
        Ok(())
    })?;
    ctx.close(element, false, check_attrs)?;
    trace!(element = %element.name, line = element.line(), result, "or condition");
    Ok(result)
}

fn evaluate_and(ctx: &mut ParseContext<'_>, element: &XmlElementNode) -> Result<bool, ConfigError> {
    ctx.open(element);
    let live = ctx.preferences().is_some();
    let mut result = true;
    common::visit_element_children(ctx, element, |ctx, child| {
        let child_result = evaluate_node(ctx, child)?;
        result &= child_result && live;
        Ok(())
    })?;
    ctx.close(element, false, true)?;
    trace!(element = %element.name, line = element.line(), result, "and condition");
    Ok(result)
}

fn evaluate_node(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<bool, ConfigError> {
    let preferences = ctx.preferences();
    let total = |count: fn(&AppPreferences) -> usize| {
        preferences.map(|preferences| to_i32(count(preferences)))
    };
    let result = match element.name.as_str() {
        OR_NODE => evaluate_or(ctx, element, true)?,
        AND_NODE => evaluate_and(ctx, element)?,
        OPTION_NODE => evaluate_option(ctx, element)?,
        MATES_NODE => evaluate_mates(ctx, element)?,
        TRUE_NODE | FALSE_NODE => {
            ctx.open(element);
            ctx.close(element, true, true)?;
            element.name == TRUE_NODE
        }
        TEAMS_NODE => evaluate_count(ctx, element, total(AppPreferences::total_teams))?,
        HUMAN_TEAMS_NODE => evaluate_count(ctx, element, total(AppPreferences::total_human_teams))?,
        AI_TEAMS_NODE => evaluate_count(ctx, element, total(AppPreferences::total_ai_teams))?,
        PLAYERS_NODE => evaluate_count(ctx, element, total(AppPreferences::total_players))?,
        HUMAN_PLAYERS_NODE => {
            evaluate_count(ctx, element, total(AppPreferences::total_human_players))?
        }
        AI_PLAYERS_NODE => evaluate_count(ctx, element, total(AppPreferences::total_ai_players))?,
        other => {
            return Err(ctx.error(
                element,
                "",
                CONDITION_UNKNOWN,
                format!("Unknown condition '{}'", other),
            ))
        }
    };
    trace!(element = %element.name, line = element.line(), result, "condition");
    Ok(result)
}

fn to_i32(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

fn parse_complement(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<bool, ConfigError> {
    match get_plain_attribute(ctx, element, NOT_ATTR)? {
        Some(value) => to_bool(ctx, element, NOT_ATTR, value),
        None => Ok(false),
    }
}

/// Count nodes compare a live total with `value` | `from`/`to` | `values`.
/// The total is `None` without preferences.
fn evaluate_count(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    total: Option<i32>,
) -> Result<bool, ConfigError> {
    ctx.open(element);
    let negate = parse_complement(ctx, element)?;
    let set = parse_int_set_attrs(ctx, element, Lookup::Plain, &IntSetAttrs::COUNT)?;
    ctx.close(element, true, true)?;
    let Some(total) = total else {
        return Ok(false);
    };
    let contained = set.is_some_and(|set| set.contains(total));
    Ok(negate != contained)
}

fn evaluate_mates(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<bool, ConfigError> {
    ctx.open(element);
    let (exists, team) = parse_team_exists(ctx, element)?;
    if !exists {
        ctx.close(element, false, false)?;
        return Ok(false);
    }
    let set = parse_int_set_attrs(ctx, element, Lookup::Plain, &IntSetAttrs::COUNT)?;
    let negate = parse_complement(ctx, element)?;
    ctx.close(element, true, true)?;
    let (Some(preferences), Ok(team)) = (ctx.preferences(), usize::try_from(team)) else {
        return Ok(false);
    };
    let mates = to_i32(preferences.team_total_mates(team));
    Ok(negate != set.is_some_and(|set| set.contains(mates)))
}

/// `Option` compares the current value of a game, team or player option
/// with a value set. The owner type defaults to the most specific owner
/// that could be resolved.
fn evaluate_option(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<bool, ConfigError> {
    ctx.open(element);
    let owner = parse_owner_exists(ctx, element)?;
    if !owner.exists {
        ctx.close(element, false, false)?;
        return Ok(false);
    }
    let Some(name) = get_plain_attribute(ctx, element, OPTION_NAME_ATTR)? else {
        return Err(ctx.error_attr_not_found(element, OPTION_NAME_ATTR));
    };
    let explicit_type = parse_owner_type(ctx, element, "")?;
    let Some(preferences) = ctx.preferences() else {
        parse_complement(ctx, element)?;
        declare_variant_set_attrs(ctx, element)?;
        ctx.close(element, true, true)?;
        return Ok(false);
    };
    let owner_type = match explicit_type {
        Some(OwnerType::Team) if owner.team < 0 => {
            let detail = "Cannot determine team from context";
            return Err(ctx.error(element, "", OWNER_UNDETERMINED, detail));
        }
        Some(OwnerType::Player) if owner.mate < 0 => {
            let detail = "Cannot determine player from context";
            return Err(ctx.error(element, "", OWNER_UNDETERMINED, detail));
        }
        Some(owner_type) => owner_type,
        None => owner.owner().owner_type(),
    };
    let Some(option) = preferences.config().option(owner_type, name) else {
        return Err(ctx.error(
            element,
            OPTION_NAME_ATTR,
            OPTION_NOT_FOUND,
            format!(
                "Attribute '{}': {} option with name '{}' not found",
                OPTION_NAME_ATTR,
                owner_type.label(),
                name
            ),
        ));
    };
    let team = usize::try_from(owner.team).unwrap_or(usize::MAX);
    let mate = usize::try_from(owner.mate).unwrap_or(usize::MAX);
    let value = match owner_type {
        OwnerType::Game => preferences.game_option_value(name),
        OwnerType::Team => preferences.team_option_value(team, name),
        OwnerType::Player => preferences.player_option_value(team, mate, name),
    };
    let negate = parse_complement(ctx, element)?;
    let values = parse_variant_set(ctx, element, option)?;
    ctx.close(element, true, true)?;
    Ok(negate != values.contains(&value))
}
