use tg_core::{ConfigError, OwnerType};
use tg_parser::XmlElementNode;

use crate::common::Lookup;
use crate::conditional;
use crate::context::ParseContext;
use crate::errors::XML_ATTR_NOT_FOUND;
use crate::xml_conv::to_number;

pub const TEAM_ATTR: &str = "team";
pub const MATE_ATTR: &str = "mate";
pub const PLAYER_ATTR: &str = "player";
pub const OWNER_TYPE_ATTR: &str = "ownerType";

pub const OWNER_NO_PREFERENCES: &str = "OWNER_NO_PREFERENCES";

/// A resolved owner: the whole game, one team or one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerRef {
    Game,
    Team(usize),
    Player { team: usize, mate: usize },
}

impl OwnerRef {
    pub fn owner_type(&self) -> OwnerType {
        match self {
            Self::Game => OwnerType::Game,
            Self::Team(_) => OwnerType::Team,
            Self::Player { .. } => OwnerType::Player,
        }
    }

    pub fn team(&self) -> Option<usize> {
        match self {
            Self::Game => None,
            Self::Team(team) | Self::Player { team, .. } => Some(*team),
        }
    }
}

/// Owner named by an element's `team`/`mate`/`player` attributes and
/// whether it is part of the current roster. `-1` marks an unset index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerExists {
    pub exists: bool,
    pub team: i32,
    pub mate: i32,
}

impl OwnerExists {
    /// The most specific owner the indexes describe.
    pub fn owner(&self) -> OwnerRef {
        match (usize::try_from(self.team), usize::try_from(self.mate)) {
            (Err(_), _) => OwnerRef::Game,
            (Ok(team), Err(_)) => OwnerRef::Team(team),
            (Ok(team), Ok(mate)) => OwnerRef::Player { team, mate },
        }
    }
}

fn read_index(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    value: &str,
    max: Option<i32>,
) -> Result<i32, ConfigError> {
    to_number(ctx, element, attr, value, Some(0), max)
}

fn check_player_conflict(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    team_value: Option<&str>,
    mate_value: Option<&str>,
) -> Result<(), ConfigError> {
    let other = if mate_value.is_some() {
        MATE_ATTR
    } else if team_value.is_some() {
        TEAM_ATTR
    } else {
        return Ok(());
    };
    Err(ctx.error_attr_already_defined_by(element, PLAYER_ATTR, other))
}

/// Resolves the owner attributes without bounds checks and reports
/// whether that owner exists. Missing `team` and `mate` fall back to the
/// context owner.
///
/// Without preferences the attributes are only validated and the owner
/// always exists.
pub fn parse_owner_exists(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<OwnerExists, ConfigError> {
    let team_value = Lookup::Conditional.get(ctx, element, TEAM_ATTR)?;
    let mate_value = Lookup::Conditional.get(ctx, element, MATE_ATTR)?;
    let player_value = Lookup::Conditional.get(ctx, element, PLAYER_ATTR)?;

    let Some(preferences) = ctx.preferences() else {
        for (attr, value) in [(TEAM_ATTR, team_value), (MATE_ATTR, mate_value)] {
            if let Some(value) = value.filter(|value| !value.is_empty()) {
                read_index(ctx, element, attr, value, None)?;
            }
        }
        if let Some(player) = player_value {
            check_player_conflict(ctx, element, team_value, mate_value)?;
            if !player.is_empty() {
                read_index(ctx, element, PLAYER_ATTR, player, None)?;
            }
        }
        return Ok(OwnerExists {
            exists: true,
            team: -1,
            mate: -1,
        });
    };
    let total_teams = i32::try_from(preferences.total_teams()).unwrap_or(i32::MAX);
    let total_players = i32::try_from(preferences.total_players()).unwrap_or(i32::MAX);

    let mut team = -1;
    match team_value {
        Some(value) if !value.is_empty() => {
            team = read_index(ctx, element, TEAM_ATTR, value, None)?;
        }
        Some(_) => {}
        None => team = ctx.context_team(),
    }
    let mut mate = -1;
    match mate_value {
        Some(value) if !value.is_empty() => {
            if team < 0 && total_teams == 1 {
                team = 0;
            }
            mate = read_index(ctx, element, MATE_ATTR, value, None)?;
        }
        Some(_) => {}
        None if team >= 0 => mate = ctx.context_mate(),
        None => {}
    }
    if let Some(value) = player_value {
        check_player_conflict(ctx, element, team_value, mate_value)?;
        if !value.is_empty() {
            let player = read_index(ctx, element, PLAYER_ATTR, value, None)?;
            match usize::try_from(player).ok().and_then(|index| preferences.player(index)) {
                Some(entry) => {
                    team = i32::try_from(entry.team).unwrap_or(i32::MAX);
                    mate = i32::try_from(entry.mate).unwrap_or(i32::MAX);
                }
                None => {
                    team = total_teams;
                    mate = player - total_players;
                }
            }
        }
    }
    if mate >= 0 && team < 0 {
        return Err(ctx.error_attr_not_found(element, TEAM_ATTR));
    }
    let exists = if team < 0 {
        true
    } else if team >= total_teams {
        false
    } else if mate < 0 {
        true
    } else {
        let mates = usize::try_from(team).map_or(0, |team| preferences.team_total_mates(team));
        usize::try_from(mate).is_ok_and(|mate| mate < mates)
    };
    Ok(OwnerExists { exists, team, mate })
}

/// Resolves `team` (or the context team) and reports whether it exists.
/// Without preferences the team always exists and is `-1`.
pub fn parse_team_exists(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<(bool, i32), ConfigError> {
    let value = Lookup::Conditional.get(ctx, element, TEAM_ATTR)?;
    let team = match value {
        Some("") => return Err(ctx.error_attr_empty(element, TEAM_ATTR)),
        Some(value) => read_index(ctx, element, TEAM_ATTR, value, None)?,
        None => ctx.context_team(),
    };
    let Some(preferences) = ctx.preferences() else {
        return Ok((true, -1));
    };
    if team < 0 {
        return Err(ctx.error_attr_not_found(element, TEAM_ATTR));
    }
    let exists = usize::try_from(team).is_ok_and(|team| team < preferences.total_teams());
    Ok((exists, team))
}

/// Conditional owner type attribute (`ownerType` when `attr` is empty).
pub fn parse_owner_type(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
) -> Result<Option<OwnerType>, ConfigError> {
    let attr = if attr.is_empty() { OWNER_TYPE_ATTR } else { attr };
    let index = conditional::get_enum_attribute_value(ctx, element, attr, &OwnerType::NAMES)?;
    Ok(index.and_then(OwnerType::from_index))
}

/// Resolves the owner attributes against the roster with bounds checks.
///
/// `required` is the least specific owner accepted: a `Player` requirement
/// fails when no mate could be determined, a `Team` requirement when no
/// team could be.
pub fn parse_owner(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    required: OwnerType,
) -> Result<OwnerRef, ConfigError> {
    let Some(preferences) = ctx.preferences() else {
        return Err(ctx.error(
            element,
            "",
            OWNER_NO_PREFERENCES,
            "Owner cannot be resolved without preferences",
        ));
    };
    let total_teams = i32::try_from(preferences.total_teams()).unwrap_or(i32::MAX);
    let total_players = i32::try_from(preferences.total_players()).unwrap_or(i32::MAX);

    let team_value = Lookup::Conditional.get(ctx, element, TEAM_ATTR)?;
    let mut team = -1;
    match team_value {
        Some(value) if !value.is_empty() => {
            team = read_index(ctx, element, TEAM_ATTR, value, Some(total_teams - 1))?;
        }
        Some(_) => {}
        None => team = ctx.context_team(),
    }

    let mate_value = Lookup::Conditional.get(ctx, element, MATE_ATTR)?;
    let mut mate = -1;
    match mate_value {
        Some(value) if !value.is_empty() => {
            if team < 0 {
                if total_teams != 1 {
                    return Err(ctx.error_attr_not_found(element, TEAM_ATTR));
                }
                team = 0;
            }
            let mates = usize::try_from(team).map_or(0, |team| preferences.team_total_mates(team));
            let max = i32::try_from(mates).unwrap_or(i32::MAX) - 1;
            mate = read_index(ctx, element, MATE_ATTR, value, Some(max))?;
        }
        Some(_) => {}
        None if team >= 0 => mate = ctx.context_mate(),
        None => {}
    }

    let player_value = Lookup::Conditional.get(ctx, element, PLAYER_ATTR)?;
    if let Some(value) = player_value {
        check_player_conflict(ctx, element, team_value, mate_value)?;
        if !value.is_empty() {
            let player = read_index(ctx, element, PLAYER_ATTR, value, Some(total_players - 1))?;
            let entry = usize::try_from(player)
                .ok()
                .and_then(|index| preferences.player(index));
            if let Some(entry) = entry {
                team = i32::try_from(entry.team).unwrap_or(i32::MAX);
                mate = i32::try_from(entry.mate).unwrap_or(i32::MAX);
            }
        }
    } else if mate >= 0 && team < 0 {
        return Err(ctx.error_attr_not_found(element, TEAM_ATTR));
    }

    if required == OwnerType::Player && mate < 0 {
        return Err(ctx.error(
            element,
            "",
            XML_ATTR_NOT_FOUND,
            "Player is not defined (by either attributes mate or player)",
        ));
    }
    if required == OwnerType::Team && team < 0 {
        return Err(ctx.error(
            element,
            "",
            XML_ATTR_NOT_FOUND,
            "Player is not defined (by attribute team)",
        ));
    }
    Ok(OwnerExists {
        exists: true,
        team,
        mate,
    }
    .owner())
}
