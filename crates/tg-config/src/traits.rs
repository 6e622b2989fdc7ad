use tg_core::convert::tokenize;
use tg_core::tile::{
    ALPHA_MAX, ALPHA_MIN, CHAR_UCS4_MAX, CHAR_UCS4_MIN, COLOR_PAL_FIRST, COLOR_PAL_LAST, FONT_INDEX_MAX,
};
use tg_core::{
    AlphaTraitSet, CharTraitSet, ColorTraitSet, ConfigError, FontTraitSet, IntSet, SelectorNode,
    Tile, TileAlpha, TileChar, TileColor, TileFont, TileSelector, TraitSet,
};
use tg_parser::XmlElementNode;
use tracing::debug;

use crate::common::{parse_int_set_attrs, parse_separator, IntSetAttrs, Lookup};
use crate::condition::NOT_ATTR;
use crate::conditional;
use crate::context::ParseContext;
use crate::errors::{XML_ATTR_INVALID_VALUE, XML_ATTR_NOT_FOUND};
use crate::xml_conv::{
    check_ucs4, to_char_name, to_color_name, to_number, to_rgb, to_tile_char, to_tile_color, to_u32,
    to_unicode_char, validate_name,
};

pub const OR_NODE: &str = "Or";
pub const AND_NODE: &str = "And";
pub const NOT_NODE: &str = "Not";
pub const TILE_NODE: &str = "Tile";
pub const CHAR_NODE: &str = "Char";
pub const COLOR_NODE: &str = "Color";
pub const FONT_NODE: &str = "Font";
pub const ALPHA_NODE: &str = "Alpha";
pub const PLAYER_NODE: &str = "Player";

pub const FONT_NAME_ATTR: &str = "fontName";
pub const FONT_NAMES_ATTR: &str = "fontNames";
pub const ALPHA_ATTR: &str = "alpha";

pub const SELECTOR_OPERANDS: &str = "SELECTOR_OPERANDS";
pub const SELECTOR_UNKNOWN_ITEM: &str = "SELECTOR_UNKNOWN_ITEM";

/// How a character attribute spells its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharForm {
    /// `'c'`, a code or a name.
    Tile,
    /// The character itself.
    Literal,
    Code,
    /// A name, stored upper case.
    Name,
}

const CHAR_ATTRS: [(&str, CharForm); 4] = [
    ("character", CharForm::Tile),
    ("char", CharForm::Literal),
    ("charCode", CharForm::Code),
    ("charName", CharForm::Name),
];
const FROM_CHAR_ATTRS: [(&str, CharForm); 3] = [
    ("fromCharacter", CharForm::Tile),
    ("fromChar", CharForm::Literal),
    ("fromCharCode", CharForm::Code),
];
const TO_CHAR_ATTRS: [(&str, CharForm); 3] = [
    ("toCharacter", CharForm::Tile),
    ("toChar", CharForm::Literal),
    ("toCharCode", CharForm::Code),
];
const CHARS_ATTRS: [(&str, CharForm); 4] = [
    ("characters", CharForm::Tile),
    ("chars", CharForm::Literal),
    ("charCodes", CharForm::Code),
    ("charNames", CharForm::Name),
];
const CHAR_SEPARATOR_ATTR: &str = "charSeparator";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorForm {
    /// `#RRGGBB`, `%r^g^b`, a palette number or a name.
    Tile,
    Pal,
    Rgb,
    Name,
}

const COLOR_ATTRS: [(&str, ColorForm); 4] = [
    ("color", ColorForm::Tile),
    ("colorPal", ColorForm::Pal),
    ("colorRgb", ColorForm::Rgb),
    ("colorName", ColorForm::Name),
];
const FROM_COLOR_ATTRS: [(&str, ColorForm); 3] = [
    ("fromColor", ColorForm::Tile),
    ("fromColorPal", ColorForm::Pal),
    ("fromColorRgb", ColorForm::Rgb),
];
const TO_COLOR_ATTRS: [(&str, ColorForm); 3] = [
    ("toColor", ColorForm::Tile),
    ("toColorPal", ColorForm::Pal),
    ("toColorRgb", ColorForm::Rgb),
];
const COLORS_ATTRS: [(&str, ColorForm); 4] = [
    ("colors", ColorForm::Tile),
    ("colorPals", ColorForm::Pal),
    ("colorRgbs", ColorForm::Rgb),
    ("colorNames", ColorForm::Name),
];
const COLOR_SEPARATOR_ATTR: &str = "colorSeparator";
const FONT_SEPARATOR_ATTR: &str = "fontSeparator";

const ALPHA_ATTRS: IntSetAttrs<'static> = IntSetAttrs {
    single: ALPHA_ATTR,
    from: "fromAlpha",
    to: "toAlpha",
    step: "",
    multi: "alphas",
    separator: "alphaSeparator",
    min: Some(ALPHA_MIN as i32),
    max: Some(ALPHA_MAX as i32),
};

const PLAYER_ATTRS: IntSetAttrs<'static> = IntSetAttrs {
    single: "player",
    from: "fromPlayer",
    to: "toPlayer",
    step: "",
    multi: "players",
    separator: "playerSeparator",
    min: Some(-1),
    max: None,
};

/// Reads the attributes of one family in order. At most one may be
/// defined; the returned tuple names it.
fn read_exclusive<'d, F: Copy>(
    ctx: &mut ParseContext<'_>,
    element: &'d XmlElementNode,
    attrs: &[(&'static str, F)],
) -> Result<Option<(&'static str, F, &'d str)>, ConfigError> {
    let mut defined: Option<(&'static str, F, &'d str)> = None;
    for &(attr, form) in attrs {
        let Some(value) = Lookup::Conditional.get(ctx, element, attr)? else {
            continue;
        };
        if let Some((other, _, _)) = defined {
            return Err(ctx.error_attr_already_defined_by(element, attr, other));
        }
        defined = Some((attr, form, value));
    }
    Ok(defined)
}

/// Error for a multi value attribute given together with a single value or
/// a range.
fn multi_conflict(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    single: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> Option<ConfigError> {
    match (single, from, to) {
        (Some(other), _, _) => Some(ctx.error_attr_already_defined_by(element, attr, other)),
        (None, Some(from), Some(to)) => {
            Some(ctx.error_attr_already_defined_by_range(element, attr, from, to))
        }
        (None, Some(other), None) | (None, None, Some(other)) => {
            Some(ctx.error_attr_already_defined_by(element, attr, other))
        }
        (None, None, None) => None,
    }
}

fn name_must_start_with_letter(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
) -> ConfigError {
    ctx.error(
        element,
        attr,
        XML_ATTR_INVALID_VALUE,
        format!("Attribute '{}': name must start with a letter", attr),
    )
}

fn to_char(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    form: CharForm,
    value: &str,
) -> Result<TileChar, ConfigError> {
    match form {
        CharForm::Tile => to_tile_char(ctx, element, attr, value),
        CharForm::Literal => to_unicode_char(ctx, element, attr, value).map(TileChar::Char),
        CharForm::Code => {
            to_u32(ctx, element, attr, value, Some(CHAR_UCS4_MIN), Some(CHAR_UCS4_MAX))
                .map(TileChar::Char)
        }
        CharForm::Name => to_char_name(ctx, element, attr, &value.to_uppercase()),
    }
}

fn to_color(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    form: ColorForm,
    value: &str,
) -> Result<TileColor, ConfigError> {
    match form {
        ColorForm::Tile => to_tile_color(ctx, element, attr, value),
        ColorForm::Pal => {
            to_u32(ctx, element, attr, value, Some(COLOR_PAL_FIRST), Some(COLOR_PAL_LAST))
                .map(TileColor::Pal)
        }
        ColorForm::Rgb => to_rgb(ctx, element, attr, value),
        ColorForm::Name => to_color_name(ctx, element, attr, value),
    }
}

fn to_font_index(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    name: &str,
) -> Result<u32, ConfigError> {
    validate_name(ctx, element, attr, name, false)?;
    let index = ctx.named_mut().fonts.add_name(name);
    match u32::try_from(index) {
        Ok(index) if index <= FONT_INDEX_MAX => Ok(index),
        _ => Err(ctx.error_attr_too_many_names(element, attr)),
    }
}

fn parse_char(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<TileChar, ConfigError> {
    match read_exclusive(ctx, element, &CHAR_ATTRS)? {
        Some((attr, form, value)) => to_char(ctx, element, attr, form, value),
        None => Ok(TileChar::Empty),
    }
}

fn parse_color(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<TileColor, ConfigError> {
    match read_exclusive(ctx, element, &COLOR_ATTRS)? {
        Some((attr, form, value)) => to_color(ctx, element, attr, form, value),
        None => Ok(TileColor::Empty),
    }
}

/// Parses a tile description: one char attribute, one color attribute,
/// `fontName` and `alpha`, each optional.
pub fn parse_tile(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<Tile, ConfigError> {
    ctx.open(element);
    let char = parse_char(ctx, element)?;
    let color = parse_color(ctx, element)?;
    let font = match Lookup::Conditional.get(ctx, element, FONT_NAME_ATTR)? {
        Some(name) => TileFont(Some(to_font_index(ctx, element, FONT_NAME_ATTR, name)?)),
        None => TileFont(None),
    };
    let alpha = match Lookup::Conditional.get(ctx, element, ALPHA_ATTR)? {
        Some(value) => {
            let (min, max) = (ALPHA_ATTRS.min, ALPHA_ATTRS.max);
            let alpha = to_number::<i32>(ctx, element, ALPHA_ATTR, value, min, max)?;
            TileAlpha(u8::try_from(alpha).ok())
        }
        None => TileAlpha(None),
    };
    ctx.close(element, true, true)?;
    Ok(Tile { char, color, font, alpha })
}

fn range_code(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    value: TileChar,
) -> Result<i32, ConfigError> {
    match value {
        TileChar::Char(code) => Ok(i32::try_from(code).unwrap_or(i32::MAX)),
        _ => Err(ctx.error_attr_names_range(element, attr)),
    }
}

fn parse_char_set(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<CharTraitSet, ConfigError> {
    let mut set = CharTraitSet::Any;
    let single = read_exclusive(ctx, element, &CHAR_ATTRS)?;
    let single_attr = single.map(|(attr, _, _)| attr);
    if let Some((attr, form, value)) = single {
        set = CharTraitSet::Chars(vec![to_char(ctx, element, attr, form, value)?]);
    }

    let mut from_attr = None;
    let mut from = i32::try_from(CHAR_UCS4_MIN).unwrap_or(1);
    if let Some((attr, form, value)) = read_exclusive(ctx, element, &FROM_CHAR_ATTRS)? {
        if let Some(other) = single_attr {
            return Err(ctx.error_attr_already_defined_by(element, attr, other));
        }
        let value = to_char(ctx, element, attr, form, value)?;
        from = range_code(ctx, element, attr, value)?;
        from_attr = Some(attr);
    }
    let mut to_attr = None;
    let mut to = i32::try_from(CHAR_UCS4_MAX).unwrap_or(i32::MAX);
    if let Some((attr, form, value)) = read_exclusive(ctx, element, &TO_CHAR_ATTRS)? {
        if let Some(other) = single_attr {
            return Err(ctx.error_attr_already_defined_by(element, attr, other));
        }
        let value = to_char(ctx, element, attr, form, value)?;
        to = range_code(ctx, element, attr, value)?;
        to_attr = Some(attr);
    }
    if from_attr.is_some() || to_attr.is_some() {
        set = CharTraitSet::Ucs4Range(IntSet::range(from, to));
    }

    let separator = parse_separator(ctx, element, CHAR_SEPARATOR_ATTR)?;
    let Some((attr, form, list)) = read_exclusive(ctx, element, &CHARS_ATTRS)? else {
        return Ok(set);
    };
    if let Some(error) = multi_conflict(ctx, element, attr, single_attr, from_attr, to_attr) {
        return Err(error);
    }
    let mut chars = Vec::new();
    if form == CharForm::Literal {
        for ch in list.chars() {
            chars.push(TileChar::Char(check_ucs4(ctx, element, attr, u32::from(ch))?));
        }
        return Ok(CharTraitSet::Chars(chars));
    }
    for token in tokenize(list, &separator) {
        let Some(first) = token.chars().next() else {
            return Err(ctx.error_attr_empty_value(element, attr));
        };
        match form {
            CharForm::Code if !first.is_ascii_digit() => {
                return Err(ctx.error_attr_not_number(element, attr));
            }
            CharForm::Name if !first.is_alphabetic() => {
                return Err(name_must_start_with_letter(ctx, element, attr));
            }
            _ => {}
        }
        chars.push(to_tile_char(ctx, element, attr, token)?);
    }
    Ok(CharTraitSet::Chars(chars))
}

#[derive(Debug, Clone, Copy)]
enum RangeEnd {
    Pal(i32),
    Rgb(u8, u8, u8),
}

fn range_end(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attr: &str,
    value: TileColor,
) -> Result<RangeEnd, ConfigError> {
    match value {
        TileColor::Pal(pal) => Ok(RangeEnd::Pal(i32::try_from(pal).unwrap_or(i32::MAX))),
        TileColor::Rgb { r, g, b } => Ok(RangeEnd::Rgb(r, g, b)),
        _ => Err(ctx.error_attr_names_range(element, attr)),
    }
}

fn parse_color_set(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<ColorTraitSet, ConfigError> {
    let mut set = ColorTraitSet::Any;
    let single = read_exclusive(ctx, element, &COLOR_ATTRS)?;
    let single_attr = single.map(|(attr, _, _)| attr);
    if let Some((attr, form, value)) = single {
        set = ColorTraitSet::Colors(vec![to_color(ctx, element, attr, form, value)?]);
    }

    let mut from = None;
    if let Some((attr, form, value)) = read_exclusive(ctx, element, &FROM_COLOR_ATTRS)? {
        if let Some(other) = single_attr {
            return Err(ctx.error_attr_already_defined_by(element, attr, other));
        }
        let value = to_color(ctx, element, attr, form, value)?;
        from = Some((attr, range_end(ctx, element, attr, value)?));
    }
    let mut to = None;
    if let Some((attr, form, value)) = read_exclusive(ctx, element, &TO_COLOR_ATTRS)? {
        if let Some(other) = single_attr {
            return Err(ctx.error_attr_already_defined_by(element, attr, other));
        }
        let value = to_color(ctx, element, attr, form, value)?;
        to = Some((attr, range_end(ctx, element, attr, value)?));
    }
    let pal_last = i32::try_from(COLOR_PAL_LAST).unwrap_or(i32::MAX);
    let pal_first = i32::try_from(COLOR_PAL_FIRST).unwrap_or(0);
    // A missing end takes the extreme of the other end's type.
    let range = match (from.map(|(_, end)| end), to.map(|(_, end)| end)) {
        (None, None) => None,
        (Some(low @ RangeEnd::Pal(_)), None) => Some((low, RangeEnd::Pal(pal_last))),
        (Some(low @ RangeEnd::Rgb(..)), None) => Some((low, RangeEnd::Rgb(255, 255, 255))),
        (None, Some(high @ RangeEnd::Pal(_))) => Some((RangeEnd::Pal(pal_first), high)),
        (None, Some(high @ RangeEnd::Rgb(..))) => Some((RangeEnd::Rgb(0, 0, 0), high)),
        (Some(low), Some(high)) => Some((low, high)),
    };
    match range {
        Some((RangeEnd::Pal(low), RangeEnd::Pal(high))) => {
            set = ColorTraitSet::PalRange(IntSet::range(low, high));
        }
        Some((RangeEnd::Rgb(r0, g0, b0), RangeEnd::Rgb(r1, g1, b1))) => {
            set = ColorTraitSet::RgbRange {
                red: IntSet::range(i32::from(r0), i32::from(r1)),
                green: IntSet::range(i32::from(g0), i32::from(g1)),
                blue: IntSet::range(i32::from(b0), i32::from(b1)),
            };
        }
        Some(_) => {
            let from_attr = from.map_or("", |(attr, _)| attr);
            let to_attr = to.map_or("", |(attr, _)| attr);
            return Err(ctx.error(
                element,
                to_attr,
                XML_ATTR_INVALID_VALUE,
                format!("range attribute '{}' type not same as attribute '{}'", to_attr, from_attr),
            ));
        }
        None => {}
    }

    let separator = parse_separator(ctx, element, COLOR_SEPARATOR_ATTR)?;
    let Some((attr, form, list)) = read_exclusive(ctx, element, &COLORS_ATTRS)? else {
        return Ok(set);
    };
    let from_attr = from.map(|(attr, _)| attr);
    let to_attr = to.map(|(attr, _)| attr);
    if let Some(error) = multi_conflict(ctx, element, attr, single_attr, from_attr, to_attr) {
        return Err(error);
    }
    let mut colors = Vec::new();
    for token in tokenize(list, &separator) {
        let Some(first) = token.chars().next() else {
            return Err(ctx.error_attr_empty_value(element, attr));
        };
        match form {
            ColorForm::Pal if !first.is_ascii_digit() => {
                return Err(ctx.error_attr_not_number(element, attr));
            }
            ColorForm::Rgb if first != '#' && first != '%' => {
                return Err(ctx.error(
                    element,
                    attr,
                    XML_ATTR_INVALID_VALUE,
                    format!("attribute '{}' not valid RGB color", attr),
                ));
            }
            ColorForm::Name if !first.is_alphabetic() => {
                return Err(name_must_start_with_letter(ctx, element, attr));
            }
            _ => {}
        }
        colors.push(to_tile_color(ctx, element, attr, token)?);
    }
    Ok(ColorTraitSet::Colors(colors))
}

fn parse_font_set(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<FontTraitSet, ConfigError> {
    let mut set = FontTraitSet::Any;
    let single = Lookup::Conditional.get(ctx, element, FONT_NAME_ATTR)?;
    if let Some(name) = single {
        let index = to_font_index(ctx, element, FONT_NAME_ATTR, name)?;
        set = FontTraitSet::Fonts(IntSet::single(i32::try_from(index).unwrap_or(i32::MAX)));
    }
    let separator = parse_separator(ctx, element, FONT_SEPARATOR_ATTR)?;
    let Some(list) = Lookup::Conditional.get(ctx, element, FONT_NAMES_ATTR)? else {
        return Ok(set);
    };
    if single.is_some() {
        return Err(ctx.error_attr_already_defined_by(element, FONT_NAMES_ATTR, FONT_NAME_ATTR));
    }
    let mut fonts = Vec::new();
    for token in tokenize(list, &separator) {
        let index = to_font_index(ctx, element, FONT_NAMES_ATTR, token)?;
        fonts.push(i32::try_from(index).unwrap_or(i32::MAX));
    }
    Ok(FontTraitSet::Fonts(IntSet::from_values(fonts)))
}

fn parse_alpha_set(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    mandatory: bool,
) -> Result<AlphaTraitSet, ConfigError> {
    match parse_int_set_attrs(ctx, element, Lookup::Conditional, &ALPHA_ATTRS)? {
        Some(set) if !set.is_empty() => Ok(AlphaTraitSet::Alphas(set)),
        _ if mandatory => Err(missing_set_error(ctx, element, &ALPHA_ATTRS)),
        _ => Ok(AlphaTraitSet::Any),
    }
}

fn missing_set_error(
    ctx: &ParseContext<'_>,
    element: &XmlElementNode,
    attrs: &IntSetAttrs<'_>,
) -> ConfigError {
    ctx.error(
        element,
        "",
        XML_ATTR_NOT_FOUND,
        format!(
            "One of attributes '{}', '{}' or '{}','{}' has to be defined",
            attrs.single, attrs.multi, attrs.from, attrs.to
        ),
    )
}

fn parse_not(ctx: &mut ParseContext<'_>, element: &XmlElementNode) -> Result<bool, ConfigError> {
    Ok(conditional::get_bool_attribute(ctx, element, NOT_ATTR)?.unwrap_or(false))
}

fn parse_trait_leaf<F>(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    parse_set: F,
) -> Result<SelectorNode, ConfigError>
where
    F: FnOnce(&mut ParseContext<'_>, &XmlElementNode) -> Result<TraitSet, ConfigError>,
{
    ctx.open(element);
    let negate = parse_not(ctx, element)?;
    let set = parse_set(ctx, element)?;
    ctx.close(element, true, true)?;
    Ok(SelectorNode::Trait { negate, set })
}

fn char_leaf(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<SelectorNode, ConfigError> {
    parse_trait_leaf(ctx, element, |ctx, element| parse_char_set(ctx, element).map(TraitSet::Char))
}

fn color_leaf(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<SelectorNode, ConfigError> {
    parse_trait_leaf(ctx, element, |ctx, element| {
        parse_color_set(ctx, element).map(TraitSet::Color)
    })
}

fn font_leaf(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<SelectorNode, ConfigError> {
    parse_trait_leaf(ctx, element, |ctx, element| parse_font_set(ctx, element).map(TraitSet::Font))
}

fn alpha_leaf(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    mandatory: bool,
) -> Result<SelectorNode, ConfigError> {
    parse_trait_leaf(ctx, element, |ctx, element| {
        parse_alpha_set(ctx, element, mandatory).map(TraitSet::Alpha)
    })
}

fn player_leaf(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<SelectorNode, ConfigError> {
    ctx.open(element);
    let negate = parse_not(ctx, element)?;
    let players = parse_int_set_attrs(ctx, element, Lookup::Conditional, &PLAYER_ATTRS)?;
    let Some(players) = players.filter(|players| !players.is_empty()) else {
        return Err(missing_set_error(ctx, element, &PLAYER_ATTRS));
    };
    ctx.close(element, true, true)?;
    Ok(SelectorNode::Skin { negate, players })
}

/// A `Tile` item: the traits set by its attributes, all negated by its
/// `not`, and-ed with the trait leaves nested inside it.
fn tile_item(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<SelectorNode, ConfigError> {
    ctx.open(element);
    let negate = parse_not(ctx, element)?;
    let sets = [
        TraitSet::Char(parse_char_set(ctx, element)?),
        TraitSet::Font(parse_font_set(ctx, element)?),
        TraitSet::Color(parse_color_set(ctx, element)?),
        TraitSet::Alpha(parse_alpha_set(ctx, element, false)?),
    ];
    let mut operands = sets
        .into_iter()
        .filter(|set| !set.is_any())
        .map(|set| SelectorNode::Trait { negate, set })
        .collect::<Vec<_>>();
    conditional::visit_element_children(ctx, element, |ctx, item| {
        ctx.open(item);
        let operand = match item.name.as_str() {
            CHAR_NODE => char_leaf(ctx, item)?,
            FONT_NODE => font_leaf(ctx, item)?,
            COLOR_NODE => color_leaf(ctx, item)?,
            ALPHA_NODE => alpha_leaf(ctx, item, true)?,
            other => {
                return Err(ctx.error(
                    item,
                    "",
                    SELECTOR_UNKNOWN_ITEM,
                    format!("TileSelector: Unknown trait '{}' in <{}>", other, TILE_NODE),
                ))
            }
        };
        operands.push(operand);
        ctx.close(item, false, true)
    })?;
    ctx.close(element, false, true)?;
    Ok(SelectorNode::And(operands))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Or,
    And,
    Not,
}

fn parse_operator(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    operator: Operator,
) -> Result<SelectorNode, ConfigError> {
    ctx.open(element);
    let mut operands = Vec::new();
    conditional::visit_element_children(ctx, element, |ctx, item| {
        ctx.open(item);
        let operand = match item.name.as_str() {
            OR_NODE => parse_operator(ctx, item, Operator::Or)?,
            AND_NODE => parse_operator(ctx, item, Operator::And)?,
            NOT_NODE => parse_operator(ctx, item, Operator::Not)?,
            TILE_NODE => tile_item(ctx, item)?,
            PLAYER_NODE => player_leaf(ctx, item)?,
            CHAR_NODE => char_leaf(ctx, item)?,
            FONT_NODE => font_leaf(ctx, item)?,
            COLOR_NODE => color_leaf(ctx, item)?,
            ALPHA_NODE => alpha_leaf(ctx, item, true)?,
            other => {
                return Err(ctx.error(
                    item,
                    "",
                    SELECTOR_UNKNOWN_ITEM,
                    format!("TileSelector: Unknown item '{}'", other),
                ))
            }
        };
        operands.push(operand);
        ctx.close(item, false, true)
    })?;
    let node = match operator {
        Operator::Not => {
            let mut operands = operands.into_iter();
            let (Some(operand), None) = (operands.next(), operands.next()) else {
                return Err(ctx.error(
                    element,
                    "",
                    SELECTOR_OPERANDS,
                    format!("TileSelector: node element <{}> needs exactly one operand", NOT_NODE),
                ));
            };
            SelectorNode::Not(Box::new(operand))
        }
        _ if operands.is_empty() => {
            return Err(ctx.error(
                element,
                "",
                SELECTOR_OPERANDS,
                "TileSelector: node element needs at least one operand",
            ));
        }
        Operator::Or => SelectorNode::Or(operands),
        Operator::And => SelectorNode::And(operands),
    };
    ctx.close(element, false, true)?;
    Ok(node)
}

fn build_selector(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
    operator: Operator,
) -> Result<TileSelector, ConfigError> {
    let root = parse_operator(ctx, element, operator)?;
    let operands = match &root {
        SelectorNode::Or(operands) | SelectorNode::And(operands) => operands.len(),
        _ => 1,
    };
    debug!(
        element = %element.name,
        line = element.line(),
        ?operator,
        operands,
        "tile selector built"
    );
    Ok(TileSelector::new(root))
}

/// Builds a selector matching tiles that match any of the element's items.
pub fn parse_tile_selector_or(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<TileSelector, ConfigError> {
    build_selector(ctx, element, Operator::Or)
}

/// Builds a selector matching tiles that match all of the element's items.
pub fn parse_tile_selector_and(
    ctx: &mut ParseContext<'_>,
    element: &XmlElementNode,
) -> Result<TileSelector, ConfigError> {
    build_selector(ctx, element, Operator::And)
}
