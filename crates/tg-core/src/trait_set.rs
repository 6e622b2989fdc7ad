use crate::int_set::IntSet;
use crate::tile::{Tile, TileChar, TileColor};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CharTraitSet {
    #[default]
    Any,
    Chars(Vec<TileChar>),
    /// Range of unicode code points.
    Ucs4Range(IntSet),
}

impl CharTraitSet {
    fn contains(&self, value: &TileChar) -> bool {
        match self {
            Self::Any => true,
            Self::Chars(chars) => chars.contains(value),
            Self::Ucs4Range(set) => match value {
                TileChar::Char(code) => i32::try_from(*code).is_ok_and(|code| set.contains(code)),
                _ => false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColorTraitSet {
    #[default]
    Any,
    Colors(Vec<TileColor>),
    PalRange(IntSet),
    /// Every combination of the three channel sets.
    RgbRange {
        red: IntSet,
        green: IntSet,
        blue: IntSet,
    },
}

impl ColorTraitSet {
    fn contains(&self, value: &TileColor) -> bool {
        match self {
            Self::Any => true,
            Self::Colors(colors) => colors.contains(value),
            Self::PalRange(set) => match value {
                TileColor::Pal(pal) => i32::try_from(*pal).is_ok_and(|pal| set.contains(pal)),
                _ => false,
            },
            Self::RgbRange { red, green, blue } => match value {
                TileColor::Rgb { r, g, b } => {
                    red.contains(i32::from(*r))
                        && green.contains(i32::from(*g))
                        && blue.contains(i32::from(*b))
                }
                _ => false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FontTraitSet {
    #[default]
    Any,
    /// Font name indexes.
    Fonts(IntSet),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AlphaTraitSet {
    #[default]
    Any,
    Alphas(IntSet),
}

/// The values one tile trait may take for a selector leaf to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraitSet {
    Char(CharTraitSet),
    Color(ColorTraitSet),
    Font(FontTraitSet),
    Alpha(AlphaTraitSet),
}

impl TraitSet {
    /// Whether the tile's trait is in the set. An `Any` set contains every
    /// value, the empty one included.
    pub fn contains(&self, tile: &Tile) -> bool {
        match self {
            Self::Char(set) => set.contains(&tile.char),
            Self::Color(set) => set.contains(&tile.color),
            Self::Font(FontTraitSet::Any) | Self::Alpha(AlphaTraitSet::Any) => true,
            Self::Font(FontTraitSet::Fonts(set)) => tile
                .font
                .0
                .and_then(|font| i32::try_from(font).ok())
                .is_some_and(|font| set.contains(font)),
            Self::Alpha(AlphaTraitSet::Alphas(set)) => tile
                .alpha
                .0
                .is_some_and(|alpha| set.contains(i32::from(alpha))),
        }
    }

    /// Whether no value attribute narrowed the set.
    pub fn is_any(&self) -> bool {
        matches!(
            self,
            Self::Char(CharTraitSet::Any)
                | Self::Color(ColorTraitSet::Any)
                | Self::Font(FontTraitSet::Any)
                | Self::Alpha(AlphaTraitSet::Any)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{TileAlpha, TileFont};

    fn tile(ch: char, color: TileColor) -> Tile {
        Tile {
            char: TileChar::Char(ch as u32),
            color,
            font: TileFont(Some(2)),
            alpha: TileAlpha(None),
        }
    }

    #[test]
    fn char_sets_match_lists_and_code_ranges() {
        let red_a = tile('A', TileColor::rgb(255, 0, 0));
        let list = TraitSet::Char(CharTraitSet::Chars(vec![TileChar::Char('A' as u32)]));
        assert!(list.contains(&red_a));
        let range = TraitSet::Char(CharTraitSet::Ucs4Range(IntSet::range('a' as i32, 'z' as i32)));
        assert!(!range.contains(&red_a));
    }

    #[test]
    fn color_rgb_range_checks_each_channel() {
        let set = TraitSet::Color(ColorTraitSet::RgbRange {
            red: IntSet::range(200, 255),
            green: IntSet::single(0),
            blue: IntSet::range(0, 10),
        });
        assert!(set.contains(&tile('A', TileColor::rgb(255, 0, 5))));
        assert!(!set.contains(&tile('A', TileColor::rgb(255, 1, 5))));
        assert!(!set.contains(&tile('A', TileColor::Pal(2))));
    }

    #[test]
    fn empty_font_and_alpha_are_not_members() {
        let mut plain = tile('A', TileColor::Empty);
        let fonts = TraitSet::Font(FontTraitSet::Fonts(IntSet::single(2)));
        assert!(fonts.contains(&plain));
        plain.font = TileFont(None);
        assert!(!fonts.contains(&plain));

        let alphas = TraitSet::Alpha(AlphaTraitSet::Alphas(IntSet::range(0, 255)));
        assert!(!alphas.contains(&plain));
        plain.alpha = TileAlpha(Some(128));
        assert!(alphas.contains(&plain));
    }

    #[test]
    fn any_sets_contain_every_tile() {
        let any_sets = [
            TraitSet::Char(CharTraitSet::Any),
            TraitSet::Color(ColorTraitSet::Any),
            TraitSet::Font(FontTraitSet::Any),
            TraitSet::Alpha(AlphaTraitSet::Any),
        ];
        for set in &any_sets {
            assert!(set.is_any());
            assert!(set.contains(&Tile::default()));
            assert!(set.contains(&tile('Z', TileColor::Pal(9))));
        }
        assert!(!TraitSet::Font(FontTraitSet::Fonts(IntSet::single(0))).is_any());
    }
}
