use crate::int_set::IntSet;
use crate::tile::Tile;
use crate::trait_set::TraitSet;

/// Skin value that makes every `Skin` leaf match.
pub const ANY_SKIN: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorNode {
    Or(Vec<SelectorNode>),
    And(Vec<SelectorNode>),
    Not(Box<SelectorNode>),
    Trait { negate: bool, set: TraitSet },
    /// Matches the player owning the tile, `-1` standing for no player.
    Skin { negate: bool, players: IntSet },
}

impl SelectorNode {
    pub fn matches(&self, tile: &Tile, skin: i32) -> bool {
        match self {
            Self::Or(operands) => operands.iter().any(|operand| operand.matches(tile, skin)),
            Self::And(operands) => operands.iter().all(|operand| operand.matches(tile, skin)),
            Self::Not(operand) => !operand.matches(tile, skin),
            Self::Trait { negate, set } => set.contains(tile) != *negate,
            Self::Skin { negate, players } => {
                skin == ANY_SKIN || players.contains(skin) != *negate
            }
        }
    }
}

/// Immutable predicate tree over tile traits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSelector {
    root: SelectorNode,
}

impl TileSelector {
    pub fn new(root: SelectorNode) -> Self {
        Self { root }
    }

    pub fn matches(&self, tile: &Tile, skin: i32) -> bool {
        self.root.matches(tile, skin)
    }

    pub fn matches_any_skin(&self, tile: &Tile) -> bool {
        self.root.matches(tile, ANY_SKIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{TileChar, TileColor};
    use crate::trait_set::{CharTraitSet, ColorTraitSet};

    fn char_leaf(ch: char, negate: bool) -> SelectorNode {
        SelectorNode::Trait {
            negate,
            set: TraitSet::Char(CharTraitSet::Chars(vec![TileChar::Char(ch as u32)])),
        }
    }

    fn red_leaf(negate: bool) -> SelectorNode {
        SelectorNode::Trait {
            negate,
            set: TraitSet::Color(ColorTraitSet::Colors(vec![TileColor::rgb(255, 0, 0)])),
        }
    }

    fn tile(ch: char, color: TileColor) -> Tile {
        Tile {
            char: TileChar::Char(ch as u32),
            color,
            ..Tile::default()
        }
    }

    #[test]
    fn not_inverts_its_operand_for_every_tile() {
        let inner = SelectorNode::And(vec![char_leaf('A', false), red_leaf(false)]);
        let negated = SelectorNode::Not(Box::new(inner.clone()));
        for candidate in [
            tile('A', TileColor::rgb(255, 0, 0)),
            tile('A', TileColor::rgb(0, 0, 255)),
            tile('B', TileColor::rgb(255, 0, 0)),
            Tile::default(),
        ] {
            for skin in [ANY_SKIN, 0, 3] {
                assert_eq!(negated.matches(&candidate, skin), !inner.matches(&candidate, skin));
            }
        }
    }

    #[test]
    fn negated_color_leaf_accepts_any_other_color() {
        let selector = TileSelector::new(SelectorNode::And(vec![char_leaf('A', false), red_leaf(true)]));
        assert!(!selector.matches_any_skin(&tile('A', TileColor::rgb(255, 0, 0))));
        assert!(selector.matches_any_skin(&tile('A', TileColor::rgb(0, 255, 0))));
        assert!(selector.matches_any_skin(&tile('A', TileColor::Pal(2))));
        assert!(!selector.matches_any_skin(&tile('B', TileColor::rgb(0, 255, 0))));
    }

    #[test]
    fn skin_leaf_is_ignored_for_any_skin() {
        let skin = SelectorNode::Skin {
            negate: false,
            players: IntSet::from_values(vec![0, 2]),
        };
        let plain = Tile::default();
        assert!(skin.matches(&plain, ANY_SKIN));
        assert!(skin.matches(&plain, 2));
        assert!(!skin.matches(&plain, 1));
        let negated = SelectorNode::Skin {
            negate: true,
            players: IntSet::single(1),
        };
        assert!(negated.matches(&plain, 0));
        assert!(!negated.matches(&plain, 1));
    }

    #[test]
    fn empty_operator_lists_follow_boolean_identities() {
        let plain = Tile::default();
        assert!(!SelectorNode::Or(Vec::new()).matches(&plain, ANY_SKIN));
        assert!(SelectorNode::And(Vec::new()).matches(&plain, ANY_SKIN));
    }

    #[test]
    fn negated_any_set_leaf_matches_nothing() {
        let any = |negate| SelectorNode::Trait {
            negate,
            set: TraitSet::Color(ColorTraitSet::Any),
        };
        for candidate in [Tile::default(), tile('A', TileColor::rgb(255, 0, 0))] {
            assert!(any(false).matches(&candidate, ANY_SKIN));
            assert!(!any(true).matches(&candidate, ANY_SKIN));
        }
    }
}
