use serde::{Deserialize, Serialize};

pub const CHAR_UCS4_MIN: u32 = 1;
pub const CHAR_UCS4_MAX: u32 = (1 << 31) - 1;
pub const CHAR_INDEX_MAX: u32 = (1 << 31) - 1;
pub const COLOR_INDEX_MAX: u32 = (1 << 24) - 1;
pub const COLOR_PAL_FIRST: u32 = 0;
pub const COLOR_PAL_LAST: u32 = (1 << 24) - 1;
pub const FONT_INDEX_MAX: u32 = 254;
pub const ALPHA_MIN: u8 = 0;
pub const ALPHA_MAX: u8 = 255;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileChar {
    #[default]
    Empty,
    /// A unicode code point in `CHAR_UCS4_MIN..=CHAR_UCS4_MAX`.
    Char(u32),
    /// Index into the `chars` name registry.
    Index(u32),
}

impl TileChar {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileColor {
    #[default]
    Empty,
    /// Index into the `colors` name registry.
    Index(u32),
    Rgb { r: u8, g: u8, b: u8 },
    /// Palette number, `0..=11` being the standard palette.
    Pal(u32),
}

impl TileColor {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb { r, g, b }
    }
}

/// Index into the `fonts` name registry, or empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileFont(pub Option<u32>);

impl TileFont {
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileAlpha(pub Option<u8>);

impl TileAlpha {
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// The alpha value; an empty alpha is opaque.
    pub fn get_alpha(&self) -> u8 {
        self.0.unwrap_or(ALPHA_MAX)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub char: TileChar,
    pub color: TileColor,
    pub font: TileFont,
    pub alpha: TileAlpha,
}

impl Tile {
    pub fn is_empty(&self) -> bool {
        self.char.is_empty() && self.color.is_empty() && self.font.is_empty() && self.alpha.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tile_is_empty_and_opaque() {
        let tile = Tile::default();
        assert!(tile.is_empty());
        assert_eq!(tile.alpha.get_alpha(), ALPHA_MAX);

        let tile = Tile {
            char: TileChar::Char('A' as u32),
            ..Tile::default()
        };
        assert!(!tile.is_empty());
    }
}
