pub mod convert;
pub mod error;
pub mod int_set;
pub mod named;
pub mod option;
pub mod preferences;
pub mod selector;
pub mod span;
pub mod tile;
pub mod trait_set;
pub mod variant;

pub use convert::{str_to_bool, str_to_number, ConversionError};
pub use error::ConfigError;
pub use int_set::IntSet;
pub use named::{Named, NamedIndex};
pub use option::{GameOption, OptionKind, OwnerType};
pub use preferences::{AppConfig, AppPreferences, MateSpec, Player, Team, TeamSpec};
pub use selector::{SelectorNode, TileSelector, ANY_SKIN};
pub use span::{SourceLocation, SourceSpan};
pub use tile::{Tile, TileAlpha, TileChar, TileColor, TileFont};
pub use trait_set::{AlphaTraitSet, CharTraitSet, ColorTraitSet, FontTraitSet, TraitSet};
pub use variant::{Variant, VariantSet};
