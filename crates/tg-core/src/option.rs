use serde::{Deserialize, Serialize};

use crate::convert::{str_to_bool, str_to_number, ConversionError};
use crate::variant::Variant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OwnerType {
    Game,
    Team,
    Player,
}

impl OwnerType {
    pub const NAMES: [&'static str; 3] = ["GAME", "TEAM", "PLAYER"];

    pub fn from_index(index: usize) -> Option<Self> {
        [Self::Game, Self::Team, Self::Player].get(index).copied()
    }

    /// Lower case name used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Team => "team",
            Self::Player => "player",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntry {
    pub value: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OptionKind {
    Int { min: i32, max: i32 },
    Bool,
    Enum { values: Vec<EnumEntry> },
}

/// A configurable option defined for the game, for each team or for each
/// player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOption {
    pub name: String,
    #[serde(rename = "owner")]
    pub owner_type: OwnerType,
    #[serde(flatten)]
    pub kind: OptionKind,
    pub default: Variant,
}

impl GameOption {
    pub fn new(
        owner_type: OwnerType,
        name: impl Into<String>,
        kind: OptionKind,
        default: Variant,
    ) -> Self {
        Self {
            name: name.into(),
            owner_type,
            kind,
            default,
        }
    }

    /// Converts a document string to a value of this option's type.
    pub fn value_from_string(&self, value: &str) -> Result<Variant, ConversionError> {
        match &self.kind {
            OptionKind::Int { min, max } => {
                str_to_number::<i32>(value, Some(*min), Some(*max)).map(Variant::Int)
            }
            OptionKind::Bool => str_to_bool(value).map(Variant::Bool),
            OptionKind::Enum { values } => {
                let name = value.trim();
                values
                    .iter()
                    .find(|entry| entry.name == name)
                    .map(|entry| Variant::Int(entry.value))
                    .ok_or(ConversionError::EnumNameInvalid)
            }
        }
    }

    pub fn allows_range(&self) -> bool {
        matches!(self.kind, OptionKind::Int { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn difficulty() -> GameOption {
        GameOption::new(
            OwnerType::Game,
            "Difficulty",
            OptionKind::Enum {
                values: vec![
                    EnumEntry { value: 0, name: "Easy".to_string() },
                    EnumEntry { value: 5, name: "Hard".to_string() },
                ],
            },
            Variant::Int(0),
        )
    }

    #[test]
    fn value_from_string_follows_option_kind() {
        let speed = GameOption::new(OwnerType::Team, "Speed", OptionKind::Int { min: 1, max: 10 }, Variant::Int(5));
        assert_eq!(speed.value_from_string("7"), Ok(Variant::Int(7)));
        assert!(speed.value_from_string("11").is_err());
        assert!(speed.allows_range());

        let sound = GameOption::new(OwnerType::Player, "Sound", OptionKind::Bool, Variant::Bool(true));
        assert_eq!(sound.value_from_string("no"), Ok(Variant::Bool(false)));
        assert!(!sound.allows_range());

        assert_eq!(difficulty().value_from_string(" Hard "), Ok(Variant::Int(5)));
        assert_eq!(
            difficulty().value_from_string("Medium"),
            Err(ConversionError::EnumNameInvalid)
        );
    }

    #[test]
    fn option_definition_reads_from_json() {
        let option: GameOption = serde_json::from_str(
            r#"{"name":"Difficulty","owner":"GAME","kind":"enum",
                "values":[{"value":0,"name":"Easy"},{"value":5,"name":"Hard"}],"default":0}"#,
        )
        .expect("option json");
        assert_eq!(option, difficulty());
    }
}
