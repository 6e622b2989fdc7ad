use std::collections::BTreeMap;

use serde::Deserialize;
use tg_core::{AppConfig, AppPreferences, GameOption, TeamSpec, Variant};

/// JSON snapshot of the option definitions, game option values and roster.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PreferencesSpec {
    #[serde(default)]
    pub(crate) options: Vec<GameOption>,
    #[serde(default)]
    pub(crate) values: BTreeMap<String, Variant>,
    #[serde(default)]
    pub(crate) teams: Vec<TeamSpec>,
}

impl PreferencesSpec {
    pub(crate) fn into_preferences(self) -> AppPreferences {
        let mut preferences = AppPreferences::new(AppConfig::new(self.options));
        for (name, value) in self.values {
            preferences.set_game_value(name, value);
        }
        for team in self.teams {
            preferences.add_team(team);
        }
        preferences
    }
}

#[cfg(test)]
mod tests {
    use tg_core::OwnerType;

    use super::*;

    #[test]
    fn snapshot_builds_roster_and_values() {
        let spec: PreferencesSpec = serde_json::from_str(
            r#"{
                "options": [
                    {"name": "Level", "owner": "GAME", "kind": "int", "min": 1, "max": 9, "default": 1},
                    {"name": "Shield", "owner": "PLAYER", "kind": "bool", "default": false}
                ],
                "values": {"Level": 4},
                "teams": [
                    {"name": "Red", "mates": [{"name": "Ann"}, {"name": "Bot", "ai": true, "values": {"Shield": true}}]},
                    {"name": "Blue", "mates": [{"name": "Cy", "ai": true}]}
                ]
            }"#,
        )
        .expect("snapshot");
        let preferences = spec.into_preferences();
        assert_eq!(preferences.total_teams(), 2);
        assert_eq!(preferences.total_players(), 3);
        assert_eq!(preferences.total_ai_players(), 2);
        assert_eq!(preferences.game_option_value("Level"), Variant::Int(4));
        assert_eq!(preferences.player_option_value(0, 1, "Shield"), Variant::Bool(true));
        assert_eq!(preferences.player_option_value(0, 0, "Shield"), Variant::Bool(false));
        assert!(preferences.config().option(OwnerType::Player, "Shield").is_some());
    }

    #[test]
    fn empty_snapshot_is_valid() {
        let spec: PreferencesSpec = serde_json::from_str("{}").expect("snapshot");
        assert_eq!(spec.into_preferences().total_teams(), 0);
    }
}
