use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::option::{GameOption, OwnerType};
use crate::variant::Variant;

/// Option definitions of a game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub options: Vec<GameOption>,
}

impl AppConfig {
    pub fn new(options: Vec<GameOption>) -> Self {
        Self { options }
    }

    pub fn option(&self, owner_type: OwnerType, name: &str) -> Option<&GameOption> {
        self.options
            .iter()
            .find(|option| option.owner_type == owner_type && option.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MateSpec {
    pub name: String,
    #[serde(default)]
    pub ai: bool,
    #[serde(default)]
    pub values: BTreeMap<String, Variant>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSpec {
    pub name: String,
    #[serde(default)]
    pub values: BTreeMap<String, Variant>,
    #[serde(default)]
    pub mates: Vec<MateSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub values: BTreeMap<String, Variant>,
    /// Indexes into the preferences' player list, in mate order.
    pub mates: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub team: usize,
    pub mate: usize,
    pub ai: bool,
    pub values: BTreeMap<String, Variant>,
}

/// Live roster and option values consulted by conditions.
///
/// Teams and players are stored in flat vectors; players are numbered
/// team by team in mate order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppPreferences {
    config: AppConfig,
    values: BTreeMap<String, Variant>,
    teams: Vec<Team>,
    players: Vec<Player>,
}

impl AppPreferences {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn set_game_value(&mut self, name: impl Into<String>, value: Variant) {
        self.values.insert(name.into(), value);
    }

    /// Appends a team and its mates, returning the team index.
    pub fn add_team(&mut self, spec: TeamSpec) -> usize {
        let team = self.teams.len();
        let mut mates = Vec::with_capacity(spec.mates.len());
        for (mate, mate_spec) in spec.mates.into_iter().enumerate() {
            mates.push(self.players.len());
            self.players.push(Player {
                name: mate_spec.name,
                team,
                mate,
                ai: mate_spec.ai,
                values: mate_spec.values,
            });
        }
        self.teams.push(Team {
            name: spec.name,
            values: spec.values,
            mates,
        });
        team
    }

    pub fn total_teams(&self) -> usize {
        self.teams.len()
    }

    pub fn total_players(&self) -> usize {
        self.players.len()
    }

    pub fn total_ai_players(&self) -> usize {
        self.players.iter().filter(|player| player.ai).count()
    }

    pub fn total_human_players(&self) -> usize {
        self.total_players() - self.total_ai_players()
    }

    /// A team is AI when all of its mates are.
    pub fn is_ai_team(&self, team: usize) -> bool {
        self.teams.get(team).is_some_and(|entry| {
            !entry.mates.is_empty() && entry.mates.iter().all(|player| self.players[*player].ai)
        })
    }

    pub fn total_ai_teams(&self) -> usize {
        (0..self.teams.len()).filter(|team| self.is_ai_team(*team)).count()
    }

    pub fn total_human_teams(&self) -> usize {
        self.total_teams() - self.total_ai_teams()
    }

    pub fn team(&self, team: usize) -> Option<&Team> {
        self.teams.get(team)
    }

    pub fn player(&self, player: usize) -> Option<&Player> {
        self.players.get(player)
    }

    pub fn team_total_mates(&self, team: usize) -> usize {
        self.teams.get(team).map_or(0, |entry| entry.mates.len())
    }

    pub fn mate_player(&self, team: usize, mate: usize) -> Option<&Player> {
        let index = *self.teams.get(team)?.mates.get(mate)?;
        self.players.get(index)
    }

    /// Current value of a game option, or its default when not set.
    /// `Null` when no game option has that name.
    pub fn game_option_value(&self, name: &str) -> Variant {
        self.owner_value(OwnerType::Game, name, &self.values)
    }

    pub fn team_option_value(&self, team: usize, name: &str) -> Variant {
        match self.teams.get(team) {
            Some(entry) => self.owner_value(OwnerType::Team, name, &entry.values),
            None => Variant::Null,
        }
    }

    pub fn player_option_value(&self, team: usize, mate: usize, name: &str) -> Variant {
        match self.mate_player(team, mate) {
            Some(player) => self.owner_value(OwnerType::Player, name, &player.values),
            None => Variant::Null,
        }
    }

    fn owner_value(
        &self,
        owner_type: OwnerType,
        name: &str,
        values: &BTreeMap<String, Variant>,
    ) -> Variant {
        let Some(option) = self.config.option(owner_type, name) else {
            return Variant::Null;
        };
        values.get(name).copied().unwrap_or(option.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::OptionKind;

    fn mate(name: &str, ai: bool) -> MateSpec {
        MateSpec {
            name: name.to_string(),
            ai,
            values: BTreeMap::new(),
        }
    }

    fn two_by_two() -> AppPreferences {
        let config = AppConfig::new(vec![
            GameOption::new(OwnerType::Game, "Speed", OptionKind::Int { min: 1, max: 9 }, Variant::Int(3)),
            GameOption::new(OwnerType::Player, "Sound", OptionKind::Bool, Variant::Bool(true)),
        ]);
        let mut prefs = AppPreferences::new(config);
        prefs.add_team(TeamSpec {
            name: "Red".to_string(),
            values: BTreeMap::new(),
            mates: vec![mate("Ann", false), mate("Bob", false)],
        });
        let mut quiet = mate("Cyd", true);
        quiet.values.insert("Sound".to_string(), Variant::Bool(false));
        prefs.add_team(TeamSpec {
            name: "Blue".to_string(),
            values: BTreeMap::new(),
            mates: vec![quiet, mate("Dee", true)],
        });
        prefs
    }

    #[test]
    fn roster_counts_split_human_and_ai() {
        let prefs = two_by_two();
        assert_eq!(prefs.total_teams(), 2);
        assert_eq!(prefs.total_players(), 4);
        assert_eq!(prefs.total_ai_players(), 2);
        assert_eq!(prefs.total_human_players(), 2);
        assert_eq!(prefs.total_ai_teams(), 1);
        assert_eq!(prefs.total_human_teams(), 1);
        assert_eq!(prefs.team_total_mates(1), 2);
        assert_eq!(prefs.team_total_mates(5), 0);
        let player = prefs.player(3).expect("fourth player");
        assert_eq!((player.team, player.mate), (1, 1));
    }

    #[test]
    fn option_values_fall_back_to_defaults() {
        let mut prefs = two_by_two();
        assert_eq!(prefs.game_option_value("Speed"), Variant::Int(3));
        prefs.set_game_value("Speed", Variant::Int(7));
        assert_eq!(prefs.game_option_value("Speed"), Variant::Int(7));
        assert_eq!(prefs.game_option_value("Missing"), Variant::Null);
        assert_eq!(prefs.player_option_value(0, 0, "Sound"), Variant::Bool(true));
        assert_eq!(prefs.player_option_value(1, 0, "Sound"), Variant::Bool(false));
        assert_eq!(prefs.player_option_value(2, 0, "Sound"), Variant::Null);
    }
}
