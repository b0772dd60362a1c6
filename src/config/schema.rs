use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::Taxonomy;

pub const DEFAULT_GENDER: &str = "women";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the snapshot tree (defaults to ~/.config/meet-standings/data)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Gender/division used when a command does not name one
    #[serde(default)]
    pub default_gender: Option<String>,

    /// Status taxonomy override; built-in taxonomy when absent
    #[serde(default)]
    pub taxonomy: Option<Taxonomy>,
}

impl Config {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| super::get_config_dir().join("data"))
    }

    pub fn default_gender(&self) -> &str {
        self.default_gender.as_deref().unwrap_or(DEFAULT_GENDER)
    }

    pub fn taxonomy(&self) -> Taxonomy {
        self.taxonomy.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::TeamRankPolicy;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert!(config.data_dir.is_none());
        assert_eq!(config.default_gender(), "women");
        assert_eq!(config.taxonomy(), Taxonomy::default());
        assert!(config.data_dir().ends_with("data"));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
data_dir: /srv/meets
default_gender: men
taxonomy:
  version: 1
  provisional_rounds: [semifinal, prelim, projection]
  team_ranking: shared
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.data_dir(), PathBuf::from("/srv/meets"));
        assert_eq!(config.default_gender(), "men");

        let taxonomy = config.taxonomy();
        assert_eq!(taxonomy.provisional_rounds.len(), 3);
        assert_eq!(taxonomy.team_ranking, TeamRankPolicy::Shared);
        assert_eq!(taxonomy.final_statuses, Taxonomy::default().final_statuses);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("queries: []");
        assert!(result.is_err());
    }
}
