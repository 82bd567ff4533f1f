use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::{error::Result, manager::VacancyRule};

/// Default location of the configuration file.
pub const CONFIG_FILE: &str = "VoteManager.toml";

/// Environment variable overriding [`CONFIG_FILE`].
pub const CONFIG_PATH_ENV: &str = "VOTE_CONFIG";

/// Prefix for environment variables overriding individual keys,
/// e.g. `VOTE_MAX_VOTES=3`.
pub const ENV_PREFIX: &str = "VOTE_";

/// Session configuration, derived from `VoteManager.toml` and `VOTE_*`
/// environment variables, falling back to built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    max_votes: u32,
    vacancy_rule: VacancyRule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_votes: 1,
            vacancy_rule: VacancyRule::default(),
        }
    }
}

impl Config {
    pub fn new(max_votes: u32, vacancy_rule: VacancyRule) -> Self {
        Self {
            max_votes,
            vacancy_rule,
        }
    }

    /// The layered configuration sources, lowest precedence first.
    pub fn figment() -> Figment {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| CONFIG_FILE.to_string());
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load the configuration from all sources.
    pub fn load() -> Result<Self> {
        let config: Self = Self::figment().extract()?;
        info!(
            "Loaded config: max_votes={}, vacancy_rule={:?}",
            config.max_votes, config.vacancy_rule
        );
        Ok(config)
    }

    /// Number of distinct candidates a single ballot may select.
    /// Configured via `max_votes` / `VOTE_MAX_VOTES`.
    pub fn max_votes(&self) -> u32 {
        self.max_votes
    }

    /// How vacant candidates depend on other candidates.
    /// Configured via `vacancy_rule` / `VOTE_VACANCY_RULE`.
    pub fn vacancy_rule(&self) -> VacancyRule {
        self.vacancy_rule
    }
}
