use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_TIME_LIMIT_SECS: u32 = 10;
pub const DEFAULT_HIGH_SCORE_KEY: &str = "quizHighScore";

const TIME_LIMIT_VAR: &str = "QUIZ_TIME_LIMIT_SECS";
const TICK_MILLIS_VAR: &str = "QUIZ_TICK_MILLIS";
const HIGH_SCORE_KEY_VAR: &str = "QUIZ_HIGH_SCORE_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    /// Countdown length per question, in ticks.
    pub time_limit_secs: u32,
    pub tick_period: Duration,
    /// Key of the single high-score slot in the key/value store.
    pub high_score_key: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            tick_period: Duration::from_secs(1),
            high_score_key: DEFAULT_HIGH_SCORE_KEY.to_string(),
        }
    }
}

impl QuizConfig {
    /// Reads the config from the process environment, loading `.env` first if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(TIME_LIMIT_VAR) {
            config.time_limit_secs = parse_positive(TIME_LIMIT_VAR, &value)?;
        }
        if let Some(value) = lookup(TICK_MILLIS_VAR) {
            let millis = parse_positive(TICK_MILLIS_VAR, &value)?;
            config.tick_period = Duration::from_millis(u64::from(millis));
        }
        if let Some(value) = lookup(HIGH_SCORE_KEY_VAR) {
            if !value.trim().is_empty() {
                config.high_score_key = value.trim().to_string();
            }
        }

        Ok(config)
    }
}

fn parse_positive(name: &'static str, value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::NotPositive {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        let config = QuizConfig::from_lookup(lookup_from(&[])).expect("config");
        assert_eq!(config, QuizConfig::default());
        assert_eq!(config.time_limit_secs, 10);
        assert_eq!(config.tick_period, Duration::from_secs(1));
        assert_eq!(config.high_score_key, "quizHighScore");
    }

    #[test]
    fn reads_overrides() {
        let config = QuizConfig::from_lookup(lookup_from(&[
            ("QUIZ_TIME_LIMIT_SECS", "30"),
            ("QUIZ_TICK_MILLIS", "250"),
            ("QUIZ_HIGH_SCORE_KEY", " capitalsBest "),
        ]))
        .expect("config");
        assert_eq!(config.time_limit_secs, 30);
        assert_eq!(config.tick_period, Duration::from_millis(250));
        assert_eq!(config.high_score_key, "capitalsBest");
    }

    #[test]
    fn rejects_zero_time_limit() {
        let err = QuizConfig::from_lookup(lookup_from(&[("QUIZ_TIME_LIMIT_SECS", "0")]))
            .expect_err("zero limit");
        assert!(matches!(
            err,
            ConfigError::NotPositive {
                name: "QUIZ_TIME_LIMIT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn rejects_garbage_tick() {
        assert!(QuizConfig::from_lookup(lookup_from(&[("QUIZ_TICK_MILLIS", "soon")])).is_err());
    }
}
