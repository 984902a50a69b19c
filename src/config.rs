use crate::game::{GameOptions, DWELL_TIME};
use anyhow::{bail, Context};
use std::time::Duration;

const DEFAULT_DB_PATH: &str = "hitler.db";
const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Server settings, read from the environment after `.env` has been loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Port the websocket server listens on.
    pub port: u16,
    /// Port for the HTTP API, if it should be served.
    pub api_port: Option<u16>,
    pub db_path: String,
    /// How often the clock ticks; must be shorter than the dwell time.
    pub tick_interval: Duration,
    /// Fixed seed for the game's random source, for reproducible games.
    pub seed: Option<u64>,
    pub options: GameOptions,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port: u16 = lookup("PORT")
            .context("PORT is unspecified")?
            .parse()
            .context("PORT is invalid")?;
        let api_port: Option<u16> = lookup("API_PORT")
            .map(|s| s.parse())
            .transpose()
            .context("API_PORT is invalid")?;
        let db_path = lookup("DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

        let tick_ms: u64 = match lookup("TICK_INTERVAL_MS") {
            Some(s) => s.parse().context("TICK_INTERVAL_MS is invalid")?,
            None => DEFAULT_TICK_INTERVAL_MS,
        };
        if tick_ms == 0 || tick_ms >= DWELL_TIME {
            bail!("TICK_INTERVAL_MS must be between 1 and {}", DWELL_TIME - 1);
        }

        let seed: Option<u64> = lookup("GAME_SEED")
            .map(|s| s.parse())
            .transpose()
            .context("GAME_SEED is invalid")?;
        let forced_policy_after_failed_tickets = match lookup("FORCED_POLICY_AFTER_FAILED_TICKETS") {
            Some(s) => parse_flag(&s).context("FORCED_POLICY_AFTER_FAILED_TICKETS is invalid")?,
            None => false,
        };

        Ok(Self {
            port,
            api_port,
            db_path,
            tick_interval: Duration::from_millis(tick_ms),
            seed,
            options: GameOptions {
                forced_policy_after_failed_tickets,
            },
        })
    }
}

fn parse_flag(s: &str) -> anyhow::Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("expected a boolean, got {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[("PORT", "8080")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_port, None);
        assert_eq!(config.db_path, "hitler.db");
        assert_eq!(config.tick_interval, Duration::from_millis(1000));
        assert_eq!(config.seed, None);
        assert_eq!(config.options, GameOptions::default());
    }

    #[test]
    fn everything_set() {
        let config = config(&[
            ("PORT", "8080"),
            ("API_PORT", "8081"),
            ("DB_PATH", "/tmp/games"),
            ("TICK_INTERVAL_MS", "250"),
            ("GAME_SEED", "42"),
            ("FORCED_POLICY_AFTER_FAILED_TICKETS", "true"),
        ])
        .unwrap();
        assert_eq!(config.api_port, Some(8081));
        assert_eq!(config.db_path, "/tmp/games");
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.seed, Some(42));
        assert!(config.options.forced_policy_after_failed_tickets);
    }

    #[test]
    fn port_is_required() {
        assert!(config(&[]).is_err());
        assert!(config(&[("PORT", "http")]).is_err());
        assert!(config(&[("PORT", "8080"), ("API_PORT", "70000")]).is_err());
    }

    #[test]
    fn tick_must_be_shorter_than_dwell_time() {
        assert!(config(&[("PORT", "1"), ("TICK_INTERVAL_MS", "4000")]).is_err());
        assert!(config(&[("PORT", "1"), ("TICK_INTERVAL_MS", "0")]).is_err());
        assert!(config(&[("PORT", "1"), ("TICK_INTERVAL_MS", "3999")]).is_ok());
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag("YES").unwrap(), true);
        assert_eq!(parse_flag("0").unwrap(), false);
        assert!(parse_flag("sometimes").is_err());
    }
}
