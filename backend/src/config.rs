use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, str::FromStr, time::Duration};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// When unset, statistics are kept in memory only
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_dir: String,
    pub portfolio_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// How long a matched pair stays visible before locking (ms)
    pub match_delay_ms: u64,
    /// How long a mismatched pair stays visible before flipping back (ms)
    pub mismatch_delay_ms: u64,
    /// Pause between a skill bar resetting and filling (ms)
    pub skill_transition_ms: u64,
    /// Storage key prefix for word-guess statistics
    pub stats_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                frontend_dir: "../frontend".to_string(),
                portfolio_path: "./portfolio.json".to_string(),
            },
            game: GameConfig {
                match_delay_ms: 500,
                mismatch_delay_ms: 1000,
                skill_transition_ms: 100,
                stats_key: "wordGameStats".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| defaults.database.max_connections.to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
        };

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or(defaults.server.host),
            port: env::var("PORT")
                .unwrap_or_else(|_| defaults.server.port.to_string())
                .parse()
                .context("PORT must be a number")?,
            frontend_dir: env::var("FRONTEND_DIR").unwrap_or(defaults.server.frontend_dir),
            portfolio_path: env::var("PORTFOLIO_PATH").unwrap_or(defaults.server.portfolio_path),
        };

        let game = GameConfig {
            match_delay_ms: parse_var(
                "MATCH_DELAY_MS",
                env::var("MATCH_DELAY_MS").ok(),
                defaults.game.match_delay_ms,
            )?,
            mismatch_delay_ms: parse_var(
                "MISMATCH_DELAY_MS",
                env::var("MISMATCH_DELAY_MS").ok(),
                defaults.game.mismatch_delay_ms,
            )?,
            skill_transition_ms: parse_var(
                "SKILL_TRANSITION_MS",
                env::var("SKILL_TRANSITION_MS").ok(),
                defaults.game.skill_transition_ms,
            )?,
            stats_key: env::var("STATS_KEY").unwrap_or(defaults.game.stats_key),
        };

        Ok(Config {
            database,
            server,
            game,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Parse an optional variable, keeping `default` when it is unset
fn parse_var<T>(name: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", name, raw)),
        None => Ok(default),
    }
}

impl GameConfig {
    pub fn match_delay(&self) -> Duration {
        Duration::from_millis(self.match_delay_ms)
    }

    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }

    pub fn skill_transition(&self) -> Duration {
        Duration::from_millis(self.skill_transition_ms)
    }
}
