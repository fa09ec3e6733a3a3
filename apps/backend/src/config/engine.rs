use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::lobby::GameDefaults;
use crate::domain::state::DuelStyle;
use crate::error::AppError;

/// Engine-wide settings. Every field has a default; env vars override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub default_board_length: usize,
    pub min_board_length: usize,
    pub max_players: usize,
    pub mass_warp_cap: usize,
    pub lock_timeout: Duration,
    pub duel_style: DuelStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let defaults = GameDefaults::default();
        Self {
            default_board_length: defaults.board_length,
            min_board_length: defaults.min_board_length,
            max_players: defaults.max_players,
            mass_warp_cap: defaults.mass_warp_cap,
            lock_timeout: Duration::from_millis(2000),
            duel_style: defaults.duel_style,
        }
    }
}

impl EngineConfig {
    /// Builds the config from `BLITZ_*` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        let base = Self::default();
        let config = Self {
            default_board_length: parse_var("BLITZ_DEFAULT_BOARD_LENGTH", base.default_board_length)?,
            min_board_length: parse_var("BLITZ_MIN_BOARD_LENGTH", base.min_board_length)?,
            max_players: parse_var("BLITZ_MAX_PLAYERS", base.max_players)?,
            mass_warp_cap: parse_var("BLITZ_MASS_WARP_CAP", base.mass_warp_cap)?,
            lock_timeout: Duration::from_millis(parse_var(
                "BLITZ_LOCK_TIMEOUT_MS",
                base.lock_timeout.as_millis() as u64,
            )?),
            duel_style: duel_style()?.unwrap_or(base.duel_style),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.min_board_length < 2 {
            return Err(AppError::config(format!(
                "BLITZ_MIN_BOARD_LENGTH must be at least 2, got {}",
                self.min_board_length
            )));
        }
        if self.default_board_length < self.min_board_length {
            return Err(AppError::config(format!(
                "BLITZ_DEFAULT_BOARD_LENGTH ({}) is below BLITZ_MIN_BOARD_LENGTH ({})",
                self.default_board_length, self.min_board_length
            )));
        }
        if self.mass_warp_cap == 0 {
            return Err(AppError::config("BLITZ_MASS_WARP_CAP must be positive"));
        }
        Ok(())
    }

    pub fn to_defaults(&self) -> GameDefaults {
        GameDefaults {
            board_length: self.default_board_length,
            min_board_length: self.min_board_length,
            max_players: self.max_players,
            mass_warp_cap: self.mass_warp_cap,
            duel_style: self.duel_style,
        }
    }
}

/// Read `name` and parse it, falling back to `default` when unset or blank.
fn parse_var<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|e| {
            AppError::config(format!("Environment variable '{name}' has invalid value '{raw}': {e}"))
        }),
        _ => Ok(default),
    }
}

fn duel_style() -> Result<Option<DuelStyle>, AppError> {
    let Ok(raw) = env::var("BLITZ_DUEL_STYLE") else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "prediction" => Ok(Some(DuelStyle::Prediction)),
        "instant" => Ok(Some(DuelStyle::Instant)),
        other => Err(AppError::config(format!(
            "BLITZ_DUEL_STYLE must be 'prediction' or 'instant', got '{other}'"
        ))),
    }
}
