//! Session configuration, fixed at process start.

use crate::error::AppError;

const DEFAULT_MIN_PLAYERS: usize = 2;
const DEFAULT_MAX_PLAYERS: usize = 7;
const DEFAULT_HISTORY_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub min_players: usize,
    pub max_players: usize,
    pub history_capacity: usize,
}

impl GameConfig {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// - `RENKU_MIN_PLAYERS` (default 2)
    /// - `RENKU_MAX_PLAYERS` (default 7)
    /// - `RENKU_HISTORY_CAPACITY` (default 20)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_parts(
            env_usize("RENKU_MIN_PLAYERS", DEFAULT_MIN_PLAYERS)?,
            env_usize("RENKU_MAX_PLAYERS", DEFAULT_MAX_PLAYERS)?,
            env_usize("RENKU_HISTORY_CAPACITY", DEFAULT_HISTORY_CAPACITY)?,
        )
    }

    pub fn from_parts(
        min_players: usize,
        max_players: usize,
        history_capacity: usize,
    ) -> Result<Self, AppError> {
        if min_players == 0 {
            return Err(AppError::config(
                "RENKU_MIN_PLAYERS must be at least 1".to_string(),
            ));
        }
        if max_players < min_players {
            return Err(AppError::config(format!(
                "RENKU_MAX_PLAYERS ({max_players}) must not be below RENKU_MIN_PLAYERS ({min_players})"
            )));
        }
        Ok(Self {
            min_players,
            max_players,
            history_capacity,
        })
    }
}

fn env_usize(key: &str, default: usize) -> Result<usize, AppError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{key} must be a non-negative integer"))),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(AppError::config(format!("{key}: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_sane_bounds() {
        let config = GameConfig::from_parts(2, 7, 20).unwrap();
        assert_eq!(config.min_players, 2);
        assert_eq!(config.max_players, 7);
    }

    #[test]
    fn rejects_zero_minimum() {
        assert!(GameConfig::from_parts(0, 7, 20).is_err());
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(GameConfig::from_parts(4, 2, 20).is_err());
    }
}
