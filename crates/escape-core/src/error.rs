//! Startup errors. Gameplay never errors; rejected actions are outcomes.

use escape_logic::config::ConfigError;
use thiserror::Error;

use crate::bake::BakeError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("level JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level config is invalid: {}", format_errors(.0))]
    InvalidConfig(Vec<ConfigError>),
    #[error(transparent)]
    Bake(#[from] BakeError),
}

fn format_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
