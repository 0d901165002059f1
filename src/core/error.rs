use thiserror::Error;

use crate::engine::EngineError;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("rules engine call failed: {0}")]
    Engine(#[from] EngineError),

    #[error("invalid planner config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AiError>;
