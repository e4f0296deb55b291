//! Unifies `survey-core` and `survey-port` errors at the one seam that
//! needs both: the dispatcher and forward pipeline, which call strategies
//! (`SurveyError`) and the port (`TransportError`) in the same function.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Survey(#[from] survey_core::SurveyError),

    #[error(transparent)]
    Transport(#[from] survey_port::TransportError),
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Survey(e) => e.code(),
            EngineError::Transport(e) => e.code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
