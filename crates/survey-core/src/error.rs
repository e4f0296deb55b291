use thiserror::Error;

use survey_port::TransportError;

/// Errors produced while loading, validating, or otherwise operating on
/// survey-core domain types. `survey-core` already depends on `survey-port`
/// for the `OutboundPort` seam a strategy's `render`/`handle_answer` needs,
/// so transport failures surfaced through that seam are wrapped here rather
/// than forcing every caller to juggle two error types.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("schema validation failed in section '{section}', question '{question}': {reason}")]
    SchemaValidation {
        section: String,
        question: String,
        reason: String,
    },

    #[error("question type '{name}' does not resolve to a registered strategy")]
    UnknownStrategy { name: String },

    #[error("strategy '{name}' registered more than once")]
    DuplicateStrategy { name: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("strategy error: {0}")]
    Strategy(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SurveyError {
    /// Short machine-readable code, mirroring the teacher's `SkynetError::code`.
    pub fn code(&self) -> &'static str {
        match self {
            SurveyError::Config(_) => "CONFIG_ERROR",
            SurveyError::SchemaValidation { .. } => "SCHEMA_VALIDATION",
            SurveyError::UnknownStrategy { .. } => "UNKNOWN_STRATEGY",
            SurveyError::DuplicateStrategy { .. } => "DUPLICATE_STRATEGY",
            SurveyError::Transport(e) => e.code(),
            SurveyError::Strategy(_) => "STRATEGY_ERROR",
            SurveyError::Io(_) => "IO_ERROR",
            SurveyError::Yaml(_) => "YAML_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;
