use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use async_graphql::ErrorExtensions;
use serde::Serialize;
use thiserror::Error;

pub const MIN_TEXT_LENGTH: usize = 50;

/// Failure of a single call to the generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    #[error("{0}")]
    Transport(String),

    #[error("Model output for '{schema}' did not match the expected schema: {message}")]
    SchemaViolation { schema: String, message: String },

    #[error("Model returned no output for '{0}'")]
    EmptyOutput(String),
}

impl GenerationFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationFailure::Transport(_) => "transport",
            GenerationFailure::SchemaViolation { .. } => "schema-violation",
            GenerationFailure::EmptyOutput(_) => "empty-output",
        }
    }

    pub fn schema_violation(schema: &str, message: impl std::fmt::Display) -> Self {
        GenerationFailure::SchemaViolation {
            schema: schema.to_string(),
            message: message.to_string(),
        }
    }
}

/// Everything that can stop a pipeline run. `Display` is the user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Please enter a text with at least {} characters.", MIN_TEXT_LENGTH)]
    InputTooShort,

    #[error("Invalid quiz results: {0}")]
    InvalidQuizResults(String),

    #[error("Could not extract any concepts from the text.")]
    EmptyExtraction,

    #[error("Could not generate quiz questions.")]
    EmptyGeneration,

    #[error("Could not generate a performance summary.")]
    EmptySummary,

    #[error("An unexpected error occurred: {0}")]
    Generation(#[from] GenerationFailure),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    EmptyResult(String),

    #[error("{0}")]
    GenerationError(String),

    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::EmptyResult(_) => "EMPTY_RESULT",
            AppError::GenerationError(_) => "GENERATION_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyResult(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::GenerationError(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        let message = err.to_string();
        match err {
            PipelineError::InputTooShort | PipelineError::InvalidQuizResults(_) => {
                AppError::ValidationError(message)
            }
            PipelineError::EmptyExtraction
            | PipelineError::EmptyGeneration
            | PipelineError::EmptySummary => AppError::EmptyResult(message),
            PipelineError::Generation(_) => AppError::GenerationError(message),
            PipelineError::Unexpected(_) => AppError::InternalError(message),
        }
    }
}

impl From<async_graphql::Error> for AppError {
    fn from(err: async_graphql::Error) -> Self {
        AppError::InternalError(err.message)
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_err, e| {
            e.set("code", self.error_code());
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;
