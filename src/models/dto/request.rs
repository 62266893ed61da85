use async_graphql::InputObject;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::errors::MIN_TEXT_LENGTH;
use crate::models::domain::QuestionResult;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    // A missing field is treated like an empty text.
    #[serde(default)]
    #[validate(custom(function = "validate_trimmed_length"))]
    pub text: String,
}

impl GenerateQuizRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

fn validate_trimmed_length(text: &str) -> Result<(), ValidationError> {
    if text.trim().chars().count() < MIN_TEXT_LENGTH {
        return Err(ValidationError::new("text_too_short"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
#[graphql(name = "SummarizePerformanceInput")]
pub struct SummarizePerformanceRequest {
    #[validate(length(min = 1, message = "at least one question is required"), nested)]
    pub questions: Vec<QuestionResult>,
}
