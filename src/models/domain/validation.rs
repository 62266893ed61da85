use async_graphql::SimpleObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::question::Question;

pub const FALLBACK_REASON: &str = "Validation check failed for this question.";

/// Verdict on whether a question's assigned difficulty fits the question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Index of the question in the list that was sent for validation.
    pub question_index: usize,
    /// Whether the assigned difficulty is appropriate.
    pub is_valid: bool,
    /// Short justification for the verdict.
    pub reason: String,
}

impl ValidationResult {
    /// Verdict used when the validator returned nothing for a question.
    pub fn fallback(question_index: usize) -> Self {
        Self {
            question_index,
            is_valid: false,
            reason: FALLBACK_REASON.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
pub struct QuestionWithValidation {
    #[serde(flatten)]
    #[graphql(flatten)]
    pub question: Question,
    pub validation: ValidationResult,
}
