use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::prompts::{render, DIFFICULTY_VALIDATION_PROMPT},
    errors::PipelineError,
    models::domain::{Difficulty, QuestionSet, ValidationResult},
    services::generation_client::{generate_structured, GenerationClient, StructuredOutput},
};

/// What the validator sees of a question: the correct answer's text, never its
/// position among the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationItem<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub difficulty: Difficulty,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyVerdicts {
    /// One verdict per question in the input list.
    pub validation_results: Vec<ValidationResult>,
}

impl StructuredOutput for DifficultyVerdicts {
    const SCHEMA_NAME: &'static str = "difficulty_validation";
}

pub struct DifficultyValidator {
    client: Arc<dyn GenerationClient>,
}

impl DifficultyValidator {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    pub fn items(questions: &QuestionSet) -> Vec<ValidationItem<'_>> {
        questions
            .iter()
            .map(|(_, q)| ValidationItem {
                question: &q.text,
                answer: q.answer_text().unwrap_or_default(),
                difficulty: q.difficulty,
            })
            .collect()
    }

    pub fn prompt(items: &[ValidationItem<'_>]) -> String {
        let listing = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                format!(
                    "Question {}: {}\nAnswer: {}\nAssigned Difficulty: {}",
                    index, item.question, item.answer, item.difficulty
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        render(DIFFICULTY_VALIDATION_PROMPT, &[("questions", listing.as_str())])
    }

    /// Returns whatever verdicts the model produced, in its order. Missing or
    /// reordered entries are the reconciler's concern.
    pub async fn validate(
        &self,
        questions: &QuestionSet,
    ) -> Result<Vec<ValidationResult>, PipelineError> {
        let items = Self::items(questions);
        let output: DifficultyVerdicts =
            generate_structured(self.client.as_ref(), Self::prompt(&items)).await?;

        if output.validation_results.len() != questions.len() {
            log::warn!(
                "Difficulty validator returned {} verdicts for {} questions",
                output.validation_results.len(),
                questions.len()
            );
        }

        Ok(output.validation_results)
    }
}
