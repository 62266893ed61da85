use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::prompts::{render, QUESTION_GENERATION_PROMPT},
    errors::{GenerationFailure, PipelineError},
    models::domain::{ConceptSet, Question, QuestionSet},
    services::generation_client::{generate_structured, GenerationClient, StructuredOutput},
};

// Requested in the prompt only; the model's actual counts are passed through.
pub const TARGET_QUESTION_COUNT: usize = 10;
pub const TARGET_OPTION_COUNT: usize = 4;

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct GeneratedQuestions {
    /// The generated multiple-choice questions.
    #[validate(nested)]
    pub questions: Vec<Question>,
}

impl StructuredOutput for GeneratedQuestions {
    const SCHEMA_NAME: &'static str = "quiz_questions";
}

pub struct QuestionGenerator {
    client: Arc<dyn GenerationClient>,
}

impl QuestionGenerator {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    pub fn prompt(concepts: &ConceptSet) -> String {
        let question_count = TARGET_QUESTION_COUNT.to_string();
        let option_count = TARGET_OPTION_COUNT.to_string();
        let bullets = concepts.to_bullet_list();

        render(
            QUESTION_GENERATION_PROMPT,
            &[
                ("question_count", question_count.as_str()),
                ("option_count", option_count.as_str()),
                ("concepts", bullets.as_str()),
            ],
        )
    }

    pub async fn generate(&self, concepts: &ConceptSet) -> Result<QuestionSet, PipelineError> {
        let output: GeneratedQuestions =
            generate_structured(self.client.as_ref(), Self::prompt(concepts)).await?;

        if output.questions.is_empty() {
            return Err(PipelineError::EmptyGeneration);
        }

        if let Some((index, question)) = output
            .questions
            .iter()
            .enumerate()
            .find(|(_, q)| q.answer_text().is_none())
        {
            return Err(GenerationFailure::schema_violation(
                GeneratedQuestions::SCHEMA_NAME,
                format!(
                    "question {} has correctAnswerIndex {} but only {} options",
                    index,
                    question.correct_answer_index,
                    question.options.len()
                ),
            )
            .into());
        }

        if output.questions.len() != TARGET_QUESTION_COUNT {
            log::debug!(
                "Model returned {} questions instead of {}",
                output.questions.len(),
                TARGET_QUESTION_COUNT
            );
        }
        log::info!("Generated {} quiz questions", output.questions.len());

        Ok(QuestionSet::new(output.questions))
    }
}
