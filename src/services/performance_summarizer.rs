use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::prompts::{render, PERFORMANCE_SUMMARY_PROMPT},
    errors::PipelineError,
    models::{
        domain::{PerformanceSummary, QuestionResult},
        dto::request::SummarizePerformanceRequest,
    },
    services::generation_client::{generate_structured, GenerationClient, StructuredOutput},
};

// A missing or blank summary is a semantic failure, not a schema violation.
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct GeneratedSummary {
    /// Concise, encouraging markdown summary of strengths and areas to review.
    #[serde(default)]
    pub summary: Option<String>,
}

impl StructuredOutput for GeneratedSummary {
    const SCHEMA_NAME: &'static str = "performance_summary";
}

pub struct PerformanceSummarizer {
    client: Arc<dyn GenerationClient>,
}

impl PerformanceSummarizer {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    /// Only incorrect answers spell out the chosen and the correct option.
    pub fn prompt(results: &[QuestionResult]) -> String {
        let listing = results
            .iter()
            .map(|result| {
                if result.is_correct {
                    format!("---\nQuestion: {}\nResult: CORRECT", result.question)
                } else {
                    format!(
                        "---\nQuestion: {}\nResult: INCORRECT\nUser's Answer: {}\nCorrect Answer: {}",
                        result.question,
                        result.user_answer().unwrap_or("No answer given"),
                        result.correct_answer()
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        render(PERFORMANCE_SUMMARY_PROMPT, &[("results", listing.as_str())])
    }

    pub async fn summarize(
        &self,
        request: &SummarizePerformanceRequest,
    ) -> Result<PerformanceSummary, PipelineError> {
        request
            .validate()
            .map_err(|e| PipelineError::InvalidQuizResults(e.to_string()))?;

        let correct = request.questions.iter().filter(|q| q.is_correct).count();
        log::info!(
            "Summarizing quiz performance ({}/{} correct)",
            correct,
            request.questions.len()
        );

        let output: GeneratedSummary =
            generate_structured(self.client.as_ref(), Self::prompt(&request.questions)).await?;

        match output.summary {
            Some(summary) if !summary.trim().is_empty() => Ok(PerformanceSummary { summary }),
            _ => Err(PipelineError::EmptySummary),
        }
    }
}
