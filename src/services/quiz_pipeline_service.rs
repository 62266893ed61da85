use std::{any::Any, future::Future, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult, PipelineError},
    models::{
        domain::PerformanceSummary,
        dto::{
            request::{GenerateQuizRequest, SummarizePerformanceRequest},
            response::QuizData,
        },
    },
    services::{
        concept_extractor::ConceptExtractor, difficulty_validator::DifficultyValidator,
        generation_client::GenerationClient, performance_summarizer::PerformanceSummarizer,
        question_generator::QuestionGenerator, reconciler::reconcile,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    InputGuard,
    ExtractConcepts,
    GenerateQuestions,
    ValidateDifficulty,
    Reconcile,
    Summarize,
}

impl PipelineStage {
    /// Stages of quiz creation, in execution order.
    pub const QUIZ_CREATION: [PipelineStage; 5] = [
        PipelineStage::InputGuard,
        PipelineStage::ExtractConcepts,
        PipelineStage::GenerateQuestions,
        PipelineStage::ValidateDifficulty,
        PipelineStage::Reconcile,
    ];

    /// 1-based position within quiz creation, `None` for other stages.
    pub fn step_number(&self) -> Option<usize> {
        Self::QUIZ_CREATION
            .iter()
            .position(|stage| stage == self)
            .map(|i| i + 1)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::InputGuard => "input_guard",
            PipelineStage::ExtractConcepts => "extract_concepts",
            PipelineStage::GenerateQuestions => "generate_questions",
            PipelineStage::ValidateDifficulty => "validate_difficulty",
            PipelineStage::Reconcile => "reconcile",
            PipelineStage::Summarize => "summarize",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_stage_start(stage: PipelineStage) {
    match stage.step_number() {
        Some(step) => log::debug!(
            "Pipeline stage {}/{}: {}",
            step,
            PipelineStage::QUIZ_CREATION.len(),
            stage
        ),
        None => log::debug!("Pipeline stage: {}", stage),
    }
}

fn log_stage_failure(stage: PipelineStage) -> impl Fn(&PipelineError) {
    move |err| log::error!("Pipeline stage '{}' failed: {}", stage, err)
}

/// Runs quiz creation (extract → generate → validate → reconcile) and the
/// separate performance-summary pipeline. Holds no per-request state.
pub struct QuizPipelineService {
    extractor: ConceptExtractor,
    generator: QuestionGenerator,
    validator: DifficultyValidator,
    summarizer: PerformanceSummarizer,
}

impl QuizPipelineService {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            extractor: ConceptExtractor::new(client.clone()),
            generator: QuestionGenerator::new(client.clone()),
            validator: DifficultyValidator::new(client.clone()),
            summarizer: PerformanceSummarizer::new(client),
        }
    }

    /// Quiz-creation entry point. Every failure comes back as an [`AppError`]
    /// carrying the user-facing message.
    pub async fn generate_quiz(&self, request: &GenerateQuizRequest) -> AppResult<QuizData> {
        catch_unexpected(self.run_quiz_pipeline(request))
            .await
            .map_err(AppError::from)
    }

    /// Summary entry point.
    pub async fn summarize_performance(
        &self,
        request: &SummarizePerformanceRequest,
    ) -> AppResult<PerformanceSummary> {
        log_stage_start(PipelineStage::Summarize);
        let summary = catch_unexpected(self.summarizer.summarize(request))
            .await
            .inspect_err(log_stage_failure(PipelineStage::Summarize))?;

        Ok(summary)
    }

    pub async fn run_quiz_pipeline(
        &self,
        request: &GenerateQuizRequest,
    ) -> Result<QuizData, PipelineError> {
        log_stage_start(PipelineStage::InputGuard);
        request
            .validate()
            .map_err(|_| PipelineError::InputTooShort)
            .inspect_err(log_stage_failure(PipelineStage::InputGuard))?;

        log_stage_start(PipelineStage::ExtractConcepts);
        let concepts = self
            .extractor
            .extract(&request.text)
            .await
            .inspect_err(log_stage_failure(PipelineStage::ExtractConcepts))?;

        log_stage_start(PipelineStage::GenerateQuestions);
        let questions = self
            .generator
            .generate(&concepts)
            .await
            .inspect_err(log_stage_failure(PipelineStage::GenerateQuestions))?;

        log_stage_start(PipelineStage::ValidateDifficulty);
        let verdicts = self
            .validator
            .validate(&questions)
            .await
            .inspect_err(log_stage_failure(PipelineStage::ValidateDifficulty))?;

        log_stage_start(PipelineStage::Reconcile);
        let joined = reconcile(&questions, &verdicts);
        log::info!(
            "Quiz ready: {} concepts, {} questions",
            concepts.len(),
            joined.len()
        );

        Ok(QuizData {
            concepts: concepts.into_inner(),
            questions: joined,
        })
    }
}

/// Final catch-all: a panic anywhere inside a pipeline run becomes an
/// `Unexpected` error instead of tearing down the worker.
async fn catch_unexpected<T, F>(pipeline: F) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, PipelineError>>,
{
    match AssertUnwindSafe(pipeline).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            log::error!("Pipeline panicked: {}", message);
            Err(PipelineError::Unexpected(message))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "An unknown error occurred.".to_string()
    }
}
