use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::{
    app_state::AppState,
    models::{
        domain::PerformanceSummary,
        dto::{
            request::{GenerateQuizRequest, SummarizePerformanceRequest},
            response::QuizData,
        },
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn generate_quiz(&self, ctx: &Context<'_>, text: String) -> Result<QuizData> {
        let state = ctx.data::<AppState>()?;

        state
            .quiz_pipeline
            .generate_quiz(&GenerateQuizRequest::new(text))
            .await
            .map_err(|e| e.extend())
    }

    async fn summarize_performance(
        &self,
        ctx: &Context<'_>,
        input: SummarizePerformanceRequest,
    ) -> Result<PerformanceSummary> {
        let state = ctx.data::<AppState>()?;

        state
            .quiz_pipeline
            .summarize_performance(&input)
            .await
            .map_err(|e| e.extend())
    }
}
