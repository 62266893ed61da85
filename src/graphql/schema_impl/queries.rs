use async_graphql::{Context, Object};

use crate::{
    app_state::AppState,
    errors::{AppResult, MIN_TEXT_LENGTH},
    models::dto::response::ModelInfo,
    services::question_generator::TARGET_QUESTION_COUNT,
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn model_info(&self, ctx: &Context<'_>) -> AppResult<ModelInfo> {
        let state = ctx.data::<AppState>()?;

        Ok(ModelInfo {
            model: state.config.model_name.clone(),
            api_base: state.config.model_api_base.clone(),
            api_key_configured: state.config.has_api_key(),
            min_text_length: MIN_TEXT_LENGTH,
            target_question_count: TARGET_QUESTION_COUNT,
        })
    }
}
