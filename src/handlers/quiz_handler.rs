use std::sync::Arc;

use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{GenerateQuizRequest, SummarizePerformanceRequest},
};

#[post("/api/quizzes")]
pub async fn generate_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<GenerateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_pipeline
        .generate_quiz(&request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[post("/api/quizzes/summary")]
pub async fn summarize_performance(
    state: web::Data<Arc<AppState>>,
    request: web::Json<SummarizePerformanceRequest>,
) -> Result<HttpResponse, AppError> {
    let summary = state
        .quiz_pipeline
        .summarize_performance(&request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}
