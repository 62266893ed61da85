pub mod health_handler;
pub mod quiz_handler;

use actix_web::web;

use crate::errors::AppError;

pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use quiz_handler::{generate_quiz, summarize_performance};

/// Body extraction failures answer with the same `{ "error": ... }` shape as
/// pipeline failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(generate_quiz)
        .service(summarize_performance);
}
