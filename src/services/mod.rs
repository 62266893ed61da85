pub mod concept_extractor;
pub mod difficulty_validator;
pub mod generation_client;
pub mod performance_summarizer;
pub mod question_generator;
pub mod quiz_pipeline_service;
pub mod reconciler;
