use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::prompts::{render, CONCEPT_EXTRACTION_PROMPT},
    errors::PipelineError,
    models::domain::ConceptSet,
    services::generation_client::{generate_structured, GenerationClient, StructuredOutput},
};

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct ExtractedConcepts {
    /// Key concepts from the text, most central first.
    pub concepts: Vec<String>,
}

impl StructuredOutput for ExtractedConcepts {
    const SCHEMA_NAME: &'static str = "extracted_concepts";
}

pub struct ConceptExtractor {
    client: Arc<dyn GenerationClient>,
}

impl ConceptExtractor {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    pub fn prompt(text: &str) -> String {
        render(CONCEPT_EXTRACTION_PROMPT, &[("text", text)])
    }

    pub async fn extract(&self, text: &str) -> Result<ConceptSet, PipelineError> {
        let output: ExtractedConcepts =
            generate_structured(self.client.as_ref(), Self::prompt(text)).await?;

        let concepts =
            ConceptSet::from_extracted(output.concepts).ok_or(PipelineError::EmptyExtraction)?;
        log::info!("Extracted {} concepts", concepts.len());
        Ok(concepts)
    }
}
