use async_graphql::{ComplexObject, SimpleObject};
use serde::Serialize;

use crate::models::domain::{Question, QuestionWithValidation};

/// Successful result of quiz creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
#[graphql(complex)]
pub struct QuizData {
    pub concepts: Vec<String>,
    /// Questions in generation order; position `i` is question index `i`.
    pub questions: Vec<QuestionWithValidation>,
}

impl QuizData {
    /// Display view: question indices ordered easy → hard. Questions of equal
    /// difficulty keep their generation order. `questions` is left untouched.
    pub fn display_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.questions.len()).collect();
        order.sort_by_key(|&i| self.questions[i].question.difficulty);
        order
    }

    pub fn plain_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().map(|q| &q.question)
    }
}

/// Which provider model the pipeline is configured with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub model: String,
    pub api_base: String,
    pub api_key_configured: bool,
    pub min_text_length: usize,
    pub target_question_count: usize,
}

#[ComplexObject]
impl QuizData {
    async fn questions_by_difficulty(&self) -> Vec<QuestionWithValidation> {
        self.display_order()
            .into_iter()
            .map(|i| self.questions[i].clone())
            .collect()
    }
}
