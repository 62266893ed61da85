use std::collections::BTreeMap;

use async_graphql::InputObject;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::question::Question;

/// One answered (or skipped) question of a completed quiz.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "QuestionResultInput")]
#[validate(schema(function = "validate_answer_indices"))]
pub struct QuestionResult {
    #[validate(length(min = 1, message = "question text must not be empty"))]
    pub question: String,
    #[validate(length(min = 2, message = "at least two options are required"))]
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    #[serde(default)]
    pub user_answer_index: Option<usize>,
    pub is_correct: bool,
}

impl QuestionResult {
    pub fn correct_answer(&self) -> &str {
        self.options
            .get(self.correct_answer_index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn user_answer(&self) -> Option<&str> {
        self.user_answer_index
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }
}

fn validate_answer_indices(result: &QuestionResult) -> Result<(), ValidationError> {
    if result.correct_answer_index >= result.options.len() {
        return Err(ValidationError::new("correct_answer_index_out_of_range")
            .with_message("correctAnswerIndex does not point at an option".into()));
    }
    if let Some(user_index) = result.user_answer_index {
        if user_index >= result.options.len() {
            return Err(ValidationError::new("user_answer_index_out_of_range")
                .with_message("userAnswerIndex does not point at an option".into()));
        }
    }
    if result.is_correct != (result.user_answer_index == Some(result.correct_answer_index)) {
        return Err(ValidationError::new("is_correct_mismatch")
            .with_message("isCorrect does not match the chosen and correct options".into()));
    }
    Ok(())
}

/// Answers chosen so far, keyed by question index (generation order).
/// Questions the user skipped are simply absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAttempt {
    answers: BTreeMap<usize, usize>,
}

impl QuizAttempt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or replace the chosen option for a question.
    pub fn answer(&mut self, question_index: usize, option_index: usize) {
        self.answers.insert(question_index, option_index);
    }

    pub fn answer_for(&self, question_index: usize) -> Option<usize> {
        self.answers.get(&question_index).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn score<'a, I>(&self, questions: I) -> usize
    where
        I: IntoIterator<Item = &'a Question>,
    {
        questions
            .into_iter()
            .enumerate()
            .filter(|(index, question)| question.is_correct(self.answer_for(*index)))
            .count()
    }

    /// Freeze the attempt into the per-question results the summarizer takes.
    pub fn results<'a, I>(&self, questions: I) -> Vec<QuestionResult>
    where
        I: IntoIterator<Item = &'a Question>,
    {
        questions
            .into_iter()
            .enumerate()
            .map(|(index, question)| {
                let user_answer_index = self.answer_for(index);
                QuestionResult {
                    question: question.text.clone(),
                    options: question.options.clone(),
                    correct_answer_index: question.correct_answer_index,
                    user_answer_index,
                    is_correct: question.is_correct(user_answer_index),
                }
            })
            .collect()
    }
}
