use crate::models::domain::{Difficulty, Question, QuestionResult};

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use serde_json::{json, Value};

    /// Long enough to pass the input guard.
    pub const PHOTOSYNTHESIS_TEXT: &str = "Photosynthesis is the process by which green plants use sunlight, \
water and carbon dioxide to produce glucose and oxygen. It takes place in the chloroplasts, \
where chlorophyll absorbs light energy.";

    pub const OPTIONS: [&str; 4] = ["Option A", "Option B", "Option C", "Option D"];

    fn options() -> Vec<String> {
        OPTIONS.iter().map(|o| o.to_string()).collect()
    }

    /// Creates a four-option question
    pub fn question(text: &str, difficulty: Difficulty, correct_answer_index: usize) -> Question {
        Question {
            text: text.to_string(),
            options: options(),
            correct_answer_index,
            difficulty,
        }
    }

    /// Creates a graded result; correct when the user picked the right option
    pub fn question_result(
        text: &str,
        correct_answer_index: usize,
        user_answer_index: Option<usize>,
    ) -> QuestionResult {
        QuestionResult {
            question: text.to_string(),
            options: options(),
            correct_answer_index,
            user_answer_index,
            is_correct: user_answer_index == Some(correct_answer_index),
        }
    }

    /// Raw generator output with `count` questions cycling hard, medium, easy
    pub fn raw_questions(count: usize) -> Value {
        const DIFFICULTIES: [&str; 3] = ["hard", "medium", "easy"];

        let questions: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "question": format!("Question {}", i),
                    "options": OPTIONS,
                    "correctAnswerIndex": i % OPTIONS.len(),
                    "difficulty": DIFFICULTIES[i % DIFFICULTIES.len()]
                })
            })
            .collect();

        json!({ "questions": questions })
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::services::question_generator::GeneratedQuestions;
    use validator::Validate;

    #[test]
    fn test_fixture_text_passes_input_guard() {
        assert!(PHOTOSYNTHESIS_TEXT.trim().chars().count() >= crate::errors::MIN_TEXT_LENGTH);
        assert!(PHOTOSYNTHESIS_TEXT.starts_with("Photosynthesis is"));
    }

    #[test]
    fn test_fixtures_question_result_grading() {
        assert!(question_result("Q", 1, Some(1)).is_correct);
        assert!(!question_result("Q", 1, Some(2)).is_correct);
        assert!(!question_result("Q", 1, None).is_correct);
    }

    #[test]
    fn test_fixtures_raw_questions_parse() {
        let parsed: GeneratedQuestions =
            serde_json::from_value(raw_questions(4)).expect("fixture should parse");

        assert_eq!(parsed.questions.len(), 4);
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.questions[3].correct_answer_index, 3);
        assert_eq!(parsed.questions[2].text, "Question 2");
    }
}
