use async_graphql::{Enum, SimpleObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, Enum, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// A multiple-choice question exactly as the generator produced it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// The question text.
    #[serde(rename = "question")]
    #[graphql(name = "question")]
    #[validate(length(min = 1))]
    pub text: String,
    /// Answer options, in display order.
    #[validate(length(min = 2))]
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_answer_index: usize,
    pub difficulty: Difficulty,
}

impl Question {
    /// Text of the correct option, if the index points at one.
    pub fn answer_text(&self) -> Option<&str> {
        self.options
            .get(self.correct_answer_index)
            .map(String::as_str)
    }

    pub fn is_correct(&self, chosen: Option<usize>) -> bool {
        chosen == Some(self.correct_answer_index)
    }
}

/// Questions in generation order. The position of each question is the join
/// key used by the validator and the reconciler.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QuestionSet(Vec<Question>);

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self(questions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Question)> {
        self.0.iter().enumerate()
    }

    pub fn into_inner(self) -> Vec<Question> {
        self.0
    }
}

impl From<Vec<Question>> for QuestionSet {
    fn from(questions: Vec<Question>) -> Self {
        Self(questions)
    }
}
