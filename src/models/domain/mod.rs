pub mod concept;
pub mod performance_summary;
pub mod question;
pub mod quiz_attempt;
pub mod validation;
pub use concept::ConceptSet;
pub use performance_summary::PerformanceSummary;
pub use question::{Difficulty, Question, QuestionSet};
pub use quiz_attempt::{QuestionResult, QuizAttempt};
pub use validation::{QuestionWithValidation, ValidationResult};
