use std::collections::HashMap;

use crate::models::domain::{QuestionSet, QuestionWithValidation, ValidationResult};

/// Join each question with the verdict whose `question_index` matches its
/// position in `questions`. Verdicts are looked up by key, so their order is
/// irrelevant; questions without a verdict get [`ValidationResult::fallback`].
/// When the validator repeats an index, the first verdict wins. Verdicts for
/// indices outside the question set are ignored.
pub fn reconcile(
    questions: &QuestionSet,
    results: &[ValidationResult],
) -> Vec<QuestionWithValidation> {
    let mut by_index: HashMap<usize, &ValidationResult> = HashMap::with_capacity(results.len());
    for result in results {
        by_index.entry(result.question_index).or_insert(result);
    }

    let joined: Vec<QuestionWithValidation> = questions
        .iter()
        .map(|(index, question)| QuestionWithValidation {
            question: question.clone(),
            validation: by_index
                .get(&index)
                .map(|v| (*v).clone())
                .unwrap_or_else(|| ValidationResult::fallback(index)),
        })
        .collect();

    let missing = (0..questions.len())
        .filter(|i| !by_index.contains_key(i))
        .count();
    if missing > 0 {
        log::warn!(
            "{} of {} questions fell back to an unvalidated verdict",
            missing,
            questions.len()
        );
    }

    joined
}
