// Templates use `{placeholder}` markers filled by the stage that owns them.

pub const CONCEPT_EXTRACTION_PROMPT: &str = "You are an expert educator preparing study material.

Read the text below and identify its key concepts: the distinct ideas, terms, processes and relationships a learner must understand.

## Rules
- Return each concept as a short phrase, not a sentence.
- Order concepts from most to least central to the text.
- Do not repeat a concept in different words.
- Only use ideas that appear in the text.

## Text
{text}

Return the concepts as a flat list of strings in the `concepts` field.";

pub const QUESTION_GENERATION_PROMPT: &str = "You are an expert educator writing a multiple-choice quiz.

Write {question_count} quiz questions covering the following concepts:

{concepts}

## Rules
- Every question has exactly {option_count} answer options and exactly one correct option.
- `correctAnswerIndex` is the zero-based position of the correct option in `options`.
- Vary the position of the correct option across questions.
- Label each question's difficulty as `easy`, `medium` or `hard`, and spread the quiz across all three levels.
- Keep distractors plausible and grounded in the concepts.

Return the questions in the `questions` field.";

pub const DIFFICULTY_VALIDATION_PROMPT: &str = "You are an expert quiz reviewer. Each quiz question below comes with its correct answer and the difficulty level (easy, medium or hard) another author assigned to it.

Decide independently whether the assigned difficulty is appropriate for each question.

## Rules
- Return one entry per question in `validationResults`.
- `questionIndex` must be the number shown after \"Question\" for that entry.
- `isValid` is true when the assigned difficulty fits the question.
- `reason` briefly explains the verdict.

## Questions
{questions}";

pub const PERFORMANCE_SUMMARY_PROMPT: &str = "You are an expert educator giving feedback on a completed quiz. Analyse the learner's results below.

Write a concise, insightful and encouraging summary of their performance:
- Highlight the concepts they seem to understand well, based on correct answers.
- Gently point out concepts they may want to review, based on incorrect answers.
- Keep the tone positive and constructive.
- Format the summary as markdown.

## Results
{results}

Return the summary in the `summary` field.";

/// Fill every `{key}` marker in `template`.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}
