pub mod controller;
pub mod shuffle;
pub mod view;

use crate::error::{QuizError, QuizResult};

pub const CHOICES_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct_choice: String,
}

impl Question {
    pub fn new<P, C, A>(prompt: P, choices: C, correct_choice: A) -> Self
    where
        P: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
        A: Into<String>,
    {
        Self {
            prompt: prompt.into(),
            choices: choices.into_iter().map(Into::into).collect(),
            correct_choice: correct_choice.into(),
        }
    }

    fn validate(&self, index: usize) -> QuizResult<()> {
        if self.choices.len() != CHOICES_PER_QUESTION {
            return Err(QuizError::InvalidQuestion {
                index,
                reason: format!(
                    "expected {} choices, got {}",
                    CHOICES_PER_QUESTION,
                    self.choices.len()
                ),
            });
        }
        let matches = self
            .choices
            .iter()
            .filter(|c| **c == self.correct_choice)
            .count();
        if matches != 1 {
            return Err(QuizError::InvalidQuestion {
                index,
                reason: format!(
                    "correct choice {:?} appears {} times among the choices",
                    self.correct_choice, matches
                ),
            });
        }
        Ok(())
    }
}

/// Non-empty, validated list of questions handed to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> QuizResult<Self> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuestionSet);
        }
        for (index, question) in questions.iter().enumerate() {
            question.validate(index)?;
        }
        Ok(Self { questions })
    }

    /// Parses a JSON array of `{ "prompt", "choices", "correct_choice" }` records.
    pub fn from_json(json: &str) -> QuizResult<Self> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    /// The built-in general knowledge bank.
    pub fn sample() -> Self {
        Self::new(vec![
            Question::new(
                "What is the capital of France?",
                ["Paris", "London", "Berlin", "Madrid"],
                "Paris",
            ),
            Question::new(
                "Which planet is known as the Red Planet?",
                ["Mars", "Venus", "Jupiter", "Saturn"],
                "Mars",
            ),
            Question::new(
                "Who wrote 'Hamlet'?",
                [
                    "Charles Dickens",
                    "Jane Austen",
                    "William Shakespeare",
                    "Mark Twain",
                ],
                "William Shakespeare",
            ),
        ])
        .expect("built-in question bank is valid")
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    // Never true, a set is rejected at construction when empty.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Question] {
        &mut self.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_set() {
        assert!(matches!(
            QuestionSet::new(Vec::new()),
            Err(QuizError::EmptyQuestionSet)
        ));
    }

    #[test]
    fn rejects_correct_choice_missing_from_choices() {
        let err = QuestionSet::new(vec![
            Question::new("2+2?", ["3", "4", "5", "6"], "4"),
            Question::new("3+3?", ["5", "7", "8", "9"], "6"),
        ])
        .expect_err("missing answer");
        assert!(matches!(err, QuizError::InvalidQuestion { index: 1, .. }));
    }

    #[test]
    fn rejects_ambiguous_correct_choice() {
        let err = QuestionSet::new(vec![Question::new("2+2?", ["4", "4", "5", "6"], "4")])
            .expect_err("duplicate answer");
        assert!(matches!(err, QuizError::InvalidQuestion { index: 0, .. }));
    }

    #[test]
    fn rejects_wrong_choice_count() {
        let err = QuestionSet::new(vec![Question::new("2+2?", ["3", "4"], "4")])
            .expect_err("two choices");
        assert!(matches!(err, QuizError::InvalidQuestion { index: 0, .. }));
    }

    #[test]
    fn sample_bank_is_valid() {
        let sample = QuestionSet::sample();
        assert_eq!(sample.len(), 3);
        QuestionSet::new(sample.iter().cloned().collect()).expect("valid sample");
    }

    #[test]
    fn loads_questions_from_json() {
        let set = QuestionSet::from_json(
            r#"[{"prompt": "2+2?", "choices": ["3", "4", "5", "6"], "correct_choice": "4"}]"#,
        )
        .expect("json");
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).map(|q| q.prompt.as_str()), Some("2+2?"));
    }

    #[test]
    fn empty_json_array_is_rejected() {
        assert!(matches!(
            QuestionSet::from_json("[]"),
            Err(QuizError::EmptyQuestionSet)
        ));
        assert!(matches!(
            QuestionSet::from_json("{"),
            Err(QuizError::QuestionSource(_))
        ));
    }
}
