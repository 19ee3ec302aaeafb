use std::ops::Index;
use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("question list cannot be empty")]
    Empty,

    #[error("question {index} is blank")]
    BlankQuestion { index: usize },
}

/// The fixed, ordered list of survey questions.
///
/// Built once at startup and shared read-only; cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Arc<[String]>,
}

impl QuestionSet {
    /// Build a question set from an ordered list of question texts.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::Empty` if no questions are given.
    /// Returns `QuestionSetError::BlankQuestion` if any question is blank.
    pub fn new<I, S>(questions: I) -> Result<Self, QuestionSetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let questions: Vec<String> = questions
            .into_iter()
            .map(|q| q.into().trim().to_string())
            .collect();

        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        if let Some(index) = questions.iter().position(String::is_empty) {
            return Err(QuestionSetError::BlankQuestion { index });
        }

        Ok(Self {
            questions: questions.into(),
        })
    }

    /// Parse a question list with one question per line. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::Empty` if the text holds no questions.
    pub fn from_lines(text: &str) -> Result<Self, QuestionSetError> {
        Self::new(text.lines().filter(|line| !line.trim().is_empty()))
    }

    /// Number of questions (N).
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.questions.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(String::as_str)
    }
}

impl Index<usize> for QuestionSet {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.questions[index]
    }
}
