use serde::{Deserialize, Serialize};

use crate::model::QuestionSet;

/// One answer slot per question, in question order.
///
/// The length is fixed when the set is created and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: Vec<String>,
}

impl AnswerSet {
    /// Blank answers for every question in `questions`.
    #[must_use]
    pub fn for_questions(questions: &QuestionSet) -> Self {
        Self::blank(questions.len())
    }

    pub(crate) fn blank(len: usize) -> Self {
        Self {
            answers: vec![String::new(); len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    #[must_use]
    pub fn get(&self, step: usize) -> Option<&str> {
        self.answers.get(step).map(String::as_str)
    }

    /// True if the answer at `step` is missing or whitespace only.
    #[must_use]
    pub fn is_blank(&self, step: usize) -> bool {
        self.get(step).is_none_or(|answer| answer.trim().is_empty())
    }

    /// Indices of every blank answer, in order.
    #[must_use]
    pub fn blank_steps(&self) -> Vec<usize> {
        (0..self.answers.len())
            .filter(|step| self.is_blank(*step))
            .collect()
    }

    pub(crate) fn record(&mut self, step: usize, text: String) {
        if let Some(slot) = self.answers.get_mut(step) {
            *slot = text;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.answers.iter().map(String::as_str)
    }
}

/// A question paired with the answer given for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// The only structure that crosses the client/service boundary.
///
/// Serializes as `{ "answers": [ { "question": ..., "answer": ... }, ... ] }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub answers: Vec<QaPair>,
}

impl SubmissionPayload {
    /// Zip questions and answers in order.
    #[must_use]
    pub fn zip(questions: &QuestionSet, answers: &AnswerSet) -> Self {
        let answers = questions
            .iter()
            .zip(answers.iter())
            .map(|(question, answer)| QaPair::new(question, answer))
            .collect();
        Self { answers }
    }

    #[must_use]
    pub fn pairs(&self) -> &[QaPair] {
        &self.answers
    }

    #[must_use]
    pub fn into_pairs(self) -> Vec<QaPair> {
        self.answers
    }
}

impl From<Vec<QaPair>> for SubmissionPayload {
    fn from(answers: Vec<QaPair>) -> Self {
        Self { answers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> QuestionSet {
        QuestionSet::new(["Name?", "Skill?"]).unwrap()
    }

    #[test]
    fn new_answer_set_is_blank_and_sized_to_questions() {
        let answers = AnswerSet::for_questions(&questions());
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.blank_steps(), vec![0, 1]);
    }

    #[test]
    fn record_ignores_out_of_range_steps() {
        let mut answers = AnswerSet::for_questions(&questions());
        answers.record(5, "ignored".into());
        assert_eq!(answers.len(), 2);
        assert!(answers.is_blank(0));
    }

    #[test]
    fn whitespace_only_answer_counts_as_blank() {
        let mut answers = AnswerSet::for_questions(&questions());
        answers.record(0, " \t ".into());
        answers.record(1, "Welding".into());
        assert_eq!(answers.blank_steps(), vec![0]);
    }

    #[test]
    fn payload_serializes_in_wire_shape() {
        let mut answers = AnswerSet::for_questions(&questions());
        answers.record(0, "Alex".into());
        answers.record(1, "Welding".into());

        let payload = SubmissionPayload::zip(&questions(), &answers);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "answers": [
                    { "question": "Name?", "answer": "Alex" },
                    { "question": "Skill?", "answer": "Welding" }
                ]
            })
        );
    }
}
