//! Prompt rendering for the summary writer.
//!
//! Rendering is pure: the same pairs always produce byte-identical text, so a
//! failing request can be reproduced from the answers alone.

use crate::model::QaPair;

/// System message sent alongside every rendered prompt.
pub const SYSTEM_PROMPT: &str = "You are a professional summary writer.";

const PREAMBLE: &str = "You are an expert professional profile writer with experience crafting \
    impactful career summaries.\n\nA candidate has provided the following information:\n\n";

const INSTRUCTIONS: &str = "\
    \n\
    \n\
    Your task is to write a compelling professional summary based strictly on the \
    information above.\n\
    \n\
    Instructions:\n\
    \n\
    - Include all details mentioned in the form and write according to the answers.\n\
    - Tone should be professional, confident, and authentic.\n\
    - Length should be between 120\u{2013}200 words.\n\
    - Write a single narrative paragraph.\n\
    - Do NOT repeat the questions.\n\
    - Do NOT mention AI, JSON, or \"based on the provided information\".\n\
    - Combine scattered details into a smooth, natural narrative.\n\
    - Highlight strengths, qualifications, skills, experience, motivation, and unique qualities.\n\
    - Avoid buzzwords and generic filler language.\n\
    \n\
    Return ONLY the final summary paragraph, with no commentary before or after it.\n";

/// Render each pair as `question: answer`, one per line.
#[must_use]
pub fn format_answers(pairs: &[QaPair]) -> String {
    pairs
        .iter()
        .map(|pair| format!("{}: {}", pair.question, pair.answer))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the full instruction text for the generation provider.
#[must_use]
pub fn render_prompt(pairs: &[QaPair]) -> String {
    let answers = format_answers(pairs);
    let mut prompt = String::with_capacity(PREAMBLE.len() + answers.len() + INSTRUCTIONS.len());
    prompt.push_str(PREAMBLE);
    prompt.push_str(&answers);
    prompt.push_str(INSTRUCTIONS);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<QaPair> {
        vec![
            QaPair::new("What is your full name?", "Alex Morgan"),
            QaPair::new("What are your key skills?", "Welding, blueprint reading"),
        ]
    }

    #[test]
    fn answers_are_rendered_verbatim_in_order() {
        let prompt = render_prompt(&pairs());
        let block = "What is your full name?: Alex Morgan\n\
            What are your key skills?: Welding, blueprint reading";
        assert!(prompt.contains(block), "missing answer block in {prompt}");
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(render_prompt(&pairs()), render_prompt(&pairs()));
    }

    #[test]
    fn template_carries_writing_constraints() {
        let prompt = render_prompt(&pairs());
        assert!(prompt.contains("120\u{2013}200 words"));
        assert!(prompt.contains("single narrative paragraph"));
        assert!(prompt.contains("Do NOT repeat the questions"));
        assert!(prompt.contains("Do NOT mention AI"));
        assert!(prompt.contains("Avoid buzzwords and generic filler"));
        assert!(prompt.contains("Return ONLY the final summary paragraph"));
    }

    #[test]
    fn blank_answers_render_without_panicking() {
        let prompt = render_prompt(&[QaPair::new("Name?", "")]);
        assert!(prompt.contains("Name?: \n"));
    }
}
