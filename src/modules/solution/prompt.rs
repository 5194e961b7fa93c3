//! Instruction template sent to the text-generation collaborator.

/// Embed the user's situation into the advice prompt.
///
/// The text is substituted verbatim; the model is trusted to answer with
/// best-effort JSON whatever the user wrote.
pub fn build_prompt(user_input: &str) -> String {
    format!(
        r#"You are the resident life coach of "unfail.io": warm, a little sarcastic, never cruel.
Someone feels like a failure and wants a way forward.

Their situation: "{user_input}"

Respond with ONE valid JSON object and nothing else. It MUST contain these keys:

- "solution": string. A constructive, concrete alternative path, encouraging in tone.
- "keyword": string. A short search phrase (1-3 words) naming the field or topic of the solution. Used to find recent news.
- "youtubeKeyword": string. A short, tutorial-style search phrase (e.g. "how to ...") for finding helpful videos.
- "motivationalQuote": string. A witty, sarcastically motivational one-liner about the situation.
- "relatedPersonality": object with:
    - "name": string. A real, well-known person who struggled with something similar.
    - "story": string. Two or three sentences on how they turned that failure around.
- "failureTitle": string. A dramatic movie-style title for the user's failure.
- "uselessLifeHack": string. A deadpan, entirely useless life hack related to the situation.

Example:
{{
  "solution": "Burning out of a coding bootcamp says more about the pace than about you. Your debugging patience is rare: look at QA engineering or technical support, where it is the core skill, and revisit development part-time.",
  "keyword": "software testing",
  "youtubeKeyword": "how to start a career in QA",
  "motivationalQuote": "Every bug you couldn't fix is just a feature you were too humble to ship.",
  "relatedPersonality": {{
    "name": "Vera Wang",
    "story": "Vera Wang missed the U.S. Olympic figure skating team and was passed over for editor-in-chief at Vogue. She designed her first dress at 40 and built a fashion empire."
  }},
  "failureTitle": "Segmentation Fault: The Musical",
  "uselessLifeHack": "Can't fail a bootcamp if you never wake up for it."
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_user_input_verbatim() {
        let prompt = build_prompt("I failed my driving test three times");
        assert!(prompt.contains(r#"Their situation: "I failed my driving test three times""#));
    }

    #[test]
    fn names_every_required_key() {
        let prompt = build_prompt("x");
        for key in [
            "\"solution\"",
            "\"keyword\"",
            "\"youtubeKeyword\"",
            "\"motivationalQuote\"",
            "\"relatedPersonality\"",
            "\"name\"",
            "\"story\"",
            "\"failureTitle\"",
            "\"uselessLifeHack\"",
        ] {
            assert!(prompt.contains(key), "prompt is missing {key}");
        }
    }

    #[test]
    fn example_is_valid_advice() {
        let prompt = build_prompt("x");
        let example = &prompt[prompt.find("Example:").unwrap()..];
        let advice = crate::modules::solution::models::GeneratedAdvice::from_model_text(example).unwrap();
        assert_eq!(advice.keyword.as_deref(), Some("software testing"));
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(build_prompt("same"), build_prompt("same"));
    }
}
