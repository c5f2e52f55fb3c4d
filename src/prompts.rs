//! Prompt text sent to the summarisation model.
//!
//! Both request shapes open with the same instruction sentence, so the target
//! length is phrased identically whether the model reads extracted text or
//! page images.

/// Word count used when the caller supplies none or an unparseable one.
pub const DEFAULT_WORD_COUNT: u32 = 200;

/// The instruction that opens every request.
pub fn summary_instruction(word_count: u32) -> String {
    format!("Please summarize the following document in approximately {word_count} words.")
}

/// Single-part prompt for documents with a text layer: the instruction,
/// followed by the full extracted text.
pub fn text_prompt(word_count: u32, document_text: &str) -> String {
    format!(
        "{} \n\nDocument:\n{}",
        summary_instruction(word_count),
        document_text
    )
}

/// Parse a user-supplied word count.
///
/// Surrounding whitespace is ignored. Returns `None` for anything that is not
/// a positive integer; callers fall back to [`DEFAULT_WORD_COUNT`].
pub fn parse_word_count(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_names_word_count() {
        assert_eq!(
            summary_instruction(150),
            "Please summarize the following document in approximately 150 words."
        );
    }

    #[test]
    fn text_prompt_puts_instruction_before_document() {
        let p = text_prompt(200, "Body text.");
        let instr = p.find("approximately 200 words").unwrap();
        let body = p.find("Body text.").unwrap();
        assert!(instr < body);
        assert!(p.ends_with("Document:\nBody text."));
    }

    #[test]
    fn parse_word_count_accepts_padded_integers() {
        assert_eq!(parse_word_count("350"), Some(350));
        assert_eq!(parse_word_count("  75\n"), Some(75));
    }

    #[test]
    fn parse_word_count_rejects_garbage() {
        assert_eq!(parse_word_count("abc"), None);
        assert_eq!(parse_word_count(""), None);
        assert_eq!(parse_word_count("-5"), None);
        assert_eq!(parse_word_count("0"), None);
        assert_eq!(parse_word_count("12.5"), None);
        assert_eq!(
            parse_word_count("abc").unwrap_or(DEFAULT_WORD_COUNT),
            200
        );
    }
}
