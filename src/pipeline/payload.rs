//! Gemini `generateContent` wire types.
//!
//! Request types only serialise; response types only deserialise and are
//! deliberately lenient, since a 2xx body without candidate text is a
//! soft "no summary" outcome rather than a parse error.

use crate::pipeline::encode::inline_png;
use crate::prompts::{summary_instruction, text_prompt};
use serde::{Deserialize, Serialize};

/// Top-level request body: `{"contents": [{"parts": [...]}]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// One content turn in a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// A request part: either text or inline media.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Base64 inline payload used for page images.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

impl GenerateContentRequest {
    /// A request with a single content turn holding `parts`.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content { parts }],
        }
    }

    /// Single-part request embedding the whole document text.
    pub fn for_text(document_text: &str, word_count: u32) -> Self {
        Self::from_parts(vec![Part::text(text_prompt(word_count, document_text))])
    }

    /// Instruction part followed by one PNG part per page, in page order.
    pub fn for_images(pages: &[Vec<u8>], word_count: u32) -> Self {
        let mut parts = Vec::with_capacity(pages.len() + 1);
        parts.push(Part::text(summary_instruction(word_count)));
        parts.extend(pages.iter().map(|png| inline_png(png)));
        Self::from_parts(parts)
    }

    /// All parts across all content turns.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.contents.iter().flat_map(|c| c.parts.iter())
    }
}

/// Response envelope. Every level is optional.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Response parts may be text, function calls, or other shapes; only text is read.
#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_request_has_one_part() {
        let req = GenerateContentRequest::for_text("Hello world.", 120);
        let v = serde_json::to_value(&req).unwrap();
        let parts = v["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 1);
        let text = parts[0]["text"].as_str().unwrap();
        assert!(text.starts_with("Please summarize the following document in approximately 120 words."));
        assert!(text.ends_with("Hello world."));
    }

    #[test]
    fn image_request_layout() {
        let pages = vec![b"one".to_vec(), b"two".to_vec()];
        let v = serde_json::to_value(GenerateContentRequest::for_images(&pages, 200)).unwrap();
        let parts = v["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(
            parts[0],
            json!({"text": "Please summarize the following document in approximately 200 words."})
        );
        assert_eq!(
            parts[1],
            json!({"inlineData": {"mimeType": "image/png", "data": "b25l"}})
        );
        assert_eq!(parts[2]["inlineData"]["data"], "dHdv");
    }

    #[test]
    fn image_request_with_no_pages_keeps_instruction() {
        let req = GenerateContentRequest::for_images(&[], 50);
        assert_eq!(req.parts().count(), 1);
    }

    #[test]
    fn first_text_reads_nested_shape() {
        let r: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "Summary."}], "role": "model"},
                            "finishReason": "STOP"}]
        }))
        .unwrap();
        assert_eq!(r.first_text(), Some("Summary."));
    }

    #[test]
    fn first_text_tolerates_missing_levels() {
        for body in [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{}]}),
            json!({"candidates": [{"content": {}}]}),
            json!({"candidates": [{"content": {"parts": [{"functionCall": {}}]}}]}),
        ] {
            let r: GenerateContentResponse = serde_json::from_value(body.clone()).unwrap();
            assert_eq!(r.first_text(), None, "body: {body}");
        }
    }
}
