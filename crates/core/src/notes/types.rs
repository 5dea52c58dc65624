//! Request payload for `generateContent`.

use serde::{Deserialize, Serialize};

/// Length of the base64 preview kept at each end when redacting.
const PREVIEW_CHARS: usize = 20;

/// Body of a `generateContent` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// A piece of a turn: inline media or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    Text {
        text: String,
    },
}

/// Base64-encoded media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

impl GenerateContentRequest {
    /// A single user turn with the audio first and the prompt after it.
    pub fn audio_with_prompt(
        mime_type: impl Into<String>,
        base64_audio: String,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::InlineData {
                        inline_data: Blob {
                            mime_type: mime_type.into(),
                            data: base64_audio,
                        },
                    },
                    Part::Text {
                        text: prompt.into(),
                    },
                ],
            }],
        }
    }

    /// Copy with inline payloads replaced by a length and preview marker.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for content in &mut copy.contents {
            for part in &mut content.parts {
                if let Part::InlineData { inline_data } = part {
                    inline_data.data = redact(&inline_data.data);
                }
            }
        }
        copy
    }
}

fn redact(data: &str) -> String {
    if data.len() <= PREVIEW_CHARS * 2 {
        return format!("[base64 omitted, length: {}]", data.len());
    }
    // base64 is ASCII, byte slicing is safe
    format!(
        "[base64 omitted, length: {}, preview: {}...{}]",
        data.len(),
        &data[..PREVIEW_CHARS],
        &data[data.len() - PREVIEW_CHARS..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let request =
            GenerateContentRequest::audio_with_prompt("audio/mp3", "QUJD".to_string(), "notes");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(
            json["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "audio/mp3"
        );
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["data"], "QUJD");
        assert_eq!(json["contents"][0]["parts"][1]["text"], "notes");
    }

    #[test]
    fn test_redacted_hides_payload() {
        let data = "A".repeat(100) + &"B".repeat(100);
        let request = GenerateContentRequest::audio_with_prompt("audio/mp3", data, "notes");
        let redacted = request.redacted();

        let Part::InlineData { inline_data } = &redacted.contents[0].parts[0] else {
            panic!("expected inline data first");
        };
        assert_eq!(
            inline_data.data,
            format!(
                "[base64 omitted, length: 200, preview: {}...{}]",
                "A".repeat(20),
                "B".repeat(20)
            )
        );
        // text parts and the original are untouched
        assert_eq!(redacted.contents[0].parts[1], request.contents[0].parts[1]);
        assert!(matches!(
            &request.contents[0].parts[0],
            Part::InlineData { inline_data } if inline_data.data.len() == 200
        ));
    }

    #[test]
    fn test_redacted_short_payload() {
        let request =
            GenerateContentRequest::audio_with_prompt("audio/mp3", "QUJD".to_string(), "notes");
        let json = serde_json::to_string(&request.redacted()).unwrap();
        assert!(json.contains("[base64 omitted, length: 4]"));
    }
}
