use crate::Error;
use serde::{Deserialize, Serialize};

pub const CHAT_ERROR_PREFIX: &str = "エラーが発生しました: ";
pub const IMAGE_ERROR_PREFIX: &str = "画像解析エラー: ";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub user_message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageAnalysisRequest {
    /// `null` and absent are both treated as no image.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ImageAnalysisResponse {
    Success { analysis: String },
    Error { error: String },
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub ok: bool,
}

impl ChatResponse {
    /// Errors are reported in the reply text.
    pub fn failure(error: &Error) -> Self {
        Self {
            reply: format!("{CHAT_ERROR_PREFIX}{error}"),
        }
    }
}

impl ImageAnalysisResponse {
    pub fn failure(error: &Error) -> Self {
        Self::Error {
            error: format!("{IMAGE_ERROR_PREFIX}{error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn missing_user_message_defaults_to_empty() {
        let request: ChatRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.user_message, "");
    }

    #[test]
    fn image_response_carries_status_discriminator() {
        let success = ImageAnalysisResponse::Success {
            analysis: "猫の写真".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&success).unwrap(),
            json!({"analysis": "猫の写真", "status": "success"})
        );

        let failure = ImageAnalysisResponse::failure(&Error::validation("画像データが提供されていません"));
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({"error": "画像解析エラー: 画像データが提供されていません", "status": "error"})
        );
    }

    #[test]
    fn chat_failure_is_folded_into_reply() {
        let response = ChatResponse::failure(&Error::llm("timeout"));
        assert_eq!(response.reply, "エラーが発生しました: LLM error: timeout");
    }

    #[test]
    fn image_request_prompt_is_optional() {
        let request: ImageAnalysisRequest =
            serde_json::from_value(json!({"image": "aGVsbG8="})).unwrap();
        assert_eq!(request.image.as_deref(), Some("aGVsbG8="));
        assert_eq!(request.prompt, None);
    }

    #[test]
    fn null_image_deserializes_as_missing() {
        let request: ImageAnalysisRequest =
            serde_json::from_value(json!({"image": null, "prompt": "x"})).unwrap();
        assert_eq!(request.image, None);
        assert_eq!(request.prompt.as_deref(), Some("x"));
    }
}
