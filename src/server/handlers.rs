use super::types::{
    ChatRequest, ChatResponse, HealthResponse, ImageAnalysisRequest, ImageAnalysisResponse,
};
use crate::assistant::Assistant;
use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
}

impl AppState {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant: Arc::new(assistant),
        }
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatResponse> {
    let request_id = Uuid::new_v4();

    let result = match payload {
        Ok(Json(request)) => {
            info!(
                %request_id,
                "Received chat request ({} chars)",
                request.user_message.chars().count()
            );
            state.assistant.chat(&request.user_message).await
        }
        Err(rejection) => Err(rejection.into()),
    };

    match result {
        Ok(reply) => {
            info!(%request_id, "Chat request completed");
            Json(ChatResponse { reply })
        }
        Err(e) => {
            error!(%request_id, "Chat request failed: {}", e);
            Json(ChatResponse::failure(&e))
        }
    }
}

pub async fn analyze_image(
    State(state): State<AppState>,
    payload: Result<Json<ImageAnalysisRequest>, JsonRejection>,
) -> Json<ImageAnalysisResponse> {
    let request_id = Uuid::new_v4();

    let result = match payload {
        Ok(Json(request)) => {
            let image = request.image.as_deref().unwrap_or_default();
            info!(
                %request_id,
                "Received image analysis request ({} base64 bytes, custom prompt: {})",
                image.len(),
                request.prompt.is_some()
            );
            state
                .assistant
                .analyze_image(image, request.prompt.as_deref())
                .await
        }
        Err(rejection) => Err(rejection.into()),
    };

    match result {
        Ok(analysis) => {
            info!(%request_id, "Image analysis completed");
            Json(ImageAnalysisResponse::Success { analysis })
        }
        Err(e) => {
            error!(%request_id, "Image analysis failed: {}", e);
            Json(ImageAnalysisResponse::failure(&e))
        }
    }
}
