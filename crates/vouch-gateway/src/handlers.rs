// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::server::GatewayState;

/// Request body for POST /send-to-client: one conversation turn that
/// needs a human decision, plus the URL to resume the workflow at.
#[derive(Debug, Deserialize)]
pub struct ClientMessage {
    pub chat_id: i64,
    pub username: String,
    pub phone_number: String,
    pub source: String,
    pub user_message: String,
    pub ai_response: String,
    pub resume_url: String,
}

/// Response body for POST /send-to-client.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub status: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The text of a review prompt as it appears in the reviewer's chat.
pub fn format_prompt(data: &ClientMessage) -> String {
    format!(
        "\u{1F464} {}: {}\n\
         \u{1F916} AI replied: {}\n\
         ------------------------------------\n\
         \u{1F4DE} Tel: {}\n\
         \u{1F4F1} Source: {}",
        data.username, data.user_message, data.ai_response, data.phone_number, data.source
    )
}

/// POST /send-to-client
///
/// Sends the review prompt to the reviewer chat and opens a session for
/// the message the channel assigned.
pub async fn post_send_to_client(
    State(state): State<GatewayState>,
    Json(body): Json<ClientMessage>,
) -> Response {
    let buttons = vouch_buttons::parse_review_buttons(&body.ai_response);
    let text = format_prompt(&body);

    let message_id = match state
        .channel
        .send_review_prompt(body.chat_id, &text, &buttons)
        .await
    {
        Ok(id) => id,
        Err(e) => {
            error!(chat_id = body.chat_id, error = %e, "failed to send review prompt");
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("failed to send review prompt: {e}"),
                }),
            )
                .into_response();
        }
    };

    if let Err(e) = state
        .engine
        .open_session(body.chat_id, message_id, &body.resume_url)
        .await
    {
        error!(chat_id = body.chat_id, message_id, error = %e, "failed to open session");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("failed to open session: {e}"),
            }),
        )
            .into_response();
    }

    info!(
        chat_id = body.chat_id,
        message_id,
        providers = buttons.len(),
        "review request dispatched"
    );

    Json(SendResponse {
        status: "sent".to_string(),
    })
    .into_response()
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
