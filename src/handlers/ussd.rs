//! USSD callback endpoint
//!
//! The telecom gateway POSTs one form-encoded request per hop and expects
//! a plain-text body starting with `CON ` or `END `. The HTTP status is
//! always 200 for processed hops; the markers are the protocol.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Form, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::error;

use crate::database::{self, DatabasePool};
use crate::ussd::UssdEngine;
use crate::utils::logging;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<UssdEngine>,
    pub pool: DatabasePool,
}

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ussd", post(handle_ussd_callback))
        .route("/health", get(health_check))
        .with_state(state)
}

/// One hop from the telecom gateway
#[derive(Debug, Deserialize)]
pub struct UssdCallback {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "serviceCode", default)]
    pub service_code: Option<String>,
    /// Cumulative input for the session, hops joined with `*`
    #[serde(default)]
    pub text: String,
}

async fn handle_ussd_callback(
    State(state): State<AppState>,
    Form(callback): Form<UssdCallback>,
) -> impl IntoResponse {
    let started = Instant::now();

    let response = state
        .engine
        .handle_input(&callback.session_id, &callback.phone_number, &callback.text)
        .await;

    logging::log_ussd_hop(
        &callback.session_id,
        &callback.phone_number,
        response.is_terminal(),
        started.elapsed().as_millis() as u64,
    );

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        response.render(),
    )
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match database::health_check(&state.pool).await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_callback_deserializes_gateway_field_names() {
        let callback: UssdCallback = serde_json::from_value(json!({
            "sessionId": "ATUid_1",
            "phoneNumber": "+254712345678",
            "serviceCode": "*384#",
            "text": "2*1"
        }))
        .unwrap();

        assert_eq!(callback.session_id, "ATUid_1");
        assert_eq!(callback.phone_number, "+254712345678");
        assert_eq!(callback.service_code.as_deref(), Some("*384#"));
        assert_eq!(callback.text, "2*1");
    }

    #[test]
    fn test_callback_text_defaults_to_empty_on_first_hop() {
        let callback: UssdCallback = serde_json::from_value(json!({
            "sessionId": "ATUid_1",
            "phoneNumber": "+254712345678"
        }))
        .unwrap();

        assert_eq!(callback.text, "");
        assert!(callback.service_code.is_none());
    }
}
