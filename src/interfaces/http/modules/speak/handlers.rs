//! Speak handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Extension,
};

use super::dto::{SpeakBody, SpeakQuery};
use crate::application::speak::DEFAULT_CONTENT_TYPE;
use crate::application::{KeyManager, SpeakForwarder, SpeakOutcome, SpeakRequest, SpeakResponse};
use crate::interfaces::http::common::ValidatedJson;
use crate::interfaces::http::middleware::AuthenticatedKey;
use crate::shared::{GatewayError, GatewayResult};

/// Set on responses that carry placeholder audio instead of upstream output
pub const FALLBACK_HEADER: &str = "x-tts-fallback";

#[derive(Clone)]
pub struct SpeakState {
    pub forwarder: Arc<SpeakForwarder>,
    pub keys: Arc<KeyManager>,
    pub max_text_length: usize,
}

#[utoipa::path(
    get,
    path = "/speak",
    tag = "Speak",
    params(SpeakQuery),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Audio relayed from the TTS upstream"),
        (status = 400, description = "Missing, blank or oversized text"),
        (status = 401, description = "Missing x-api-key"),
        (status = 403, description = "Unknown or disabled API key"),
        (status = 502, description = "TTS upstream failed")
    )
)]
pub async fn speak_get(
    State(state): State<SpeakState>,
    key: Option<Extension<AuthenticatedKey>>,
    headers: HeaderMap,
    query: Result<Query<SpeakQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            record_outcome("rejected");
            return GatewayError::Validation(rejection.body_text()).into_response();
        }
    };
    speak(&state, key, query.text, query.voice, &headers).await
}

#[utoipa::path(
    post,
    path = "/speak",
    tag = "Speak",
    request_body = SpeakBody,
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Audio relayed from the TTS upstream"),
        (status = 400, description = "Invalid body or text"),
        (status = 401, description = "Missing x-api-key"),
        (status = 403, description = "Unknown or disabled API key"),
        (status = 502, description = "TTS upstream failed")
    )
)]
pub async fn speak_post(
    State(state): State<SpeakState>,
    key: Option<Extension<AuthenticatedKey>>,
    headers: HeaderMap,
    ValidatedJson(body): ValidatedJson<SpeakBody>,
) -> Response {
    speak(&state, key, Some(body.text), body.voice, &headers).await
}

async fn speak(
    state: &SpeakState,
    key: Option<Extension<AuthenticatedKey>>,
    text: Option<String>,
    voice: Option<String>,
    headers: &HeaderMap,
) -> Response {
    let request = match speak_request(text, voice, state.max_text_length) {
        Ok(request) => request,
        Err(e) => {
            record_outcome("rejected");
            return e.into_response();
        }
    };

    match state.forwarder.forward_speak(&request, headers).await {
        Ok(audio) => {
            record_outcome(audio.outcome.as_str());
            if let Some(Extension(key)) = key {
                state
                    .keys
                    .record_usage(&key.id, request.text.chars().count())
                    .await;
            }
            relay(audio)
        }
        Err(e) => {
            record_outcome("failed");
            e.into_response()
        }
    }
}

fn speak_request(
    text: Option<String>,
    voice: Option<String>,
    max_text_length: usize,
) -> GatewayResult<SpeakRequest> {
    let text = text.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(GatewayError::Validation("text is required".to_string()));
    }
    if text.chars().count() > max_text_length {
        return Err(GatewayError::Validation(format!(
            "text must be at most {} characters",
            max_text_length
        )));
    }

    let voice = voice
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    Ok(SpeakRequest { text, voice })
}

fn relay(audio: SpeakResponse) -> Response {
    let content_type = HeaderValue::from_str(&audio.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    let mut response = Response::new(Body::from_stream(audio.body));
    *response.status_mut() = audio.status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    if audio.outcome == SpeakOutcome::Fallback {
        response
            .headers_mut()
            .insert(FALLBACK_HEADER, HeaderValue::from_static("1"));
    }
    response
}

fn record_outcome(outcome: &'static str) {
    metrics::counter!("speak_requests_total", "outcome" => outcome).increment(1);
}
