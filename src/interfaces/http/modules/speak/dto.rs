//! Speak DTOs

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query string of `GET /speak`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SpeakQuery {
    /// Text to synthesize
    pub text: Option<String>,
    /// Optional voice name understood by the upstream
    pub voice: Option<String>,
}

/// Body of `POST /speak`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"text": "ନମସ୍କାର", "voice": "female"}))]
pub struct SpeakBody {
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
    #[validate(length(max = 64, message = "voice must be at most 64 characters"))]
    pub voice: Option<String>,
}
