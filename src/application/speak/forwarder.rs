//! Upstream TTS forwarding
//!
//! Builds the upstream request from [`UpstreamConfig`], relays status and
//! content type verbatim and hands the body back as a stream so audio of any
//! length passes through without being buffered.

use std::io;
use std::pin::Pin;
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::fallback::{placeholder_audio, PLACEHOLDER_CONTENT_TYPE};
use crate::config::{SpeakConfig, UpstreamConfig, UpstreamMethod};
use crate::shared::{GatewayError, GatewayResult};

/// Content type relayed when the upstream does not send one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Caller headers passed through to the upstream
const FORWARDED_HEADERS: [HeaderName; 2] = [ACCEPT, ACCEPT_LANGUAGE];

pub type AudioStream = Pin<Box<dyn Stream<Item = Result<Bytes, io::Error>> + Send>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakRequest {
    pub text: String,
    pub voice: Option<String>,
}

/// Terminal state of a forwarded request that produced audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    Succeeded,
    Fallback,
}

impl SpeakOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Fallback => "fallback",
        }
    }
}

pub struct SpeakResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: AudioStream,
    pub outcome: SpeakOutcome,
}

impl std::fmt::Debug for SpeakResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeakResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

pub struct SpeakForwarder {
    client: Client,
    upstream: UpstreamConfig,
    timeout: Duration,
    fallback_enabled: bool,
}

impl SpeakForwarder {
    pub fn new(upstream: &UpstreamConfig, speak: &SpeakConfig) -> GatewayResult<Self> {
        let timeout = Duration::from_secs(upstream.timeout_secs);
        let client = Client::builder()
            .connect_timeout(timeout)
            .user_agent(concat!("odia-tts-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            upstream: upstream.clone(),
            timeout,
            fallback_enabled: speak.dev_fallback_audio,
        })
    }

    pub fn fallback_enabled(&self) -> bool {
        self.fallback_enabled
    }

    /// Forward one request. Upstream failures become `GatewayError::Upstream`
    /// unless the development fallback is on, in which case placeholder audio
    /// is returned instead.
    pub async fn forward_speak(
        &self,
        request: &SpeakRequest,
        caller_headers: &HeaderMap,
    ) -> GatewayResult<SpeakResponse> {
        match self.call_upstream(request, caller_headers).await {
            Ok(response) => Ok(response),
            Err(e) if self.fallback_enabled => {
                warn!("Serving placeholder audio after upstream failure: {}", e);
                Ok(Self::fallback_response())
            }
            Err(e) => Err(e),
        }
    }

    fn fallback_response() -> SpeakResponse {
        let audio = placeholder_audio();
        SpeakResponse {
            status: StatusCode::OK,
            content_type: PLACEHOLDER_CONTENT_TYPE.to_string(),
            body: Box::pin(futures_util::stream::once(async move {
                Ok::<_, io::Error>(audio)
            })),
            outcome: SpeakOutcome::Fallback,
        }
    }

    async fn call_upstream(
        &self,
        request: &SpeakRequest,
        caller_headers: &HeaderMap,
    ) -> GatewayResult<SpeakResponse> {
        if self.upstream.url.is_empty() {
            return Err(GatewayError::upstream(None, "TTS upstream is not configured"));
        }

        let mut params: Vec<(&str, &str)> =
            vec![(self.upstream.text_param.as_str(), request.text.as_str())];
        if let Some(voice) = request.voice.as_deref() {
            params.push((self.upstream.voice_param.as_str(), voice));
        }

        let builder = match self.upstream.method {
            UpstreamMethod::Get => self.client.get(&self.upstream.url).query(&params),
            UpstreamMethod::Post => {
                let body: Map<String, Value> = params
                    .iter()
                    .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                    .collect();
                self.client.post(&self.upstream.url).json(&body)
            }
        };
        let mut forwarded = HeaderMap::new();
        for name in FORWARDED_HEADERS {
            if let Some(value) = caller_headers.get(&name) {
                forwarded.insert(name, value.clone());
            }
        }
        let builder = builder.headers(forwarded);

        let started = Instant::now();
        let sent = tokio::time::timeout(self.timeout, builder.send()).await;
        metrics::histogram!("upstream_request_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        let response = match sent {
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "TTS upstream timed out");
                return Err(GatewayError::upstream(None, "TTS upstream timed out"));
            }
            Ok(Err(e)) => {
                warn!("TTS upstream request failed: {}", e);
                return Err(GatewayError::upstream(
                    e.status().map(|s| s.as_u16()),
                    "TTS upstream unreachable",
                ));
            }
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        if !status.is_success() {
            // Upstream error bodies are never relayed.
            warn!(upstream_status = status.as_u16(), "TTS upstream returned an error");
            return Err(GatewayError::upstream(
                Some(status.as_u16()),
                "TTS upstream returned an error",
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        debug!(%status, %content_type, "Relaying upstream audio");

        Ok(SpeakResponse {
            status,
            content_type,
            body: bounded_chunks(response.bytes_stream(), self.timeout),
            outcome: SpeakOutcome::Succeeded,
        })
    }
}

/// Ends the body with a `TimedOut` error when the upstream stalls for longer
/// than `timeout` between chunks.
fn bounded_chunks<S>(chunks: S, timeout: Duration) -> AudioStream
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    let chunks = Box::pin(chunks);
    Box::pin(futures_util::stream::unfold(
        Some(chunks),
        move |state| async move {
            let mut chunks = state?;
            match tokio::time::timeout(timeout, chunks.next()).await {
                Ok(Some(Ok(bytes))) => Some((Ok(bytes), Some(chunks))),
                Ok(Some(Err(e))) => {
                    warn!("TTS upstream body failed: {}", e);
                    Some((Err(io::Error::other(e)), None))
                }
                Ok(None) => None,
                Err(_) => {
                    warn!(timeout_secs = timeout.as_secs(), "TTS upstream body stalled");
                    Some((
                        Err(io::Error::new(
                            io::ErrorKind::TimedOut,
                            "TTS upstream body timed out",
                        )),
                        None,
                    ))
                }
            }
        },
    ))
}
