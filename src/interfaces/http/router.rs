//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::middleware::{admin_middleware, api_key_middleware, AuthState, API_KEY_HEADER};
use super::modules::{
    api_keys, health, metrics as metrics_module, request_id, speak, tester,
};
use crate::application::{AdminGate, KeyManager, SpeakForwarder};
use crate::config::{AppConfig, CorsConfig};

/// Shared state for every route. Handlers extract their own slice via `FromRef`.
#[derive(Clone)]
pub struct GatewayState {
    pub keys: Arc<KeyManager>,
    pub admin: AdminGate,
    pub forwarder: Arc<SpeakForwarder>,
    pub require_key: bool,
    pub max_text_length: usize,
    pub upstream_configured: bool,
    pub started_at: Arc<Instant>,
    pub prometheus: PrometheusHandle,
}

impl GatewayState {
    pub fn new(
        config: &AppConfig,
        keys: Arc<KeyManager>,
        forwarder: Arc<SpeakForwarder>,
        prometheus: PrometheusHandle,
    ) -> Self {
        Self {
            keys,
            admin: AdminGate::new(&config.security),
            forwarder,
            require_key: config.speak.require_key,
            max_text_length: config.speak.max_text_length,
            upstream_configured: !config.upstream.url.is_empty(),
            started_at: Arc::new(Instant::now()),
            prometheus,
        }
    }
}

impl FromRef<GatewayState> for AuthState {
    fn from_ref(s: &GatewayState) -> Self {
        AuthState {
            keys: Arc::clone(&s.keys),
            admin: s.admin.clone(),
            require_key: s.require_key,
        }
    }
}

impl FromRef<GatewayState> for speak::SpeakState {
    fn from_ref(s: &GatewayState) -> Self {
        speak::SpeakState {
            forwarder: Arc::clone(&s.forwarder),
            keys: Arc::clone(&s.keys),
            max_text_length: s.max_text_length,
        }
    }
}

impl FromRef<GatewayState> for api_keys::ApiKeyHandlerState {
    fn from_ref(s: &GatewayState) -> Self {
        api_keys::ApiKeyHandlerState {
            keys: Arc::clone(&s.keys),
        }
    }
}

impl FromRef<GatewayState> for health::HealthState {
    fn from_ref(s: &GatewayState) -> Self {
        health::HealthState {
            keys: Arc::clone(&s.keys),
            started_at: Arc::clone(&s.started_at),
            upstream_configured: s.upstream_configured,
            fallback_enabled: s.forwarder.fallback_enabled(),
        }
    }
}

impl FromRef<GatewayState> for metrics_module::MetricsState {
    fn from_ref(s: &GatewayState) -> Self {
        metrics_module::MetricsState {
            handle: s.prometheus.clone(),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Admin bearer secret"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-api-key"))),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        speak::speak_get,
        speak::speak_post,
        api_keys::create_api_key,
        api_keys::list_api_keys,
        api_keys::disable_api_key,
        api_keys::enable_api_key,
        api_keys::usage_stats,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            speak::SpeakBody,
            api_keys::CreateApiKeyRequest,
            api_keys::ApiKeyDto,
            api_keys::CreatedApiKeyResponse,
            api_keys::UsageStatsDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and key store reachability"),
        (name = "Speak", description = "Text-to-speech forwarded to the configured upstream"),
        (name = "API Keys", description = "Admin-only API key management"),
    ),
    info(
        title = "Odia TTS Gateway API",
        version = "1.0.0",
        description = "API-key gateway in front of an Odia text-to-speech endpoint",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            HeaderName::from_static(API_KEY_HEADER),
        ])
        .expose_headers([
            HeaderName::from_static(request_id::REQUEST_ID_HEADER),
            HeaderName::from_static(speak::FALLBACK_HEADER),
        ]);

    if cors.allows_any() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Create the API router with all routes
pub fn create_api_router(state: GatewayState, config: &AppConfig) -> Router {
    let auth_state = AuthState::from_ref(&state);

    // Key-gated speak routes
    let speak_routes = Router::new()
        .route("/speak", get(speak::speak_get).post(speak::speak_post))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            api_key_middleware,
        ));

    // Admin routes
    let admin_routes = Router::new()
        .route("/create-api-key", post(api_keys::create_api_key))
        .route("/admin/api-keys", get(api_keys::list_api_keys))
        .route("/admin/api-keys/{id}/disable", post(api_keys::disable_api_key))
        .route("/admin/api-keys/{id}/enable", post(api_keys::enable_api_key))
        .route("/admin/stats", get(api_keys::usage_stats))
        .route_layer(middleware::from_fn_with_state(auth_state, admin_middleware));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/", get(tester::agent_page))
        .route("/public/agent.html", get(tester::agent_page))
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics_module::prometheus_metrics))
        .merge(speak_routes)
        .merge(admin_routes)
        .with_state(state)
        .layer(middleware::from_fn(metrics_module::http_metrics_middleware))
        .layer(cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    use super::*;
    use crate::application::speak::forwarder::test_upstream;
    use crate::config::UpstreamMethod;
    use crate::domain::ApiKeyRepository;
    use crate::infrastructure::storage::InMemoryApiKeyRepository;

    const ADMIN: &str = "admin-secret";

    struct Gateway {
        app: Router,
        repo: Arc<InMemoryApiKeyRepository>,
    }

    fn config(upstream_url: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.security.secret_key = "router-secret".into();
        config.security.key_pepper = "router-pepper".into();
        config.security.admin_bearer = ADMIN.into();
        config.upstream.url = upstream_url.to_string();
        config.upstream.timeout_secs = 2;
        config
    }

    fn gateway(config: AppConfig) -> Gateway {
        let repo = Arc::new(InMemoryApiKeyRepository::new());
        let keys = Arc::new(KeyManager::new(repo.clone(), &config.security));
        let forwarder = Arc::new(SpeakForwarder::new(&config.upstream, &config.speak).unwrap());
        let prometheus = PrometheusBuilder::new().build_recorder().handle();
        let state = GatewayState::new(&config, keys, forwarder, prometheus);
        Gateway {
            app: create_api_router(state, &config),
            repo,
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> Response {
        app.clone().oneshot(req).await.unwrap()
    }

    async fn json_body(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn raw_body(resp: Response) -> Vec<u8> {
        axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    fn create_key_request(bearer: Option<&str>, name: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/create-api-key")
            .header("content-type", "application/json");
        if let Some(bearer) = bearer {
            builder = builder.header("authorization", format!("Bearer {}", bearer));
        }
        builder
            .body(Body::from(serde_json::json!({ "name": name }).to_string()))
            .unwrap()
    }

    async fn create_key(app: &Router) -> serde_json::Value {
        let resp = send(app, create_key_request(Some(ADMIN), "agent")).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        json_body(resp).await
    }

    fn speak_request(uri: &str, key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(key) = key {
            builder = builder.header("x-api-key", key);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn admin_creates_key_and_it_unlocks_speak() {
        let (base, calls) = test_upstream::spawn().await;
        let gw = gateway(config(&format!("{}/tts", base)));

        let created = create_key(&gw.app).await;
        let api_key = created["api_key"].as_str().unwrap();
        assert!(api_key.starts_with("otts_"));
        assert_eq!(created["name"], "agent");

        let resp = send(&gw.app, speak_request("/speak?text=Hello", Some(api_key))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "audio/mpeg");
        assert!(resp.headers().contains_key("x-request-id"));
        assert!(!resp.headers().contains_key("x-tts-fallback"));
        let audio = raw_body(resp).await;
        assert!(audio.starts_with(b"ID3"));
        assert_eq!(calls.count(), 1);
    }

    #[tokio::test]
    async fn wrong_bearer_creates_nothing() {
        let gw = gateway(config(""));

        let resp = send(&gw.app, create_key_request(Some("guess"), "agent")).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = json_body(resp).await;
        assert_eq!(body["success"], false);

        let resp = send(&gw.app, create_key_request(None, "agent")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        assert!(gw.repo.is_empty());
    }

    #[tokio::test]
    async fn admin_is_disabled_without_a_bearer_secret() {
        let mut cfg = config("");
        cfg.security.admin_bearer.clear();
        let gw = gateway(cfg);

        let resp = send(&gw.app, create_key_request(Some(""), "agent")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let resp = send(&gw.app, create_key_request(Some("anything"), "agent")).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(gw.repo.is_empty());
    }

    #[tokio::test]
    async fn speak_without_key_is_401_and_never_reaches_upstream() {
        let (base, calls) = test_upstream::spawn().await;
        let gw = gateway(config(&format!("{}/tts", base)));

        let resp = send(&gw.app, speak_request("/speak?text=Hello", None)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(resp).await;
        assert_eq!(body["error"], "Missing credentials");
        assert_eq!(calls.count(), 0);
    }

    #[tokio::test]
    async fn speak_with_unknown_key_is_403() {
        let (base, calls) = test_upstream::spawn().await;
        let gw = gateway(config(&format!("{}/tts", base)));
        let bogus = format!("otts_{}", "0".repeat(64));

        let resp = send(&gw.app, speak_request("/speak?text=Hello", Some(&bogus))).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(calls.count(), 0);
    }

    #[tokio::test]
    async fn disabled_key_is_rejected_until_re_enabled() {
        let (base, _) = test_upstream::spawn().await;
        let gw = gateway(config(&format!("{}/tts", base)));
        let created = create_key(&gw.app).await;
        let id = created["id"].as_str().unwrap();
        let api_key = created["api_key"].as_str().unwrap();

        let toggle = |action: &str| {
            Request::builder()
                .method("POST")
                .uri(format!("/admin/api-keys/{}/{}", id, action))
                .header("authorization", format!("Bearer {}", ADMIN))
                .body(Body::empty())
                .unwrap()
        };

        let resp = send(&gw.app, toggle("disable")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["data"]["enabled"], false);
        let resp = send(&gw.app, speak_request("/speak?text=Hello", Some(api_key))).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = send(&gw.app, toggle("enable")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = send(&gw.app, speak_request("/speak?text=Hello", Some(api_key))).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn listing_keys_never_shows_secrets() {
        let gw = gateway(config(""));
        let created = create_key(&gw.app).await;

        let resp = send(
            &gw.app,
            Request::builder()
                .uri("/admin/api-keys")
                .header("authorization", format!("Bearer {}", ADMIN))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        let listed = &body["data"][0];
        assert_eq!(listed["id"], created["id"]);
        assert!(listed.get("key_hash").is_none());
        assert!(listed.get("api_key").is_none());
        let rendered = body.to_string();
        assert!(!rendered.contains(created["api_key"].as_str().unwrap()));
    }

    #[tokio::test]
    async fn unknown_key_id_is_404() {
        let gw = gateway(config(""));
        let resp = send(
            &gw.app,
            Request::builder()
                .method("POST")
                .uri("/admin/api-keys/missing/disable")
                .header("authorization", format!("Bearer {}", ADMIN))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_502() {
        let url = test_upstream::unreachable_url().await;
        let gw = gateway(config(&url));
        let created = create_key(&gw.app).await;

        let resp = send(
            &gw.app,
            speak_request("/speak?text=Hello", created["api_key"].as_str()),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(resp).await["success"], false);
    }

    #[tokio::test]
    async fn upstream_error_status_is_reported_not_its_body() {
        let (base, _) = test_upstream::spawn().await;
        let gw = gateway(config(&format!("{}/fail", base)));
        let created = create_key(&gw.app).await;

        let resp = send(
            &gw.app,
            speak_request("/speak?text=Hello", created["api_key"].as_str()),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(resp.headers()["x-upstream-status"], "500");
        let rendered = json_body(resp).await.to_string();
        assert!(!rendered.contains("internal.py"));
    }

    #[tokio::test]
    async fn unreachable_upstream_with_fallback_serves_placeholder() {
        let url = test_upstream::unreachable_url().await;
        let mut cfg = config(&url);
        cfg.speak.dev_fallback_audio = true;
        let gw = gateway(cfg);
        let created = create_key(&gw.app).await;

        let resp = send(
            &gw.app,
            speak_request("/speak?text=Hello", created["api_key"].as_str()),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "audio/wav");
        assert_eq!(resp.headers()["x-tts-fallback"], "1");
        let audio = raw_body(resp).await;
        assert_eq!(&audio[..4], b"RIFF");
    }

    #[tokio::test]
    async fn open_gate_forwards_without_a_key() {
        let (base, calls) = test_upstream::spawn().await;
        let mut cfg = config(&format!("{}/tts", base));
        cfg.speak.require_key = false;
        let gw = gateway(cfg);

        let resp = send(&gw.app, speak_request("/speak?text=Hello", None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(calls.count(), 1);
    }

    #[tokio::test]
    async fn post_speak_sends_json_upstream() {
        let (base, _) = test_upstream::spawn().await;
        let mut cfg = config(&format!("{}/tts", base));
        cfg.upstream.method = UpstreamMethod::Post;
        let gw = gateway(cfg);
        let created = create_key(&gw.app).await;

        let resp = send(
            &gw.app,
            Request::builder()
                .method("POST")
                .uri("/speak")
                .header("content-type", "application/json")
                .header("x-api-key", created["api_key"].as_str().unwrap())
                .body(Body::from(r#"{"text":"Hello","voice":"female"}"#))
                .unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let audio = raw_body(resp).await;
        let echoed: serde_json::Value = serde_json::from_slice(&audio[3..]).unwrap();
        assert_eq!(echoed["method"], "POST");
        assert_eq!(echoed["params"]["voice"], "female");
    }

    #[tokio::test]
    async fn blank_text_is_400() {
        let (base, calls) = test_upstream::spawn().await;
        let gw = gateway(config(&format!("{}/tts", base)));
        let created = create_key(&gw.app).await;

        let resp = send(
            &gw.app,
            speak_request("/speak?text=%20%20", created["api_key"].as_str()),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(calls.count(), 0);
    }

    #[tokio::test]
    async fn malformed_query_is_a_json_400() {
        let (base, calls) = test_upstream::spawn().await;
        let gw = gateway(config(&format!("{}/tts", base)));
        let created = create_key(&gw.app).await;

        let resp = send(
            &gw.app,
            speak_request("/speak?text=a&text=b", created["api_key"].as_str()),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("text"));
        assert_eq!(calls.count(), 0);
    }

    fn admin_get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {}", ADMIN))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn served_requests_are_counted_per_key() {
        let (base, _) = test_upstream::spawn().await;
        let gw = gateway(config(&format!("{}/tts", base)));
        let created = create_key(&gw.app).await;
        let api_key = created["api_key"].as_str();

        // "Hello" and "ନମସ୍କାର": 5 + 7 characters
        let odia = "/speak?text=%E0%AC%A8%E0%AC%AE%E0%AC%B8%E0%AD%8D%E0%AC%95%E0%AC%BE%E0%AC%B0";
        for uri in ["/speak?text=Hello", odia] {
            let resp = send(&gw.app, speak_request(uri, api_key)).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
        // rejected before forwarding; not counted
        let resp = send(&gw.app, speak_request("/speak?text=%20", api_key)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let listed = json_body(send(&gw.app, admin_get("/admin/api-keys")).await).await;
        assert_eq!(listed["data"][0]["usage_count"], 2);
        assert_eq!(listed["data"][0]["characters_used"], 12);

        let resp = send(&gw.app, admin_get("/admin/stats")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let stats = json_body(resp).await;
        assert_eq!(stats["data"]["total_keys"], 1);
        assert_eq!(stats["data"]["enabled_keys"], 1);
        assert_eq!(stats["data"]["total_requests"], 2);
        assert_eq!(stats["data"]["total_characters"], 12);
    }

    #[tokio::test]
    async fn fallback_audio_counts_as_usage() {
        let url = test_upstream::unreachable_url().await;
        let mut cfg = config(&url);
        cfg.speak.dev_fallback_audio = true;
        let gw = gateway(cfg);
        let created = create_key(&gw.app).await;

        let resp = send(
            &gw.app,
            speak_request("/speak?text=Hello", created["api_key"].as_str()),
        )
        .await;
        assert_eq!(resp.headers()["x-tts-fallback"], "1");

        let stored = gw
            .repo
            .find_by_id(created["id"].as_str().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!((stored.usage_count, stored.characters_used), (1, 5));
    }

    #[tokio::test]
    async fn stats_require_the_admin_bearer() {
        let gw = gateway(config(""));
        let resp = send(
            &gw.app,
            Request::builder().uri("/admin/stats").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn request_id_is_propagated() {
        let gw = gateway(config(""));
        let resp = send(
            &gw.app,
            Request::builder()
                .uri("/health")
                .header("x-request-id", "trace-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["x-request-id"], "trace-123");
        let body = json_body(resp).await;
        assert_eq!(body["key_store"]["status"], "ok");
        assert_eq!(body["upstream_configured"], false);
    }

    #[tokio::test]
    async fn tester_page_and_openapi_are_served() {
        let gw = gateway(config(""));
        for uri in ["/", "/public/agent.html"] {
            let resp = send(&gw.app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let page = String::from_utf8(raw_body(resp).await).unwrap();
            assert!(page.contains("/speak"));
        }

        let resp = send(
            &gw.app,
            Request::builder()
                .uri("/api-doc/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let doc = json_body(resp).await;
        assert!(doc["paths"].get("/speak").is_some());
        assert!(doc["paths"].get("/create-api-key").is_some());
    }

    #[tokio::test]
    async fn stored_record_matches_created_response() {
        let gw = gateway(config(""));
        let created = create_key(&gw.app).await;
        let stored = gw
            .repo
            .find_by_id(created["id"].as_str().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.prefix, created["prefix"]);
        assert!(stored.enabled);
    }
}
