//! Application configuration
//!
//! Built once at startup: optional TOML file, then environment overrides,
//! then [`AppConfig::validate`]. The resulting value is immutable and handed
//! to each component by reference or inside an `Arc`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::{GatewayError, GatewayResult};

/// Default location of the optional config file.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("odia-tts-gateway")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub upstream: UpstreamConfig,
    pub speak: SpeakConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds allowed for graceful shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SeaORM connection URL, or `memory://` for the in-process store
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./odia_gateway.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HMAC key used when hashing API keys
    pub secret_key: String,
    /// Server-side pepper appended to the plaintext before hashing
    pub key_pepper: String,
    /// Admin bearer secret; empty disables admin operations
    pub admin_bearer: String,
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(s: &str) -> &'static str {
            if s.is_empty() {
                "<unset>"
            } else {
                "<redacted>"
            }
        }
        f.debug_struct("SecurityConfig")
            .field("secret_key", &redact(&self.secret_key))
            .field("key_pepper", &redact(&self.key_pepper))
            .field("admin_bearer", &redact(&self.admin_bearer))
            .finish()
    }
}

/// HTTP method used for the upstream TTS call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpstreamMethod {
    #[default]
    Get,
    Post,
}

impl UpstreamMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl FromStr for UpstreamMethod {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            other => Err(GatewayError::Config(format!(
                "ODIA_TTS_METHOD must be GET or POST, got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub url: String,
    pub method: UpstreamMethod,
    pub text_param: String,
    pub voice_param: String,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: UpstreamMethod::Get,
            text_param: "text".to_string(),
            voice_param: "voice".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakConfig {
    pub require_key: bool,
    pub dev_fallback_audio: bool,
    pub max_text_length: usize,
}

impl Default for SpeakConfig {
    fn default() -> Self {
        Self {
            require_key: true,
            dev_fallback_audio: false,
            max_text_length: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// `*` allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl AppConfig {
    /// Read the TOML file (if present), overlay the process environment and
    /// validate the result.
    pub fn load(path: Option<&Path>) -> GatewayResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> GatewayResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&raw)
            .map_err(|e| GatewayError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    /// Overlay values from `lookup`, which maps a variable name to its value.
    pub fn apply_env<F>(&mut self, lookup: F) -> GatewayResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SECRET_KEY") {
            self.security.secret_key = v;
        }
        if let Some(v) = lookup("KEY_PEPPER") {
            self.security.key_pepper = v;
        }
        if let Some(v) = lookup("ADMIN_BEARER") {
            self.security.admin_bearer = v;
        }
        if let Some(v) = lookup("ALLOWED_ORIGINS") {
            self.cors.allowed_origins = v
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("ODIA_TTS_URL") {
            self.upstream.url = v.trim().to_string();
        }
        if let Some(v) = lookup("ODIA_TTS_METHOD") {
            self.upstream.method = v.parse()?;
        }
        if let Some(v) = lookup("ODIA_TTS_TEXT_PARAM") {
            self.upstream.text_param = v;
        }
        if let Some(v) = lookup("ODIA_TTS_VOICE_PARAM") {
            self.upstream.voice_param = v;
        }
        if let Some(v) = lookup("ODIA_TTS_TIMEOUT_SECS") {
            self.upstream.timeout_secs = parse_number("ODIA_TTS_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("REQUIRE_KEY_FOR_SPEAK") {
            self.speak.require_key = parse_bool("REQUIRE_KEY_FOR_SPEAK", &v)?;
        }
        if let Some(v) = lookup("DEV_FALLBACK_AUDIO") {
            self.speak.dev_fallback_audio = parse_bool("DEV_FALLBACK_AUDIO", &v)?;
        }
        if let Some(v) = lookup("MAX_TEXT_LENGTH") {
            self.speak.max_text_length = parse_number("MAX_TEXT_LENGTH", &v)?;
        }
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse_number("PORT", &v)?;
        }
        if let Some(v) = lookup("SHUTDOWN_TIMEOUT_SECS") {
            self.server.shutdown_timeout = parse_number("SHUTDOWN_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("LOG_FORMAT") {
            self.logging.format = v;
        }
        Ok(())
    }

    /// Apply command-line overrides and re-validate the result.
    pub fn apply_overrides(
        &mut self,
        port: Option<u16>,
        log_level: Option<&str>,
    ) -> GatewayResult<()> {
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(level) = log_level {
            self.logging.level = level.to_string();
        }
        self.validate()
    }

    /// Reject configurations the gateway cannot run with.
    pub fn validate(&self) -> GatewayResult<()> {
        if self.security.secret_key.is_empty() {
            return Err(GatewayError::Config("SECRET_KEY is not set".to_string()));
        }
        if self.security.key_pepper.is_empty() {
            return Err(GatewayError::Config("KEY_PEPPER is not set".to_string()));
        }
        if self.upstream.text_param.trim().is_empty() {
            return Err(GatewayError::Config(
                "ODIA_TTS_TEXT_PARAM must not be empty".to_string(),
            ));
        }
        if self.upstream.voice_param.trim().is_empty() {
            return Err(GatewayError::Config(
                "ODIA_TTS_VOICE_PARAM must not be empty".to_string(),
            ));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(GatewayError::Config(
                "ODIA_TTS_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        if self.speak.max_text_length == 0 {
            return Err(GatewayError::Config(
                "MAX_TEXT_LENGTH must be greater than zero".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(GatewayError::Config("LOG_LEVEL must not be empty".to_string()));
        }
        if let Err(e) = tracing_subscriber::EnvFilter::try_new(&self.logging.level) {
            return Err(GatewayError::Config(format!(
                "LOG_LEVEL '{}' is invalid: {}",
                self.logging.level, e
            )));
        }
        Ok(())
    }

    pub fn admin_enabled(&self) -> bool {
        !self.security.admin_bearer.is_empty()
    }
}

fn parse_bool(name: &str, value: &str) -> GatewayResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(GatewayError::Config(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> GatewayResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| GatewayError::Config(format!("{} must be a number, got '{}'", name, value)))
}
