use thiserror::Error;

/// Why a credential was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthFailure),

    /// `status` is the upstream HTTP status when one was received at all.
    #[error("Upstream TTS error: {message}")]
    Upstream { status: Option<u16>, message: String },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl GatewayError {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for GatewayError {
    fn from(e: sea_orm::DbErr) -> Self {
        GatewayError::Storage(e.to_string())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_converts_into_gateway_error() {
        let err: GatewayError = AuthFailure::MissingCredentials.into();
        assert!(matches!(
            err,
            GatewayError::Auth(AuthFailure::MissingCredentials)
        ));
        assert_eq!(err.to_string(), "Authentication failed: Missing credentials");
    }

    #[test]
    fn database_errors_become_storage_errors() {
        let err: GatewayError = sea_orm::DbErr::Custom("locked".into()).into();
        assert!(matches!(err, GatewayError::Storage(ref m) if m.contains("locked")));
    }
}
