#[derive(Debug, thiserror::Error)]
pub enum NacosError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid number '{value}' for {field}")]
    InvalidNumber { field: String, value: String },

    #[error("Register agent '{agent_name}' to Nacos failed ({code}): {message}")]
    Registration { agent_name: String, code: i32, message: String },

    #[error("Nacos error ({code}): {message}")]
    Remote { code: i32, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl NacosError {
    /// Nacos `INVALID_PARAM` error code.
    pub const INVALID_PARAM: i32 = 400;
    /// Nacos `SERVER_ERROR` error code, used when a failure carries no code of its own.
    pub const SERVER_ERROR: i32 = 500;

    pub fn remote(code: i32, message: impl Into<String>) -> Self {
        Self::Remote { code, message: message.into() }
    }

    /// Error code reported by the registry, or a local code for client-side failures.
    pub fn code(&self) -> i32 {
        match self {
            Self::Remote { code, .. } | Self::Registration { code, .. } => *code,
            Self::Validation(_) | Self::InvalidUrl { .. } | Self::InvalidNumber { .. } => {
                Self::INVALID_PARAM
            }
            _ => Self::SERVER_ERROR,
        }
    }

    /// Message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Remote { message, .. } | Self::Registration { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Wrap any failure of a registry call for `agent_name` into the uniform registration shape.
    pub fn into_registration(self, agent_name: &str) -> Self {
        match self {
            already @ Self::Registration { .. } => already,
            other => Self::Registration {
                agent_name: agent_name.to_string(),
                code: other.code(),
                message: other.message(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, NacosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NacosError::Validation("A2a Endpoint `Address` can not be empty.".to_string());
        assert_eq!(err.to_string(), "Validation error: A2a Endpoint `Address` can not be empty.");
    }

    #[test]
    fn test_remote_into_registration_keeps_code_and_message() {
        let err = NacosError::remote(403, "permission denied").into_registration("weather");
        match err {
            NacosError::Registration { agent_name, code, message } => {
                assert_eq!(agent_name, "weather");
                assert_eq!(code, 403);
                assert_eq!(message, "permission denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_registration_is_not_wrapped_twice() {
        let err = NacosError::Registration {
            agent_name: "a".to_string(),
            code: 1,
            message: "m".to_string(),
        }
        .into_registration("b");
        assert!(matches!(
            err,
            NacosError::Registration { ref agent_name, .. } if agent_name == "a"
        ));
    }

    #[test]
    fn test_local_errors_map_to_invalid_param() {
        let err = NacosError::InvalidNumber { field: "PORT".to_string(), value: "abc".to_string() };
        assert_eq!(err.code(), NacosError::INVALID_PARAM);
        assert_eq!(NacosError::Config("x".to_string()).code(), NacosError::SERVER_ERROR);
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: NacosError = serde_err.into();
        assert!(matches!(err, NacosError::Serde(_)));
    }
}
