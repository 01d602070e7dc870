//! Error types and handling for the weather service

use thiserror::Error;

/// Main error type for the weather service
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Missing or placeholder API key
    #[error("Configuration error: KOREA_WEATHER_API_KEY is not set")]
    MissingApiKey,

    /// Invalid settings such as an unparseable base URL
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Timeout or connection failure talking to the provider
    #[error("Network error: {message}")]
    Network { message: String },

    /// Provider answered with a non-2xx HTTP status
    #[error("Upstream returned HTTP status {status}")]
    UpstreamStatus { status: u16 },

    /// Provider answered 2xx but reported a failure in the response header
    #[error("Upstream result {code}: {message}")]
    UpstreamResult { code: String, message: String },

    /// Body could not be decoded or lacks the expected item structure
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// A single observation value could not be converted
    #[error("Cannot convert {category} value '{value}'")]
    FieldConversion { category: String, value: String },

    /// JSON encoding errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl WeatherError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new per-field conversion error
    pub fn field_conversion<C: Into<String>, V: Into<String>>(category: C, value: V) -> Self {
        Self::FieldConversion {
            category: category.into(),
            value: value.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::MissingApiKey => {
                "서버에 API 키가 설정되지 않았습니다. 관리자에게 문의하세요.".to_string()
            }
            WeatherError::Config { message } => format!("서버 설정 오류: {message}"),
            WeatherError::Network { message } => format!("API 요청 실패: {message}"),
            WeatherError::UpstreamStatus { status } => {
                format!("API 서버 오류: 상태 코드 {status}")
            }
            WeatherError::UpstreamResult { code, message } => {
                format!("API 응답 오류: {code} {message}")
            }
            WeatherError::MalformedResponse { message } => {
                format!("API 응답 데이터 형식이 올바르지 않습니다: {message}")
            }
            WeatherError::FieldConversion { category, value } => {
                format!("{category} 값 '{value}'을(를) 해석할 수 없습니다.")
            }
            WeatherError::Json { source } => format!("JSON 처리 오류: {source}"),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return WeatherError::UpstreamStatus {
                status: status.as_u16(),
            };
        }
        if err.is_timeout() {
            return WeatherError::network(format!("request timed out: {err}"));
        }
        if err.is_decode() {
            return WeatherError::malformed(err.to_string());
        }
        WeatherError::network(err.to_string())
    }
}

impl From<quick_xml::DeError> for WeatherError {
    fn from(err: quick_xml::DeError) -> Self {
        WeatherError::malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = WeatherError::config("num_of_rows must be positive");
        assert!(matches!(config_err, WeatherError::Config { .. }));

        let network_err = WeatherError::network("connection refused");
        assert!(matches!(network_err, WeatherError::Network { .. }));

        let field_err = WeatherError::field_conversion("WSD", "abc");
        assert!(matches!(field_err, WeatherError::FieldConversion { .. }));
        assert_eq!(field_err.to_string(), "Cannot convert WSD value 'abc'");
    }

    #[test]
    fn test_user_messages() {
        assert!(WeatherError::MissingApiKey.user_message().contains("API 키"));

        let config_err = WeatherError::config("Invalid base URL 'not a url'");
        assert_eq!(
            config_err.user_message(),
            "서버 설정 오류: Invalid base URL 'not a url'"
        );
        assert!(!config_err.user_message().contains("API 키"));

        let status_err = WeatherError::UpstreamStatus { status: 503 };
        assert!(status_err.user_message().contains("503"));

        let network_err = WeatherError::network("timed out");
        assert!(network_err.user_message().contains("timed out"));

        let malformed = WeatherError::malformed("no items");
        assert!(malformed.user_message().contains("형식"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: WeatherError = json_err.into();
        assert!(matches!(err, WeatherError::Json { .. }));
        assert!(err.user_message().starts_with("JSON 처리 오류"));
    }
}
