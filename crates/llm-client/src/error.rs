//! Model call errors and their user-facing rendering.

use thiserror::Error;

/// Failure of a model API call.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API 키가 설정되지 않았습니다.")]
    MissingApiKey,

    #[error("유효한 메시지가 없습니다.")]
    NoMessages,

    #[error("API error: 401 - API 키가 유효하지 않습니다.")]
    InvalidCredential,

    #[error("API error: 404 - 모델을 찾을 수 없습니다. 설정에서 모델 이름을 확인해주세요.")]
    ModelNotFound,

    #[error("API error: 429 - 요청 한도를 초과했습니다.")]
    RateLimited,

    #[error("API error: 400 - {0}")]
    BadRequest(String),

    #[error("API error: {status} - {reason}")]
    Http { status: u16, reason: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("응답을 받을 수 없었습니다.")]
    EmptyResponse,
}

impl LlmError {
    /// Classifies a non-2xx HTTP status.
    pub fn from_status(status: u16, reason: impl Into<String>) -> Self {
        match status {
            400 => LlmError::BadRequest(reason.into()),
            401 => LlmError::InvalidCredential,
            404 => LlmError::ModelNotFound,
            429 => LlmError::RateLimited,
            _ => LlmError::Http {
                status,
                reason: reason.into(),
            },
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::BadRequest(_) => Some(400),
            LlmError::InvalidCredential => Some(401),
            LlmError::ModelNotFound => Some(404),
            LlmError::RateLimited => Some(429),
            LlmError::Http { status, .. } => Some(*status),
            LlmError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Renders an error as the assistant-style message shown in the conversation.
pub fn format_error_message(error: &LlmError) -> String {
    let mut text = format!("오류가 발생했습니다: {}", error);

    match error.status() {
        Some(404) => {
            text.push_str("\n\n⚠️ 모델 이름이 잘못되었거나 해당 모델에 접근 권한이 없을 수 있습니다.");
            text.push_str("\n\n다음을 확인해주세요:");
            text.push_str("\n1. xAI API 대시보드에서 사용 가능한 모델 확인");
            text.push_str("\n2. 설정에서 다른 모델 선택 시도");
            text.push_str("\n3. API 키가 올바른지 확인");
            text.push_str("\n4. 계정에 충분한 크레딧이 있는지 확인");
        }
        Some(400) => {
            text.push_str("\n\n⚠️ 요청 형식이 잘못되었습니다.");
            text.push_str("\n\n다음을 확인해주세요:");
            text.push_str("\n1. 메시지 내용이 비어있지 않은지 확인");
            text.push_str("\n2. 모델 이름이 올바른지 확인");
            text.push_str("\n3. API 키가 올바른지 확인");
            text.push_str("\n4. 프롬프트가 너무 길지 않은지 확인");
        }
        Some(401) => text.push_str("\n\n⚠️ API 키가 유효하지 않습니다."),
        Some(429) => text.push_str("\n\n⚠️ 요청 한도를 초과했습니다. 잠시 후 다시 시도해주세요."),
        _ => {}
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        assert!(matches!(LlmError::from_status(401, "Unauthorized"), LlmError::InvalidCredential));
        assert!(matches!(LlmError::from_status(404, "Not Found"), LlmError::ModelNotFound));
        assert!(matches!(LlmError::from_status(429, "Too Many"), LlmError::RateLimited));
        assert!(matches!(LlmError::from_status(400, "Bad"), LlmError::BadRequest(_)));
        assert!(matches!(
            LlmError::from_status(503, "Service Unavailable"),
            LlmError::Http { status: 503, .. }
        ));
    }

    #[test]
    fn test_format_404_has_checklist() {
        let text = format_error_message(&LlmError::ModelNotFound);
        assert!(text.starts_with("오류가 발생했습니다: API error: 404"));
        assert!(text.contains("4. 계정에 충분한 크레딧이 있는지 확인"));
    }

    #[test]
    fn test_format_401_and_429() {
        let text = format_error_message(&LlmError::InvalidCredential);
        assert!(text.ends_with("⚠️ API 키가 유효하지 않습니다."));

        let text = format_error_message(&LlmError::RateLimited);
        assert!(text.contains("잠시 후 다시 시도해주세요."));
    }

    #[test]
    fn test_format_generic_has_no_guidance() {
        let err = LlmError::from_status(500, "Internal Server Error");
        assert_eq!(
            format_error_message(&err),
            "오류가 발생했습니다: API error: 500 - Internal Server Error"
        );
    }
}
