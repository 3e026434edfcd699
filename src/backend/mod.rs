pub mod mock;
pub mod ollama;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Language;

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    fn name(&self) -> &str;
    /// Probes the status endpoint. Never fails; any problem reads as `false`.
    async fn check_availability(&self) -> bool;
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("backend endpoint not found: {0}")]
    NotFound(String),
    #[error("backend http error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("backend timeout: {0}")]
    Timeout(String),
    #[error("backend error: {0}")]
    Other(String),
}

impl BackendError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "unreachable",
            Self::NotFound(_) => "not_found",
            Self::Http { .. } => "http",
            Self::Timeout(_) => "timeout",
            Self::Other(_) => "other",
        }
    }

    /// Operator-facing text shown in place of a model reply.
    pub fn advisory(&self, language: Language) -> String {
        match (language, self) {
            (Language::Korean, Self::Unreachable(_)) => {
                "Ollama 서비스가 실행되지 않았습니다. 'ollama serve' 명령어로 시작해주세요."
                    .to_owned()
            }
            (Language::Korean, Self::NotFound(detail)) => format!(
                "Ollama API 엔드포인트를 찾을 수 없습니다. Ollama가 올바르게 설치되었는지 확인해주세요. ({detail})"
            ),
            (Language::Korean, Self::Http { status, message }) => {
                format!("Ollama HTTP 오류: {status} {message}")
            }
            (Language::Korean, Self::Timeout(_)) => {
                "Ollama 응답 시간 초과. 다시 시도해주세요.".to_owned()
            }
            (Language::Korean, Self::Other(detail)) => format!("Ollama 오류: {detail}"),
            (Language::English, Self::Unreachable(_)) => {
                "The Ollama service is not running. Start it with 'ollama serve'.".to_owned()
            }
            (Language::English, Self::NotFound(detail)) => format!(
                "The Ollama API endpoint was not found. Check that Ollama is installed correctly. ({detail})"
            ),
            (Language::English, Self::Http { status, message }) => {
                format!("Ollama HTTP error: {status} {message}")
            }
            (Language::English, Self::Timeout(_)) => {
                "Ollama response timed out. Please try again.".to_owned()
            }
            (Language::English, Self::Other(detail)) => format!("Ollama error: {detail}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn korean_advisories_keep_operator_wording() {
        let unreachable = BackendError::Unreachable("refused".to_owned());
        assert!(unreachable
            .advisory(Language::Korean)
            .contains("실행되지 않았습니다"));

        let other = BackendError::Other("boom".to_owned());
        assert_eq!(other.advisory(Language::Korean), "Ollama 오류: boom");
    }

    #[test]
    fn not_found_advisory_embeds_detail() {
        let error = BackendError::NotFound("404 /api/generate".to_owned());
        let text = error.advisory(Language::English);
        assert!(text.contains("not found"));
        assert!(text.ends_with("(404 /api/generate)"));
        assert_eq!(error.kind(), "not_found");
    }
}
