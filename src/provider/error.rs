use thiserror::Error;

/// Failure taxonomy for provider calls. Only `Overloaded` is retried;
/// `Unreachable` is kept distinct so the image flow can tell "rate limited"
/// from "cannot reach the service".
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider overloaded (HTTP {status})")]
    Overloaded { status: u16 },

    #[error("provider unreachable: {0}")]
    Unreachable(String),

    #[error("provider error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("provider returned no usable content")]
    Empty,

    #[error("request failed: {0}")]
    Http(String),
}

impl ProviderError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Overloaded { .. })
    }

    /// Generic message surfaced to the user; details stay in the log
    pub fn user_message(&self) -> String {
        match self {
            ProviderError::Overloaded { .. } => {
                String::from("Муза отдыхает. Попробуй ещё раз чуть позже.")
            }
            ProviderError::Unreachable(_) => {
                String::from("Сервис недоступен. Проверь соединение.")
            }
            _ => String::from("Не удалось создать ответ. Попробуй ещё раз."),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ProviderError::Unreachable(e.to_string())
        } else {
            ProviderError::Http(e.to_string())
        }
    }
}
