use thiserror::Error;

pub const CONNECTIVITY_MESSAGE: &str = "Erro de conexão. Verifique sua internet e tente novamente.";
pub const DEFAULT_SERVICE_MESSAGE: &str = "Erro ao processar pagamento. Tente novamente.";
pub const MISSING_QR_MESSAGE: &str = "QR Code não foi gerado corretamente. Tente novamente.";

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("network error: {0}")]
    Network(String),
    #[error("service error: {0}")]
    Service(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl CheckoutError {
    /// Text suitable for the buyer-facing error step.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::Validation(reasons) => reasons.join("\n"),
            CheckoutError::Network(_) => CONNECTIVITY_MESSAGE.to_string(),
            CheckoutError::Service(message) if message.trim().is_empty() => {
                DEFAULT_SERVICE_MESSAGE.to_string()
            }
            CheckoutError::Service(message) => message.clone(),
            CheckoutError::Config(message) => message.clone(),
        }
    }
}

impl From<reqwest::Error> for CheckoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CheckoutError::Service(DEFAULT_SERVICE_MESSAGE.to_string())
        } else {
            CheckoutError::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
