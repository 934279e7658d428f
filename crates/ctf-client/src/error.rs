use reqwest::StatusCode;
use thiserror::Error;

/// Erros do cliente do dashboard
#[derive(Debug, Error)]
pub enum ClientError {
    /// O backend recusou a troca de usuário por token
    #[error("Falha no login ({status})")]
    Auth { status: StatusCode },

    /// Qualquer outra resposta fora da faixa 2xx
    #[error("{status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Erro de rede: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Resposta inválida do servidor: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Falha ao acessar o armazenamento da sessão: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Configuração inválida: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Nenhuma sessão ativa; faça login primeiro")]
    NotAuthenticated,

    #[error("Sessão ainda não carregada do armazenamento")]
    SessionUninitialized,
}

impl ClientError {
    pub(crate) fn from_status(status: StatusCode) -> Self {
        ClientError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message() {
        let err = ClientError::from_status(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "404 Not Found");
    }
}
