use anyhow::{Context, Result};
use ctf_client::{
    task_cards, ApiClient, AuthState, ClientConfig, ClientError, Dispatcher, SessionStore, Task,
    TaskCard,
};
use std::sync::Arc;

/// Tudo que os comandos precisam, montado uma vez na inicialização
pub struct App {
    pub config: ClientConfig,
    pub api: ApiClient,
    pub session: Arc<SessionStore>,
    pub dispatcher: Dispatcher,
}

impl App {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = ApiClient::new(config.api_url.clone());
        let session = Arc::new(SessionStore::file_backed(config.token_path()));
        session
            .initialize()
            .with_context(|| format!("Falha ao ler token em {}", config.token_path().display()))?;

        let dispatcher = Dispatcher::new(api.clone(), session.clone(), config.captcha_token.clone());
        tracing::debug!(api = %api.base_url(), "cliente configurado");

        Ok(Self {
            config,
            api,
            session,
            dispatcher,
        })
    }

    /// Equivalente ao redirecionamento para a tela de login
    pub fn require_login(&self) -> Result<()> {
        match self.session.require_token() {
            Ok(_) => Ok(()),
            Err(ClientError::NotAuthenticated) => anyhow::bail!(
                "Nenhuma sessão ativa. Faça login com `ctf-dashboard login <usuario>`"
            ),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.session.auth_state(), AuthState::Authenticated(_))
    }

    /// Carga em segundo plano: falhas só vão para o log e a lista fica vazia
    pub async fn load_tasks(&self) -> Vec<Task> {
        match self.api.list_tasks().await {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "tasks carregadas");
                tasks
            }
            Err(e) => {
                tracing::error!(error = %e, "falha ao carregar tasks");
                Vec::new()
            }
        }
    }

    pub async fn load_catalog(&self) -> Vec<TaskCard> {
        task_cards(&self.load_tasks().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn offline_app(dir: &std::path::Path) -> App {
        let config = ClientConfig {
            // Porta 9 (discard): conexão recusada
            api_url: "http://127.0.0.1:9".into(),
            data_dir: Some(dir.to_path_buf()),
            ..ClientConfig::default()
        };
        App::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_empty() {
        let dir = tempdir().unwrap();
        let app = offline_app(dir.path());

        assert!(app.load_tasks().await.is_empty());
        assert!(app.load_catalog().await.is_empty());
    }

    #[test]
    fn test_require_login_without_token() {
        let dir = tempdir().unwrap();
        let app = offline_app(dir.path());

        assert!(!app.is_authenticated());
        let err = app.require_login().unwrap_err();
        assert!(err.to_string().contains("ctf-dashboard login"));
    }
}
