//! Sessão do usuário: bearer token em memória + persistência em disco.

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Onde o token sobrevive entre execuções
pub trait TokenStorage: Send + Sync {
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Guarda o token em um único arquivo (`ctf_token`)
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let token = text.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct InMemoryTokenStorage {
    inner: Mutex<Option<String>>,
}

impl InMemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            inner: Mutex::new(Some(token.to_string())),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStorage for InMemoryTokenStorage {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn write(&self, token: &str) -> Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

/// Estado de autenticação visto pelas telas.
///
/// `Unknown` enquanto o armazenamento não foi lido: não significa "deslogado".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unknown,
    Anonymous,
    Authenticated(String),
}

impl AuthState {
    pub fn is_known(&self) -> bool {
        !matches!(self, AuthState::Unknown)
    }
}

/// Handle da sessão, compartilhado explicitamente (`Arc<SessionStore>`)
pub struct SessionStore {
    storage: Box<dyn TokenStorage>,
    state: Mutex<AuthState>,
}

impl SessionStore {
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        Self {
            storage,
            state: Mutex::new(AuthState::Unknown),
        }
    }

    pub fn file_backed(path: PathBuf) -> Self {
        Self::new(Box::new(FileTokenStorage::new(path)))
    }

    fn state(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lê o token persistido uma única vez; chamadas seguintes não fazem nada
    pub fn initialize(&self) -> Result<()> {
        let mut state = self.state();
        if state.is_known() {
            return Ok(());
        }

        *state = match self.storage.read()? {
            Some(token) => AuthState::Authenticated(token),
            None => AuthState::Anonymous,
        };
        Ok(())
    }

    pub fn auth_state(&self) -> AuthState {
        self.state().clone()
    }

    pub fn token(&self) -> Option<String> {
        match &*self.state() {
            AuthState::Authenticated(token) => Some(token.clone()),
            _ => None,
        }
    }

    pub fn require_token(&self) -> Result<String> {
        match &*self.state() {
            AuthState::Authenticated(token) => Ok(token.clone()),
            AuthState::Anonymous => Err(ClientError::NotAuthenticated),
            AuthState::Unknown => Err(ClientError::SessionUninitialized),
        }
    }

    /// Troca o usuário por um token e o persiste.
    ///
    /// Se o backend recusar, o token anterior (em disco e em memória) fica intacto.
    pub async fn login(&self, api: &ApiClient, username: &str) -> Result<()> {
        let token = api.issue_token(username).await?;
        self.storage.write(&token)?;
        *self.state() = AuthState::Authenticated(token);
        tracing::info!(%username, "sessão iniciada");
        Ok(())
    }

    /// Sempre termina deslogado; falhas ao apagar o arquivo são apenas registradas
    pub fn logout(&self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "falha ao remover token persistido");
        }
        *self.state() = AuthState::Anonymous;
    }
}
