//! Configuração do cliente (arquivo TOML + variáveis de ambiente)

use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

/// Valor enviado no lugar do desafio anti-bot ao implantar uma instância
pub const DEFAULT_CAPTCHA_TOKEN: &str = "null";

/// Variável de ambiente que sobrescreve `api_url`
pub const API_URL_ENV: &str = "CTF_API_URL";

/// Nome do arquivo que guarda o token de sessão
pub const TOKEN_FILE_NAME: &str = "ctf_token";

const APP_DIR: &str = "ctf-dashboard";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// URL base do backend
    pub api_url: String,

    /// Diretório onde o token é persistido (padrão: diretório de dados do usuário)
    pub data_dir: Option<PathBuf>,

    pub captcha_token: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: None,
            captcha_token: DEFAULT_CAPTCHA_TOKEN.to_string(),
        }
    }
}

impl ClientConfig {
    /// Caminho padrão do arquivo de configuração
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Lê e parseia um arquivo de configuração
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&text)?;
        Ok(config)
    }

    /// Carrega o arquivo se existir; caso contrário usa os valores padrão.
    /// Em seguida aplica `CTF_API_URL`.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) if path.exists() => Self::load(path)?,
            _ => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_url = url;
            }
        }
        self
    }

    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
        }
    }

    pub fn token_path(&self) -> PathBuf {
        self.data_dir().join(TOKEN_FILE_NAME)
    }
}
