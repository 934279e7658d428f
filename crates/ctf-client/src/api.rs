//! Cliente HTTP do backend de instâncias.
//!
//! Uma única tentativa por chamada: sem retry, sem timeout, sem backoff.

use crate::dispatcher::Action;
use crate::error::{ClientError, Result};
use crate::model::{
    ActionRequest, DeployRequest, DeployResponse, Instance, Task, TokenRequest, TokenResponse,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Requisição autenticada: bearer token + corpo JSON
    fn authorized(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Envia a requisição e decodifica o corpo de uma resposta 2xx
    pub async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = ensure_success(request.send().await?)?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// `POST /token`: troca um nome de usuário por um bearer token
    pub async fn issue_token(&self, username: &str) -> Result<String> {
        tracing::debug!(%username, "solicitando token");
        let response = self
            .http
            .post(self.url("/token"))
            .json(&TokenRequest { username })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Auth { status });
        }

        let body = response.bytes().await?;
        let reply: TokenResponse = serde_json::from_slice(&body)?;
        Ok(reply.token)
    }

    /// `GET /tasks`: catálogo completo, sem autenticação
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        Self::fetch_json(self.http.get(self.url("/tasks"))).await
    }

    /// `GET /instances`: instâncias do usuário da sessão
    pub async fn list_instances(&self, token: &str) -> Result<Vec<Instance>> {
        Self::fetch_json(self.authorized(Method::GET, "/instances", token)).await
    }

    /// `POST /deploy`: cria uma instância da task e devolve o registro criado
    pub async fn deploy(&self, token: &str, captcha_token: &str, task: &str) -> Result<Instance> {
        tracing::debug!(%task, "implantando instância");
        let request = self
            .authorized(Method::POST, "/deploy", token)
            .json(&DeployRequest {
                captcha_token,
                task,
            });
        let reply: DeployResponse = Self::fetch_json(request).await?;
        Ok(reply.instance)
    }

    /// `POST /stop`, `/restart` ou `/extend`. Qualquer 2xx é sucesso; o corpo é ignorado.
    pub async fn post_action(&self, token: &str, action: Action, instance_id: i64) -> Result<()> {
        tracing::debug!(%action, instance_id, "enviando ação");
        let response = self
            .authorized(Method::POST, action.path(), token)
            .json(&ActionRequest { instance_id })
            .send()
            .await?;
        ensure_success(response)?;
        Ok(())
    }
}

fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::from_status(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let api = ApiClient::new("http://ctf.local:8080/");
        assert_eq!(api.base_url(), "http://ctf.local:8080");
        assert_eq!(api.url("/tasks"), "http://ctf.local:8080/tasks");
        assert_eq!(api.url("instances"), "http://ctf.local:8080/instances");
    }

    #[test]
    fn test_authorized_headers() {
        let api = ApiClient::new("http://ctf.local");
        let request = api
            .authorized(Method::GET, "/instances", "abc123")
            .build()
            .unwrap();

        let headers = request.headers();
        assert_eq!(headers["authorization"], "Bearer abc123");
        assert_eq!(headers["content-type"], "application/json");
    }
}
