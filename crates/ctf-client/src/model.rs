//! Tipos de dados trocados com o backend de instâncias.

use serde::{Deserialize, Serialize};

/// Protocolo de transporte exposto por uma task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Tcp,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Http => write!(f, "http"),
            Protocol::Tcp => write!(f, "tcp"),
        }
    }
}

/// Entrada do catálogo de tasks, definida pelo backend e identificada pelo nome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub protocol: Protocol,
    pub container_port: u16,
}

/// Estado de uma instância, como reportado pelo servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceStatus {
    Running,
    Stopped,
    Expired,
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceStatus::Running => write!(f, "running"),
            InstanceStatus::Stopped => write!(f, "stopped"),
            InstanceStatus::Expired => write!(f, "expired"),
        }
    }
}

/// Snapshot somente leitura de uma instância implantada.
///
/// `expires_in_secs` é um valor pontual do servidor; qualquer contagem local
/// derivada dele é apenas projeção para exibição.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: i64,
    pub task_name: String,
    pub expires_in_secs: u64,
    #[serde(default)]
    pub container_id: String,
    #[serde(default)]
    pub endpoint: String,
    pub status: InstanceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployResponse {
    pub instance: Instance,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub username: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeployRequest<'a> {
    pub captcha_token: &'a str,
    pub task: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ActionRequest {
    pub instance_id: i64,
}

/// Nome legível de uma task ou instância (`baby_pwn` -> `baby pwn`)
pub fn display_name(name: &str) -> String {
    name.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_task_catalog() {
        let json = r#"[{"name":"baby_pwn","protocol":"tcp","container_port":1337}]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].protocol, Protocol::Tcp);
        assert_eq!(tasks[0].container_port, 1337);
    }

    #[test]
    fn test_decode_instance_without_endpoint() {
        // A rota de listagem do backend não envia container_id nem endpoint
        let json = r#"{"id":3,"task_name":"web_1","expires_in_secs":900,"status":"Running"}"#;
        let inst: Instance = serde_json::from_str(json).unwrap();

        assert_eq!(inst.status, InstanceStatus::Running);
        assert!(inst.endpoint.is_empty());
        assert!(inst.container_id.is_empty());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let json = r#"{"id":3,"task_name":"x","expires_in_secs":1,"status":"running"}"#;
        assert!(serde_json::from_str::<Instance>(json).is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("baby_pwn"), "baby pwn");
        assert_eq!(display_name("web"), "web");
    }
}
