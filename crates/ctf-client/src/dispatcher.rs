//! Encaminha ações do usuário ao backend e ressincroniza a lista.
//!
//! Regra: muta no servidor, depois busca a lista inteira de novo. Nada é
//! alterado localmente antes da resposta. Requisições duplicadas (ex.: dois
//! `stop` seguidos) não são deduplicadas aqui.

use crate::api::ApiClient;
use crate::board::InstanceBoard;
use crate::error::Result;
use crate::model::Instance;
use crate::session::SessionStore;
use std::str::FromStr;
use std::sync::Arc;

/// Ações de ciclo de vida sobre uma instância existente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Stop,
    Restart,
    Extend,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Stop, Action::Restart, Action::Extend];

    pub fn path(self) -> &'static str {
        match self {
            Action::Stop => "/stop",
            Action::Restart => "/restart",
            Action::Extend => "/extend",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Stop => write!(f, "stop"),
            Action::Restart => write!(f, "restart"),
            Action::Extend => write!(f, "extend"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "stop" => Ok(Action::Stop),
            "restart" => Ok(Action::Restart),
            "extend" => Ok(Action::Extend),
            other => Err(format!("ação desconhecida: '{other}'")),
        }
    }
}

pub struct Dispatcher {
    api: ApiClient,
    session: Arc<SessionStore>,
    captcha_token: String,
}

impl Dispatcher {
    pub fn new(api: ApiClient, session: Arc<SessionStore>, captcha_token: impl Into<String>) -> Self {
        Self {
            api,
            session,
            captcha_token: captcha_token.into(),
        }
    }

    /// Busca `/instances` e substitui a lista local
    pub async fn refresh(&self, board: &mut InstanceBoard) -> Result<()> {
        let token = self.session.require_token()?;
        let instances = self.api.list_instances(&token).await?;
        tracing::debug!(count = instances.len(), "lista de instâncias atualizada");
        board.sync(instances);
        Ok(())
    }

    /// Envia a ação e, depois de concluída, ressincroniza a lista
    pub async fn perform_action(
        &self,
        board: &mut InstanceBoard,
        action: Action,
        instance_id: i64,
    ) -> Result<()> {
        let token = self.session.require_token()?;
        self.api.post_action(&token, action, instance_id).await?;
        tracing::info!(%action, instance_id, "ação concluída");
        self.refresh(board).await
    }

    /// Implanta a task e semeia uma nova view com o registro devolvido.
    ///
    /// A instância já existe no servidor quando a lista é recarregada, então
    /// uma falha nesse refresh é só registrada.
    pub async fn deploy(&self, board: &mut InstanceBoard, task_name: &str) -> Result<Instance> {
        let token = self.session.require_token()?;
        let instance = self
            .api
            .deploy(&token, &self.captcha_token, task_name)
            .await?;
        tracing::info!(task = %task_name, id = instance.id, "instância implantada");

        board.upsert(instance.clone());
        if let Err(e) = self.refresh(board).await {
            tracing::warn!(error = %e, "falha ao recarregar instâncias após deploy");
        }
        Ok(instance)
    }
}
