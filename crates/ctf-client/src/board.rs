//! Lista de instâncias exibida, cada uma com sua contagem regressiva.

use crate::countdown::{Countdown, CountdownState};
use crate::model::{display_name, Instance, InstanceStatus};

/// Uma instância conhecida pela tela + seu timer local
#[derive(Debug)]
pub struct InstanceView {
    instance: Instance,
    countdown: Countdown,
}

impl InstanceView {
    /// Semeia a contagem com o TTL do servidor. Requer runtime tokio.
    pub fn new(instance: Instance) -> Self {
        let countdown = Countdown::start(instance.expires_in_secs);
        Self {
            instance,
            countdown,
        }
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn id(&self) -> i64 {
        self.instance.id
    }

    pub fn secs_left(&self) -> u64 {
        self.countdown.secs_left()
    }

    pub fn countdown(&self) -> CountdownState {
        self.countdown.state()
    }

    pub fn is_ticking(&self) -> bool {
        self.countdown.is_ticking()
    }

    pub fn card(&self) -> InstanceCard {
        let state = self.countdown.state();
        InstanceCard {
            id: self.instance.id,
            title: display_name(&self.instance.task_name),
            endpoint: self.instance.endpoint.clone(),
            status: self.instance.status,
            remaining: state.label(),
            percent: state.percent(),
        }
    }
}

/// Dados de exibição de uma instância
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceCard {
    pub id: i64,
    pub title: String,
    pub endpoint: String,
    pub status: InstanceStatus,
    pub remaining: String,
    pub percent: u8,
}

/// Snapshot local da lista do servidor.
///
/// Nunca é alterado de forma otimista: só `sync` (lista completa) e `upsert`
/// (registro devolvido pelo servidor) mudam o conteúdo.
#[derive(Debug, Default)]
pub struct InstanceBoard {
    views: Vec<InstanceView>,
}

impl InstanceBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitui tudo pela lista do servidor, re-semeando todas as contagens.
    /// As views antigas são descartadas e com elas seus timers.
    ///
    /// A listagem do backend pode omitir `endpoint` e `container_id`; nesse caso
    /// o valor já conhecido para o mesmo id é mantido. O TTL vem sempre do servidor.
    pub fn sync(&mut self, instances: Vec<Instance>) {
        let previous = std::mem::take(&mut self.views);
        self.views = instances
            .into_iter()
            .map(|mut instance| {
                if let Some(known) = previous.iter().find(|v| v.id() == instance.id) {
                    if instance.endpoint.is_empty() {
                        instance.endpoint = known.instance.endpoint.clone();
                    }
                    if instance.container_id.is_empty() {
                        instance.container_id = known.instance.container_id.clone();
                    }
                }
                InstanceView::new(instance)
            })
            .collect();
    }

    /// Registra (ou substitui) uma instância recém-devolvida pelo servidor
    pub fn upsert(&mut self, instance: Instance) {
        let view = InstanceView::new(instance);
        match self.views.iter_mut().find(|v| v.id() == view.id()) {
            Some(existing) => *existing = view,
            None => self.views.push(view),
        }
    }

    pub fn get(&self, id: i64) -> Option<&InstanceView> {
        self.views.iter().find(|v| v.id() == id)
    }

    pub fn views(&self) -> &[InstanceView] {
        &self.views
    }

    pub fn cards(&self) -> Vec<InstanceCard> {
        self.views.iter().map(InstanceView::card).collect()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn clear(&mut self) {
        self.views.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time;

    fn instance(id: i64, ttl: u64) -> Instance {
        Instance {
            id,
            task_name: "baby_pwn".into(),
            expires_in_secs: ttl,
            container_id: format!("c{id}"),
            endpoint: format!("nc ctf.local 3{id:04}"),
            status: InstanceStatus::Running,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_reseeds_from_server() {
        let mut board = InstanceBoard::new();
        board.sync(vec![instance(7, 100), instance(8, 50)]);

        time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(board.get(7).unwrap().secs_left(), 90);

        // Servidor estendeu a 7 para 1900s: valor local antigo é descartado
        board.sync(vec![instance(7, 1900), instance(8, 40)]);
        assert_eq!(board.get(7).unwrap().secs_left(), 1900);
        assert_eq!(board.get(8).unwrap().secs_left(), 40);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_drops_removed_instances() {
        let mut board = InstanceBoard::new();
        board.sync(vec![instance(1, 10), instance(2, 10)]);
        board.sync(vec![instance(2, 10)]);

        assert_eq!(board.len(), 1);
        assert!(board.get(1).is_none());
        assert!(board.get(2).unwrap().is_ticking());

        board.sync(Vec::new());
        assert!(board.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_keeps_known_endpoint() {
        let mut board = InstanceBoard::new();
        board.upsert(instance(5, 1800));

        let mut listed = instance(5, 1700);
        listed.endpoint = String::new();
        listed.container_id = String::new();
        board.sync(vec![listed, Instance { endpoint: String::new(), ..instance(6, 10) }]);

        let view = board.get(5).unwrap();
        assert_eq!(view.instance().endpoint, "nc ctf.local 30005");
        assert_eq!(view.instance().container_id, "c5");
        assert_eq!(view.secs_left(), 1700);
        // Id novo sem endpoint continua vazio
        assert!(board.get(6).unwrap().instance().endpoint.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_view_does_not_tick() {
        let mut board = InstanceBoard::new();
        board.sync(vec![instance(9, 0)]);
        assert!(!board.get(9).unwrap().is_ticking());
        assert_eq!(board.cards()[0].percent, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upsert_replaces_existing() {
        let mut board = InstanceBoard::new();
        board.upsert(instance(3, 30));
        board.upsert(instance(3, 60));

        assert_eq!(board.len(), 1);
        assert_eq!(board.get(3).unwrap().countdown().total, 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_card() {
        let mut board = InstanceBoard::new();
        board.sync(vec![instance(4, 120)]);
        time::sleep(Duration::from_millis(30_500)).await;

        let card = &board.cards()[0];
        assert_eq!(card.title, "baby pwn");
        assert_eq!(card.remaining, "1m 30s");
        assert_eq!(card.percent, 75);
        assert_eq!(card.status, InstanceStatus::Running);
    }
}
