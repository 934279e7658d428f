//! Contagem regressiva local do TTL de uma instância.
//!
//! Puramente cosmética: ao chegar a zero o timer para e nada mais acontece.
//! O valor autoritativo é sempre o `expires_in_secs` do servidor.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

pub const TICK: Duration = Duration::from_secs(1);

/// Aritmética da contagem, sem timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    /// TTL informado pelo servidor no momento do seed
    pub total: u64,
    pub remaining: u64,
}

impl CountdownState {
    pub fn seeded(expires_in_secs: u64) -> Self {
        Self {
            total: expires_in_secs,
            remaining: expires_in_secs,
        }
    }

    /// Estado após `elapsed` segundos: `max(0, total - elapsed)`
    pub fn at(expires_in_secs: u64, elapsed: u64) -> Self {
        Self {
            total: expires_in_secs,
            remaining: expires_in_secs.saturating_sub(elapsed),
        }
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Fração restante em [0, 1]; 0 quando o total é 0
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.remaining as f64 / self.total as f64
    }

    pub fn percent(&self) -> u8 {
        (self.fraction() * 100.0).round() as u8
    }

    /// `"{m}m {s}s"`
    pub fn label(&self) -> String {
        format!("{}m {}s", self.remaining / 60, self.remaining % 60)
    }
}

/// Contagem viva: uma task tokio decrementa o valor a cada segundo.
///
/// O timer é abortado ao descartar o `Countdown` ou ao chamar `reseed`,
/// então nunca há dois timers para a mesma instância.
pub struct Countdown {
    total: u64,
    remaining: watch::Receiver<u64>,
    timer: Option<JoinHandle<()>>,
}

impl Countdown {
    /// Requer um runtime tokio ativo
    pub fn start(expires_in_secs: u64) -> Self {
        let (tx, rx) = watch::channel(expires_in_secs);
        let timer = (expires_in_secs > 0).then(|| tokio::spawn(run_timer(tx, TICK)));

        Self {
            total: expires_in_secs,
            remaining: rx,
            timer,
        }
    }

    pub fn secs_left(&self) -> u64 {
        *self.remaining.borrow()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn state(&self) -> CountdownState {
        CountdownState {
            total: self.total,
            remaining: self.secs_left(),
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Substitui o valor por um novo TTL do servidor, descartando o timer antigo
    pub fn reseed(&mut self, expires_in_secs: u64) {
        self.cancel();
        *self = Self::start(expires_in_secs);
    }

    fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Countdown")
            .field("total", &self.total)
            .field("remaining", &self.secs_left())
            .finish()
    }
}

async fn run_timer(tx: watch::Sender<u64>, period: Duration) {
    // O primeiro tick só depois de um período completo
    let mut ticker = time::interval_at(Instant::now() + period, period);
    loop {
        ticker.tick().await;
        let mut finished = false;
        tx.send_modify(|secs| {
            *secs = secs.saturating_sub(1);
            finished = *secs == 0;
        });
        if finished {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_never_negative() {
        assert_eq!(CountdownState::at(10, 3).remaining, 7);
        assert_eq!(CountdownState::at(10, 10).remaining, 0);
        assert_eq!(CountdownState::at(10, 500).remaining, 0);

        let mut state = CountdownState::seeded(1);
        state.tick();
        state.tick();
        assert_eq!(state.remaining, 0);
        assert!(state.is_finished());
    }

    #[test]
    fn test_fraction() {
        assert_eq!(CountdownState::at(100, 25).fraction(), 0.75);
        assert_eq!(CountdownState::at(100, 25).percent(), 75);
        assert_eq!(CountdownState::seeded(0).fraction(), 0.0);
        assert_eq!(CountdownState::seeded(0).percent(), 0);
        assert_eq!(CountdownState::at(3, 1).percent(), 67);
    }

    #[test]
    fn test_label() {
        assert_eq!(CountdownState::seeded(0).label(), "0m 0s");
        assert_eq!(CountdownState::seeded(90).label(), "1m 30s");
        assert_eq!(CountdownState::seeded(1800).label(), "30m 0s");
    }

    #[tokio::test(start_paused = true)]
    async fn test_decrements_once_per_second() {
        let countdown = Countdown::start(5);
        assert_eq!(countdown.secs_left(), 5);

        time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(countdown.secs_left(), 3);
        assert_eq!(countdown.state(), CountdownState::at(5, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_at_zero() {
        let countdown = Countdown::start(2);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(countdown.secs_left(), 0);
        assert!(!countdown.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_has_no_timer() {
        let countdown = Countdown::start(0);
        assert!(!countdown.is_ticking());
        assert_eq!(countdown.state().fraction(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reseed_replaces_timer() {
        let mut countdown = Countdown::start(10);
        time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(countdown.secs_left(), 6);

        countdown.reseed(60);
        assert_eq!(countdown.total(), 60);
        assert_eq!(countdown.secs_left(), 60);

        // Só um timer: 3,5 segundos tiram exatamente 3
        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(countdown.secs_left(), 57);
    }
}
