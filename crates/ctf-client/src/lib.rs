//! Cliente do dashboard de instâncias CTF.
//!
//! Toda a lógica de negócio vive no backend; aqui ficam a sessão, o cliente
//! HTTP, as views (catálogo e instâncias com contagem regressiva) e o
//! despachante de ações.

pub mod api;
pub mod board;
pub mod catalog;
pub mod config;
pub mod countdown;
pub mod dispatcher;
pub mod error;
pub mod model;
pub mod session;

pub use api::ApiClient;
pub use board::{InstanceBoard, InstanceCard, InstanceView};
pub use catalog::{task_cards, Icon, TaskCard};
pub use config::ClientConfig;
pub use countdown::{Countdown, CountdownState};
pub use dispatcher::{Action, Dispatcher};
pub use error::{ClientError, Result};
pub use model::{Instance, InstanceStatus, Protocol, Task};
pub use session::{AuthState, FileTokenStorage, InMemoryTokenStorage, SessionStore, TokenStorage};
