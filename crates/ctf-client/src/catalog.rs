//! Catálogo de tasks e a apresentação de cada protocolo.

use crate::model::{display_name, Protocol, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Server,
    ShieldCheck,
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Server => "🖥",
            Icon::ShieldCheck => "🛡",
        }
    }
}

/// Metadados de exibição de um protocolo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub protocol: Protocol,
    pub icon: Icon,
    pub label: &'static str,
}

/// Tabela protocolo -> apresentação. Novo protocolo = nova variante + nova linha.
pub const PRESENTATIONS: [Presentation; 2] = [
    Presentation {
        protocol: Protocol::Http,
        icon: Icon::Server,
        label: "HTTP",
    },
    Presentation {
        protocol: Protocol::Tcp,
        icon: Icon::ShieldCheck,
        label: "TCP",
    },
];

impl Protocol {
    pub fn presentation(self) -> &'static Presentation {
        let index = match self {
            Protocol::Http => 0,
            Protocol::Tcp => 1,
        };
        &PRESENTATIONS[index]
    }
}

/// Card de uma task pronto para exibição
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    /// Nome da task como o backend conhece (usado para implantar)
    pub task_name: String,
    pub title: String,
    pub protocol: Protocol,
    pub icon: Icon,
    pub container_port: u16,
}

impl TaskCard {
    pub fn from_task(task: &Task) -> Self {
        Self {
            task_name: task.name.clone(),
            title: display_name(&task.name),
            protocol: task.protocol,
            icon: task.protocol.presentation().icon,
            container_port: task.container_port,
        }
    }
}

pub fn task_cards(tasks: &[Task]) -> Vec<TaskCard> {
    tasks.iter().map(TaskCard::from_task).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_protocol() {
        for protocol in [Protocol::Http, Protocol::Tcp] {
            assert_eq!(protocol.presentation().protocol, protocol);
        }
    }

    #[test]
    fn test_baby_pwn_card() {
        let tasks: Vec<Task> = serde_json::from_str(
            r#"[{"name":"baby_pwn","protocol":"tcp","container_port":1337}]"#,
        )
        .unwrap();

        let cards = task_cards(&tasks);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "baby pwn");
        assert_eq!(cards[0].icon, Icon::ShieldCheck);
        assert_eq!(cards[0].task_name, "baby_pwn");
    }

    #[test]
    fn test_http_uses_server_icon() {
        let task = Task {
            name: "web_login".into(),
            protocol: Protocol::Http,
            container_port: 80,
        };
        assert_eq!(TaskCard::from_task(&task).icon, Icon::Server);
    }
}
