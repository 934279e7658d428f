//! Renderização em texto dos cards do dashboard

use ctf_client::{InstanceCard, TaskCard};

const BAR_WIDTH: usize = 20;

pub fn navbar(authenticated: bool) -> String {
    if authenticated {
        "CTF Dashboard                                  [logout]".to_string()
    } else {
        "CTF Dashboard".to_string()
    }
}

pub fn task_card(card: &TaskCard) -> String {
    format!(
        "{} {:<28} {:<5} porta {}",
        card.icon.glyph(),
        card.title,
        card.protocol.presentation().label,
        card.container_port
    )
}

pub fn progress_bar(percent: u8) -> String {
    let filled = (usize::from(percent.min(100)) * BAR_WIDTH + 50) / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent.min(100)
    )
}

pub fn instance_card(card: &InstanceCard) -> String {
    let endpoint = if card.endpoint.is_empty() {
        "(endpoint indisponível)"
    } else {
        card.endpoint.as_str()
    };

    format!(
        "#{:<4} {:<28} {:<8} ⏱ {}\n      {}\n      {}",
        card.id,
        card.title,
        card.status.to_string(),
        card.remaining,
        endpoint,
        progress_bar(card.percent)
    )
}

pub fn task_list(cards: &[TaskCard]) -> String {
    if cards.is_empty() {
        return "Nenhuma task disponível.".to_string();
    }
    cards.iter().map(task_card).collect::<Vec<_>>().join("\n")
}

pub fn instance_list(cards: &[InstanceCard]) -> String {
    if cards.is_empty() {
        return "Nenhuma instância rodando.".to_string();
    }
    cards.iter().map(instance_card).collect::<Vec<_>>().join("\n\n")
}
