//! Tela interativa: cards redesenhados a cada segundo, comandos via stdin.

use crate::app::App;
use crate::render;
use anyhow::Result;
use ctf_client::{Action, InstanceBoard, TaskCard};
use std::io::Write;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, Interval, MissedTickBehavior};

const REDRAW: Duration = Duration::from_secs(1);
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    Deploy(String),
    Act(Action, i64),
    Refresh,
    Logout,
    Quit,
}

impl FromStr for DashboardCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or_else(|| "comando vazio".to_string())?;
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(format!("argumentos demais para '{verb}'"));
        }

        match (verb, arg) {
            ("deploy", Some(task)) => Ok(DashboardCommand::Deploy(task.to_string())),
            ("refresh", None) => Ok(DashboardCommand::Refresh),
            ("logout", None) => Ok(DashboardCommand::Logout),
            ("quit" | "q" | "exit", None) => Ok(DashboardCommand::Quit),
            (verb, Some(id)) => {
                let action = verb.parse::<Action>()?;
                let id = id
                    .parse::<i64>()
                    .map_err(|_| format!("id inválido: '{id}'"))?;
                Ok(DashboardCommand::Act(action, id))
            }
            (verb, None) => Err(format!("comando desconhecido ou incompleto: '{verb}'")),
        }
    }
}

struct Screen {
    tasks: Vec<TaskCard>,
    board: InstanceBoard,
    busy: Option<String>,
    message: Option<String>,
}

impl Screen {
    fn draw(&self, app: &App) {
        let mut out = String::from(CLEAR_SCREEN);
        out.push_str(&render::navbar(app.is_authenticated()));
        out.push_str(&format!("\n{}\n\nTasks\n", app.config.api_url));
        out.push_str(&render::task_list(&self.tasks));
        out.push_str("\n\nInstâncias\n");
        out.push_str(&render::instance_list(&self.board.cards()));
        out.push_str("\n\n");
        if let Some(busy) = &self.busy {
            out.push_str(&format!("… {busy}\n"));
        }
        if let Some(message) = &self.message {
            out.push_str(&format!("{message}\n"));
        }
        out.push_str("deploy <task> | stop|restart|extend <id> | refresh | logout | quit\n> ");
        present(&mut std::io::stdout(), &out);
    }
}

/// Escreve o quadro inteiro; um terminal que recusa a escrita só gera log
fn present(out: &mut impl Write, frame: &str) {
    if let Err(e) = out.write_all(frame.as_bytes()).and_then(|()| out.flush()) {
        tracing::debug!(error = %e, "falha ao escrever a tela");
    }
}

/// Um redesenho atrasado (ex.: durante uma ação lenta) é descartado, sem rajada
fn redraw_interval() -> Interval {
    let mut redraw = time::interval(REDRAW);
    redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);
    redraw
}

pub async fn run(app: &App) -> Result<()> {
    let mut screen = Screen {
        tasks: app.load_catalog().await,
        board: InstanceBoard::new(),
        busy: None,
        message: None,
    };
    if let Err(e) = app.dispatcher.refresh(&mut screen.board).await {
        tracing::error!(error = %e, "falha ao carregar instâncias");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut redraw = redraw_interval();

    loop {
        tokio::select! {
            _ = redraw.tick() => screen.draw(app),
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<DashboardCommand>() {
                    Ok(DashboardCommand::Quit) => break,
                    Ok(DashboardCommand::Logout) => {
                        app.session.logout();
                        screen.board.clear();
                        println!("\nSessão encerrada.");
                        break;
                    }
                    Ok(command) => {
                        screen.busy = Some(line.trim().to_string());
                        screen.draw(app);
                        screen.message = execute(app, &mut screen.board, command).await;
                        screen.busy = None;
                    }
                    Err(e) => screen.message = Some(e),
                }
                screen.draw(app);
            }
        }
    }

    Ok(())
}

/// Executa um comando; falhas só vão para o log e a tela mantém o estado anterior
async fn execute(app: &App, board: &mut InstanceBoard, command: DashboardCommand) -> Option<String> {
    let result = match command {
        DashboardCommand::Deploy(task) => app
            .dispatcher
            .deploy(board, &task)
            .await
            .map(|inst| format!("Instância #{} criada: {}", inst.id, inst.endpoint)),
        DashboardCommand::Act(action, id) => app
            .dispatcher
            .perform_action(board, action, id)
            .await
            .map(|()| format!("{action} #{id} ok")),
        DashboardCommand::Refresh => app.dispatcher.refresh(board).await.map(|()| String::new()),
        DashboardCommand::Logout | DashboardCommand::Quit => return None,
    };

    match result {
        Ok(message) if message.is_empty() => None,
        Ok(message) => Some(message),
        Err(e) => {
            tracing::error!(error = %e, "ação falhou");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "deploy baby_pwn".parse::<DashboardCommand>().unwrap(),
            DashboardCommand::Deploy("baby_pwn".into())
        );
        assert_eq!(
            "extend 7".parse::<DashboardCommand>().unwrap(),
            DashboardCommand::Act(Action::Extend, 7)
        );
        assert_eq!(
            " stop   3 ".parse::<DashboardCommand>().unwrap(),
            DashboardCommand::Act(Action::Stop, 3)
        );
        assert_eq!("q".parse::<DashboardCommand>().unwrap(), DashboardCommand::Quit);
        assert_eq!(
            "refresh".parse::<DashboardCommand>().unwrap(),
            DashboardCommand::Refresh
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<DashboardCommand>().is_err());
        assert!("stop".parse::<DashboardCommand>().is_err());
        assert!("stop abc".parse::<DashboardCommand>().is_err());
        assert!("delete 3".parse::<DashboardCommand>().is_err());
        assert!("extend 1 2".parse::<DashboardCommand>().is_err());
        assert!("deploy".parse::<DashboardCommand>().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_redraw_skips_missed_ticks() {
        let mut redraw = redraw_interval();
        assert_eq!(redraw.missed_tick_behavior(), MissedTickBehavior::Skip);

        redraw.tick().await;
        // Ação lenta: vários segundos sem desenhar
        time::sleep(Duration::from_millis(3500)).await;
        redraw.tick().await;

        // Sem rajada: o próximo redesenho volta a esperar o período inteiro
        let before = time::Instant::now();
        redraw.tick().await;
        assert!(before.elapsed() >= Duration::from_millis(400));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_present_writes_frame() {
        let mut out = Vec::new();
        present(&mut out, "frame");
        assert_eq!(out, b"frame");

        // Falha de escrita não derruba a tela
        present(&mut BrokenPipe, "frame");
    }
}
