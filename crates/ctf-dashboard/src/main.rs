mod app;
mod dashboard;
mod logging;
mod render;

use crate::app::App;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ctf_client::{Action, AuthState, ClientConfig, InstanceBoard};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "ctf-dashboard",
    about = "Dashboard de instâncias CTF: catálogo, deploy e ciclo de vida"
)]
struct Args {
    /// Arquivo de configuração TOML (padrão: ~/.config/ctf-dashboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// URL do backend (sobrescreve config e CTF_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Saída em JSON em vez de cards
    #[arg(long, global = true)]
    json: bool,

    /// Logs de depuração no stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Troca o nome de usuário por um token e o salva
    Login { username: String },
    /// Remove o token salvo
    Logout,
    /// Mostra o estado da sessão
    Whoami,
    /// Lista o catálogo de tasks
    Tasks,
    /// Lista as instâncias do usuário
    Instances,
    /// Implanta uma instância da task
    Deploy { task: String },
    /// Para uma instância
    Stop { id: i64 },
    /// Reinicia uma instância
    Restart { id: i64 },
    /// Estende o TTL de uma instância
    Extend { id: i64 },
    /// Tela interativa com contagem regressiva ao vivo
    Dashboard,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    // Arquivo passado explicitamente precisa existir; o padrão é opcional
    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("Falha ao carregar {}", path.display()))?
            .with_env_overrides(),
        None => ClientConfig::load_or_default(ClientConfig::default_path().as_deref())?,
    };
    if let Some(url) = args.api_url {
        config.api_url = url;
    }

    let app = App::new(config)?;

    match args.command {
        Command::Login { username } => login(&app, &username).await,
        Command::Logout => {
            app.session.logout();
            println!("Sessão encerrada.");
            Ok(())
        }
        Command::Whoami => {
            match app.session.auth_state() {
                AuthState::Authenticated(_) => println!("Autenticado em {}", app.api.base_url()),
                AuthState::Anonymous => println!("Sem sessão ativa."),
                AuthState::Unknown => println!("Sessão ainda não carregada."),
            }
            Ok(())
        }
        Command::Tasks => {
            // Mesma carga tolerante a falhas nos dois formatos
            if args.json {
                let tasks = app.load_tasks().await;
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                println!("{}", render::task_list(&app.load_catalog().await));
            }
            Ok(())
        }
        Command::Instances => {
            app.require_login()?;
            let mut board = InstanceBoard::new();
            app.dispatcher.refresh(&mut board).await?;
            print_instances(&board, args.json)
        }
        Command::Deploy { task } => {
            app.require_login()?;
            let mut board = InstanceBoard::new();
            let instance = app.dispatcher.deploy(&mut board, &task).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&instance)?);
            } else if let Some(view) = board.get(instance.id) {
                println!("{}", render::instance_card(&view.card()));
            }
            Ok(())
        }
        Command::Stop { id } => action(&app, Action::Stop, id, args.json).await,
        Command::Restart { id } => action(&app, Action::Restart, id, args.json).await,
        Command::Extend { id } => action(&app, Action::Extend, id, args.json).await,
        Command::Dashboard => {
            app.require_login()?;
            dashboard::run(&app).await
        }
    }
}

async fn login(app: &App, username: &str) -> Result<()> {
    // Se o backend recusar, o token anterior continua salvo
    app.session.login(&app.api, username).await?;
    println!("Login realizado como '{username}'.");
    Ok(())
}

async fn action(app: &App, action: Action, id: i64, json: bool) -> Result<()> {
    app.require_login()?;
    let mut board = InstanceBoard::new();
    app.dispatcher.perform_action(&mut board, action, id).await?;
    print_instances(&board, json)
}

fn print_instances(board: &InstanceBoard, json: bool) -> Result<()> {
    if json {
        let instances: Vec<_> = board.views().iter().map(|v| v.instance()).collect();
        println!("{}", serde_json::to_string_pretty(&instances)?);
    } else {
        println!("{}", render::instance_list(&board.cards()));
    }
    Ok(())
}
