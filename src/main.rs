//! Asistente - back-office de restaurante por voz o texto
//!
//! Cada línea de la entrada estándar es una frase del operador; las
//! respuestas se imprimen con su latencia.

use asistente::{
    api::HttpBackend,
    assistant::{AssistantSettings, CommandProcessor, Session, TurnReport},
    config::AppConfig,
    log_error, log_info, logging,
};
use clap::Parser;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Asistente conversacional del restaurante
#[derive(Parser, Debug)]
#[command(name = "asistente")]
#[command(author = "MadKoding")]
#[command(version = "0.1.0")]
#[command(about = "Asistente de comandos para el back-office del restaurante", long_about = None)]
struct Args {
    /// Configuration file path (overrides defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Bearer token for the backend (or the name of an env var holding it)
    #[arg(long)]
    token: Option<String>,

    /// Directory for exported reports
    #[arg(long)]
    reports_dir: Option<PathBuf>,

    /// Write the session transcript as JSON to this path on exit
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Keep the transcript under the user data directory
    #[arg(long)]
    save_session: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Run these phrases and exit instead of opening the prompt
    #[arg(short, long = "command")]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut app_config = AppConfig::load(args.config.as_deref())?;

    init_logging(args.verbose, app_config.debug);

    // CLI overrides
    if let Some(url) = args.api_url {
        app_config.api.base_url = url;
    }
    if let Some(token) = args.token {
        app_config.api.auth_token = Some(token);
    }
    if let Some(dir) = args.reports_dir {
        app_config.reports_dir = dir;
    }
    app_config.validate()?;

    tracing::info!("Backend en {}", app_config.api.base_url);
    let backend = HttpBackend::from_config(&app_config.api)?;
    let processor = CommandProcessor::new(
        Arc::new(backend),
        AssistantSettings {
            reports_dir: app_config.reports_dir.clone(),
        },
    );

    let mut session = Session::new();
    log_info!("Sesión {} (backend {})", session.id, app_config.api.base_url);

    if args.command.is_empty() {
        run_prompt(&processor, &mut session).await?;
    } else {
        for phrase in &args.command {
            let report = processor.process(&mut session, phrase).await;
            print_report(&report);
            if report.close_requested {
                break;
            }
        }
    }

    if let Some(path) = &args.transcript {
        write_transcript(&session, path).await?;
    }
    if args.save_session {
        match session_path(&session) {
            Some(path) => write_transcript(&session, &path).await?,
            None => tracing::warn!("No hay directorio de datos para guardar la sesión"),
        }
    }

    log_info!("Sesión {} terminada ({} mensajes)", session.id, session.messages().len());
    Ok(())
}

/// Initialize logging
fn init_logging(verbose: bool, debug_mode: bool) {
    let filter = if verbose || debug_mode {
        "asistente=debug,info"
    } else {
        "asistente=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match logging::open_journal() {
        Ok(path) => tracing::info!("Bitácora de turnos en {}", path.display()),
        Err(e) => tracing::warn!("No se pudo abrir la bitácora: {}", e),
    }
}

/// Interactive loop: one line, one turn
async fn run_prompt(processor: &CommandProcessor, session: &mut Session) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("🎙️  Asistente listo. Escribe «ayuda» o «cerrar asistente» para salir.");

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrumpido por el operador");
                None
            }
        };

        let Some(line) = line else {
            println!();
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let report = processor.process(session, text).await;
        print_report(&report);

        if report.close_requested {
            break;
        }
    }

    Ok(())
}

fn print_report(report: &TurnReport) {
    for reply in &report.replies {
        println!("{}", reply);
    }
    println!("   ({} ms)", report.duration_ms);
}

fn session_path(session: &Session) -> Option<PathBuf> {
    ProjectDirs::from("com", "madkoding", "asistente")
        .map(|dirs| dirs.data_dir().join("sesiones").join(format!("{}.json", session.id)))
}

async fn write_transcript(session: &Session, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(session)?;
    if let Err(e) = tokio::fs::write(path, json).await {
        log_error!("No se pudo guardar la transcripción en {:?}: {}", path, e);
        return Err(e.into());
    }
    tracing::info!("Transcripción guardada en {:?}", path);
    Ok(())
}
