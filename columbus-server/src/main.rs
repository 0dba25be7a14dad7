use anyhow::Result;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod cli;
mod commands;
mod config;

use cli::{Args, Mode};
use config::Config;

/// Initialize tracing:
/// 1. Console output (stderr) so one-shot commands keep stdout for JSON
/// 2. Optional file output under COLUMBUS_LOG_DIR
///
/// The returned guard must live as long as the program or file logging stops.
fn initialize_tracing() -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "info,\
         columbus_server=debug,\
         columbus_orchestrations=debug,\
         kube=warn"
            .into()
    });

    let (file_layer, guard) = match std::env::var("COLUMBUS_LOG_DIR") {
        Ok(dir) => {
            std::fs::create_dir_all(&dir)?;
            let file_appender = tracing_appender::rolling::never(&dir, "launcher.log");
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_writer(file_writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file before tracing so RUST_LOG and COLUMBUS_LOG_DIR apply
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let _guard = initialize_tracing()?;

    let config = Config::load()?;

    match args.mode.unwrap_or(Mode::Serve { port: None }) {
        Mode::Serve { port } => commands::serve::run_server(config, port).await,
        Mode::Start {
            username,
            app_name,
            image,
            client_id,
            client_secret,
        } => commands::app::start(&config, username, app_name, image, client_id, client_secret).await,
        Mode::Stop { username, app_name } => commands::app::stop(&config, username, app_name).await,
        Mode::Status { username, app_name } => {
            commands::app::status(&config, username, app_name).await
        }
        Mode::DeleteStorage {
            username,
            app_name,
            yes,
        } => commands::app::delete_storage(&config, username, app_name, yes).await,
        Mode::Pods => commands::app::pods(&config).await,
    }
}
