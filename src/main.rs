use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

mod app;
mod cli;
mod config;
mod confirm;
mod theme;
mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting twostep");

    let args = cli::Args::parse();

    let mut config = config::load()?;
    if let Some(theme) = &args.theme {
        config.theme.name.clone_from(theme);
    }
    if let Some(prompt_ms) = args.prompt_timeout_ms {
        config.timeouts.prompt_ms = prompt_ms;
    }
    if let Some(success_ms) = args.success_display_ms {
        config.timeouts.success_ms = success_ms;
    }
    if args.three_phase {
        config.timeouts.four_phase = false;
    }

    let theme = theme::theme_from_name(&config.theme.name);
    let confirm = config.timeouts.to_confirm_config();

    let mut app = App::new(&config, confirm, theme);
    app.run().await?;

    info!("Shutting down");
    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("twostep").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "twostep.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    Ok(guard)
}
