use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use clap::Parser;
use railadvice_core::{Config, RailAdviceClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "railadvice")]
#[command(about = "Terminal chat client for RailAdvice AI")]
#[command(version)]
struct Cli {
    /// Host name used to pick the backend (localhost/127.0.0.1 = development)
    #[arg(long)]
    host: Option<String>,

    /// Base URL of the chat backend, overriding the host-derived one
    #[arg(long, env = "RAILADVICE_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Write the merged settings back to the config file
    #[arg(long)]
    save: bool,
}

impl Cli {
    /// Command-line flags win over the saved config
    fn apply_to(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.host = Some(host.clone());
        }
        if let Some(url) = &self.api_url {
            config.api_base_url = Some(url.clone());
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = Some(secs);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let mut config = Config::load()?;
    cli.apply_to(&mut config);
    if cli.save {
        config.save()?;
        info!(path = %Config::get_config_path()?.display(), "saved settings");
    }

    let environment = config.environment();
    let base_url = config.api_base_url();
    info!(environment = environment.as_str(), %base_url, "starting RailAdvice chat");

    let client = RailAdviceClient::with_timeout(&base_url, config.request_timeout())?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let mut app = App::new(client, environment, events.sender());
    app.check_health();

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}

/// Log to a file so output never lands on the alternate screen
fn init_logging(verbose: bool) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?
        .join("railadvice");
    fs::create_dir_all(&log_dir)?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("railadvice.log"))?;

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("railadvice={level},railadvice_core={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}
