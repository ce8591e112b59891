use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_files as fs;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gtm_engine::app_config::{AppConfigManager, APP_CONFIG_FILE};
use gtm_engine::content_handlers::AppState;
use gtm_engine::llm_handler::{LLMProviderImpl, LlmClient};
use gtm_engine::{configure_api, json_config};

#[derive(Parser, Debug)]
#[command(author, version, about = "GTM content engine server", long_about = None)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Service config file
    #[arg(short, long, default_value = APP_CONFIG_FILE)]
    config: String,

    /// Write logs to daily files in this directory instead of stdout
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "gtm-engine.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
            None
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.as_deref());

    let config_manager = Arc::new(AppConfigManager::new(&cli.config));
    let config = match config_manager.load_config() {
        Ok(config) => {
            info!("Loaded config from {}", cli.config);
            config
        }
        Err(e) => {
            warn!("Failed to load config from {}: {}. Using defaults", cli.config, e);
            config_manager.get_config()
        }
    };

    let provider = LLMProviderImpl::new(&config).map_err(io::Error::other)?;
    if !provider.is_configured() {
        warn!("{} is not set; LLM endpoints will answer NO_API_KEY", provider.credential_name());
    }
    info!("Using LLM provider {:?}", provider.provider());

    let app_state = web::Data::new(AppState::new(Arc::new(provider), config_manager));
    let static_dir = config.static_dir().to_string();

    info!("Starting server at http://{}:{}", cli.host, cli.port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(json_config())
            .configure(configure_api)
            // Serve the dashboard for everything else
            .service(fs::Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((cli.host.as_str(), cli.port))?
    .run()
    .await
}
