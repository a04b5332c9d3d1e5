use clap::Parser;
use querychat::core::config::{self, EnvOverrides, QueryChatConfig};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "querychat", version, about = "Ask questions about your data in plain language")]
struct Args {
    /// Base URL of the query service (overrides QUERYCHAT_API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to querychat.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("querychat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {e}; using defaults");
        log::warn!("Falling back to default config: {}", e);
        QueryChatConfig::default()
    });
    let resolved = config::resolve(&file_config, &EnvOverrides::from_env(), args.api_url.as_deref());

    log::info!(
        "QueryChat starting up: base_url={}, query_path={}",
        resolved.base_url,
        resolved.query_path
    );

    querychat::tui::run(resolved)
}
