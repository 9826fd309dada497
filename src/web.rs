#![cfg(not(tarpaulin_include))]

use clap::Parser;
use timetable::{AppConfig, app};

#[derive(Parser)]
#[clap(version, about = "Timetable generator web application", long_about = None)]
struct Args {
    /// Configuration file
    #[clap(short, long, value_name = "FILE", default_value = "timetable.toml")]
    config: String,

    /// Address to listen on, overrides the configuration
    #[clap(short, long, value_name = "ADDR")]
    bind: Option<String>,
}

/// Main entry point for the web application
///
/// Loads the configuration, falling back to defaults when the file is
/// missing, and serves the timetable form until the process is stopped.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = AppConfig::load_or_default(Some(&args.config));
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }

    app::run(config).await?;

    Ok(())
}
