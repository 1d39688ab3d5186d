use anyhow::Result;
use clap::Parser;
use tracing::info;
use veracity_server::cli::{Cli, Commands};
use veracity_server::commands::{self, TextSource};
use veracity_server::config::AppConfig;
use veracity_server::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_format);

    let config = AppConfig::load(&cli.config, &cli.artifacts)?;
    info!("Using {}", commands::describe_config_source(&cli.config));

    match cli.command {
        Commands::Classify { text, file, json } => {
            let status = commands::run_classify(&config, TextSource::from_args(text, file), json)?;
            if status != 0 {
                std::process::exit(status);
            }
        }

        Commands::Check => commands::run_check(&config)?,

        Commands::Serve { listen, port } => {
            let mut config = config;
            if let Some(listen) = listen {
                config.server.listen = listen;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            commands::run_serve(config).await?;
        }
    }

    Ok(())
}
