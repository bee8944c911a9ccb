use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "shelf", version, about = "Personal clipping library")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// Override the configured listen port.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the resolved settings as JSON, secrets masked.
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().context("failed to load shelf settings")?;

    match cli.command {
        Command::Config => {
            let shown = serde_json::to_string_pretty(&settings.redacted())
                .context("failed to render settings")?;
            println!("{shown}");
            Ok(())
        }
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            shelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "shelf serve starting");

            tokio::runtime::Runtime::new()
                .context("failed to start async runtime")?
                .block_on(shelf_app::run(settings))
        }
    }
}
