use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use unfail_app::{Collaborators, SolutionService};
use unfail_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "unfail", version, about = "Slightly helpful advice for when things go sideways")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Ask for advice once and print the JSON payload
    Solve {
        /// What went sideways
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
    },
    /// Print the effective settings with credentials redacted
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Unfail settings")?;
    unfail_telemetry::init(&settings.telemetry).ok();

    match cli.command {
        Command::Serve => {
            unfail_app::serve(&settings).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Solve { input } => solve(&settings, &input.join(" ")).await,
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings.redacted())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn solve(settings: &Settings, input: &str) -> anyhow::Result<ExitCode> {
    let service = SolutionService::new(Collaborators::from_settings(settings)?);

    match service.solve(input).await {
        Ok(payload) => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = ?e, "solve failed");
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
            Ok(ExitCode::FAILURE)
        }
    }
}
