mod cli;
mod commands;
mod project;

use clap::Parser;

use cli::{Cli, Command};
use commands::{check_cmd, config_cmd, export_cmd, headers_cmd};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // Header snippets do not depend on the project layout.
    if let Command::Headers { format } = cli.command {
        return headers_cmd::run(format);
    }

    let ctx = project::detect_project_context()?;
    match cli.command {
        Command::Export => export_cmd::run(ctx).await,
        Command::Check { out } => check_cmd::run(out, ctx),
        Command::Config => config_cmd::run(ctx),
        Command::Headers { format } => headers_cmd::run(format),
    }
}
