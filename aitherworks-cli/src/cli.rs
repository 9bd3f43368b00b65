use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::headers_cmd::HostFormat;

#[derive(Parser)]
#[command(
    name = "awcli",
    about = "AItherworks web export tooling",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the Godot web export script
    Export,
    /// Check that the exported engine artifacts are in place
    Check {
        /// Static output directory the page is served from
        #[arg(long, default_value = "web/public")]
        out: PathBuf,
    },
    /// Print the cross-origin isolation headers the threaded engine needs
    Headers {
        /// Static host to format the headers for
        #[arg(long, value_enum, default_value_t = HostFormat::Netlify)]
        format: HostFormat,
    },
    /// Print the effective bootstrap configuration
    Config,
}
