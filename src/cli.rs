use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "apod-proxy")]
#[command(about = "Proxy for NASA's Astronomy Picture of the Day", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the server
    Serve {
        /// Listen address (overrides HOST)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch one entry and print it as JSON
    Fetch {
        /// Entry date (YYYY-MM-DD), latest when omitted
        #[arg(short, long, conflicts_with = "random")]
        date: Option<String>,
        /// Pick a random date from the archive
        #[arg(short, long)]
        random: bool,
    },
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            commands::serve::run(host, port).await;
        }
        Commands::Fetch { date, random } => {
            commands::fetch::run(date, random).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch_args() {
        let cli = Cli::try_parse_from(["apod-proxy", "fetch", "--date", "2024-07-04"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Fetch { date: Some(ref d), random: false } if d == "2024-07-04"
        ));

        assert!(Cli::try_parse_from(["apod-proxy", "fetch", "--date", "2024-07-04", "--random"]).is_err());
    }

    #[test]
    fn test_parse_serve_args() {
        let cli = Cli::try_parse_from(["apod-proxy", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { host: None, port: Some(8080) }));
    }
}
