use agora_core::{PeerId, purge_peer_lines};
use agora_server::{ServerConfig, serve};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agora")]
#[command(about = "Presence and signaling coordinator for shared spatial sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the coordinator. Flags override AGORA_* environment variables.
    Serve(ServeArgs),

    /// Drop every line one peer said from a transcript log.
    Purge {
        peer: String,

        #[arg(long, default_value = "STT.txt")]
        file: PathBuf,
    },
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long)]
    bind: Option<SocketAddr>,

    #[arg(long)]
    max_capacity: Option<usize>,

    /// Turn away joins once the room is full.
    #[arg(long)]
    enforce_capacity: bool,

    #[arg(long)]
    presence_interval_ms: Option<u64>,

    #[arg(long)]
    transcript: Option<PathBuf>,

    #[arg(long)]
    transcript_poll_ms: Option<u64>,

    /// Directory with the browser client, served on every unmatched path.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

impl ServeArgs {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(max) = self.max_capacity {
            config.max_capacity = max;
        }
        if self.enforce_capacity {
            config.enforce_capacity = true;
        }
        if let Some(ms) = self.presence_interval_ms {
            config.presence_interval = Duration::from_millis(ms);
        }
        if let Some(path) = self.transcript {
            config.transcript_path = path;
        }
        if let Some(ms) = self.transcript_poll_ms {
            config.transcript_poll_interval = Duration::from_millis(ms);
        }
        if self.static_dir.is_some() {
            config.static_dir = self.static_dir;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve(args) => {
            let config = args.apply(ServerConfig::from_env());

            println!("{}", "Starting Agora coordinator...".green().bold());
            println!("   Listening:  {}", config.bind_addr);
            println!(
                "   Capacity:   {} ({})",
                config.max_capacity,
                if config.enforce_capacity { "enforced" } else { "advisory" }
            );
            println!("   Transcript: {}", config.transcript_path.display());
            if let Some(dir) = &config.static_dir {
                println!("   Static:     {}", dir.display());
            }

            serve(config).await?;
        }

        Commands::Purge { peer, file } => {
            let peer: PeerId = peer.parse()?;
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("cannot read {}", file.display()))?;

            let purged = purge_peer_lines(&content, &peer);
            let removed = content.lines().count().saturating_sub(purged.lines().count());
            tokio::fs::write(&file, purged)
                .await
                .with_context(|| format!("cannot write {}", file.display()))?;

            println!(
                "{} {} line(s) from {}",
                "Removed".cyan().bold(),
                removed,
                file.display()
            );
        }
    }

    Ok(())
}
