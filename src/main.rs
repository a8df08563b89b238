use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use validata::config::ServerConfig;
use validata::server::{self, MigrateDirection};

#[derive(Parser)]
#[command(name = "validata", version, about = "Multilingual dataset annotation and validation service")]
struct Cli {
    /// Path to a YAML configuration file
    #[clap(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(long)]
        database: Option<String>,
        #[clap(long)]
        uploads_dir: Option<String>,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    /// Run database migrations
    Migrate {
        #[clap(long)]
        database: Option<String>,
        #[command(subcommand)]
        direction: MigrateDirection,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Cli::parse();

    let mut config = match args.config.as_deref() {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    match args.command {
        Commands::Serve {
            port,
            database,
            uploads_dir,
            cors_origin,
        } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(database) = database {
                config.database = database;
            }
            if let Some(uploads_dir) = uploads_dir {
                config.uploads_dir = uploads_dir;
            }
            if let Some(cors_origin) = cors_origin {
                config.cors_origin = Some(cors_origin);
            }

            server::start_server(
                config.port,
                &config.database,
                &config.uploads_dir,
                config.cors_origin.as_deref(),
            )
            .await
        }
        Commands::Migrate {
            database,
            direction,
        } => {
            let database = database.unwrap_or(config.database);
            server::migrate_database(&database, direction).await
        }
    }
}
