//! CLI entry point for inkpress

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkpress::{commands, server, Site};

#[derive(Parser)]
#[command(name = "inkpress")]
#[command(version)]
#[command(about = "A minimal markdown content manager with a browser admin", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post; its file name is derived from it
        title: String,
    },

    /// Build every post and the index
    #[command(alias = "g")]
    Generate,

    /// List posts with their publish state
    List,

    /// Delete a post and its generated page
    Delete {
        /// Post name, without extension
        name: String,
    },

    /// Remove the build directory
    Clean,

    /// Build, then serve the site and the admin interface
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to server.port in the config)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip in the config)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "inkpress=debug,info"
    } else {
        "inkpress=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            commands::new::run(&site, &title)?;
        }

        Commands::Generate => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            commands::generate::run(&site)?;
        }

        Commands::List => {
            let site = Site::new(&base_dir)?;
            commands::list::run(&site)?;
        }

        Commands::Delete { name } => {
            let site = Site::new(&base_dir)?;
            commands::delete::run(&site, &name)?;
        }

        Commands::Clean => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Cleaning build folder...");
            commands::clean::run(&site)?;
            println!("Cleaned successfully!");
        }

        Commands::Server { port, ip } => {
            let site = Site::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| site.config.server.ip.clone());
            let port = port.unwrap_or(site.config.server.port);

            // Generate first
            tracing::info!("Generating static files...");
            server::initial_build(&site);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            server::start(site, &ip, port).await?;
        }

        Commands::Version => {
            println!("inkpress version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
