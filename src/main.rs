use std::path::PathBuf;

use busfind::dbus::{candidate_names, get_matching_application, get_objects, ZbusBus, ROOT_PATH};
use busfind::render::{render, OutputFormat};
use busfind::{config, BusSelector, Config};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "busfind")]
#[command(author, version, about = "Find D-Bus applications and map their objects", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Bus to search: session, system, or a D-Bus address
    #[arg(short, long, global = true)]
    bus: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an application name to its bus name
    Resolve {
        /// Application name or any part of its bus name (e.g. "Notif")
        app: String,
    },

    /// Resolve an application and list its objects and interfaces
    Introspect {
        /// Application name or any part of its bus name
        app: String,

        /// Object path to start from
        #[arg(short, long, default_value = ROOT_PATH)]
        path: String,

        /// Output format (text, json)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// List every owned and activatable name on the bus
    Names,

    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("busfind=debug,zbus=info")
    } else {
        EnvFilter::new(format!("busfind={},zbus=warn", level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    Ok(match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    })
}

/// Connect to the bus named by `--bus`, or the configured default.
async fn connect(bus: Option<&str>, config: &Config) -> anyhow::Result<ZbusBus> {
    let selector: BusSelector = match bus {
        Some(bus) => bus.parse()?,
        None => config.bus_selector()?,
    };
    debug!("Using {} bus", selector);
    Ok(ZbusBus::connect(&selector).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_logging(cli.verbose, &config.logging.level);

    match cli.command {
        Commands::Resolve { app } => {
            let bus = connect(cli.bus.as_deref(), &config).await?;
            println!("{}", get_matching_application(&bus, &app).await?);
        }

        Commands::Introspect { app, path, format } => {
            let bus = connect(cli.bus.as_deref(), &config).await?;
            let service = get_matching_application(&bus, &app).await?;
            let objects = get_objects(&bus, &service, &path).await?;
            let format = format.unwrap_or(config.output.format);
            print!("{}", render(&objects, format)?);
            if format == OutputFormat::Json {
                println!();
            }
        }

        Commands::Names => {
            let bus = connect(cli.bus.as_deref(), &config).await?;
            for name in candidate_names(&bus).await? {
                println!("{}", name);
            }
        }

        Commands::Config { show } => {
            if show {
                config::show(&config, cli.config.as_deref())?;
            } else {
                println!("Use --show to view current config.");
            }
        }
    }

    Ok(())
}
