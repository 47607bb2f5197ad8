use catalog_extract::cli;
use clap::{Parser, Subcommand, ValueEnum, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Catalog Extract: pull dashboard and table metadata from Tableau and Snowflake as catalog models
#[derive(Parser)]
#[command(name = "catex", version, styles = STYLES)]
struct Cli {
    /// YAML configuration file with connection settings and extractor scopes
    #[arg(short, long, global = true, default_value = "catex.yml")]
    config: PathBuf,

    /// The dotenv file to source credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract Tableau workbook owners as dashboard owners
    TableauOwner {
        /// NDJSON file to write (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract Tableau workbook owners as catalog users
    TableauUser {
        /// NDJSON file to write (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract Tableau workbook views as dashboard queries
    TableauView {
        /// NDJSON file to write (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract Snowflake table owners from INFORMATION_SCHEMA
    SnowflakeOwner {
        /// NDJSON file to write (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Test authorization to a source
    Auth {
        /// Source to test
        #[arg(value_enum)]
        source: Source,
    },
}

#[derive(Clone, Debug, ValueEnum)]
enum Source {
    Tableau,
    Snowflake,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let env_loaded = dotenvy::from_filename(&cli.env).is_ok();

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    if !env_loaded {
        log::debug!("No dotenv file loaded from {}", cli.env.bright_black());
    }

    let config = cli::load_config(&cli.config)?;

    match cli.command {
        Commands::TableauOwner { output } => {
            log::info!("Extracting {} from Tableau", "dashboard owners".cyan());
            let count = cli::extract_tableau_owners(&config, output.as_deref()).await?;
            log::info!("✓ Extracted {} dashboard owner(s)", count);
        }
        Commands::TableauUser { output } => {
            log::info!("Extracting {} from Tableau", "users".cyan());
            let count = cli::extract_tableau_users(&config, output.as_deref()).await?;
            log::info!("✓ Extracted {} user(s)", count);
        }
        Commands::TableauView { output } => {
            log::info!("Extracting {} from Tableau", "dashboard queries".cyan());
            let count = cli::extract_tableau_views(&config, output.as_deref()).await?;
            log::info!("✓ Extracted {} dashboard query(ies)", count);
        }
        Commands::SnowflakeOwner { output } => {
            log::info!("Extracting {} from Snowflake", "table owners".cyan());
            let count = cli::extract_snowflake_owners(&config, output.as_deref()).await?;
            log::info!("✓ Extracted {} table owner(s)", count);
        }
        Commands::Auth { source } => {
            log::info!("Testing authorization to {}", format!("{:?}", source).bright_black());
            match source {
                Source::Tableau => cli::test_tableau_auth(&config).await?,
                Source::Snowflake => cli::test_snowflake_auth(&config).await?,
            }
        }
    }

    Ok(())
}
