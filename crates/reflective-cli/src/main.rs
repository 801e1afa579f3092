use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use reflective_core::feedback::ResponseStyle;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

#[derive(Parser)]
#[command(name = "reflective")]
#[command(about = "Reflective - synthetic customer persona feedback on creative material", long_about = None)]
struct Cli {
    /// Directory holding config.toml, secret.json and personas.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the personas in the catalog
    Personas {
        /// Persona catalog file (.json or .toml)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Collect persona feedback on a piece of material
    Run(RunArgs),
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Persona id; repeat to select several, order is kept
    #[arg(long = "persona", required = true)]
    pub personas: Vec<String>,

    /// Material text
    #[arg(long, conflicts_with = "material_file")]
    pub material: Option<String>,

    /// Read the material text from a file
    #[arg(long)]
    pub material_file: Option<PathBuf>,

    /// Attach an image reference to the material
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// short or detailed
    #[arg(long, default_value = "short")]
    pub style: ResponseStyle,

    /// Persona catalog file (.json or .toml)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Personas processed at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Write the combined export to this file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write one export per persona into this directory
    #[arg(long)]
    pub per_persona_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let context = commands::Context::new(cli.config_dir.as_deref())?;

    match cli.command {
        Commands::Personas { catalog } => commands::personas::list(&context, catalog.as_deref()).await?,
        Commands::Run(args) => commands::run::execute(&context, args).await?,
    }

    Ok(())
}
