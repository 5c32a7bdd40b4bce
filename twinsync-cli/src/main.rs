use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twinsync::{
    menu_text, Choice, ConsoleLog, ConsolePrompter, FileLog, Mode, Prompter, Session, SyncConfig,
};

#[derive(Parser)]
#[command(name = "twinsync")]
#[command(about = "Keep directories in step between a local disk and an external drive")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level for diagnostics on stderr
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Menu choice (1-6); skips the interactive menu
    #[arg(long)]
    choice: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the menu and run the chosen synchronisation (default)
    Run,
    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigActions,
    },
}

#[derive(Subcommand)]
enum ConfigActions {
    /// Validate configuration file
    Validate,
    /// Show current configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_basic_logging(&cli.log_level)?;

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&config_path, cli.choice),
        Commands::Config { action } => match action {
            ConfigActions::Validate => validate_config(&config_path),
            ConfigActions::Show => show_config(&config_path),
        },
    }
}

fn init_basic_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::WARN,
    };

    // Diagnostics stay on stderr; stdout carries the menu and the action log.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!("twinsync={level}"))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to initialise logging")?;

    Ok(())
}

fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("twinsync").join("config.toml"))
        .context("Could not determine the user configuration directory; pass --config")
}

fn load_config(path: &Path) -> Result<SyncConfig> {
    SyncConfig::load(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn run(config_path: &Path, choice: Option<String>) -> Result<()> {
    let config = load_config(config_path)?;
    let mut prompter = ConsolePrompter::stdio();

    let answer = match choice {
        Some(answer) => answer,
        None => prompter.seek_string(&menu_text(&config))?,
    };
    let Some(choice) = Choice::from_answer(&answer) else {
        info!("No synchronisation chosen, quitting");
        return Ok(());
    };

    let session = Session::new(&config, choice);
    let stats = match choice.mode {
        Mode::Execute => {
            let mut log = FileLog::create(&config.log_file).with_context(|| {
                format!("Failed to create log file {}", config.log_file.display())
            })?;
            let result = session.run_logged(&mut prompter, &mut log);
            if let Err(e) = log.finish() {
                warn!("Failed to close log file: {}", e);
            }
            result.context("Synchronisation failed")?
        }
        Mode::Simulate => session
            .run(&mut prompter, &mut ConsoleLog)
            .context("Simulation failed")?,
    };

    info!(policy = %choice.policy, mode = %choice.mode, "{}", stats.summary());
    println!("{}", stats.summary());
    Ok(())
}

fn validate_config(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    println!(
        "Configuration is valid: {} directories between {} and {}",
        config.directories.len(),
        config.local_root.display(),
        config.external_root.display()
    );
    Ok(())
}

fn show_config(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
    println!("# {}", config_path.display());
    print!("{rendered}");
    Ok(())
}
