use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use console_trax::cli::{
    handle_backup_command, handle_export_command, handle_part_command, handle_photo_command,
    handle_settings_command, handle_supply_command, handle_task_command, handle_timer_command,
    handle_unit_command, handle_use_command,
};
use console_trax::config::{paths::TraxPaths, settings::Settings};
use console_trax::storage::init::needs_initialization;
use console_trax::storage::Storage;

#[derive(Parser)]
#[command(
    name = "trax",
    author = "Kaylee Beyene",
    version,
    about = "Inventory and repair tracker for console refurbishment",
    long_about = "Console Trax tracks refurbishment units from check-in to sale: \
                  repair checklists, photos, labor time, parts consumed from \
                  inventory, and the resulting profit."
)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Unit management commands
    #[command(subcommand)]
    Unit(console_trax::cli::UnitCommands),

    /// Repair checklist commands
    #[command(subcommand)]
    Task(console_trax::cli::TaskCommands),

    /// Unit photo commands
    #[command(subcommand)]
    Photo(console_trax::cli::PhotoCommands),

    /// Part inventory commands
    #[command(subcommand)]
    Part(console_trax::cli::PartCommands),

    /// Attach parts to units
    #[command(subcommand, name = "use")]
    Use(console_trax::cli::UseCommands),

    /// Labor timer commands
    #[command(subcommand)]
    Timer(console_trax::cli::TimerCommands),

    /// Shop supply commands
    #[command(subcommand)]
    Supply(console_trax::cli::SupplyCommands),

    /// Backup and restore
    #[command(subcommand)]
    Backup(console_trax::cli::BackupCommands),

    /// Export data
    #[command(subcommand)]
    Export(console_trax::cli::ExportCommands),

    /// Labor rate and reminder settings
    #[command(subcommand)]
    Settings(console_trax::cli::SettingsCommands),

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Initialize paths and settings
    let paths = TraxPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    if settings.backup_due(chrono::Utc::now()) {
        eprintln!("Reminder: no backup in the last 24 hours. Run 'trax backup create'.");
    }

    match cli.command {
        Some(Commands::Unit(cmd)) => handle_unit_command(&storage, &settings, cmd)?,
        Some(Commands::Task(cmd)) => handle_task_command(&storage, cmd)?,
        Some(Commands::Photo(cmd)) => handle_photo_command(&storage, cmd)?,
        Some(Commands::Part(cmd)) => handle_part_command(&storage, &settings, cmd)?,
        Some(Commands::Use(cmd)) => handle_use_command(&storage, &settings, cmd)?,
        Some(Commands::Timer(cmd)) => handle_timer_command(&storage, &mut settings, cmd)?,
        Some(Commands::Supply(cmd)) => handle_supply_command(&storage, &settings, cmd)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&storage, &mut settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Settings(cmd)) => handle_settings_command(&paths, &mut settings, cmd)?,
        Some(Commands::Init) => {
            if !needs_initialization(&paths) {
                println!("Console Trax is already initialized at: {}", paths.base_dir().display());
                return Ok(());
            }
            println!("Initializing Console Trax at: {}", paths.base_dir().display());
            console_trax::storage::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Check in your first unit with: trax unit check-in XBX-101");
        }
        Some(Commands::Config) => {
            println!("Console Trax Configuration");
            println!("==========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Store file:       {}", paths.store_file().display());
            println!("Photos directory: {}", paths.photos_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("Settings:");
            println!(
                "  Hourly rate:     {}",
                settings.hourly_rate.format_with_symbol(&settings.currency_symbol)
            );
            println!(
                "  Backup reminder: {}",
                if settings.backup_reminder_enabled { "on" } else { "off" }
            );
        }
        None => {
            println!("Console Trax - refurbishment inventory and repair tracker");
            println!();
            println!("Run 'trax --help' for usage information.");
        }
    }

    Ok(())
}
