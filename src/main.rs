use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

mod app;
mod applier;
mod classifier;
mod cli_output;
mod error;
mod fs_ops;
mod highlight;
mod menu;
mod process;
mod profile_store;
mod rotation;
mod settings;
mod system_conf;

use app::App;
use cli_output::{OutputMode, OutputWriter};
use settings::Settings;

#[derive(Parser)]
#[command(name = "anyprofile")]
#[command(about = "Generate client identity profiles and find beautiful IDs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Profiles directory (default: ./profiles next to the program)
    #[arg(short, long, global = true)]
    profiles_dir: Option<PathBuf>,

    /// Settings file (default: <config dir>/anyprofile/settings.json)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan profiles and list their IDs
    List,

    /// Generate new profiles by cycling the client
    Generate {
        /// Number of IDs to generate
        #[arg(short = 'n', long)]
        count: usize,

        /// Path to the client executable
        #[arg(short, long)]
        exe: Option<PathBuf>,

        /// Seconds to wait for the client to write its config
        #[arg(short, long)]
        wait: Option<u64>,
    },

    /// Show beautiful IDs with the matching part highlighted
    Beautiful,

    /// Print the configuration of the profile holding an ID
    Lookup {
        /// Identifier to look up
        id: String,
    },

    /// Copy a stored profile into the client's live configuration and start it
    Apply {
        /// Profile name, e.g. AD1
        name: String,
    },

    /// Show or initialize settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show effective settings
    Show,
    /// Write default settings to the settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(Settings::settings_file_path);
    let mut settings = Settings::load_from(&settings_path)?;
    if let Some(dir) = cli.profiles_dir {
        settings.profiles_dir = Some(dir);
    }
    debug!("settings={:?}", settings);

    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::auto()
    };
    let output = OutputWriter::new(mode);

    if let Some(Commands::Settings { action }) = &cli.command {
        return settings_command(action, &settings, &settings_path, &output);
    }

    let mut app = App::new(settings, output)?;

    match cli.command {
        None => menu::run(&mut app, io::stdin().lock()),

        Some(Commands::List) => {
            app.list();
            Ok(())
        }

        Some(Commands::Generate { count, exe, wait }) => app.generate(count, exe, wait),

        Some(Commands::Beautiful) => {
            app.show_beautiful();
            Ok(())
        }

        Some(Commands::Lookup { id }) => Ok(app.lookup(&id)?),

        Some(Commands::Apply { name }) => app.apply(&name),

        Some(Commands::Settings { .. }) => Ok(()),
    }
}

fn settings_command(
    action: &SettingsAction,
    settings: &Settings,
    path: &Path,
    output: &OutputWriter,
) -> Result<()> {
    match action {
        SettingsAction::Show => {
            if matches!(output.mode(), OutputMode::Json) {
                output.emit_json(settings);
                return Ok(());
            }

            output.section("Settings");
            let live_config = settings
                .live_config_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|e| e.to_string());
            output.table(&[
                ("Settings file", path.display().to_string()),
                ("Profiles dir", settings.profiles_dir().display().to_string()),
                ("App name", settings.app_name.clone()),
                ("Process name", settings.process_name.clone()),
                ("Executable", settings.executable().display().to_string()),
                ("Live config", live_config),
                ("Profile prefix", settings.profile_prefix.clone()),
                ("Wait", cli_output::format_duration(settings.wait_seconds)),
            ]);
            Ok(())
        }

        SettingsAction::Init { force } => {
            if path.exists() && !force {
                output.warning(&format!(
                    "{} already exists, use --force to overwrite",
                    path.display()
                ));
                return Ok(());
            }
            Settings::default().save_to(path)?;
            output.success(&format!("Wrote {}", path.display()));
            Ok(())
        }
    }
}
