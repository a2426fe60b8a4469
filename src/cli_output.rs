// Terminal, plain and JSON output for profile listings and status messages
use crate::highlight::{highlight, MarkerStyle};
use crate::profile_store::{BeautifulCatalog, ProfileCatalog};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde::{Deserialize, Serialize};
use std::io::{self, IsTerminal};

/// Output mode for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with colors
    Human,
    /// Machine-readable JSON output
    Json,
    /// Plain text without colors (for pipes/logs)
    Plain,
}

impl OutputMode {
    /// Auto-detect output mode based on environment
    pub fn auto() -> Self {
        if std::env::var("ANYPROFILE_JSON").is_ok() {
            Self::Json
        } else if !io::stdout().is_terminal() {
            Self::Plain
        } else {
            Self::Human
        }
    }

    pub fn marker_style(&self) -> MarkerStyle {
        match self {
            OutputMode::Human => MarkerStyle::Ansi,
            OutputMode::Plain | OutputMode::Json => MarkerStyle::Brackets,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: String,
    pub message: String,
    pub current: Option<usize>,
    pub total: Option<usize>,
    pub percentage: Option<f64>,
    pub status: ProgressStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Running,
    Completed,
    Failed,
    Warning,
}

/// CLI output writer with mode awareness
pub struct OutputWriter {
    mode: OutputMode,
}

impl OutputWriter {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        match self.mode {
            OutputMode::Human => {
                println!();
                println!("{}", title.cyan().bold());
                println!("{}", "═".repeat(title.chars().count()).cyan());
            }
            OutputMode::Plain => {
                println!();
                println!("{}", title);
                println!("{}", "=".repeat(title.chars().count()));
            }
            OutputMode::Json => {}
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => println!("  {} {}", "✓".green(), message),
            OutputMode::Plain => println!("  [OK] {}", message),
            OutputMode::Json => self.emit_progress(status_update("info", message, ProgressStatus::Completed)),
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => eprintln!("  {} {}", "✗".red(), message),
            OutputMode::Plain => eprintln!("  [ERROR] {}", message),
            OutputMode::Json => self.emit_progress(status_update("error", message, ProgressStatus::Failed)),
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Human => println!("  {} {}", "⚠".yellow(), message),
            OutputMode::Plain => println!("  [WARN] {}", message),
            OutputMode::Json => self.emit_progress(status_update("warning", message, ProgressStatus::Warning)),
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        match self.mode {
            OutputMode::Human | OutputMode::Plain => println!("  {}", message),
            OutputMode::Json => self.emit_progress(status_update("info", message, ProgressStatus::Running)),
        }
    }

    /// Progress for non-interactive modes; human mode draws an indicatif bar instead
    pub fn progress(&self, stage: &str, current: usize, total: usize) {
        let percentage = if total == 0 {
            100.0
        } else {
            (current as f64 / total as f64 * 100.0).min(100.0)
        };

        match self.mode {
            OutputMode::Human => {}
            OutputMode::Plain => {
                println!("  [{}] {}/{} ({:.0}%)", stage, current, total, percentage);
            }
            OutputMode::Json => self.emit_progress(ProgressUpdate {
                stage: stage.to_string(),
                message: format!("Processing {}/{}", current, total),
                current: Some(current),
                total: Some(total),
                percentage: Some(percentage),
                status: if current == total {
                    ProgressStatus::Completed
                } else {
                    ProgressStatus::Running
                },
            }),
        }
    }

    fn emit_progress(&self, update: ProgressUpdate) {
        if let Ok(json) = serde_json::to_string(&update) {
            println!("{}", json);
        }
    }

    /// Emit a structured value (JSON mode only)
    pub fn emit_json<T: Serialize>(&self, value: &T) {
        if matches!(self.mode, OutputMode::Json) {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }

    /// Print every profile with its identifier
    pub fn profiles(&self, catalog: &ProfileCatalog) {
        match self.mode {
            OutputMode::Human => {
                let mut table = Table::new();
                table.load_preset(UTF8_FULL).set_header(vec!["Profile", "ID"]);
                for profile in catalog.iter() {
                    table.add_row(vec![profile.name.clone(), profile.identifier.clone()]);
                }
                println!("{table}");
            }
            OutputMode::Plain => {
                for profile in catalog.iter() {
                    println!("{}: {}", profile.name, profile.identifier);
                }
            }
            OutputMode::Json => self.emit_json(catalog),
        }
    }

    /// Print beautiful identifiers with the matched part highlighted
    pub fn beautiful(&self, catalog: &BeautifulCatalog) {
        if matches!(self.mode, OutputMode::Json) {
            self.emit_json(catalog);
            return;
        }

        if catalog.is_empty() {
            self.info("No beautiful IDs found.");
            return;
        }

        let style = self.mode.marker_style();
        for profile in catalog.iter() {
            let highlighted = highlight(&profile.identifier, &profile.beauty, style);
            match self.mode {
                OutputMode::Human => println!(
                    "  {}: {} {}",
                    profile.name.bold(),
                    highlighted,
                    format!("({})", profile.beauty.kind).dimmed()
                ),
                _ => println!("{}: {} ({})", profile.name, highlighted, profile.beauty.kind),
            }
        }
    }

    /// Print a key-value table
    pub fn table(&self, rows: &[(&str, String)]) {
        let max_key_len = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        match self.mode {
            OutputMode::Human => {
                for (key, value) in rows {
                    println!("  {:width$} │ {}", key.yellow(), value, width = max_key_len);
                }
            }
            OutputMode::Plain => {
                for (key, value) in rows {
                    println!("  {:width$} : {}", key, value, width = max_key_len);
                }
            }
            OutputMode::Json => {}
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn is_human(&self) -> bool {
        matches!(self.mode, OutputMode::Human)
    }
}

fn status_update(stage: &str, message: &str, status: ProgressStatus) -> ProgressUpdate {
    ProgressUpdate {
        stage: stage.to_string(),
        message: message.to_string(),
        current: None,
        total: None,
        percentage: None,
        status,
    }
}

/// Format duration in human-readable form
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}
