use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::config::Config;
use crate::tui;

/// regdesk - registration desk admin console
#[derive(Parser)]
#[command(
    name = "regdesk",
    version,
    about = "Terminal admin console for course and driver registration",
    long_about = r#"regdesk is a terminal console for administering course and driver
registrations: deleting records, uploading rosters, bulk actions, and
console settings, all driven through guided multi-step dialogs.

Examples:
  regdesk                 # Start the console
  regdesk tour            # Start with the guided tour
  regdesk --theme light   # Use the light theme"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Theme name (dark, light)
    #[arg(long = "theme", global = true)]
    pub theme: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the console with the guided tour running
    Tour,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        let mut config = Config::load();
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        config.validate()?;

        let start_tutorial = matches!(self.command, Some(Commands::Tour));
        info!(theme = %config.theme, "starting console");
        tui::run(&config, start_tutorial).await
    }
}
