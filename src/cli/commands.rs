use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stackradar", about = "Deal stack classifier and daily report generator")]
pub struct Cli {
    /// JSON config file (overrides STACKRADAR_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output options shared by the report commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Print the plain-text report to stdout instead of emailing it
    #[arg(long)]
    pub print: bool,
    /// Build the report but skip sending email
    #[arg(long)]
    pub no_email: bool,
    /// Print the report data as JSON (implies --no-email)
    #[arg(long)]
    pub json: bool,
    /// Read listings from a JSON file instead of scraping
    #[arg(long)]
    pub input: Option<PathBuf>,
}

impl ReportArgs {
    pub fn sends_email(&self) -> bool {
        !(self.print || self.no_email || self.json)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Top stacks report
    Stack(ReportArgs),
    /// Full daily feed grouped by source
    Daily(ReportArgs),
    /// Stack report and daily feed in one message
    Combined(ReportArgs),
    /// Show every annotation for a single title
    Classify {
        title: String,
        /// Source the title came from
        #[arg(long, default_value = "ozbargain")]
        source: String,
        #[arg(long, default_value = "")]
        link: String,
    },
}
