pub mod dashboard;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dashboard::{process_dashboard_command, DashboardCommand, PipelineStatus};
use tracing::level_filters::LevelFilter;

use crate::utils::logging::enable_logging;

#[derive(Parser, Debug)]
#[command(name = "awdash", version, long_about = None)]
#[command(about = "Dashboard for ActivityWatch data exports", long_about = None)]
struct Args {
    #[command(flatten)]
    command: DashboardCommand,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long = "log-dir",
        help = "Also write logs into daily rotated files inside this directory"
    )]
    log_dir: Option<PathBuf>,
}

pub async fn run_cli() -> Result<PipelineStatus> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(args.log_dir.as_deref(), logging_level, args.log)?;

    process_dashboard_command(args.command).await
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::Args;

    #[test]
    fn arguments_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn logging_flags() {
        let args = Args::parse_from(["awdash", "--log", "--log-dir", "/tmp/awdash", "export.json"]);
        assert!(args.log);
        assert_eq!(args.log_dir.as_deref(), Some(std::path::Path::new("/tmp/awdash")));
    }
}
