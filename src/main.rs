use std::process::ExitCode;

use anyhow::Result;
use awdash::cli::run_cli;
use tracing::error;


#[tokio::main]
async fn main() -> Result<ExitCode> {

    let status = run_cli().await.inspect_err(|e| {
        error!("Error running cli {e:?}");
    })?;
    Ok(status.exit_code())
}
