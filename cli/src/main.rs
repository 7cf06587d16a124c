use clap::Parser;
use navgroup_cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Dropping the guard flushes the log file.
    let _log_guard = navgroup_cli::logging::init(cli.log_dir.as_deref())?;
    navgroup_cli::run(cli).await
}
