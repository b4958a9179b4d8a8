mod commands;
mod terminal;

use anyhow::Context;
use commands::{CommandLine, Commands, once, run, targets};
use siprtt_common::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    terminal::logging::init_logging(commands.verbose);

    let cfg = Config::load(&commands.config).with_context(|| {
        format!(
            "cannot start without configuration ({})",
            commands.config.display()
        )
    })?;

    match commands.command.unwrap_or(Commands::Run) {
        Commands::Run => run::run(&cfg).await,
        Commands::Once { dry_run } => once::once(&cfg, dry_run).await,
        Commands::Targets => targets::targets(&cfg).await,
    }
}
