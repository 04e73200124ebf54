use anyhow::Result;
use clap::Parser;

use scriptflow::cli::commands::{
    Command, GenerateCommand, InitCommand, InteractiveCommand, ServeCommand, TableCommand,
};
use scriptflow::cli::{Cli, Commands};
use scriptflow::{config, init_config, init_telemetry};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config()?.clone();
    init_telemetry(&config.observability)?;
    init_config()?;

    tokio::runtime::Runtime::new()?.block_on(async {
        match cli.command {
            None | Some(Commands::Interactive) => InteractiveCommand::new(config).execute().await,
            Some(Commands::Generate { requirements }) => {
                GenerateCommand::new(requirements.join(" "), config)
                    .execute()
                    .await
            }
            Some(Commands::Serve { bind }) => {
                ServeCommand::new(config).with_bind(bind).execute().await
            }
            Some(Commands::Table) => TableCommand.execute().await,
            Some(Commands::Init { path, force }) => InitCommand::new(path, force).execute().await,
        }
    })
}
