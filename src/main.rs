use anyhow::{bail, Context};
use clap::Parser;
use newshound::{
    cli::Cli,
    configuration::get_configuration,
    domain::search::SearchContext,
    services::RunOutcome,
    startup::{init_logger, run},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(&cli.log_dir);

    let configuration = get_configuration(&cli.config)
        .inspect_err(|e| log::error!("Failed to read configuration: {}", e))
        .with_context(|| format!("Failed to read configuration {}", cli.config.display()))?;

    let work_item = cli
        .work_item_source()
        .resolve(&configuration.work_item)
        .await
        .inspect_err(|e| log::error!("Failed to get the work item: {:#}", e))?;
    let context = SearchContext::new(work_item, configuration)?;

    match run(&context).await {
        Ok(RunOutcome::Completed) => Ok(()),
        Ok(RunOutcome::Aborted(reason)) => bail!("Run aborted: {}", reason),
        Err(e) => {
            log::error!("Run failed: {:#}", e);
            Err(e)
        }
    }
}
