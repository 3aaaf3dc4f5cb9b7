use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::{Local, NaiveDate};
use env_logger::{Env, Target};

use crate::{
    dal::spreadsheet,
    domain::{news::ResultTable, search::SearchContext},
    services::{
        Droid, NewsSite, PictureDownloader, PictureStore, RunOutcome, SearchController,
        SiteSession,
    },
};

pub fn daily_log_path(log_dir: &Path, date: NaiveDate) -> PathBuf {
    log_dir.join(format!("{}.log", date.format("%m_%d_%Y")))
}

/// Logs to today's file under `log_dir`, or to stderr when it cannot be
/// created. `RUST_LOG` overrides the `info` default.
pub fn init_logger(log_dir: &Path) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            record.level(),
            record.args()
        )
    });

    let path = daily_log_path(log_dir, Local::now().date_naive());
    let file = std::fs::create_dir_all(log_dir).and_then(|_| File::create(&path));
    match file {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("Logging to stderr, cannot open {}: {}", path.display(), e),
    }

    builder.init();
}

/// What a run left behind: the flushed workbook, the number of records in
/// it and how the run ended.
#[derive(Debug)]
pub struct RunReport {
    pub path: PathBuf,
    pub records: usize,
    pub outcome: RunOutcome,
}

/// Searches, pages through the results and flushes the table once, whether
/// the run completed or aborted.
pub async fn collect_and_flush<S: NewsSite, P: PictureStore>(
    site: &S,
    pictures: &P,
    context: &SearchContext,
) -> anyhow::Result<RunReport> {
    let (table, outcome) = SearchController::new(site, context)
        .run(pictures, ResultTable::new())
        .await;

    let path = spreadsheet::write_results(&table, &context.settings.output)
        .context("Failed to save the results")?;

    Ok(RunReport {
        path,
        records: table.len(),
        outcome,
    })
}

/// One complete run on a live browser session. The session is closed
/// whatever the outcome.
pub async fn run(context: &SearchContext) -> anyhow::Result<RunOutcome> {
    let settings = &context.settings;

    let droid = Droid::new(&settings.webdriver)
        .await
        .context("Failed to start the browser session")?;
    let pictures = PictureDownloader::new(&settings.output, &settings.signs_to_replace);
    let site = SiteSession::new(&droid.driver, settings);

    let report = collect_and_flush(&site, &pictures, context).await;

    if let Err(e) = droid.quit().await {
        log::warn!("Failed to close the browser session: {}", e);
    }

    let report = report?;
    match &report.outcome {
        RunOutcome::Completed => log::info!(
            "Run completed, {} news in {}",
            report.records,
            report.path.display()
        ),
        RunOutcome::Aborted(reason) => log::error!(
            "Run aborted ({}), {} partial news in {}",
            reason,
            report.records,
            report.path.display()
        ),
    }

    Ok(report.outcome)
}
