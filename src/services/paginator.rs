use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{
    news::{PageCursor, ResultRecord, ResultTable},
    search::SearchContext,
};

use super::{DomError, FieldExtractor, HeaderLookup, NewsSite, PictureStore};

/// Page reloads granted per run for elements that have not rendered yet.
pub const MISSING_ELEMENT_RETRIES: usize = 4;

static TOTAL_AFTER_OF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bof\s+(\d[\d,]*)").expect("valid total pages regex"));
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("valid number regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbortReason {
    #[error("{0}")]
    MissingElement(String),
    #[error("required element still missing after {retries} page reloads: {0}", retries = MISSING_ELEMENT_RETRIES)]
    ReloadBudgetExhausted(String),
    #[error("{0}")]
    StaleElement(String),
    #[error("{0}")]
    AssertionFailed(String),
    #[error("{0}")]
    Obstructed(String),
    #[error("malformed pagination header: {0:?}")]
    MalformedHeader(String),
    #[error("category {0:?} is not offered by the search filter")]
    CategoryNotFound(String),
    #[error("{0}")]
    Session(String),
}

impl From<DomError> for AbortReason {
    fn from(error: DomError) -> Self {
        let message = error.to_string();
        match error {
            DomError::Missing(_) => AbortReason::MissingElement(message),
            DomError::Stale(_) => AbortReason::StaleElement(message),
            DomError::AssertionFailed(_) => AbortReason::AssertionFailed(message),
            DomError::Obstructed(_) => AbortReason::Obstructed(message),
            DomError::Session(_) => AbortReason::Session(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Aborted(AbortReason),
}

/// Extracts the total from headers like `Page 1 of 1,234 results` or
/// `1 of 10\nresults`: the number after `of`, else the last number.
pub fn parse_total_pages(header: &str) -> Option<u32> {
    let digits = match TOTAL_AFTER_OF.captures(header) {
        Some(captures) => captures.get(1)?.as_str(),
        None => NUMBER.find_iter(header).last()?.as_str(),
    };

    digits.replace(',', "").parse().ok()
}

pub struct Paginator<'a, S, P> {
    site: &'a S,
    context: &'a SearchContext,
    extractor: FieldExtractor<'a, P>,
}

impl<'a, S: NewsSite, P: PictureStore> Paginator<'a, S, P> {
    pub fn new(site: &'a S, pictures: &'a P, context: &'a SearchContext) -> Self {
        Paginator {
            site,
            context,
            extractor: FieldExtractor::new(pictures, &context.search_phrase),
        }
    }

    /// Walks every result page and returns the table together with how the
    /// walk ended. The table is never flushed here.
    pub async fn run(&self, mut table: ResultTable) -> (ResultTable, RunOutcome) {
        let mut cursor = match self.initialize().await {
            Ok(Some(cursor)) => cursor,
            Ok(None) => return (table, RunOutcome::Completed),
            Err(reason) => {
                log::error!("Aborting before the first result page: {}", reason);
                return (table, RunOutcome::Aborted(reason));
            }
        };

        let mut staged = vec![];
        let mut missing_strikes = 0;

        while cursor.has_more() {
            let failure = match self.visit_page(&mut cursor, &mut table, &mut staged).await {
                Ok(()) => continue,
                Err(failure) => failure,
            };

            let recovery = match failure {
                DomError::Missing(e) if missing_strikes < MISSING_ELEMENT_RETRIES => {
                    missing_strikes += 1;
                    log::warn!(
                        "It was not possible to find a required element, a page reload will be executed ({}/{}): {}",
                        missing_strikes,
                        MISSING_ELEMENT_RETRIES,
                        e
                    );
                    self.reload().await.map_err(AbortReason::from)
                }
                DomError::Missing(e) => Err(AbortReason::ReloadBudgetExhausted(e)),
                DomError::Obstructed(e) => {
                    log::warn!("Interaction blocked, closing advertisement: {}", e);
                    self.dismiss_overlay().await.map_err(AbortReason::from)
                }
                other => Err(other.into()),
            };

            if let Err(reason) = recovery {
                log::warn!(
                    "Aborting on page {} of {}: {}",
                    cursor.current() + 1,
                    cursor.total(),
                    reason
                );
                table.extend(staged.drain(..));
                return (table, RunOutcome::Aborted(reason));
            }
        }

        (table, RunOutcome::Completed)
    }

    async fn initialize(&self) -> Result<Option<PageCursor>, AbortReason> {
        let settings = &self.context.settings;

        let groups = self.site.result_group_count().await?;
        if groups == 0 {
            log::info!("No news found for {}", self.context.search_phrase);
            return Ok(None);
        }

        self.site
            .wait_until_visible(
                &settings.website.total_results,
                settings.timeouts.initial_results(),
            )
            .await?;
        tokio::time::sleep(settings.timeouts.settle()).await;

        let header = self.pagination_header().await?;
        let total = parse_total_pages(&header).ok_or(AbortReason::MalformedHeader(header))?;
        log::info!(
            "Found {} result pages for {}",
            total,
            self.context.search_phrase
        );

        Ok(Some(PageCursor::new(total)))
    }

    async fn pagination_header(&self) -> Result<String, AbortReason> {
        let mut last_failure = String::new();

        for lookup in HeaderLookup::ORDER {
            match self.site.pagination_text(lookup).await {
                Ok(text) => return Ok(text),
                Err(DomError::Obstructed(e)) => {
                    log::warn!("Pagination header {:?} is obstructed: {}", lookup, e);
                    self.site.close_advertisement().await?;
                    last_failure = e;
                }
                Err(DomError::Missing(e)) | Err(DomError::Stale(e)) => {
                    log::warn!("Pagination header {:?} not available: {}", lookup, e);
                    last_failure = e;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AbortReason::MissingElement(format!(
            "pagination header: {}",
            last_failure
        )))
    }

    /// Items of a page reach the table only once the whole page was
    /// extracted, a retried page starts over with an empty `staged`.
    async fn visit_page(
        &self,
        cursor: &mut PageCursor,
        table: &mut ResultTable,
        staged: &mut Vec<ResultRecord>,
    ) -> Result<(), DomError> {
        let settings = &self.context.settings;

        if !cursor.is_extracted() {
            staged.clear();
            self.site
                .wait_until_visible(
                    &settings.website.search_results_table,
                    settings.timeouts.page_load(),
                )
                .await?;

            for item in self.site.result_items().await?.iter() {
                staged.push(self.extractor.extract(item).await?);
            }

            log::info!(
                "Collected {} news from page {} of {}",
                staged.len(),
                cursor.current() + 1,
                cursor.total()
            );
            table.extend(staged.drain(..));
            cursor.mark_extracted();
        }

        if !cursor.is_last() {
            self.site.next_page().await?;
        }
        cursor.advance();

        Ok(())
    }

    async fn reload(&self) -> Result<(), DomError> {
        let settings = &self.context.settings;
        self.site.reload().await?;
        self.site
            .wait_until_visible(&settings.website.total_results, settings.timeouts.recovery())
            .await
    }

    async fn dismiss_overlay(&self) -> Result<(), DomError> {
        let settings = &self.context.settings;
        self.site.close_advertisement().await?;
        self.site
            .wait_until_visible(&settings.website.total_results, settings.timeouts.recovery())
            .await
    }
}
