use crate::domain::{news::ResultTable, search::SearchContext};

use super::{AbortReason, DomError, NewsSite, Paginator, PictureStore, RunOutcome};

pub struct SearchController<'a, S> {
    site: &'a S,
    context: &'a SearchContext,
}

impl<'a, S: NewsSite> SearchController<'a, S> {
    pub fn new(site: &'a S, context: &'a SearchContext) -> Self {
        SearchController { site, context }
    }

    /// Opens the website, searches, applies the category filter and pages
    /// through the results. Setup failures end the run with an empty table.
    pub async fn run<P: PictureStore>(
        &self,
        pictures: &P,
        table: ResultTable,
    ) -> (ResultTable, RunOutcome) {
        if let Err(reason) = self.prepare().await {
            log::error!("Search could not be prepared: {}", reason);
            return (table, RunOutcome::Aborted(reason));
        }

        Paginator::new(self.site, pictures, self.context)
            .run(table)
            .await
    }

    async fn prepare(&self) -> Result<(), AbortReason> {
        self.open_news_website().await?;
        self.search_news().await?;
        self.select_category().await
    }

    pub async fn open_news_website(&self) -> Result<(), AbortReason> {
        let settings = &self.context.settings;
        let header = &settings.website.page_header_visible_element;

        self.site.open(self.context.url.as_str()).await?;
        if let Err(e) = self
            .site
            .wait_until_visible(header, settings.timeouts.page_load())
            .await
        {
            log::warn!(
                "Reloading page, it was not possible to establish a connection: {}",
                e
            );
            self.site.reload().await?;
            self.site
                .wait_until_visible(header, settings.timeouts.page_load())
                .await?;
        }

        Ok(())
    }

    pub async fn search_news(&self) -> Result<(), AbortReason> {
        log::info!("Searching for {}", self.context.search_phrase);

        match self.submit_search().await {
            Ok(()) => Ok(()),
            Err(DomError::Missing(e)) | Err(DomError::Obstructed(e)) => {
                log::warn!("Search control is not reachable, closing advertisement: {}", e);
                self.site.close_advertisement().await?;

                match self.submit_search().await {
                    Ok(()) => Ok(()),
                    Err(DomError::Missing(e)) => {
                        log::warn!("Search control still missing, typing the phrase directly: {}", e);
                        Ok(self.type_phrase().await?)
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn select_category(&self) -> Result<(), AbortReason> {
        let settings = &self.context.settings;
        let selectors = &settings.website;

        self.site
            .wait_until_visible(
                &selectors.filter_title_visible_element,
                settings.timeouts.recovery(),
            )
            .await?;
        self.site.click(&selectors.category_title).await?;

        let labels = self.site.category_labels().await?;
        let index = labels
            .iter()
            .position(|label| label.contains(self.context.category.as_str()))
            .ok_or_else(|| AbortReason::CategoryNotFound(self.context.category.clone()))?;
        log::info!("Selecting category {}", labels[index]);

        self.site.activate_category(index).await?;
        self.site
            .wait_until_visible(
                &selectors.clear_categories_selected,
                settings.timeouts.recovery(),
            )
            .await?;

        Ok(())
    }

    async fn submit_search(&self) -> Result<(), DomError> {
        let settings = &self.context.settings;

        self.site.click(&settings.website.search_button).await?;
        self.site
            .wait_until_enabled(&settings.website.search_field, settings.timeouts.page_load())
            .await?;
        self.type_phrase().await
    }

    async fn type_phrase(&self) -> Result<(), DomError> {
        let search_field = &self.context.settings.website.search_field;

        self.site.click(search_field).await?;
        self.site
            .type_and_submit(search_field, &self.context.search_phrase)
            .await
    }
}
