use std::time::Duration;

use thirtyfour::{error::WebDriverError, prelude::ElementQueryable, By, Key, WebDriver, WebElement};

use crate::configuration::{Locator, LocatorStrategy, Settings, WebsiteSelectors};

use super::{DomError, HeaderLookup, NewsItem, NewsSite};

const IMAGE_SOURCE_ATTRIBUTE: &str = "src";

fn by(locator: &Locator) -> By {
    let value = locator.value.clone();
    match locator.strategy {
        LocatorStrategy::XPath => By::XPath(value),
        LocatorStrategy::Css => By::Css(value),
        LocatorStrategy::ClassName => By::ClassName(value),
        LocatorStrategy::Id => By::Id(value),
        LocatorStrategy::TagName => By::Tag(value),
        LocatorStrategy::Name => By::Name(value),
    }
}

/// Maps a webdriver error onto the failure classes the pagination driver
/// recovers from.
fn classify(error: WebDriverError, subject: &str) -> DomError {
    let message = format!("{}: {}", subject, error);

    match error {
        WebDriverError::NoSuchElement(..) => DomError::Missing(message),
        WebDriverError::StaleElementReference(..) => DomError::Stale(message),
        WebDriverError::ElementNotInteractable(..) | WebDriverError::ElementClickIntercepted(..) => {
            DomError::Obstructed(message)
        }
        WebDriverError::Timeout(..) => DomError::AssertionFailed(message),
        _ => DomError::Session(message),
    }
}

fn wait_failure(error: WebDriverError, locator: &Locator, condition: &str) -> DomError {
    match classify(error, &locator.to_string()) {
        DomError::Missing(message) => {
            DomError::AssertionFailed(format!("{} did not become {}", message, condition))
        }
        other => other,
    }
}

pub struct SiteSession<'a> {
    driver: &'a WebDriver,
    settings: &'a Settings,
}

impl<'a> SiteSession<'a> {
    pub fn new(driver: &'a WebDriver, settings: &'a Settings) -> Self {
        SiteSession { driver, settings }
    }

    fn selectors(&self) -> &'a WebsiteSelectors {
        &self.settings.website
    }

    async fn find(&self, locator: &Locator) -> Result<WebElement, DomError> {
        self.driver
            .find(by(locator))
            .await
            .map_err(|e| classify(e, &locator.to_string()))
    }

    async fn results_table(&self) -> Result<WebElement, DomError> {
        self.find(&self.selectors().search_results_table).await
    }

    async fn category_options(&self) -> Result<Vec<WebElement>, DomError> {
        let selectors = self.selectors();
        let table = self.find(&selectors.category_options_table).await?;

        table
            .find_all(by(&selectors.category_class_name))
            .await
            .map_err(|e| classify(e, &selectors.category_class_name.to_string()))
    }
}

async fn find_within(element: &WebElement, locator: &Locator) -> Result<WebElement, DomError> {
    element
        .find(by(locator))
        .await
        .map_err(|e| classify(e, &locator.to_string()))
}

async fn find_all_within(
    element: &WebElement,
    locator: &Locator,
) -> Result<Vec<WebElement>, DomError> {
    element
        .find_all(by(locator))
        .await
        .map_err(|e| classify(e, &locator.to_string()))
}

async fn text_of(element: &WebElement, subject: &Locator) -> Result<String, DomError> {
    element
        .text()
        .await
        .map_err(|e| classify(e, &subject.to_string()))
}

async fn click_on(element: &WebElement, subject: &Locator) -> Result<(), DomError> {
    element
        .click()
        .await
        .map_err(|e| classify(e, &subject.to_string()))
}

impl<'a> NewsSite for SiteSession<'a> {
    type Item = SiteItem<'a>;

    async fn open(&self, url: &str) -> Result<(), DomError> {
        log::info!("Opening {}", url);
        self.driver.goto(url).await.map_err(|e| classify(e, url))
    }

    async fn reload(&self) -> Result<(), DomError> {
        self.driver.refresh().await.map_err(|e| classify(e, "reload"))
    }

    async fn wait_until_visible(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), DomError> {
        self.driver
            .query(by(locator))
            .wait(timeout, self.settings.timeouts.poll_interval())
            .and_displayed()
            .first()
            .await
            .map(|_| ())
            .map_err(|e| wait_failure(e, locator, "visible"))
    }

    async fn wait_until_enabled(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<(), DomError> {
        self.driver
            .query(by(locator))
            .wait(timeout, self.settings.timeouts.poll_interval())
            .and_enabled()
            .first()
            .await
            .map(|_| ())
            .map_err(|e| wait_failure(e, locator, "enabled"))
    }

    async fn click(&self, locator: &Locator) -> Result<(), DomError> {
        let element = self.find(locator).await?;
        click_on(&element, locator).await
    }

    async fn type_and_submit(&self, locator: &Locator, text: &str) -> Result<(), DomError> {
        let element = self.find(locator).await?;
        element
            .send_keys(text)
            .await
            .map_err(|e| classify(e, &locator.to_string()))?;
        element
            .send_keys(Key::Enter)
            .await
            .map_err(|e| classify(e, &locator.to_string()))
    }

    async fn close_advertisement(&self) -> Result<(), DomError> {
        let webdriver = &self.settings.webdriver;
        let advertisement = self.find(&webdriver.main_advertisements).await?;
        let close_button =
            find_within(&advertisement, &webdriver.close_button_main_advertisement).await?;
        click_on(&close_button, &webdriver.close_button_main_advertisement).await
    }

    async fn category_labels(&self) -> Result<Vec<String>, DomError> {
        let mut labels = vec![];
        for option in self.category_options().await? {
            labels.push(text_of(&option, &self.selectors().category_class_name).await?);
        }

        Ok(labels)
    }

    async fn activate_category(&self, index: usize) -> Result<(), DomError> {
        let selectors = self.selectors();
        let options = self.category_options().await?;
        let option = options.get(index).ok_or_else(|| {
            DomError::Missing(format!("category option #{} of {}", index, options.len()))
        })?;

        let input = find_within(option, &selectors.category_input).await?;
        click_on(&input, &selectors.category_input).await
    }

    async fn result_group_count(&self) -> Result<usize, DomError> {
        let selectors = self.selectors();
        let table = self.results_table().await?;
        let search_results = find_within(&table, &selectors.search_results).await?;
        let page_list_items = find_within(&search_results, &selectors.page_list_items).await?;

        Ok(find_all_within(&page_list_items, &selectors.results_information)
            .await?
            .len())
    }

    async fn pagination_text(&self, lookup: HeaderLookup) -> Result<String, DomError> {
        let selectors = self.selectors();

        let (header, locator) = match lookup {
            HeaderLookup::Document => (
                self.find(&selectors.pagination_header).await?,
                &selectors.pagination_header,
            ),
            HeaderLookup::ResultsTable => {
                let table = self.results_table().await?;
                (
                    find_within(&table, &selectors.pagination_header).await?,
                    &selectors.pagination_header,
                )
            }
            HeaderLookup::TotalNumber => {
                let table = self.results_table().await?;
                (
                    find_within(&table, &selectors.search_result_pages_total_number).await?,
                    &selectors.search_result_pages_total_number,
                )
            }
        };

        text_of(&header, locator).await
    }

    async fn result_items(&self) -> Result<Vec<SiteItem<'a>>, DomError> {
        let selectors = self.selectors();
        let table = self.results_table().await?;
        let search_results = find_within(&table, &selectors.search_results).await?;

        Ok(find_all_within(&search_results, &selectors.results_information)
            .await?
            .into_iter()
            .map(|element| SiteItem {
                element,
                selectors,
            })
            .collect())
    }

    async fn next_page(&self) -> Result<(), DomError> {
        let selectors = self.selectors();
        let table = self.results_table().await?;
        let next_page = find_within(&table, &selectors.next_page).await?;
        click_on(&next_page, &selectors.next_page).await
    }
}

/// One rendered search result.
pub struct SiteItem<'a> {
    element: WebElement,
    selectors: &'a WebsiteSelectors,
}

impl SiteItem<'_> {
    async fn text_at(&self, locator: &Locator) -> Result<String, DomError> {
        let element = find_within(&self.element, locator).await?;
        text_of(&element, locator).await
    }
}

impl NewsItem for SiteItem<'_> {
    async fn title(&self) -> Result<String, DomError> {
        self.text_at(&self.selectors.news_title).await
    }

    async fn description(&self) -> Result<String, DomError> {
        self.text_at(&self.selectors.news_description).await
    }

    async fn date(&self) -> Result<String, DomError> {
        self.text_at(&self.selectors.news_date).await
    }

    async fn image_source(&self) -> Result<String, DomError> {
        let locator = &self.selectors.image_tag_name;
        let image = find_within(&self.element, locator).await?;

        image
            .attr(IMAGE_SOURCE_ATTRIBUTE)
            .await
            .map_err(|e| classify(e, &locator.to_string()))?
            .ok_or_else(|| DomError::Missing(format!("{} has no {}", locator, IMAGE_SOURCE_ATTRIBUTE)))
    }
}

