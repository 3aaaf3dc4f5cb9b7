use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
    time::Duration,
};

use crate::{
    configuration::{parse_configuration, Locator, Settings},
    domain::search::{SearchContext, WorkItem},
    services::{DomError, HeaderLookup, NewsItem, NewsSite, PictureStore},
};

pub const SAMPLE_CONFIGURATION: &str = r#"
webdriver:
  browser: firefox
  headless: true
  main_advertisements: "xpath://modality-custom-element"
  close_button_main_advertisement: "css:a.met-flyout-close"
website:
  page_header_visible_element: "css:header.page-header"
  search_button: "css:button[data-element='search-button']"
  search_field: "css:input[data-element='search-form-input']"
  filter_title_visible_element: "class:search-filter"
  category_title: "css:button.see-all-button"
  category_options_table: "class:checkbox-input-list"
  category_class_name: "class:checkbox-input"
  clear_categories_selected: "class:search-filter-input-clear"
  search_results_table: "class:search-results-module-results-header"
  search_results: "class:search-results-module-results-menu"
  page_list_items: "tag:li"
  results_information: "class:promo-wrapper"
  total_results: "class:search-results-module-count-desktop"
  search_result_pages_total_number: "class:search-results-module-page-counts"
  news_title: "class:promo-title"
  news_date: "class:promo-timestamp"
  news_description: "class:promo-description"
  image_tag_name: "tag:img"
  next_page:
    "css:div.search-results-module-next-page a"
output:
  excel_files_path: output
  excel_files_extension: ".xlsx"
  downloaded_pictures_path: output/pictures
  pictures_extension: jpg
signs_to_replace: ["?", ":", "/", "\""]
timeouts:
  page_load_secs: 1
  recovery_secs: 1
  settle_secs: 0
  poll_interval_millis: "10"
"#;

pub fn sample_settings() -> Settings {
    parse_configuration(SAMPLE_CONFIGURATION).expect("Failed to parse sample configuration.")
}

pub fn sample_context(search_phrase: &str) -> SearchContext {
    let work_item = WorkItem {
        url: "https://www.latimes.com/".to_string(),
        search_phrase: search_phrase.to_string(),
        category: "Politics".to_string(),
    };

    SearchContext::new(work_item, sample_settings()).expect("Failed to build sample context.")
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Open,
    Reload,
    Wait(String),
    WaitEnabled(String),
    Click(String),
    Type(String),
    CloseAdvertisement,
    CategoryLabels,
    ActivateCategory,
    GroupCount,
    Pagination(HeaderLookup),
    ResultItems,
    NextPage,
}

/// Scripted news website. Every call is recorded as a [`Step`] and consumes
/// the next failure queued for it, page specific failures first.
pub struct FakeSite {
    pages: Vec<Vec<FakeItem>>,
    header: String,
    categories: Vec<String>,
    current: Cell<usize>,
    calls: RefCell<Vec<Step>>,
    failures: RefCell<HashMap<Step, VecDeque<DomError>>>,
    page_failures: RefCell<HashMap<(usize, Step), VecDeque<DomError>>>,
    pub opened: RefCell<Vec<String>>,
    pub typed: RefCell<Vec<String>>,
    pub activated: Cell<Option<usize>>,
}

impl FakeSite {
    pub fn new(pages: Vec<Vec<FakeItem>>) -> Self {
        FakeSite {
            header: format!("Page 1 of {}", pages.len()),
            pages,
            categories: ["SPORTS (12)", "POLITICS (34)", "WORLD & NATION (5)"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            current: Cell::new(0),
            calls: RefCell::new(vec![]),
            failures: RefCell::new(HashMap::new()),
            page_failures: RefCell::new(HashMap::new()),
            opened: RefCell::new(vec![]),
            typed: RefCell::new(vec![]),
            activated: Cell::new(None),
        }
    }

    pub fn with_header(mut self, header: &str) -> Self {
        self.header = header.to_string();
        self
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn fail(&self, step: Step, error: DomError) {
        self.failures
            .borrow_mut()
            .entry(step)
            .or_default()
            .push_back(error);
    }

    pub fn fail_on_page(&self, page: usize, step: Step, times: usize, error: DomError) {
        let mut page_failures = self.page_failures.borrow_mut();
        let queue = page_failures.entry((page, step)).or_default();
        for _ in 0..times {
            queue.push_back(error.clone());
        }
    }

    pub fn count(&self, step: &Step) -> usize {
        self.calls.borrow().iter().filter(|s| *s == step).count()
    }

    fn record(&self, step: Step) -> Result<(), DomError> {
        self.calls.borrow_mut().push(step.clone());

        let on_page = self
            .page_failures
            .borrow_mut()
            .get_mut(&(self.current.get(), step.clone()))
            .and_then(VecDeque::pop_front);
        let failure = on_page.or_else(|| {
            self.failures
                .borrow_mut()
                .get_mut(&step)
                .and_then(VecDeque::pop_front)
        });

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl NewsSite for FakeSite {
    type Item = FakeItem;

    async fn open(&self, url: &str) -> Result<(), DomError> {
        self.record(Step::Open)?;
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }

    async fn reload(&self) -> Result<(), DomError> {
        self.record(Step::Reload)
    }

    async fn wait_until_visible(&self, locator: &Locator, _: Duration) -> Result<(), DomError> {
        self.record(Step::Wait(locator.value.clone()))
    }

    async fn wait_until_enabled(&self, locator: &Locator, _: Duration) -> Result<(), DomError> {
        self.record(Step::WaitEnabled(locator.value.clone()))
    }

    async fn click(&self, locator: &Locator) -> Result<(), DomError> {
        self.record(Step::Click(locator.value.clone()))
    }

    async fn type_and_submit(&self, locator: &Locator, text: &str) -> Result<(), DomError> {
        self.record(Step::Type(locator.value.clone()))?;
        self.typed.borrow_mut().push(text.to_string());
        Ok(())
    }

    async fn close_advertisement(&self) -> Result<(), DomError> {
        self.record(Step::CloseAdvertisement)
    }

    async fn category_labels(&self) -> Result<Vec<String>, DomError> {
        self.record(Step::CategoryLabels)?;
        Ok(self.categories.clone())
    }

    async fn activate_category(&self, index: usize) -> Result<(), DomError> {
        self.record(Step::ActivateCategory)?;
        self.activated.set(Some(index));
        Ok(())
    }

    async fn result_group_count(&self) -> Result<usize, DomError> {
        self.record(Step::GroupCount)?;
        Ok(self.pages.first().map_or(0, Vec::len))
    }

    async fn pagination_text(&self, lookup: HeaderLookup) -> Result<String, DomError> {
        self.record(Step::Pagination(lookup))?;
        Ok(self.header.clone())
    }

    async fn result_items(&self) -> Result<Vec<FakeItem>, DomError> {
        self.record(Step::ResultItems)?;
        Ok(self
            .pages
            .get(self.current.get())
            .cloned()
            .unwrap_or_default())
    }

    async fn next_page(&self) -> Result<(), DomError> {
        self.record(Step::NextPage)?;
        if self.current.get() + 1 < self.pages.len() {
            self.current.set(self.current.get() + 1);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FakeItem {
    title: Result<String, DomError>,
    description: Result<String, DomError>,
    date: Result<String, DomError>,
    image: Result<String, DomError>,
}

impl FakeItem {
    pub fn new(title: &str, description: &str, date: &str) -> Self {
        FakeItem {
            title: Ok(title.to_string()),
            description: Ok(description.to_string()),
            date: Ok(date.to_string()),
            image: Err(DomError::Missing("tag:img".to_string())),
        }
    }

    pub fn with_image(mut self, source_url: &str) -> Self {
        self.image = Ok(source_url.to_string());
        self
    }

    pub fn with_title(mut self, title: Result<String, DomError>) -> Self {
        self.title = title;
        self
    }

    pub fn with_description(mut self, description: Result<String, DomError>) -> Self {
        self.description = description;
        self
    }

    pub fn with_date(mut self, date: Result<String, DomError>) -> Self {
        self.date = date;
        self
    }
}

impl NewsItem for FakeItem {
    async fn title(&self) -> Result<String, DomError> {
        self.title.clone()
    }

    async fn description(&self) -> Result<String, DomError> {
        self.description.clone()
    }

    async fn date(&self) -> Result<String, DomError> {
        self.date.clone()
    }

    async fn image_source(&self) -> Result<String, DomError> {
        self.image.clone()
    }
}

/// Records every saved picture instead of downloading it.
#[derive(Default)]
pub struct FakePictures {
    pub saved: RefCell<Vec<(String, String)>>,
    unreachable: bool,
}

impl FakePictures {
    pub fn failing() -> Self {
        FakePictures {
            saved: RefCell::new(vec![]),
            unreachable: true,
        }
    }
}

impl PictureStore for FakePictures {
    async fn save(&self, source_url: &str, title: &str) -> anyhow::Result<String> {
        if self.unreachable {
            anyhow::bail!("picture host unreachable");
        }

        self.saved
            .borrow_mut()
            .push((source_url.to_string(), title.to_string()));
        Ok(format!("pictures/{}.jpg", title))
    }
}
