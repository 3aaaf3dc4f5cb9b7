use std::{fmt, path::Path, str::FromStr, time::Duration};

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub webdriver: WebDriverSettings,
    pub website: WebsiteSelectors,
    pub output: OutputSettings,
    #[serde(default)]
    pub signs_to_replace: Vec<String>,
    #[serde(default)]
    pub timeouts: TimeoutSettings,
    #[serde(default)]
    pub work_item: WorkItemSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct WebDriverSettings {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default)]
    pub browser: BrowserKind,
    #[serde(default)]
    pub headless: bool,
    pub main_advertisements: Locator,
    pub close_button_main_advertisement: Locator,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Firefox,
    Chrome,
}

/// Locators of the news website. Every entry except the two with defaults must
/// be present in the configuration file.
#[derive(Deserialize, Clone, Debug)]
pub struct WebsiteSelectors {
    pub page_header_visible_element: Locator,
    pub search_button: Locator,
    pub search_field: Locator,
    pub filter_title_visible_element: Locator,
    pub category_title: Locator,
    pub category_options_table: Locator,
    pub category_class_name: Locator,
    #[serde(default = "default_category_input")]
    pub category_input: Locator,
    pub clear_categories_selected: Locator,
    pub search_results_table: Locator,
    pub search_results: Locator,
    pub page_list_items: Locator,
    pub results_information: Locator,
    pub total_results: Locator,
    #[serde(default = "default_pagination_header")]
    pub pagination_header: Locator,
    pub search_result_pages_total_number: Locator,
    pub news_title: Locator,
    pub news_date: Locator,
    pub news_description: Locator,
    pub image_tag_name: Locator,
    pub next_page: Locator,
}

#[derive(Deserialize, Clone, Debug)]
pub struct OutputSettings {
    pub excel_files_path: String,
    pub excel_files_extension: String,
    pub downloaded_pictures_path: String,
    pub pictures_extension: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TimeoutSettings {
    #[serde(
        default = "default_page_load_secs",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub page_load_secs: u64,
    #[serde(
        default = "default_initial_results_secs",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub initial_results_secs: u64,
    #[serde(
        default = "default_recovery_secs",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub recovery_secs: u64,
    #[serde(
        default = "default_settle_secs",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub settle_secs: u64,
    #[serde(
        default = "default_poll_interval_millis",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub poll_interval_millis: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        TimeoutSettings {
            page_load_secs: default_page_load_secs(),
            initial_results_secs: default_initial_results_secs(),
            recovery_secs: default_recovery_secs(),
            settle_secs: default_settle_secs(),
            poll_interval_millis: default_poll_interval_millis(),
        }
    }
}

impl TimeoutSettings {
    pub fn page_load(&self) -> Duration {
        Duration::from_secs(self.page_load_secs)
    }

    pub fn initial_results(&self) -> Duration {
        Duration::from_secs(self.initial_results_secs)
    }

    pub fn recovery(&self) -> Duration {
        Duration::from_secs(self.recovery_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct WorkItemSettings {
    pub webpage_url: Option<String>,
    pub search_phrase: Option<String>,
    pub category: Option<String>,
    #[serde(default = "default_work_item_env_var")]
    pub env_var: String,
    pub api: Option<WorkItemApiSettings>,
}

impl Default for WorkItemSettings {
    fn default() -> Self {
        WorkItemSettings {
            webpage_url: None,
            search_phrase: None,
            category: None,
            env_var: default_work_item_env_var(),
            api: None,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct WorkItemApiSettings {
    pub url: String,
    pub token: Option<String>,
    #[serde(
        default = "default_api_poll_interval_secs",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub poll_interval_secs: u64,
    #[serde(
        default = "default_api_max_attempts",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorStrategy {
    XPath,
    Css,
    ClassName,
    Id,
    TagName,
    Name,
}

/// An element locator as written in the configuration file, e.g.
/// `xpath://div[@id="main"]`, `class:promo-title` or a bare `//h3`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "String")]
pub struct Locator {
    pub strategy: LocatorStrategy,
    pub value: String,
}

impl Locator {
    pub fn new(strategy: LocatorStrategy, value: impl Into<String>) -> Self {
        Locator {
            strategy,
            value: value.into(),
        }
    }
}

impl FromStr for Locator {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();

        let (strategy, value) = match raw.split_once(':') {
            Some((prefix, rest)) => match prefix.trim().to_lowercase().as_str() {
                "xpath" => (LocatorStrategy::XPath, rest),
                "css" => (LocatorStrategy::Css, rest),
                "class" => (LocatorStrategy::ClassName, rest),
                "id" => (LocatorStrategy::Id, rest),
                "tag" => (LocatorStrategy::TagName, rest),
                "name" => (LocatorStrategy::Name, rest),
                _ => (bare_strategy(raw), raw),
            },
            None => (bare_strategy(raw), raw),
        };

        let value = value.trim();
        match value.is_empty() {
            true => Err(format!("locator {:?} has an empty value", raw)),
            false => Ok(Locator::new(strategy, value)),
        }
    }
}

impl TryFrom<String> for Locator {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.strategy {
            LocatorStrategy::XPath => "xpath",
            LocatorStrategy::Css => "css",
            LocatorStrategy::ClassName => "class",
            LocatorStrategy::Id => "id",
            LocatorStrategy::TagName => "tag",
            LocatorStrategy::Name => "name",
        };
        write!(f, "{}:{}", prefix, self.value)
    }
}

fn bare_strategy(raw: &str) -> LocatorStrategy {
    match raw.starts_with('/') || raw.starts_with('(') {
        true => LocatorStrategy::XPath,
        false => LocatorStrategy::Css,
    }
}

/// Reads the YAML configuration file at `path`, then `APP_` environment
/// overrides. A missing file is not an error by itself, but every required
/// locator must still be supplied by some source.
pub fn get_configuration(path: &Path) -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(
            config::File::new(&path.to_string_lossy(), config::FileFormat::Yaml).required(false),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
pub(crate) fn parse_configuration(yaml: &str) -> Result<Settings, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
        .build()?
        .try_deserialize::<Settings>()
}

fn default_server_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_category_input() -> Locator {
    Locator::new(LocatorStrategy::TagName, "input")
}

fn default_pagination_header() -> Locator {
    Locator::new(LocatorStrategy::XPath, r#"//*[@class="Pagination"]"#)
}

fn default_page_load_secs() -> u64 {
    120
}

fn default_initial_results_secs() -> u64 {
    180
}

fn default_recovery_secs() -> u64 {
    90
}

fn default_settle_secs() -> u64 {
    5
}

fn default_poll_interval_millis() -> u64 {
    500
}

fn default_work_item_env_var() -> String {
    "NEWSHOUND_WORK_ITEM".to_string()
}

fn default_api_poll_interval_secs() -> u64 {
    10
}

fn default_api_max_attempts() -> u32 {
    30
}
