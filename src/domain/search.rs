use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

use crate::configuration::Settings;

/// The URL, phrase and category of one run, however they were sourced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkItem {
    #[serde(alias = "webpage_url")]
    pub url: String,
    pub search_phrase: String,
    pub category: String,
}

pub struct SearchContext {
    pub url: Url,
    pub search_phrase: String,
    pub category: String,
    pub settings: Settings,
}

impl SearchContext {
    pub fn new(work_item: WorkItem, settings: Settings) -> anyhow::Result<Self> {
        let url = Url::parse(work_item.url.trim())
            .with_context(|| format!("Invalid webpage url: {:?}", work_item.url))?;

        let category = work_item.category.trim().to_uppercase();
        if category.is_empty() {
            bail!("The news category is empty");
        }

        Ok(SearchContext {
            url,
            search_phrase: work_item.search_phrase,
            category,
            settings,
        })
    }
}
