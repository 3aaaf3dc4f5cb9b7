use std::{path::Path, time::Duration};

use anyhow::{anyhow, bail, Context};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::{
    configuration::{WorkItemApiSettings, WorkItemSettings},
    domain::search::WorkItem,
};

/// Where the run's url, phrase and category come from.
#[derive(Debug, Clone)]
pub enum WorkItemSource {
    Config,
    Args {
        url: Option<String>,
        search_phrase: Option<String>,
        category: Option<String>,
    },
    Environment,
    Api,
}

impl WorkItemSource {
    pub async fn resolve(self, settings: &WorkItemSettings) -> anyhow::Result<WorkItem> {
        let work_item = match self {
            WorkItemSource::Config => WorkItem {
                url: required(settings.webpage_url.clone(), "work_item.webpage_url")?,
                search_phrase: required(settings.search_phrase.clone(), "work_item.search_phrase")?,
                category: required(settings.category.clone(), "work_item.category")?,
            },
            WorkItemSource::Args {
                url,
                search_phrase,
                category,
            } => WorkItem {
                url: required(url, "--url")?,
                search_phrase: required(search_phrase, "--phrase")?,
                category: required(category, "--category")?,
            },
            WorkItemSource::Environment => from_environment(&settings.env_var)?,
            WorkItemSource::Api => {
                let api = settings
                    .api
                    .as_ref()
                    .context("work_item.api is not configured")?;
                poll_api(&Client::new(), api).await?
            }
        };

        log::info!(
            "Work item: {} searching {:?} in {}",
            work_item.url,
            work_item.search_phrase,
            work_item.category
        );
        Ok(work_item)
    }
}

fn required(value: Option<String>, name: &str) -> anyhow::Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow!("Missing work item field {}", name)),
    }
}

/// Accepts a flat object, one wrapped in `payload`, or a list whose first
/// element is the item.
pub fn parse_work_item(raw: &str) -> anyhow::Result<WorkItem> {
    let mut value: Value = serde_json::from_str(raw).context("Work item is not valid json")?;

    if let Value::Array(items) = value {
        value = items
            .into_iter()
            .next()
            .context("Work item list is empty")?;
    }
    if let Some(payload) = value.get_mut("payload").map(Value::take) {
        value = payload;
    }

    serde_json::from_value(value).context("Work item is incomplete")
}

fn from_environment(env_var: &str) -> anyhow::Result<WorkItem> {
    let path = std::env::var(env_var)
        .with_context(|| format!("Environment variable {} is not set", env_var))?;
    let raw = std::fs::read_to_string(Path::new(&path))
        .with_context(|| format!("Failed to read work item file {}", path))?;

    parse_work_item(&raw)
}

async fn poll_api(client: &Client, api: &WorkItemApiSettings) -> anyhow::Result<WorkItem> {
    for attempt in 1..=api.max_attempts {
        let mut request = client.get(&api.url);
        if let Some(token) = &api.token {
            request = request.bearer_auth(token);
        }

        let res = request
            .send()
            .await
            .with_context(|| format!("Failed to reach work item api {}", api.url))?;

        match res.status() {
            StatusCode::OK => {
                let raw = res.text().await.context("Failed to read work item body")?;
                return parse_work_item(&raw);
            }
            StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => {
                log::info!(
                    "No work item available yet, polling again ({}/{})",
                    attempt,
                    api.max_attempts
                );
                tokio::time::sleep(Duration::from_secs(api.poll_interval_secs)).await;
            }
            status => bail!("Work item api answered with {}", status),
        }
    }

    bail!(
        "No work item available after {} attempts",
        api.max_attempts
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::{
        configuration::{WorkItemApiSettings, WorkItemSettings},
        domain::search::WorkItem,
    };

    use super::{parse_work_item, WorkItemSource};

    fn expected() -> WorkItem {
        WorkItem {
            url: "https://www.latimes.com/".to_string(),
            search_phrase: "climate".to_string(),
            category: "Politics".to_string(),
        }
    }

    #[test]
    fn parse_work_item_shapes() {
        let flat = r#"{"url": "https://www.latimes.com/", "search_phrase": "climate", "category": "Politics"}"#;
        let wrapped = r#"{"payload": {"webpage_url": "https://www.latimes.com/", "search_phrase": "climate", "category": "Politics"}}"#;
        let listed = r#"[{"payload": {"url": "https://www.latimes.com/", "search_phrase": "climate", "category": "Politics"}}, {}]"#;

        for raw in [flat, wrapped, listed] {
            assert_eq!(parse_work_item(raw).unwrap(), expected(), "{}", raw);
        }
    }

    #[test]
    fn parse_work_item_missing_field_is_named() {
        let err = parse_work_item(r#"{"url": "https://www.latimes.com/", "category": "Politics"}"#)
            .unwrap_err();

        assert!(format!("{:#}", err).contains("search_phrase"), "{:#}", err);
    }

    #[test]
    fn parse_work_item_invalid() {
        assert!(parse_work_item("not json").is_err());
        assert!(parse_work_item("[]").is_err());
    }

    #[tokio::test]
    async fn resolve_from_config() {
        let settings = WorkItemSettings {
            webpage_url: Some("https://www.latimes.com/".to_string()),
            search_phrase: Some("climate".to_string()),
            category: Some("Politics".to_string()),
            ..WorkItemSettings::default()
        };

        let work_item = WorkItemSource::Config.resolve(&settings).await.unwrap();

        assert_eq!(work_item, expected());
    }

    #[tokio::test]
    async fn resolve_from_args_requires_every_field() {
        let source = WorkItemSource::Args {
            url: Some("https://www.latimes.com/".to_string()),
            search_phrase: None,
            category: Some("Politics".to_string()),
        };

        let err = source
            .resolve(&WorkItemSettings::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("--phrase"), "{}", err);
    }

    #[tokio::test]
    async fn resolve_from_environment_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"payload": {"url": "https://www.latimes.com/", "search_phrase": "climate", "category": "Politics"}}"#,
        )
        .unwrap();
        let env_var = "NEWSHOUND_TEST_WORK_ITEM_FILE";
        std::env::set_var(env_var, file.path());
        let settings = WorkItemSettings {
            env_var: env_var.to_string(),
            ..WorkItemSettings::default()
        };

        let work_item = WorkItemSource::Environment.resolve(&settings).await.unwrap();

        assert_eq!(work_item, expected());
    }

    #[tokio::test]
    async fn resolve_from_unset_environment() {
        let settings = WorkItemSettings {
            env_var: "NEWSHOUND_TEST_UNSET_WORK_ITEM".to_string(),
            ..WorkItemSettings::default()
        };

        assert!(WorkItemSource::Environment.resolve(&settings).await.is_err());
    }

    #[tokio::test]
    async fn resolve_from_api_without_settings() {
        assert!(WorkItemSource::Api
            .resolve(&WorkItemSettings::default())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn resolve_from_unreachable_api() {
        let settings = WorkItemSettings {
            api: Some(WorkItemApiSettings {
                url: "http://127.0.0.1:9/work-item".to_string(),
                token: Some("token".to_string()),
                poll_interval_secs: 0,
                max_attempts: 1,
            }),
            ..WorkItemSettings::default()
        };

        assert!(WorkItemSource::Api.resolve(&settings).await.is_err());
    }
}
