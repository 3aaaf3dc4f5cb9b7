use std::path::PathBuf;

use anyhow::Context;
use reqwest::Client;

use crate::configuration::OutputSettings;

const UNTITLED: &str = "untitled";

/// Persists the picture of a news item and returns the reference stored in
/// the result table.
#[allow(async_fn_in_trait)]
pub trait PictureStore {
    async fn save(&self, source_url: &str, title: &str) -> anyhow::Result<String>;
}

pub struct PictureDownloader {
    client: Client,
    directory: PathBuf,
    extension: String,
    signs_to_replace: Vec<String>,
}

impl PictureDownloader {
    pub fn new(output: &OutputSettings, signs_to_replace: &[String]) -> Self {
        PictureDownloader {
            client: Client::new(),
            directory: PathBuf::from(&output.downloaded_pictures_path),
            extension: output.pictures_extension.clone(),
            signs_to_replace: signs_to_replace.to_vec(),
        }
    }

    pub fn picture_path(&self, title: &str, copy: usize) -> PathBuf {
        self.directory.join(picture_file_name(
            title,
            &self.signs_to_replace,
            &self.extension,
            copy,
        ))
    }

    /// First path for `title` no earlier picture occupies.
    pub async fn free_picture_path(&self, title: &str) -> anyhow::Result<PathBuf> {
        let mut copy = 0;
        loop {
            let path = self.picture_path(title, copy);
            let taken = tokio::fs::try_exists(&path)
                .await
                .with_context(|| format!("Failed to check {}", path.display()))?;
            if !taken {
                return Ok(path);
            }
            copy += 1;
        }
    }
}

impl PictureStore for PictureDownloader {
    async fn save(&self, source_url: &str, title: &str) -> anyhow::Result<String> {
        let bytes = self
            .client
            .get(source_url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .with_context(|| format!("Failed to fetch picture {}", source_url))?
            .bytes()
            .await
            .with_context(|| format!("Failed to read picture body {}", source_url))?;

        tokio::fs::create_dir_all(&self.directory)
            .await
            .with_context(|| format!("Failed to create {}", self.directory.display()))?;
        let path = self.free_picture_path(title).await?;
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(path.to_string_lossy().into_owned())
    }
}

pub fn sanitize_title(title: &str, signs_to_replace: &[String]) -> String {
    signs_to_replace
        .iter()
        .filter(|sign| !sign.is_empty())
        .fold(title.to_string(), |name, sign| name.replace(sign.as_str(), ""))
}

/// `copy` above zero is appended as ` (n)` to keep same-named pictures apart.
pub fn picture_file_name(
    title: &str,
    signs_to_replace: &[String],
    extension: &str,
    copy: usize,
) -> String {
    let name = sanitize_title(title, signs_to_replace);
    let name = match name.trim().is_empty() {
        true => UNTITLED.to_string(),
        false => name,
    };
    let extension = extension.trim_start_matches('.');

    match copy {
        0 => format!("{}.{}", name, extension),
        n => format!("{} ({}).{}", name, n, extension),
    }
}
