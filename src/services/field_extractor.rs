use crate::domain::{
    news::{ResultRecord, NO_PICTURE},
    text::{count_phrase_occurrences, has_monetary_mention},
};

use super::{DomError, NewsItem, PictureStore};

pub struct FieldExtractor<'a, P> {
    pictures: &'a P,
    search_phrase: &'a str,
}

impl<'a, P: PictureStore> FieldExtractor<'a, P> {
    pub fn new(pictures: &'a P, search_phrase: &'a str) -> Self {
        FieldExtractor {
            pictures,
            search_phrase,
        }
    }

    /// Title and description fall back to empty text and the picture to
    /// [`NO_PICTURE`]. The date is required: any failure reading it is
    /// returned to the caller.
    pub async fn extract<I: NewsItem>(&self, item: &I) -> Result<ResultRecord, DomError> {
        let title = tolerate(item.title().await, "news title")?;
        let description = tolerate(item.description().await, "news description")?;
        let picture_reference = self.picture(item, &title).await?;
        let date = item.date().await?;

        Ok(ResultRecord {
            phrase_match_count: count_phrase_occurrences(&title, &description, self.search_phrase),
            contains_monetary_mention: has_monetary_mention(&title, &description),
            title,
            date,
            description,
            picture_reference,
        })
    }

    async fn picture<I: NewsItem>(&self, item: &I, title: &str) -> Result<String, DomError> {
        let source = match item.image_source().await {
            Ok(source) => source,
            Err(DomError::Missing(e)) => {
                log::info!("News {:?} has no picture: {}", title, e);
                return Ok(NO_PICTURE.to_string());
            }
            Err(e) => return Err(e),
        };

        match self.pictures.save(&source, title).await {
            Ok(reference) => Ok(reference),
            Err(e) => {
                log::warn!("It was not possible to download the picture {}: {:#}", source, e);
                Ok(NO_PICTURE.to_string())
            }
        }
    }
}

fn tolerate(text: Result<String, DomError>, field: &str) -> Result<String, DomError> {
    match text {
        Ok(text) => Ok(text),
        Err(DomError::Missing(e)) => {
            log::warn!("It was not possible to find a {}: {}", field, e);
            Ok(String::new())
        }
        Err(DomError::Stale(e)) => {
            log::warn!("The {} is a stale element: {}", field, e);
            Ok(String::new())
        }
        Err(e) => Err(e),
    }
}
