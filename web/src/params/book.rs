use chrono::NaiveDate;
use sea_orm::Value;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use domain::{IntoUpdateMap, UpdateMap};

const DEFAULT_SKIP: u64 = 0;
const DEFAULT_LIMIT: u64 = 10;

/// Paging parameters for listing books.
#[derive(Debug, Deserialize, IntoParams)]
pub struct IndexParams {
    /// Number of books to skip from the start of the collection
    pub skip: Option<u64>,
    /// Maximum number of books to return
    pub limit: Option<u64>,
}

impl IndexParams {
    pub fn skip(&self) -> u64 {
        self.skip.unwrap_or(DEFAULT_SKIP)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// Body of a PATCH request: every field optional, absent fields untouched.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UpdateParams {
    pub title: Option<String>,
    pub author: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub published_date: Option<NaiveDate>,
    pub summary: Option<String>,
    pub genre: Option<String>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        if let Some(title) = self.title {
            update_map.insert(
                "title".to_string(),
                Some(Value::String(Some(Box::new(title)))),
            );
        }
        if let Some(author) = self.author {
            update_map.insert(
                "author".to_string(),
                Some(Value::String(Some(Box::new(author)))),
            );
        }
        if let Some(published_date) = self.published_date {
            update_map.insert(
                "published_date".to_string(),
                Some(Value::ChronoDate(Some(Box::new(published_date)))),
            );
        }
        if let Some(summary) = self.summary {
            update_map.insert(
                "summary".to_string(),
                Some(Value::String(Some(Box::new(summary)))),
            );
        }
        if let Some(genre) = self.genre {
            update_map.insert(
                "genre".to_string(),
                Some(Value::String(Some(Box::new(genre)))),
            );
        }
        update_map
    }
}
