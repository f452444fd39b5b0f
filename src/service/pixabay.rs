//! Pixabay image search API client.
//!
//! `GET https://pixabay.com/api/?key=..&q=..&page=..&per_page=..`
//! returns `{ total, totalHits, hits: [...] }`. Only `totalHits` results
//! are actually reachable through paging, so that is the total we report.

use serde::Deserialize;
use tracing::{debug, warn};

use super::{network_error, SearchError, SearchFuture, SearchService};
use crate::config::Settings;
use crate::state::data::{Image, SearchPage};

#[derive(Debug, Clone)]
pub struct PixabayClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    per_page: u32,
}

impl PixabayClient {
    pub fn new(http: reqwest::Client, settings: &Settings) -> Self {
        Self {
            http,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            per_page: settings.per_page,
        }
    }

    fn query_params(&self, query: &str, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.api_key.clone()),
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("per_page", self.per_page.to_string()),
            ("image_type", "photo".to_string()),
            ("orientation", "horizontal".to_string()),
            ("safesearch", "true".to_string()),
        ]
    }
}

impl SearchService for PixabayClient {
    fn search(&self, query: &str, page: u32) -> SearchFuture {
        debug!(query, page, "requesting pixabay page");
        let request = self
            .http
            .get(&self.base_url)
            .query(&self.query_params(query, page));

        Box::pin(async move {
            let response = request.send().await.map_err(network_error)?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default().trim().to_string();
                warn!(status = status.as_u16(), %message, "pixabay returned an error");
                return Err(SearchError::Service {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await.map_err(network_error)?;
            parse_response(&body)
        })
    }
}

/// Decode a Pixabay JSON body into a page of images
pub fn parse_response(body: &str) -> Result<SearchPage, SearchError> {
    let response: PixabayResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Decode(e.to_string()))?;
    Ok(response.into())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PixabayResponse {
    #[serde(default)]
    total: u64,
    total_hits: u64,
    #[serde(default)]
    hits: Vec<PixabayHit>,
}

#[derive(Debug, Deserialize)]
struct PixabayHit {
    id: u64,
    #[serde(rename = "webformatURL")]
    webformat_url: String,
    #[serde(rename = "webformatWidth", default)]
    webformat_width: u32,
    #[serde(rename = "webformatHeight", default)]
    webformat_height: u32,
    #[serde(rename = "largeImageURL")]
    large_image_url: String,
    #[serde(rename = "imageWidth", default)]
    image_width: u32,
    #[serde(rename = "imageHeight", default)]
    image_height: u32,
    #[serde(default)]
    tags: String,
}

impl From<PixabayResponse> for SearchPage {
    fn from(response: PixabayResponse) -> Self {
        debug!(
            total = response.total,
            total_hits = response.total_hits,
            hits = response.hits.len(),
            "decoded pixabay page"
        );
        SearchPage {
            images: response.hits.into_iter().map(Image::from).collect(),
            total_matches: response.total_hits as usize,
        }
    }
}

impl From<PixabayHit> for Image {
    fn from(hit: PixabayHit) -> Self {
        Image {
            id: hit.id,
            thumbnail_url: hit.webformat_url,
            full_size_url: hit.large_image_url,
            tags: hit.tags,
            thumbnail_size: dimensions(hit.webformat_width, hit.webformat_height),
            full_size: dimensions(hit.image_width, hit.image_height),
        }
    }
}

fn dimensions(width: u32, height: u32) -> Option<(u32, u32)> {
    (width > 0 && height > 0).then_some((width, height))
}
