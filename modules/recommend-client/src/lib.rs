pub mod error;
pub mod types;

pub use error::{RecommendError, Result};
pub use types::Article;

use std::time::Duration;

use reqwest::StatusCode;
use types::{ContextualDoc, ContextualRequest, RecommendResponse};

const CONTEXTUAL_PATH: &str = "/recommended-reads-api/recommend/contextual/doc";

pub struct RecommendClient {
    client: reqwest::Client,
    base_url: String,
}

impl RecommendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Rank articles related to free text, most relevant first.
    /// A 404 from the service means there is nothing to recommend.
    pub async fn recommend(&self, title: &str, text: &str, count: usize) -> Result<Vec<Article>> {
        let endpoint = format!("{}{}", self.base_url, CONTEXTUAL_PATH);
        let body = ContextualRequest {
            doc: ContextualDoc {
                title,
                content: text,
            },
        };

        let resp = self
            .client
            .post(&endpoint)
            .query(&[
                ("count", count.to_string()),
                ("sort", "rel".to_string()),
                ("explain", "false".to_string()),
            ])
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(endpoint = %endpoint, "No recommendations for document");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(RecommendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp.bytes().await?;
        let parsed: RecommendResponse = serde_json::from_slice(&bytes)?;
        let mut articles = parsed.articles;
        articles.truncate(count);
        Ok(articles)
    }
}
