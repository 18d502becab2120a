pub mod error;
pub mod types;

pub use error::{ContentApiError, Result};
pub use types::{ApiAnnotation, EnrichedContent, Reference};

use std::time::Duration;

pub struct ContentApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ContentApiClient {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Fetch enriched content by reference. Accepts a bare UUID or a URI
    /// whose last path segment is the UUID.
    pub async fn enriched_content(&self, reference: &str) -> Result<EnrichedContent> {
        let uuid = content_uuid(reference)
            .ok_or_else(|| ContentApiError::InvalidReference(reference.to_string()))?;
        let url = format!("{}/enrichedcontent/{}", self.base_url, uuid);

        let resp = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ContentApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = resp.bytes().await?;
        let content: EnrichedContent = serde_json::from_slice(&bytes)?;
        tracing::trace!(uuid, "Fetched enriched content");
        Ok(content)
    }
}

/// Extract the content UUID from a bare id or an API URI.
pub fn content_uuid(reference: &str) -> Option<&str> {
    let trimmed = reference.trim().trim_end_matches('/');
    let last = trimmed.rsplit('/').next()?;
    let last = last.split(['?', '#']).next()?;
    if last.is_empty() || last.contains(':') {
        None
    } else {
        Some(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ContentApiClient {
        ContentApiClient::new(&server.uri(), "secret".into(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn content_uuid_accepts_ids_and_uris() {
        assert_eq!(content_uuid("abc-123"), Some("abc-123"));
        assert_eq!(
            content_uuid("http://api.ft.com/content/abc-123"),
            Some("abc-123")
        );
        assert_eq!(
            content_uuid("http://www.ft.com/thing/abc-123/"),
            Some("abc-123")
        );
        assert_eq!(content_uuid(""), None);
        assert_eq!(content_uuid("http://"), None);
    }

    #[tokio::test]
    async fn fetches_story_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/enrichedcontent/c1"))
            .and(header("X-Api-Key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "http://www.ft.com/thing/c1",
                "title": "Test title",
                "standfirst": "A summary",
                "mainImage": { "id": "http://api.ft.com/content/set-1" },
                "annotations": [
                    { "id": "http://api.ft.com/things/g1", "prefLabel": "Comment", "type": "GENRE" }
                ]
            })))
            .mount(&server)
            .await;

        let content = client(&server)
            .enriched_content("http://api.ft.com/content/c1")
            .await
            .unwrap();

        assert_eq!(content.standfirst.as_deref(), Some("A summary"));
        assert_eq!(
            content.main_image,
            Some(Reference {
                id: "http://api.ft.com/content/set-1".into()
            })
        );
        assert_eq!(content.annotations[0].kind, "GENRE");
        assert_eq!(content.annotations[0].pref_label, "Comment");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client(&server).enriched_content("c1").await.unwrap_err();
        assert!(matches!(err, ContentApiError::Api { status: 403, .. }));
    }

    #[tokio::test]
    async fn invalid_reference_is_rejected_without_a_request() {
        let server = MockServer::start().await;
        let err = client(&server).enriched_content("  ").await.unwrap_err();
        assert!(matches!(err, ContentApiError::InvalidReference(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
