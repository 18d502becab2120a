// Trait abstractions for the aggregator's upstream dependencies.
//
// Recommender   — ranked article stubs for free text (recommended-reads API).
// ContentSource — enrichment detail for a content reference (content API).
// ContentService — the single capability the HTTP layer consumes.
//
// The graph seam is `orgcontent_graph::OrganisationGraph`. Mocks for all of
// them live in `crate::testing`.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use content_api_client::{ContentApiClient, EnrichedContent};
use orgcontent_common::{
    Annotation, EnrichmentDetail, OrgContentError, Organisation, RecommendationRequest,
    RecommendedArticle,
};
use recommend_client::RecommendClient;

// ---------------------------------------------------------------------------
// ContentService
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ContentService: Send + Sync {
    /// Assembled organisation for `id`. `Ok(None)` when the graph store has
    /// no such organisation; `Err` only when the graph store is unavailable.
    async fn organisation(&self, id: &str) -> Result<Option<Arc<Organisation>>, OrgContentError>;
}

// ---------------------------------------------------------------------------
// Recommender
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<RecommendedArticle>>;
}

#[async_trait]
impl Recommender for RecommendClient {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<RecommendedArticle>> {
        let articles =
            RecommendClient::recommend(self, &request.title, &request.text, request.count).await?;
        Ok(articles
            .into_iter()
            .map(|a| RecommendedArticle {
                id: a.id,
                title: a.title,
                popularity: a.popularity,
                published: a.published,
                score: a.score,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// ContentSource
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the enrichment record for a story, image set or image.
    async fn fetch(&self, reference: &str) -> Result<EnrichmentDetail>;
}

#[async_trait]
impl ContentSource for ContentApiClient {
    async fn fetch(&self, reference: &str) -> Result<EnrichmentDetail> {
        let content = self.enriched_content(reference).await?;
        Ok(detail_from_api(content))
    }
}

fn detail_from_api(content: EnrichedContent) -> EnrichmentDetail {
    EnrichmentDetail {
        id: content.id,
        standfirst: content.standfirst.unwrap_or_default(),
        byline: content.byline.unwrap_or_default(),
        annotations: content
            .annotations
            .into_iter()
            .map(|a| Annotation {
                kind: a.kind,
                label: a.pref_label,
                url: a.api_url.unwrap_or(a.id),
            })
            .collect(),
        main_image: content.main_image.map(|r| r.id).filter(|id| !id.is_empty()),
        members: content.members.into_iter().map(|r| r.id).collect(),
        binary_url: content.binary_url.filter(|u| !u.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_api_client::{ApiAnnotation, Reference};

    #[test]
    fn api_content_maps_to_detail() {
        let detail = detail_from_api(EnrichedContent {
            id: "c1".into(),
            standfirst: Some("Summary".into()),
            main_image: Some(Reference { id: String::new() }),
            members: vec![Reference { id: "img-1".into() }],
            annotations: vec![ApiAnnotation {
                id: "http://www.ft.com/thing/g1".into(),
                api_url: Some("http://api.ft.com/things/g1".into()),
                pref_label: "Comment".into(),
                kind: "GENRE".into(),
            }],
            ..Default::default()
        });

        assert_eq!(detail.standfirst, "Summary");
        assert!(detail.byline.is_empty());
        assert_eq!(detail.main_image, None);
        assert_eq!(detail.members, vec!["img-1".to_string()]);
        let genre = detail.comment_genre().unwrap();
        assert_eq!(genre.url, "http://api.ft.com/things/g1");
    }
}
