use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, warn};

use orgcontent_common::{Content, Degradation, EngineSettings, OrgContentError, Organisation};
use orgcontent_graph::{CypherQuery, OrganisationGraph, QueryComposer};

use crate::cache::ResultCache;
use crate::enricher::ConcurrentEnricher;
use crate::traits::{ContentService, ContentSource, Recommender};

/// Production `ContentService`: assembles an organisation from the graph
/// store and the recommendation service, enriches every populated story
/// section, and memoizes the result.
///
/// Only a failure of the core graph query fails the request. Subsidiary,
/// industry-peer, recommendation and enrichment failures drop the affected
/// section or field and are logged.
pub struct OrganisationContentService {
    graph: Arc<dyn OrganisationGraph>,
    recommender: Arc<dyn Recommender>,
    enricher: ConcurrentEnricher,
    composer: QueryComposer,
    cache: Arc<ResultCache>,
}

impl OrganisationContentService {
    pub fn new(
        graph: Arc<dyn OrganisationGraph>,
        recommender: Arc<dyn Recommender>,
        source: Arc<dyn ContentSource>,
        cache: Arc<ResultCache>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            graph,
            recommender,
            enricher: ConcurrentEnricher::new(source, &settings),
            composer: QueryComposer::new(&settings),
            cache,
        }
    }

    /// Assemble without consulting or filling the cache.
    pub async fn assemble(&self, id: &str) -> Result<Option<Organisation>, OrgContentError> {
        let now = Utc::now();

        let core = self.composer.core(id, now);
        let rows = self.graph.organisation(&core).await.map_err(|e| {
            error!(kind = %core.kind, org_id = id, error = %e, "Core organisation query failed");
            OrgContentError::GraphUnavailable {
                org_id: id.to_string(),
                reason: e.to_string(),
            }
        })?;

        let Some(row) = rows.into_iter().next() else {
            info!(org_id = id, "No organisation found");
            return Ok(None);
        };

        let mut org = Organisation {
            id: if row.id.is_empty() { id.to_string() } else { row.id },
            title: row.title,
            description: row.description,
            industry_classification: row.industry_classification,
            ..Default::default()
        };

        // A content-less organisation still yields one all-null story map.
        let direct = if row.stories.first().is_some_and(|s| !s.id.is_empty()) {
            row.stories
        } else {
            Vec::new()
        };

        let subsidiary = self
            .optional_stories(&self.composer.subsidiaries(id, now), Degradation::SubsidiaryQuery)
            .await;

        let industry = match self.composer.industry_peers(&org, now) {
            Some(q) => self.optional_stories(&q, Degradation::IndustryQuery).await,
            None => Vec::new(),
        };

        let recommended = self.recommended(&org).await;

        let (stories, subsidiary_stories, industry_classification_stories, recommended_reads_stories) = tokio::join!(
            self.enricher.enrich(direct),
            self.enricher.enrich(subsidiary),
            self.enricher.enrich(industry),
            self.enricher.enrich(recommended),
        );

        org.stories = stories;
        org.subsidiary_stories = subsidiary_stories;
        org.industry_classification_stories = industry_classification_stories;
        org.recommended_reads_stories = recommended_reads_stories;

        info!(
            org_id = id,
            stories = org.stories.len(),
            subsidiary = org.subsidiary_stories.len(),
            industry = org.industry_classification_stories.len(),
            recommended = org.recommended_reads_stories.len(),
            "Organisation assembled"
        );
        Ok(Some(org))
    }

    async fn optional_stories(&self, query: &CypherQuery, kind: Degradation) -> Vec<Content> {
        match self.graph.stories(query).await {
            Ok(stories) => stories,
            Err(e) => {
                warn!(
                    kind = %kind,
                    org_id = query.org_id(),
                    error = %e,
                    "Story query failed, omitting section"
                );
                Vec::new()
            }
        }
    }

    async fn recommended(&self, org: &Organisation) -> Vec<Content> {
        let Some(request) = self.composer.recommendation(org) else {
            return Vec::new();
        };
        match self.recommender.recommend(&request).await {
            Ok(articles) => articles
                .into_iter()
                .take(self.composer.top_n())
                .map(Content::from)
                .collect(),
            Err(e) => {
                warn!(
                    kind = %Degradation::Recommendation,
                    org_id = %org.id,
                    error = %e,
                    "Recommendation lookup failed, omitting section"
                );
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ContentService for OrganisationContentService {
    async fn organisation(&self, id: &str) -> Result<Option<Arc<Organisation>>, OrgContentError> {
        if let Some(cached) = self.cache.get(id) {
            return Ok(Some(cached));
        }

        let Some(org) = self.assemble(id).await? else {
            return Ok(None);
        };

        let org = Arc::new(org);
        self.cache.put(id, org.clone());
        Ok(Some(org))
    }
}
