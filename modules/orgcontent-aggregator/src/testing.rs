// Test mocks for the aggregator.
//
// Four mocks matching the trait boundaries:
// - MockGraph (OrganisationGraph) — canned rows per query kind, call counting
// - MockRecommender (Recommender) — canned articles, records requests
// - MockContentSource (ContentSource) — HashMap-based reference→detail with delays
// - InMemoryContentService (ContentService) — deterministic service for HTTP tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use orgcontent_common::{
    Annotation, Content, EnrichmentDetail, OrgContentError, Organisation, RecommendationRequest,
    RecommendedArticle, COMMENT_GENRE_LABEL, GENRE_ANNOTATION_TYPE,
};
use orgcontent_graph::{CypherQuery, OrganisationGraph, OrganisationRow, QueryKind};

use crate::traits::{ContentService, ContentSource, Recommender};

// ---------------------------------------------------------------------------
// MockGraph
// ---------------------------------------------------------------------------

/// Canned graph store. Unregistered organisations return zero rows; story
/// queries with nothing registered return an empty list.
pub struct MockGraph {
    organisations: HashMap<String, OrganisationRow>,
    stories: HashMap<QueryKind, Vec<Content>>,
    failing: HashSet<QueryKind>,
    calls: Mutex<HashMap<QueryKind, usize>>,
    queries: Mutex<Vec<CypherQuery>>,
}

impl MockGraph {
    pub fn new() -> Self {
        Self {
            organisations: HashMap::new(),
            stories: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(HashMap::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn on_organisation(mut self, row: OrganisationRow) -> Self {
        self.organisations.insert(row.id.clone(), row);
        self
    }

    pub fn on_subsidiary_stories(mut self, stories: Vec<Content>) -> Self {
        self.stories.insert(QueryKind::Subsidiary, stories);
        self
    }

    pub fn on_industry_stories(mut self, stories: Vec<Content>) -> Self {
        self.stories.insert(QueryKind::IndustryPeer, stories);
        self
    }

    /// Make every query of this kind fail as if the store were unreachable.
    pub fn failing(mut self, kind: QueryKind) -> Self {
        self.failing.insert(kind);
        self
    }

    pub fn calls(&self, kind: QueryKind) -> usize {
        self.calls.lock().unwrap().get(&kind).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn queries(&self) -> Vec<CypherQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn record(&self, query: &CypherQuery) -> Result<()> {
        *self.calls.lock().unwrap().entry(query.kind).or_default() += 1;
        self.queries.lock().unwrap().push(query.clone());
        if self.failing.contains(&query.kind) {
            bail!("MockGraph: connection refused for {} query", query.kind);
        }
        Ok(())
    }
}

impl Default for MockGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrganisationGraph for MockGraph {
    async fn organisation(&self, query: &CypherQuery) -> Result<Vec<OrganisationRow>> {
        self.record(query)?;
        Ok(self
            .organisations
            .get(query.org_id())
            .cloned()
            .into_iter()
            .collect())
    }

    async fn stories(&self, query: &CypherQuery) -> Result<Vec<Content>> {
        self.record(query)?;
        Ok(self.stories.get(&query.kind).cloned().unwrap_or_default())
    }
}

/// Core row with the given stories and no classification or description.
pub fn org_row(id: &str, title: &str, stories: Vec<Content>) -> OrganisationRow {
    OrganisationRow {
        id: id.to_string(),
        title: title.to_string(),
        stories,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// MockRecommender
// ---------------------------------------------------------------------------

pub struct MockRecommender {
    articles: Vec<RecommendedArticle>,
    fail: bool,
    requests: Mutex<Vec<RecommendationRequest>>,
}

impl MockRecommender {
    pub fn new() -> Self {
        Self {
            articles: Vec::new(),
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_articles(mut self, articles: Vec<RecommendedArticle>) -> Self {
        self.articles = articles;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn requests(&self) -> Vec<RecommendationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockRecommender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Recommender for MockRecommender {
    async fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<RecommendedArticle>> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            bail!("MockRecommender: service unavailable");
        }
        Ok(self.articles.iter().take(request.count).cloned().collect())
    }
}

pub fn article(id: &str, title: &str) -> RecommendedArticle {
    RecommendedArticle {
        id: id.to_string(),
        title: title.to_string(),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// MockContentSource
// ---------------------------------------------------------------------------

/// HashMap-based content source. Returns `Err` for unregistered references.
/// Builder pattern: `.on_content()`, `.on_image_set()`, `.on_image()`, `.delay()`.
pub struct MockContentSource {
    details: HashMap<String, EnrichmentDetail>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completed: Mutex<Vec<String>>,
}

impl MockContentSource {
    pub fn new() -> Self {
        Self {
            details: HashMap::new(),
            delays: HashMap::new(),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            completed: Mutex::new(Vec::new()),
        }
    }

    pub fn on_content(mut self, reference: &str, detail: EnrichmentDetail) -> Self {
        self.details.insert(reference.to_string(), detail);
        self
    }

    pub fn on_image_set(mut self, reference: &str, members: &[&str]) -> Self {
        let detail = EnrichmentDetail {
            id: reference.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        };
        self.details.insert(reference.to_string(), detail);
        self
    }

    pub fn on_image(mut self, reference: &str, binary_url: &str) -> Self {
        let detail = EnrichmentDetail {
            id: reference.to_string(),
            binary_url: Some(binary_url.to_string()),
            ..Default::default()
        };
        self.details.insert(reference.to_string(), detail);
        self
    }

    /// Hold the response for `reference` back by `delay`.
    pub fn delay(mut self, reference: &str, delay: Duration) -> Self {
        self.delays.insert(reference.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// References in the order their fetches finished.
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

impl Default for MockContentSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentSource for MockContentSource {
    async fn fetch(&self, reference: &str) -> Result<EnrichmentDetail> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(reference) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.lock().unwrap().push(reference.to_string());
        self.details
            .get(reference)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("MockContentSource: no content registered for {reference}"))
    }
}

pub fn story_detail(standfirst: &str) -> EnrichmentDetail {
    EnrichmentDetail {
        standfirst: standfirst.to_string(),
        ..Default::default()
    }
}

pub fn comment_detail(standfirst: &str) -> EnrichmentDetail {
    EnrichmentDetail {
        standfirst: standfirst.to_string(),
        annotations: vec![Annotation {
            kind: GENRE_ANNOTATION_TYPE.to_string(),
            label: COMMENT_GENRE_LABEL.to_string(),
            url: "http://api.ft.com/things/comment".to_string(),
        }],
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// InMemoryContentService
// ---------------------------------------------------------------------------

/// Deterministic `ContentService` backed by a fixed set of organisations.
pub struct InMemoryContentService {
    organisations: HashMap<String, Arc<Organisation>>,
    unavailable: bool,
}

impl InMemoryContentService {
    pub fn new() -> Self {
        Self {
            organisations: HashMap::new(),
            unavailable: false,
        }
    }

    pub fn with_organisation(mut self, org: Organisation) -> Self {
        self.organisations.insert(org.id.clone(), Arc::new(org));
        self
    }

    /// Every lookup fails as if the graph store were down.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }
}

impl Default for InMemoryContentService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentService for InMemoryContentService {
    async fn organisation(&self, id: &str) -> Result<Option<Arc<Organisation>>, OrgContentError> {
        if self.unavailable {
            return Err(OrgContentError::GraphUnavailable {
                org_id: id.to_string(),
                reason: "in-memory store marked unavailable".to_string(),
            });
        }
        Ok(self.organisations.get(id).cloned())
    }
}
