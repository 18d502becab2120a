use anyhow::Result;
use async_trait::async_trait;
use neo4rs::{query, Query, Row};
use serde::Deserialize;
use tracing::debug;

use orgcontent_common::{Content, Tag};

use crate::composer::{CypherQuery, QueryParam};
use crate::GraphClient;

/// One row of the core organisation query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganisationRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub industry_classification: String,
    /// May contain a single all-null entry when no content matched.
    pub stories: Vec<Content>,
}

/// Read-only capability over the graph store: executes a composed
/// statement and decodes rows of the expected shape.
#[async_trait]
pub trait OrganisationGraph: Send + Sync {
    /// Run a core organisation query.
    async fn organisation(&self, query: &CypherQuery) -> Result<Vec<OrganisationRow>>;

    /// Run a story query (subsidiary or industry-peer shape).
    async fn stories(&self, query: &CypherQuery) -> Result<Vec<Content>>;
}

/// Neo4j-backed reader used by the service.
pub struct OrganisationGraphReader {
    client: GraphClient,
}

impl OrganisationGraphReader {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrganisationGraph for OrganisationGraphReader {
    async fn organisation(&self, q: &CypherQuery) -> Result<Vec<OrganisationRow>> {
        let mut results = Vec::new();
        let mut stream = self.client.graph.execute(to_neo4j(q)).await?;
        while let Some(row) = stream.next().await? {
            results.push(row_to_organisation(&row));
        }
        debug!(kind = %q.kind, org_id = q.org_id(), rows = results.len(), "Graph query complete");
        Ok(results)
    }

    async fn stories(&self, q: &CypherQuery) -> Result<Vec<Content>> {
        let mut results = Vec::new();
        let mut stream = self.client.graph.execute(to_neo4j(q)).await?;
        while let Some(row) = stream.next().await? {
            if let Some(story) = row_to_tagged_story(&row) {
                results.push(story);
            }
        }
        debug!(kind = %q.kind, org_id = q.org_id(), rows = results.len(), "Graph query complete");
        Ok(results)
    }
}

fn to_neo4j(q: &CypherQuery) -> Query {
    let mut out = query(q.statement);
    for (key, value) in &q.params {
        out = match value {
            QueryParam::Str(s) => out.param(key, s.as_str()),
            QueryParam::Int(i) => out.param(key, *i),
        };
    }
    out
}

// --- Row decoding ---

/// Map collected inside the core query. Every field is null when the
/// optional content match found nothing.
#[derive(Debug, Deserialize)]
struct StoryMap {
    id: Option<String>,
    title: Option<String>,
    #[serde(rename = "publishedDate")]
    published_date: Option<String>,
}

impl From<StoryMap> for Content {
    fn from(m: StoryMap) -> Self {
        Content {
            id: m.id.unwrap_or_default(),
            title: m.title.unwrap_or_default(),
            published_date: m.published_date.unwrap_or_default(),
            ..Default::default()
        }
    }
}

fn opt_string(row: &Row, key: &str) -> String {
    row.get::<Option<String>>(key).ok().flatten().unwrap_or_default()
}

pub(crate) fn row_to_organisation(row: &Row) -> OrganisationRow {
    let stories: Vec<StoryMap> = row.get("stories").unwrap_or_default();
    OrganisationRow {
        id: opt_string(row, "id"),
        title: opt_string(row, "title"),
        description: opt_string(row, "description"),
        industry_classification: opt_string(row, "industryClassification"),
        stories: stories.into_iter().map(Content::from).collect(),
    }
}

/// Story row with organisation tags collected as `[label, uuid]` pairs.
pub(crate) fn row_to_tagged_story(row: &Row) -> Option<Content> {
    let id = opt_string(row, "id");
    if id.is_empty() {
        return None;
    }
    let pairs: Vec<Vec<Option<String>>> = row.get("tags").unwrap_or_default();
    Some(Content {
        id,
        title: opt_string(row, "title"),
        published_date: opt_string(row, "publishedDate"),
        tags: tags_from_pairs(pairs),
        ..Default::default()
    })
}

fn tags_from_pairs(pairs: Vec<Vec<Option<String>>>) -> Vec<Tag> {
    pairs
        .into_iter()
        .filter_map(|pair| {
            let mut it = pair.into_iter();
            let label = it.next().flatten().filter(|l| !l.is_empty())?;
            let url = it
                .next()
                .flatten()
                .filter(|u| !u.is_empty())
                .map(|uuid| format!("/organisations/{uuid}"))
                .unwrap_or_default();
            Some(Tag::new(label, url))
        })
        .collect()
}
