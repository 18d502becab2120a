use serde::{Deserialize, Serialize};

/// Request body for the contextual document endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ContextualRequest<'a> {
    pub doc: ContextualDoc<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextualDoc<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendResponse {
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// A ranked article. Absent numeric fields default to zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Article {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub score: f64,
}
