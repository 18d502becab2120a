use serde::{Deserialize, Serialize};

// --- Engine constants ---

/// Default story lookback window, in months, applied at query time.
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 3;

/// Default per-section cap on story and recommendation counts.
pub const DEFAULT_TOP_N: usize = 10;

/// Default upper bound on in-flight enrichment tasks per story list.
pub const DEFAULT_ENRICH_CONCURRENCY: usize = 16;

/// Default per-story enrichment deadline, in seconds.
pub const DEFAULT_ENRICH_TIMEOUT_SECS: u64 = 10;

/// Annotation type and label that mark a story as opinion.
pub const GENRE_ANNOTATION_TYPE: &str = "GENRE";
pub const COMMENT_GENRE_LABEL: &str = "Comment";

// --- Organisation ---

/// The assembled organisation view returned by `GET /organisations/{uuid}`.
///
/// Each story section is independently optional. An empty section is omitted
/// from the JSON body rather than serialized as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organisation {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Empty when the organisation has no classification.
    #[serde(default)]
    pub industry_classification: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stories: Vec<Content>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsidiary_stories: Vec<Content>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub industry_classification_stories: Vec<Content>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_reads_stories: Vec<Content>,
}

impl Organisation {
    pub fn has_classification(&self) -> bool {
        !self.industry_classification.is_empty()
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

// --- Content ---

/// A story. Identity is `id`; enrichment fills `standfirst`, `image`,
/// an empty `byline` and appends derived tags, never touching `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub standfirst: String,
    #[serde(default)]
    pub byline: String,
    #[serde(default)]
    pub published_date: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Content {
    /// A bare stub carrying only identity and title.
    pub fn stub(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn has_tag(&self, label: &str) -> bool {
        self.tags.iter().any(|t| t.label == label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub url: String,
    pub label: String,
}

impl Tag {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

// --- Recommendations ---

/// A ranked article stub from the recommendation service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendedArticle {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub score: f64,
}

impl From<RecommendedArticle> for Content {
    fn from(article: RecommendedArticle) -> Self {
        Content::stub(article.id, article.title)
    }
}

/// Free-text request submitted to the recommendation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    pub title: String,
    pub text: String,
    pub count: usize,
}

// --- Enrichment ---

/// Superset record returned by the content API for stories, image sets
/// and images alike. Only the fields relevant to the fetched kind are set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentDetail {
    pub id: String,
    pub standfirst: String,
    pub byline: String,
    pub annotations: Vec<Annotation>,
    /// Reference to the story's image set.
    pub main_image: Option<String>,
    /// References to the images inside an image set.
    pub members: Vec<String>,
    /// Binary location of an image.
    pub binary_url: Option<String>,
}

impl EnrichmentDetail {
    /// The "Comment" genre annotation, when the story carries one.
    pub fn comment_genre(&self) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|a| a.kind == GENRE_ANNOTATION_TYPE && a.label == COMMENT_GENRE_LABEL)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    /// Annotation type, e.g. `GENRE` or `ORGANISATION`.
    pub kind: String,
    pub label: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sections_are_omitted_from_json() {
        let org = Organisation {
            id: "123".into(),
            title: "Acme".into(),
            stories: vec![Content::stub("c1", "Test title")],
            ..Default::default()
        };

        let json = serde_json::to_value(&org).unwrap();
        assert_eq!(json["stories"][0]["title"], "Test title");
        assert_eq!(json["stories"][0]["tags"], serde_json::json!([]));
        assert!(json.get("subsidiaryStories").is_none());
        assert!(json.get("industryClassificationStories").is_none());
        assert!(json.get("recommendedReadsStories").is_none());
        assert_eq!(json["industryClassification"], "");
    }

    #[test]
    fn recommended_article_reduces_to_stub() {
        let article = RecommendedArticle {
            id: "a1".into(),
            title: "T1".into(),
            popularity: 3.0,
            published: "2026-01-01".into(),
            score: 0.9,
        };
        let content: Content = article.into();
        assert_eq!(content, Content::stub("a1", "T1"));
    }

    #[test]
    fn comment_genre_requires_type_and_label() {
        let detail = EnrichmentDetail {
            annotations: vec![
                Annotation {
                    kind: "ORGANISATION".into(),
                    label: "Comment".into(),
                    url: String::new(),
                },
                Annotation {
                    kind: "GENRE".into(),
                    label: "News".into(),
                    url: String::new(),
                },
            ],
            ..Default::default()
        };
        assert!(detail.comment_genre().is_none());
    }
}
