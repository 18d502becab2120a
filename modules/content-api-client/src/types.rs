use serde::Deserialize;

/// Body of `GET /enrichedcontent/{uuid}`. Stories, image sets and images
/// share this endpoint; each populates a different subset of fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedContent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub standfirst: Option<String>,
    #[serde(default)]
    pub byline: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub main_image: Option<Reference>,
    #[serde(default)]
    pub members: Vec<Reference>,
    #[serde(default)]
    pub binary_url: Option<String>,
    #[serde(default)]
    pub annotations: Vec<ApiAnnotation>,
}

/// A link to another content item, usually a full API URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Reference {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnnotation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub pref_label: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}
