use std::fmt;

use thiserror::Error;

/// Failure of a content request. Only the core organisation query can
/// fail a request; every other upstream degrades in place.
#[derive(Error, Debug)]
pub enum OrgContentError {
    #[error("Graph store unavailable for organisation {org_id}: {reason}")]
    GraphUnavailable { org_id: String, reason: String },
}

/// Kind of upstream failure absorbed without failing the request.
/// Logged as the `kind` field on degradation warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    SubsidiaryQuery,
    IndustryQuery,
    Recommendation,
    Enrichment,
    ImageSet,
    Image,
    Timeout,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Degradation::SubsidiaryQuery => "subsidiary_query",
            Degradation::IndustryQuery => "industry_query",
            Degradation::Recommendation => "recommendation",
            Degradation::Enrichment => "enrichment",
            Degradation::ImageSet => "image_set",
            Degradation::Image => "image",
            Degradation::Timeout => "timeout",
        };
        f.write_str(s)
    }
}
