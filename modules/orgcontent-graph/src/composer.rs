//! Cypher composition for the organisation view.
//!
//! Every story query filters on `publishedDateEpoch` at query time and is
//! capped at `top_n` rows. Both values come from [`EngineSettings`] and are
//! never taken from a request.

use chrono::{DateTime, Months, Utc};
use tracing::warn;

use orgcontent_common::{EngineSettings, Organisation, RecommendationRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Organisation, its classification and the stories mentioning it.
    Core,
    /// Stories mentioning organisations related by `SUB_ORGANISATION_OF`.
    Subsidiary,
    /// Stories mentioning organisations in the same industry classification.
    IndustryPeer,
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKind::Core => write!(f, "core"),
            QueryKind::Subsidiary => write!(f, "subsidiary"),
            QueryKind::IndustryPeer => write!(f, "industry_peer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Str(String),
    Int(i64),
}

/// A parameterized statement ready for the graph store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CypherQuery {
    pub kind: QueryKind,
    pub statement: &'static str,
    pub params: Vec<(&'static str, QueryParam)>,
}

impl CypherQuery {
    pub fn param(&self, key: &str) -> Option<&QueryParam> {
        self.params.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// The organisation identifier this query is scoped to.
    pub fn org_id(&self) -> &str {
        match self.param("uuid") {
            Some(QueryParam::Str(s)) => s.as_str(),
            _ => "",
        }
    }
}

const CORE_STATEMENT: &str = "MATCH (o:Organisation {uuid: $uuid})
     OPTIONAL MATCH (o)--(i:IndustryClassification)
     OPTIONAL MATCH (o)-[:MENTIONS]-(c:Content)
     WHERE c.publishedDateEpoch > $since
     WITH o, i, c
     ORDER BY c.publishedDateEpoch DESC
     WITH o, i, collect({title: c.title, id: c.uuid, publishedDate: c.publishedDate})[0..$limit] AS stories
     RETURN o.uuid AS id, o.prefLabel AS title, o.description AS description,
            i.prefLabel AS industryClassification, stories";

const SUBSIDIARY_STATEMENT: &str =
    "MATCH (:Organisation {uuid: $uuid})-[:SUB_ORGANISATION_OF]-(s:Organisation)-[:MENTIONS]-(c:Content)
     WHERE c.publishedDateEpoch > $since
     WITH c, collect(DISTINCT [s.prefLabel, coalesce(s.uuid, '')]) AS tags
     RETURN c.uuid AS id, c.title AS title, c.publishedDate AS publishedDate, tags
     ORDER BY c.publishedDateEpoch DESC
     LIMIT $limit";

const INDUSTRY_PEER_STATEMENT: &str =
    "MATCH (o:Organisation {uuid: $uuid})--(i:IndustryClassification)--(peer:Organisation)-[:MENTIONS]-(c:Content)
     WHERE peer <> o AND c.publishedDateEpoch > $since
     WITH c, collect(DISTINCT [peer.prefLabel, coalesce(peer.uuid, '')]) AS tags
     RETURN c.uuid AS id, c.title AS title, c.publishedDate AS publishedDate, tags
     ORDER BY c.publishedDateEpoch DESC
     LIMIT $limit";

/// Builds the query shapes needed to assemble one organisation.
#[derive(Debug, Clone, Copy)]
pub struct QueryComposer {
    lookback_months: u32,
    top_n: usize,
}

impl QueryComposer {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            lookback_months: settings.lookback_months,
            top_n: settings.top_n,
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Epoch seconds of the oldest publish date still inside the lookback.
    pub fn since_epoch(&self, now: DateTime<Utc>) -> i64 {
        match now.checked_sub_months(Months::new(self.lookback_months)) {
            Some(since) => since.timestamp(),
            None => {
                warn!(
                    lookback_months = self.lookback_months,
                    "Lookback out of range, window collapsed to now"
                );
                now.timestamp()
            }
        }
    }

    pub fn core(&self, org_id: &str, now: DateTime<Utc>) -> CypherQuery {
        self.story_query(QueryKind::Core, CORE_STATEMENT, org_id, now)
    }

    pub fn subsidiaries(&self, org_id: &str, now: DateTime<Utc>) -> CypherQuery {
        self.story_query(QueryKind::Subsidiary, SUBSIDIARY_STATEMENT, org_id, now)
    }

    /// `None` when the organisation has no classification: peers are
    /// defined only through a shared classification node.
    pub fn industry_peers(&self, org: &Organisation, now: DateTime<Utc>) -> Option<CypherQuery> {
        if !org.has_classification() {
            return None;
        }
        Some(self.story_query(QueryKind::IndustryPeer, INDUSTRY_PEER_STATEMENT, &org.id, now))
    }

    /// `None` when there is no description to recommend against.
    pub fn recommendation(&self, org: &Organisation) -> Option<RecommendationRequest> {
        if !org.has_description() {
            return None;
        }
        Some(RecommendationRequest {
            title: org.title.clone(),
            text: org.description.clone(),
            count: self.top_n,
        })
    }

    fn story_query(
        &self,
        kind: QueryKind,
        statement: &'static str,
        org_id: &str,
        now: DateTime<Utc>,
    ) -> CypherQuery {
        CypherQuery {
            kind,
            statement,
            params: vec![
                ("uuid", QueryParam::Str(org_id.to_string())),
                ("since", QueryParam::Int(self.since_epoch(now))),
                ("limit", QueryParam::Int(self.top_n as i64)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn composer(lookback_months: u32, top_n: usize) -> QueryComposer {
        QueryComposer::new(&EngineSettings {
            lookback_months,
            top_n,
            ..Default::default()
        })
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 31, 12, 0, 0).unwrap()
    }

    #[test]
    fn lookback_is_calendar_months_before_now() {
        let since = composer(3, 10).since_epoch(now());
        let expected = Utc.with_ymd_and_hms(2026, 2, 28, 12, 0, 0).unwrap();
        assert_eq!(since, expected.timestamp());

        let since = composer(1, 10).since_epoch(now());
        let expected = Utc.with_ymd_and_hms(2026, 4, 30, 12, 0, 0).unwrap();
        assert_eq!(since, expected.timestamp());
    }

    #[test]
    fn out_of_range_lookback_collapses_to_now() {
        assert_eq!(composer(u32::MAX, 10).since_epoch(now()), now().timestamp());
    }

    #[test]
    fn story_queries_carry_window_and_cap() {
        let c = composer(3, 5);
        for q in [c.core("123", now()), c.subsidiaries("123", now())] {
            assert_eq!(q.org_id(), "123");
            assert_eq!(q.param("since"), Some(&QueryParam::Int(c.since_epoch(now()))));
            assert_eq!(q.param("limit"), Some(&QueryParam::Int(5)));
            assert!(q.statement.contains("publishedDateEpoch > $since"));
        }
    }

    #[test]
    fn industry_peers_require_classification() {
        let c = composer(3, 10);
        let mut org = Organisation {
            id: "123".into(),
            title: "Acme".into(),
            ..Default::default()
        };
        assert!(c.industry_peers(&org, now()).is_none());

        org.industry_classification = "Construction".into();
        let q = c.industry_peers(&org, now()).unwrap();
        assert_eq!(q.kind, QueryKind::IndustryPeer);
        assert!(q.statement.contains("ORDER BY c.publishedDateEpoch DESC"));
        assert!(q.statement.contains("DISTINCT"));
    }

    #[test]
    fn recommendation_requires_description() {
        let c = composer(3, 10);
        let mut org = Organisation {
            id: "123".into(),
            title: "Ferrovial".into(),
            description: "   ".into(),
            ..Default::default()
        };
        assert!(c.recommendation(&org).is_none());

        org.description = "Spanish infrastructure group".into();
        let req = c.recommendation(&org).unwrap();
        assert_eq!(req.title, "Ferrovial");
        assert_eq!(req.text, "Spanish infrastructure group");
        assert_eq!(req.count, 10);
    }
}
