//! End-to-end assembly against in-memory collaborators.
//!
//! Run with: cargo test -p orgcontent-aggregator --test organisation_test

use std::sync::Arc;
use std::time::Duration;

use orgcontent_aggregator::testing::{
    article, org_row, story_detail, MockContentSource, MockGraph, MockRecommender,
};
use orgcontent_aggregator::{ContentService, OrganisationContentService, ResultCache};
use orgcontent_common::{Content, EngineSettings, Tag};
use orgcontent_graph::{OrganisationRow, QueryKind};

fn service(
    graph: Arc<MockGraph>,
    recommender: MockRecommender,
    source: MockContentSource,
) -> OrganisationContentService {
    OrganisationContentService::new(
        graph,
        Arc::new(recommender),
        Arc::new(source),
        Arc::new(ResultCache::unbounded()),
        EngineSettings::default(),
    )
}

#[tokio::test]
async fn full_organisation_populates_every_section_in_order() {
    let mut peer = Content::stub("p1", "Peer news");
    peer.tags.push(Tag::new("Rival plc", "/organisations/rival"));

    let graph = Arc::new(
        MockGraph::new()
            .on_organisation(OrganisationRow {
                description: "Builds roads".into(),
                industry_classification: "Construction".into(),
                ..org_row(
                    "123",
                    "Acme",
                    vec![Content::stub("c1", "First"), Content::stub("c2", "Second")],
                )
            })
            .on_subsidiary_stories(vec![Content::stub("s1", "Subsidiary news")])
            .on_industry_stories(vec![peer]),
    );
    let source = MockContentSource::new()
        .on_content("c1", story_detail("one"))
        .on_content("c2", story_detail("two"))
        .on_content("s1", story_detail("sub"))
        .on_content("p1", story_detail("peer"))
        .on_content("a1", story_detail("rec"))
        .delay("c1", Duration::from_millis(40));
    let svc = service(
        graph.clone(),
        MockRecommender::new().with_articles(vec![article("a1", "Recommended")]),
        source,
    );

    let org = svc.organisation("123").await.unwrap().unwrap();

    let ids: Vec<&str> = org.stories.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2"]);
    assert_eq!(org.stories[0].standfirst, "one");
    assert_eq!(org.subsidiary_stories[0].standfirst, "sub");
    assert_eq!(org.industry_classification_stories[0].standfirst, "peer");
    assert_eq!(org.industry_classification_stories[0].tags[0].label, "Rival plc");
    assert_eq!(org.recommended_reads_stories[0].title, "Recommended");

    for kind in [QueryKind::Core, QueryKind::Subsidiary, QueryKind::IndustryPeer] {
        assert_eq!(graph.calls(kind), 1, "{kind} query should run once");
    }

    let json = serde_json::to_value(&*org).unwrap();
    assert_eq!(json["industryClassificationStories"][0]["standfirst"], "peer");
    assert_eq!(json["recommendedReadsStories"][0]["id"], "a1");
}

#[tokio::test]
async fn concurrent_requests_for_different_organisations_stay_separate() {
    let mut graph = MockGraph::new();
    for i in 0..10 {
        let id = format!("org-{i}");
        graph = graph.on_organisation(org_row(&id, &format!("Title {i}"), vec![]));
    }
    let svc = Arc::new(service(
        Arc::new(graph),
        MockRecommender::new(),
        MockContentSource::new(),
    ));

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let svc = svc.clone();
            tokio::spawn(async move { svc.organisation(&format!("org-{i}")).await })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let org = handle.await.unwrap().unwrap().unwrap();
        assert_eq!(org.id, format!("org-{i}"));
        assert_eq!(org.title, format!("Title {i}"));
    }
}
