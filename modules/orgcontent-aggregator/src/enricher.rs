//! Per-story enrichment fan-out.
//!
//! Each story becomes an independent task: fetch its enrichment detail, copy
//! the standfirst, derive the "Comment" genre tag, then follow the image
//! chain (story → image set → first image) to fill `image`. Tasks run with
//! bounded concurrency and a per-story deadline. Results land in a slot
//! buffer addressed by input index, so output order always equals input
//! order no matter which task finishes first.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use orgcontent_common::{Content, Degradation, EngineSettings, EnrichmentDetail, Tag};

use crate::traits::ContentSource;

pub struct ConcurrentEnricher {
    source: Arc<dyn ContentSource>,
    concurrency: usize,
    timeout: Duration,
}

impl ConcurrentEnricher {
    pub fn new(source: Arc<dyn ContentSource>, settings: &EngineSettings) -> Self {
        Self {
            source,
            concurrency: settings.enrich_concurrency.max(1),
            timeout: settings.enrich_timeout,
        }
    }

    /// Enrich every story. Same length and order as the input; a story whose
    /// enrichment fails keeps whatever was filled before the failure.
    pub async fn enrich(&self, stories: Vec<Content>) -> Vec<Content> {
        if stories.is_empty() {
            return stories;
        }

        let total = stories.len();
        let mut slots: Vec<Option<Content>> = vec![None; total];

        let mut completions = stream::iter(stories.into_iter().enumerate().map(|(idx, story)| {
            async move { (idx, self.enrich_with_deadline(story).await) }
        }))
        .buffer_unordered(self.concurrency);

        while let Some((idx, story)) = completions.next().await {
            slots[idx] = Some(story);
        }

        debug!(stories = total, "Enrichment batch complete");
        slots.into_iter().flatten().collect()
    }

    async fn enrich_with_deadline(&self, story: Content) -> Content {
        let original = story.clone();
        match tokio::time::timeout(self.timeout, self.enrich_story(story)).await {
            Ok(enriched) => enriched,
            Err(_) => {
                warn!(
                    kind = %Degradation::Timeout,
                    content_id = %original.id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Enrichment deadline exceeded, returning story unenriched"
                );
                original
            }
        }
    }

    async fn enrich_story(&self, mut story: Content) -> Content {
        let detail = match self.source.fetch(&story.id).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!(
                    kind = %Degradation::Enrichment,
                    content_id = %story.id,
                    error = %e,
                    "Content enrichment failed"
                );
                return story;
            }
        };

        apply_detail(&mut story, &detail);

        if let Some(image_set) = detail.main_image.as_deref() {
            if let Some(url) = self.image_url(&story.id, image_set).await {
                story.image = url;
            }
        }

        story
    }

    /// Resolve an image-set reference to the first member's binary URL.
    async fn image_url(&self, content_id: &str, image_set: &str) -> Option<String> {
        let set = match self.source.fetch(image_set).await {
            Ok(set) => set,
            Err(e) => {
                warn!(
                    kind = %Degradation::ImageSet,
                    content_id,
                    upstream_id = image_set,
                    error = %e,
                    "Image set lookup failed"
                );
                return None;
            }
        };

        let member = set.members.first()?;
        match self.source.fetch(member).await {
            Ok(image) => image.binary_url,
            Err(e) => {
                warn!(
                    kind = %Degradation::Image,
                    content_id,
                    upstream_id = member.as_str(),
                    error = %e,
                    "Image lookup failed"
                );
                None
            }
        }
    }
}

/// Fill empty fields from the detail record. Never touches `id` or `title`.
fn apply_detail(story: &mut Content, detail: &EnrichmentDetail) {
    if story.standfirst.is_empty() {
        story.standfirst = detail.standfirst.clone();
    }
    if story.byline.is_empty() {
        story.byline = detail.byline.clone();
    }
    if let Some(genre) = detail.comment_genre() {
        if !story.has_tag(&genre.label) {
            story.tags.push(Tag::new(genre.label.clone(), genre.url.clone()));
        }
    }
}
