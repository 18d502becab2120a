pub mod aggregator;
pub mod cache;
pub mod enricher;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use aggregator::OrganisationContentService;
pub use cache::{CachePolicy, ResultCache};
pub use enricher::ConcurrentEnricher;
pub use traits::{ContentService, ContentSource, Recommender};
