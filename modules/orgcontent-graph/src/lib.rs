pub mod client;
pub mod composer;
pub mod reader;
#[cfg(feature = "test-utils")]
pub mod testutil;

pub use client::GraphClient;
pub use neo4rs::query;
pub use composer::{CypherQuery, QueryComposer, QueryKind, QueryParam};
pub use reader::{OrganisationGraph, OrganisationGraphReader, OrganisationRow};
