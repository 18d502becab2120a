use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use content_api_client::ContentApiClient;
use orgcontent_aggregator::{CachePolicy, OrganisationContentService, ResultCache};
use orgcontent_api::{app, AppState};
use orgcontent_common::Config;
use orgcontent_graph::{GraphClient, OrganisationGraphReader};
use recommend_client::RecommendClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("orgcontent=info".parse()?))
        .init();

    let config = Config::from_env();
    let settings = config.engine_settings();
    info!(
        neo4j_uri = %config.neo4j_uri,
        rec_reads_url = %config.rec_reads_url,
        content_api_url = %config.content_api_url,
        lookback_months = settings.lookback_months,
        top_n = settings.top_n,
        "Configuration loaded"
    );

    let client =
        GraphClient::connect(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password)
            .await?;

    let recommender = RecommendClient::new(&config.rec_reads_url, config.http_timeout())?;
    let content_api = ContentApiClient::new(
        &config.content_api_url,
        config.api_key.clone(),
        config.http_timeout(),
    )?;

    let service = OrganisationContentService::new(
        Arc::new(OrganisationGraphReader::new(client)),
        Arc::new(recommender),
        Arc::new(content_api),
        Arc::new(ResultCache::new(CachePolicy::from_config(&config))),
        settings,
    );

    let state = Arc::new(AppState {
        service: Arc::new(service),
    });

    let app = app(state).layer(
        tower_http::trace::TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            },
        ),
    );

    let addr = format!("{}:{}", config.api_host, config.port);
    info!("Organisation content API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
