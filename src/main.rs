use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use repomatch_api::{
    api::{create_router, AppState},
    config::Config,
    db::{self, PgCatalog, PgFeedback, PgRecommendationStore, SearchHistory},
    services::{providers::AnalysisClient, HybridRecommender, RecommendationService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    let redis_client = db::create_redis_client(&config.redis_url)?;

    let analysis = AnalysisClient::new(
        config.analysis_url.clone(),
        Duration::from_secs(config.analysis_timeout_secs),
    )?;

    let recommender = HybridRecommender::new(
        config.scoring_weights(),
        config.factorization_params(),
        config.logo_dir.clone(),
    );

    let service = RecommendationService::new(
        Arc::new(PgCatalog::new(pool.clone())),
        Arc::new(PgFeedback::new(pool.clone(), SearchHistory::new(redis_client))),
        Arc::new(analysis),
        Arc::new(PgRecommendationStore::new(pool)),
        recommender,
    );

    let app = create_router(AppState::new(service));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, analysis_url = %config.analysis_url, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
