// server/src/main.rs

mod api;

use std::sync::Arc;

use anyhow::Context;
use common_utils::{init_tracing, ServiceConfig};
use hotel_catalog::CategoryLookup;
use orchestrator::{ChatCompletionsOracle, Orchestrator};
use tracing::info;

use crate::api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info,tower_http=debug");
    info!("initializing hotel search server");

    let config = ServiceConfig::from_env().context("invalid configuration")?;

    let categories = match &config.categories_path {
        Some(path) => CategoryLookup::from_path(path)
            .with_context(|| format!("failed to load categories from {}", path.display()))?,
        None => CategoryLookup::embedded().context("embedded category resource is malformed")?,
    };

    let oracle = ChatCompletionsOracle::new(&config.llm).context("failed to build LLM client")?;
    info!(url = %config.llm.url, model = %config.llm.model, "LLM gateway ready");

    let orchestrator = Orchestrator::new(Arc::new(oracle), &categories)
        .with_restriction_policy(config.restriction_policy);
    info!(
        policy = %config.restriction_policy,
        cities = ?config.cities().collect::<Vec<_>>(),
        data_dir = %config.data_dir.display(),
        "orchestrator initialized"
    );

    let bind_addr = config.bind_addr.clone();
    let app = router(AppState {
        orchestrator: Arc::new(orchestrator),
        config: Arc::new(config),
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
