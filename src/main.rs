use std::sync::Arc;

use axum::Router;
use shuttle_runtime::{CustomError, SecretStore};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::BillplzConfig;

mod billplz;
mod components;
mod config;
mod err_responses;
mod icons;

#[derive(Clone)]
struct AppState {
    config: Arc<BillplzConfig>,
    http_client: reqwest::Client,
}

impl AppState {
    fn new(config: BillplzConfig) -> reqwest::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            http_client,
        })
    }
}

fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", billplz::router(state))
        .layer(TraceLayer::new_for_http())
}

#[shuttle_runtime::main]
async fn main(#[shuttle_runtime::Secrets] secret_store: SecretStore) -> shuttle_axum::ShuttleAxum {
    let config = BillplzConfig::from_lookup(|key| secret_store.get(key)).map_err(CustomError::new)?;

    if config.credentials().is_err() {
        warn!("BILLPLZ_API_KEY or BILLPLZ_COLLECTION_ID missing, bills cannot be created");
    }
    if config.x_signature_key.is_none() {
        warn!("BILLPLZ_X_SIGNATURE_KEY missing, callbacks will be rejected");
    }
    info!(
        sandbox = config.sandbox,
        flow = ?config.flow,
        public_base_url = %config.public_base_url,
        "starting Billplz gateway"
    );

    let state = AppState::new(config).map_err(CustomError::new)?;

    Ok(app(state).into())
}
