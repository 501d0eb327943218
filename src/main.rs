// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use barista_server::api::router;
use barista_server::auth::{JwksManager, TokenVerifier};
use barista_server::config::{KeySetSource, Settings, LOG_FORMAT_ENV};
use barista_server::state::AppState;
use barista_server::store::DrinkStore;

#[tokio::main]
async fn main() {
    init_tracing();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Open the drink store
    let store = DrinkStore::open(&settings.data_dir.join("drinks.redb"))
        .expect("Failed to open drink store");
    if settings.reset_store {
        store.reset().expect("Failed to reset drink store");
        tracing::warn!("dropped and recreated the drink store");
    }

    // Load the signing key set
    let keys = match &settings.key_source {
        KeySetSource::Url(url) => JwksManager::from_url(url.clone()),
        KeySetSource::File(path) => {
            let raw = std::fs::read(path).expect("Failed to read JWK set file");
            let jwks = serde_json::from_slice(&raw).expect("Failed to parse JWK set file");
            JwksManager::from_set(jwks)
        }
    };
    let verifier = TokenVerifier::new(
        keys,
        settings.issuer.clone(),
        settings.audience.clone(),
        settings.algorithms.clone(),
    );

    let state = AppState::new(store, verifier);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .expect("Failed to parse bind address");
    tracing::info!(%addr, "drinks menu server listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

/// Resolve when the process is asked to stop (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var(LOG_FORMAT_ENV).as_deref() == Ok("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}
