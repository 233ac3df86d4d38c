//! Standalone development server for the workspace event stream.
//!
//! Production deployments embed the library in the full Taskstream backend,
//! which supplies the real session and membership services and calls the
//! `WorkspaceBroadcaster` port from its business operations. This binary
//! wires the in-memory adapters instead so the stream endpoint can be run
//! and exercised on its own.

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use taskstream::adapters::auth::StaticSessionValidator;
use taskstream::adapters::events::SubscriberRegistry;
use taskstream::adapters::http::middleware::{auth_middleware, AuthState};
use taskstream::adapters::http::{events_router, EventsAppState};
use taskstream::adapters::membership::InMemoryMembershipDirectory;
use taskstream::config::AppConfig;
use taskstream::domain::{AuthenticatedUser, Role, UserId, WorkspaceId};

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    let registry = Arc::new(SubscriberRegistry::new());
    let validator = Arc::new(StaticSessionValidator::new());
    let memberships = Arc::new(InMemoryMembershipDirectory::new());

    if !config.is_production() {
        seed_development_fixtures(&validator, &memberships);
    }

    let state = EventsAppState {
        registry,
        memberships,
        stream: config.stream.clone(),
    };

    let cors = if config.server.cors_origins_list().is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .server
            .cors_origins_list()
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api = Router::new()
        .nest("/workspaces", events_router())
        .with_state(state);

    let auth_state: AuthState = validator;
    let app = Router::new()
        .nest(&config.server.base_path, api)
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        "taskstream event server listening"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Seed a token and a workspace membership so the stream can be exercised
/// locally without the full backend:
///
/// ```text
/// curl -N -H "Authorization: Bearer dev-token" \
///   http://localhost:8000/api/workspaces/workspace-dev/events
/// ```
fn seed_development_fixtures(
    validator: &StaticSessionValidator,
    memberships: &InMemoryMembershipDirectory,
) {
    let user_id = UserId::new("dev-user").expect("fixture user id is non-empty");
    let workspace_id = WorkspaceId::new("workspace-dev").expect("fixture workspace id is non-empty");

    validator.add_token(
        "dev-token",
        AuthenticatedUser::new(user_id.clone(), "dev@taskstream.local"),
    );
    memberships.grant(user_id, workspace_id, Role::Owner);

    tracing::info!("seeded development fixtures: token 'dev-token', workspace 'workspace-dev'");
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
