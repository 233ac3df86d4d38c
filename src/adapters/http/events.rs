//! HTTP adapter for the workspace event stream endpoint.
//!
//! Connection lifecycle:
//! 1. The auth middleware validates the caller's token (`RequireAuth`)
//! 2. The caller's role in the workspace is resolved and checked against
//!    the view permission; rejection happens here, never mid-stream
//! 3. A channel-backed sink is registered under the workspace id
//! 4. The receiver half becomes the SSE response body, prefixed with a
//!    `: connected` comment confirming the stream is open
//! 5. Client disconnect drops the response stream, which deregisters the
//!    handle

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::adapters::events::{ChannelSink, SubscriberRegistry};
use crate::config::StreamConfig;
use crate::domain::{
    role_guard, DomainError, ErrorCode, Permission, SubscriberId, WorkspaceId,
};
use crate::ports::MembershipResolver;

use super::middleware::RequireAuth;

/// Shared state for the events routes.
#[derive(Clone)]
pub struct EventsAppState {
    pub registry: Arc<SubscriberRegistry>,
    pub memberships: Arc<dyn MembershipResolver>,
    pub stream: StreamConfig,
}

/// Create the events API router.
///
/// # Routes
///
/// - `GET /:workspace_id/events` - long-lived SSE subscription to one
///   workspace's event stream (requires authentication)
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .nest("/api/workspaces", events_router())
///     .layer(middleware::from_fn_with_state(validator, auth_middleware))
///     .with_state(state);
/// ```
pub fn events_router() -> Router<EventsAppState> {
    Router::new().route("/:workspace_id/events", get(subscribe_workspace))
}

/// GET /api/workspaces/:workspace_id/events - subscribe to workspace events.
pub async fn subscribe_workspace(
    State(state): State<EventsAppState>,
    Path(workspace_id): Path<String>,
    RequireAuth(user): RequireAuth,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, EventsApiError> {
    let workspace_id = WorkspaceId::new(workspace_id).map_err(DomainError::from)?;

    // Per-workspace authorization happens once, at connect time; the handle
    // is only registered after the guard passes.
    let role = state
        .memberships
        .role_in_workspace(&user.id, &workspace_id)
        .await?
        .ok_or_else(|| DomainError::forbidden("Not a member of this workspace"))?;
    role_guard(role, &[Permission::ViewOnly])?;

    let (tx, rx) = mpsc::channel(state.stream.subscriber_buffer);
    let subscriber_id = SubscriberId::new();
    state
        .registry
        .register(&workspace_id, subscriber_id, Arc::new(ChannelSink::new(tx)))
        .await;

    tracing::debug!(
        workspace_id = %workspace_id,
        subscriber_id = %subscriber_id,
        user_id = %user.id,
        "workspace stream opened"
    );

    let guard = DeregisterOnDisconnect {
        registry: Arc::clone(&state.registry),
        workspace_id,
        subscriber_id,
    };

    // The initial comment confirms the stream is open before any event
    // arrives; frames map one-to-one onto `event:`/`data:` lines.
    let connected = stream::once(async {
        Ok::<Event, Infallible>(Event::default().comment("connected"))
    });
    let events = ReceiverStream::new(rx).map(move |frame| {
        let _held_until_disconnect = &guard;
        Ok::<Event, Infallible>(Event::default().event(frame.event).data(frame.data))
    });

    Ok(Sse::new(connected.chain(events)).keep_alive(
        KeepAlive::new()
            .interval(state.stream.keep_alive_interval())
            .text("keep-alive"),
    ))
}

/// Deregisters a subscriber when its response stream is dropped.
///
/// Dropping the SSE body is the transport's close notification. Removal is
/// spawned so it completes even while broadcasts are mid-flight against the
/// handle; the registry tolerates the race, and the dispatcher's pruning
/// path covers a write that slips in between.
struct DeregisterOnDisconnect {
    registry: Arc<SubscriberRegistry>,
    workspace_id: WorkspaceId,
    subscriber_id: SubscriberId,
}

impl Drop for DeregisterOnDisconnect {
    fn drop(&mut self) {
        let registry = Arc::clone(&self.registry);
        let workspace_id = self.workspace_id.clone();
        let subscriber_id = self.subscriber_id;
        // No runtime means the process is shutting down and the registry
        // goes with it.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                tracing::debug!(
                    workspace_id = %workspace_id,
                    subscriber_id = %subscriber_id,
                    "workspace stream closed"
                );
                registry.deregister(&workspace_id, &subscriber_id).await;
            });
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
pub struct EventsApiError(DomainError);

impl From<DomainError> for EventsApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for EventsApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.code {
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            error_code: self.0.code.to_string(),
            message: self.0.message,
        };
        (status, Json(body)).into_response()
    }
}

/// Standard error body for rejected subscription attempts.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}
