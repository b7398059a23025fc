//! REST API layer: route handlers, DTOs, router composition and the
//! OpenAPI document.
//!
//! Resource endpoints are mounted under `/api/v1`; system endpoints live
//! at the root.

pub mod dto;
pub mod handlers;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for the REST API.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "canvas-relay",
        description = "Introspection API of the room-scoped drawing relay. Drawing traffic itself flows over the WebSocket endpoint at `/ws`."
    ),
    paths(
        handlers::system::health_handler,
        handlers::system::session_limits_handler,
        handlers::room::list_rooms,
        handlers::room::get_room,
    ),
    components(schemas(
        handlers::system::HealthResponse,
        handlers::system::SessionLimits,
        dto::RoomListResponse,
        dto::RoomSummaryDto,
        dto::RoomDetailResponse,
        dto::MemberDto,
        dto::PaginationMeta,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "System", description = "Health and configuration"),
        (name = "Rooms", description = "Active rooms and their members"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
///
/// Requests that take longer than `request_timeout` are answered with
/// `408 Request Timeout`.
pub fn build_router(request_timeout: Duration) -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
        .layer(ServiceBuilder::new().layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        )))
}
