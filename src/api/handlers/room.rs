//! Room introspection handlers: list and detail.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{PaginationParams, RoomDetailResponse, RoomListResponse, RoomSummaryDto};
use crate::app_state::AppState;
use crate::domain::RoomId;
use crate::error::{ErrorResponse, RelayError};

/// `GET /rooms` — List active rooms.
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "List rooms",
    description = "Returns a paginated list of active rooms ordered by identifier.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated room list", body = RoomListResponse),
    )
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> impl IntoResponse {
    let summaries = state.registry.list().await;
    let rows: Vec<RoomSummaryDto> = summaries.iter().map(RoomSummaryDto::from).collect();
    let (rooms, pagination) = params.paginate(rows);
    Json(RoomListResponse { rooms, pagination })
}

/// `GET /rooms/{room_id}` — Room details with its members.
///
/// # Errors
///
/// Returns [`RelayError::RoomNotFound`] if no such room is active.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}",
    tag = "Rooms",
    summary = "Get room details",
    description = "Returns one active room and its members ordered by join time.",
    params(
        ("room_id" = String, Path, description = "Room identifier"),
    ),
    responses(
        (status = 200, description = "Room details", body = RoomDetailResponse),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailResponse>, RelayError> {
    let room_id = RoomId::new(room_id)?;
    let summary = state
        .registry
        .summary(&room_id)
        .await
        .ok_or_else(|| RelayError::RoomNotFound(room_id.to_string()))?;
    Ok(Json(RoomDetailResponse::from(summary)))
}

/// Room routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(list_rooms))
        .route("/rooms/{room_id}", get(get_room))
}
