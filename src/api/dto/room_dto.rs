//! Room DTOs for the list and detail endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{MemberSummary, RoomSummary};

/// One row of `GET /rooms`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomSummaryDto {
    /// Room identifier.
    pub room_id: String,
    /// Current number of members.
    pub member_count: usize,
    /// When the room was created.
    pub created_at: DateTime<Utc>,
}

/// Response body for `GET /rooms`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomListResponse {
    /// Rooms on the requested page, ordered by identifier.
    pub rooms: Vec<RoomSummaryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// One member in `GET /rooms/{room_id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberDto {
    /// Connection identifier.
    pub connection_id: uuid::Uuid,
    /// Advisory display name from the join descriptor.
    pub display_name: String,
    /// When the connection joined.
    pub joined_at: DateTime<Utc>,
}

/// Response body for `GET /rooms/{room_id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomDetailResponse {
    /// Room identifier.
    pub room_id: String,
    /// When the room was created.
    pub created_at: DateTime<Utc>,
    /// Number of members.
    pub member_count: usize,
    /// Members ordered by join time.
    pub members: Vec<MemberDto>,
}

impl From<&RoomSummary> for RoomSummaryDto {
    fn from(summary: &RoomSummary) -> Self {
        Self {
            room_id: summary.room_id.to_string(),
            member_count: summary.members.len(),
            created_at: summary.created_at,
        }
    }
}

impl From<MemberSummary> for MemberDto {
    fn from(member: MemberSummary) -> Self {
        Self {
            connection_id: *member.connection_id.as_uuid(),
            display_name: member.display_name,
            joined_at: member.joined_at,
        }
    }
}

impl From<RoomSummary> for RoomDetailResponse {
    fn from(summary: RoomSummary) -> Self {
        Self {
            room_id: summary.room_id.to_string(),
            created_at: summary.created_at,
            member_count: summary.members.len(),
            members: summary.members.into_iter().map(MemberDto::from).collect(),
        }
    }
}
