//! Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::Envelope;
use shared::util::now_millis;

use crate::api::convert::ReservationView;
use crate::booking::BookingError;
use crate::core::ServerState;
use crate::db::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, Reservation, TableStatus,
};
use crate::db::repository::{DiningTableRepository, ReservationRepository};
use crate::utils::validation::{MAX_SECTION_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};
use crate::utils::time::{day_end_millis, day_start_millis, parse_date, today};

#[derive(Debug, Serialize)]
pub struct TablePayload {
    pub table: DiningTable,
}

#[derive(Debug, Deserialize)]
pub struct PositionUpdateRequest {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: TableStatus,
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub table_id: String,
    pub reservation_id: String,
}

#[derive(Debug, Serialize)]
pub struct AssignPayload {
    pub table: DiningTable,
    pub reservation: Reservation,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReservationsPayload {
    pub reservations: Vec<ReservationView>,
}

/// POST /tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<Envelope<TablePayload>>> {
    if payload.number <= 0 {
        return Err(AppError::validation("number must be a positive number"));
    }
    if payload.seats <= 0 {
        return Err(AppError::validation("seats must be a positive number"));
    }
    validate_optional_text(&payload.section, "section", MAX_SECTION_LEN)?;

    let table = state.registry().create_table(payload).await?;
    Ok(Json(Envelope::ok_with_message(
        TablePayload { table },
        "Table created",
    )))
}

/// PUT /tables/{table_id}/position - 更新桌台坐标
pub async fn update_position(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
    Json(payload): Json<PositionUpdateRequest>,
) -> AppResult<Json<Envelope<TablePayload>>> {
    let table = state
        .registry()
        .update_position(&table_id, payload.x, payload.y)
        .await?;
    Ok(Json(Envelope::ok(TablePayload { table })))
}

/// PUT /tables/{table_id}/details - 更新桌台属性
pub async fn update_details(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<Envelope<TablePayload>>> {
    if matches!(payload.seats, Some(seats) if seats <= 0) {
        return Err(AppError::validation("seats must be a positive number"));
    }
    validate_optional_text(&payload.section, "section", MAX_SECTION_LEN)?;

    let table = state.registry().update_details(&table_id, payload).await?;
    Ok(Json(Envelope::ok(TablePayload { table })))
}

/// PUT /tables/{table_id}/status - 设置桌台状态
pub async fn set_status(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<Envelope<TablePayload>>> {
    let table = state
        .registry()
        .set_status(&table_id, payload.status)
        .await?;
    Ok(Json(Envelope::ok(TablePayload { table })))
}

/// DELETE /tables/{table_id} - 删除桌台
pub async fn delete(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> AppResult<Json<Envelope<()>>> {
    state
        .registry()
        .delete_table(&table_id, now_millis())
        .await?;
    Ok(Json(Envelope::message_only("Table deleted")))
}

/// GET /tables/{table_id}/reservations?date= - 单桌的当日预订
pub async fn reservations(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Envelope<ReservationsPayload>>> {
    let date = match &query.date {
        Some(raw) => parse_date(raw)?,
        None => today(state.tz()),
    };

    let table = DiningTableRepository::new(state.get_db())
        .find_by_id(&table_id)
        .await
        .map_err(BookingError::from)?
        .ok_or_else(|| BookingError::TableNotFound(table_id.clone()))?;
    let table_ref = table
        .id
        .ok_or_else(|| AppError::internal("table record missing id"))?;

    let tz = state.tz();
    let reservations = ReservationRepository::new(state.get_db())
        .find_for_table_between(&table_ref, day_start_millis(date, tz), day_end_millis(date, tz))
        .await
        .map_err(BookingError::from)?;

    Ok(Json(Envelope::ok(ReservationsPayload {
        reservations: reservations.iter().map(ReservationView::from).collect(),
    })))
}

/// POST /tables/assign - 指派预订到桌台
pub async fn assign(
    State(state): State<ServerState>,
    Json(payload): Json<AssignRequest>,
) -> AppResult<Json<Envelope<AssignPayload>>> {
    let (table, reservation) = state
        .coordinator()
        .assign_table(&payload.table_id, &payload.reservation_id, now_millis())
        .await?;
    Ok(Json(Envelope::ok_with_message(
        AssignPayload { table, reservation },
        "Table assigned",
    )))
}
