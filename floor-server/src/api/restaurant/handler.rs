//! Restaurant-scoped floor endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::Envelope;

use crate::api::convert::{TableView, tables_with_schedule};
use crate::booking::TableMove;
use crate::core::ServerState;
use crate::db::models::DiningTable;
use crate::db::repository::{ReservationRepository, parse_record};
use crate::utils::AppResult;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date, today};

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TablesPayload {
    pub tables: Vec<TableView>,
}

#[derive(Debug, Serialize)]
pub struct FloorLayoutPayload {
    pub restaurant: String,
    pub date: String,
    pub tables: Vec<TableView>,
}

#[derive(Debug, Deserialize)]
pub struct LayoutUpdateRequest {
    pub tables: Vec<TableMove>,
}

#[derive(Debug, Serialize)]
pub struct LayoutUpdatedPayload {
    pub tables: Vec<DiningTable>,
}

/// GET /restaurant/{id}/tables - 当日排期视图
pub async fn list_tables(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<TablesPayload>>> {
    let date = today(state.tz());
    let tables = state.registry().list_tables(&id).await?;
    let views = with_day_schedule(&state, &id, tables, date).await?;
    Ok(Json(Envelope::ok(TablesPayload { tables: views })))
}

/// GET /restaurant/{id}/floor-layout?date= - 指定日期的完整平面图
pub async fn floor_layout(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Envelope<FloorLayoutPayload>>> {
    let date = match &query.date {
        Some(raw) => parse_date(raw)?,
        None => today(state.tz()),
    };
    let tables = state.registry().list_tables(&id).await?;
    let views = with_day_schedule(&state, &id, tables, date).await?;
    Ok(Json(Envelope::ok(FloorLayoutPayload {
        restaurant: id,
        date: date.to_string(),
        tables: views,
    })))
}

/// PUT /restaurant/{id}/floor-layout - 平面图批量保存
pub async fn save_layout(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<LayoutUpdateRequest>,
) -> AppResult<Json<Envelope<LayoutUpdatedPayload>>> {
    let tables = state.registry().update_layout(&id, payload.tables).await?;
    Ok(Json(Envelope::ok_with_message(
        LayoutUpdatedPayload { tables },
        "Floor layout updated",
    )))
}

async fn with_day_schedule(
    state: &ServerState,
    restaurant_id: &str,
    tables: Vec<DiningTable>,
    date: chrono::NaiveDate,
) -> AppResult<Vec<TableView>> {
    let rid = parse_record(restaurant_id).map_err(crate::booking::BookingError::from)?;
    let tz = state.tz();
    let reservations = ReservationRepository::new(state.get_db())
        .find_for_restaurant_between(&rid, day_start_millis(date, tz), day_end_millis(date, tz))
        .await
        .map_err(crate::booking::BookingError::from)?;
    Ok(tables_with_schedule(tables, reservations))
}
