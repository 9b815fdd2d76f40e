//! Reservation & availability API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::Envelope;
use shared::util::now_millis;

use crate::api::convert::ReservationView;
use crate::booking::{AvailabilityReport, NewReservation};
use crate::core::ServerState;
use crate::db::models::{ClientRef, GuestClient, ReservationStatus};
use crate::db::repository::{ClientRepository, RepoError};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_guests, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use crate::utils::time::{parse_clock, parse_date};

#[derive(Debug, Deserialize)]
pub struct CheckAvailabilityRequest {
    pub restaurant_id: String,
    /// YYYY-MM-DD
    pub date: String,
    /// "HH:MM" or "h:mm AM/PM"
    pub time: String,
    pub guests: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub restaurant_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub guests: i32,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ReservationPayload {
    pub reservation: ReservationView,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ReservationStatus,
}

/// POST /check_Availability - 运行可用性引擎
pub async fn check_availability(
    State(state): State<ServerState>,
    Json(payload): Json<CheckAvailabilityRequest>,
) -> AppResult<Json<Envelope<AvailabilityReport>>> {
    validate_guests(payload.guests)?;
    let date = parse_date(&payload.date)?;
    let minute = parse_clock(&payload.time)?;

    let report = state
        .availability()
        .check(&payload.restaurant_id, date, minute, payload.guests)
        .await?;
    Ok(Json(Envelope::ok(report)))
}

/// POST /create_Reservation - 创建预订
///
/// 邮箱未知时隐式创建散客记录。
pub async fn create_reservation(
    State(state): State<ServerState>,
    Json(payload): Json<CreateReservationRequest>,
) -> AppResult<Json<Envelope<ReservationPayload>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    if !payload.email.contains('@') {
        return Err(AppError::validation("email is not a valid address"));
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_guests(payload.guests)?;

    let date = parse_date(&payload.date)?;
    let minute = parse_clock(&payload.time)?;
    let now = now_millis();

    let client = resolve_client(&state, &payload, now).await?;

    let reservation = state
        .reservations()
        .create(
            NewReservation {
                restaurant_id: payload.restaurant_id,
                client,
                guests: payload.guests,
                date,
                minute_of_day: minute,
                duration_minutes: payload.duration_minutes,
            },
            now,
        )
        .await?;

    Ok(Json(Envelope::ok_with_message(
        ReservationPayload {
            reservation: ReservationView::from(reservation),
        },
        "Reservation created",
    )))
}

/// PUT /reservations/{id}/status - 预订状态流转
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<Envelope<ReservationPayload>>> {
    let reservation = state.reservations().update_status(&id, payload.status).await?;
    Ok(Json(Envelope::ok(ReservationPayload {
        reservation: ReservationView::from(reservation),
    })))
}

/// PUT /reservations/{id}/cancel - 取消预订
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<ReservationPayload>>> {
    let reservation = state.reservations().cancel(&id).await?;
    Ok(Json(Envelope::ok_with_message(
        ReservationPayload {
            reservation: ReservationView::from(reservation),
        },
        "Reservation cancelled",
    )))
}

/// 邮箱 → 注册客户 / 已有散客 / 新散客
async fn resolve_client(
    state: &ServerState,
    payload: &CreateReservationRequest,
    now: i64,
) -> AppResult<ClientRef> {
    let clients = ClientRepository::new(state.get_db());
    let email = payload.email.trim().to_ascii_lowercase();

    if let Some(registered) = clients
        .find_registered_by_email(&email)
        .await
        .map_err(repo_err)?
    {
        let id = registered
            .id
            .ok_or_else(|| AppError::internal("registered client record missing id"))?;
        return Ok(ClientRef::registered(id));
    }

    if let Some(guest) = clients.find_guest_by_email(&email).await.map_err(repo_err)? {
        let id = guest
            .id
            .ok_or_else(|| AppError::internal("guest client record missing id"))?;
        return Ok(ClientRef::guest(id));
    }

    let guest = clients
        .create_guest(GuestClient {
            id: None,
            name: payload.name.trim().to_string(),
            email,
            phone: payload.phone.clone(),
            created_at: now,
        })
        .await
        .map_err(repo_err)?;
    let id = guest
        .id
        .ok_or_else(|| AppError::internal("guest client record missing id"))?;
    tracing::info!("Created guest client for first-time reservation");
    Ok(ClientRef::guest(id))
}

fn repo_err(e: RepoError) -> AppError {
    crate::booking::BookingError::from(e).into()
}
