//! Booking errors

use thiserror::Error;

use crate::db::models::{ReservationStatus, TableStatus};
use crate::db::repository::RepoError;
use crate::utils::AppError;
use crate::utils::time::ClockParseError;

/// Booking core errors
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Restaurant {0} not found")]
    RestaurantNotFound(String),

    #[error("Table {0} not found")]
    TableNotFound(String),

    #[error("Reservation {0} not found")]
    ReservationNotFound(String),

    #[error("Table {number} already exists in this restaurant")]
    DuplicateTable { number: i32 },

    #[error("Shape '{shape}' requires {required}")]
    InvalidShapeDimensions {
        shape: String,
        required: &'static str,
    },

    #[error("Table {number} has an active reservation")]
    HasActiveReservation { number: i32 },

    #[error("Table {number} has upcoming reservations")]
    HasFutureReservations { number: i32 },

    #[error("Table {number} is not available during the requested time slot")]
    TableNotAvailable { number: i32 },

    #[error("Table {number} seats {seats}, reservation needs {guests}")]
    InsufficientCapacity {
        number: i32,
        seats: i32,
        guests: i32,
    },

    #[error("Table {number} is already booked for an overlapping time slot")]
    TimeConflict { number: i32 },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("Table status '{0}' cannot be set directly")]
    StatusNotSettable(TableStatus),

    #[error("The restaurant is closed at the requested time")]
    RestaurantClosed,

    #[error("Table {number} was modified concurrently, please retry")]
    VersionConflict { number: i32 },

    #[error(transparent)]
    Clock(#[from] ClockParseError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type BookingResult<T> = Result<T, BookingError>;

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        use BookingError::*;
        match &err {
            RestaurantNotFound(_) | TableNotFound(_) | ReservationNotFound(_) => {
                AppError::not_found(err.to_string())
            }

            DuplicateTable { .. }
            | HasActiveReservation { .. }
            | HasFutureReservations { .. }
            | TableNotAvailable { .. }
            | InsufficientCapacity { .. }
            | TimeConflict { .. }
            | VersionConflict { .. } => AppError::conflict(err.to_string()),

            InvalidShapeDimensions { .. } | Clock(_) => AppError::validation(err.to_string()),

            InvalidTransition { .. } | StatusNotSettable(_) | RestaurantClosed => {
                AppError::business_rule(err.to_string())
            }

            Repo(repo) => match repo {
                RepoError::NotFound(msg) => AppError::not_found(msg.clone()),
                RepoError::Duplicate(msg) => AppError::conflict(msg.clone()),
                RepoError::Validation(msg) => AppError::validation(msg.clone()),
                RepoError::Database(msg) => AppError::database(msg.clone()),
            },
        }
    }
}
