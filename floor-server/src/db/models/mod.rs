//! Database Models
//!
//! SurrealDB entities and their create/update payloads.

pub mod client;
pub mod dining_table;
pub mod reservation;
pub mod restaurant;
pub mod serde_helpers;

pub use client::{GuestClient, RegisteredClient};
pub use dining_table::{
    DiningTable, DiningTableCreate, DiningTableUpdate, Position, TableShape, TableStatus,
};
pub use reservation::{ClientKind, ClientRef, Reservation, ReservationStatus};
pub use restaurant::{DayHours, DayWindow, OpeningHours, Restaurant, RestaurantCreate, WeekSchedule};
