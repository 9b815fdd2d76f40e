use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::broadcast;

use super::*;
use crate::db::DbService;
use crate::db::models::{
    ClientRef, DiningTable, DiningTableCreate, GuestClient, OpeningHours, Reservation,
    ReservationStatus, Restaurant, RestaurantCreate, TableShape,
};
use crate::db::repository::{ClientRepository, RestaurantRepository};
use crate::db::repository::client::DbClientDirectory;
use crate::notify::{EventHub, EventNotifier};
use crate::utils::time::date_minute_to_millis;
use shared::event::FloorEvent;

mod test_assignment;
mod test_availability;

const TZ: Tz = chrono_tz::Europe::Madrid;

/// 2025-06-02 is a Monday
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

/// Millis for `date` + minute-of-day in the test timezone
fn at(date: NaiveDate, minute_of_day: u16) -> i64 {
    date_minute_to_millis(date, minute_of_day, TZ)
}

fn id_of(record: &Option<surrealdb::RecordId>) -> String {
    record.as_ref().unwrap().to_string()
}

fn restaurant_id(restaurant: &Restaurant) -> String {
    id_of(&restaurant.id)
}

fn table_id(table: &DiningTable) -> String {
    id_of(&table.id)
}

fn reservation_id(reservation: &Reservation) -> String {
    id_of(&reservation.id)
}

struct Harness {
    db: Surreal<Db>,
    hub: Arc<EventHub>,
    notifier: Arc<EventNotifier>,
}

impl Harness {
    async fn new() -> Self {
        let db = DbService::memory().await.unwrap().db;
        let hub = Arc::new(EventHub::new());
        let directory: Arc<dyn ClientDirectory> = Arc::new(DbClientDirectory::new(db.clone()));
        let notifier = Arc::new(EventNotifier::new(hub.clone(), directory));
        Self { db, hub, notifier }
    }

    fn registry(&self) -> TableRegistry {
        TableRegistry::new(self.db.clone(), self.notifier.clone())
    }

    fn availability(&self) -> AvailabilityEngine {
        AvailabilityEngine::new(self.db.clone(), TZ)
    }

    fn coordinator(&self) -> AssignmentCoordinator {
        AssignmentCoordinator::new(self.db.clone(), self.notifier.clone())
    }

    fn reservation_service(&self) -> ReservationService {
        ReservationService::new(self.db.clone(), self.notifier.clone(), TZ)
    }

    /// Restaurant open every day 09:00–22:00
    async fn seed_restaurant(&self, name: &str) -> Restaurant {
        RestaurantRepository::new(self.db.clone())
            .create(RestaurantCreate {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                phone: None,
                address: None,
                opening_hours: OpeningHours::all_week("09:00", "22:00"),
            })
            .await
            .unwrap()
    }

    async fn seed_table(
        &self,
        restaurant: &Restaurant,
        number: i32,
        seats: i32,
    ) -> DiningTable {
        self.registry()
            .create_table(DiningTableCreate {
                restaurant_id: restaurant_id(restaurant),
                number,
                seats,
                shape: TableShape::Square,
                radius: None,
                width: Some(1.0),
                height: Some(1.0),
                position: None,
                section: None,
                status: None,
            })
            .await
            .unwrap()
    }

    async fn seed_guest(&self, name: &str, email: &str) -> ClientRef {
        let guest = ClientRepository::new(self.db.clone())
            .create_guest(GuestClient {
                id: None,
                name: name.to_string(),
                email: email.to_string(),
                phone: None,
                created_at: 0,
            })
            .await
            .unwrap();
        ClientRef::guest(guest.id.unwrap())
    }

    /// Planning reservation for `date` + `minute`, 90 minutes, unassigned
    async fn seed_reservation(
        &self,
        restaurant: &Restaurant,
        email: &str,
        guests: i32,
        date: NaiveDate,
        minute_of_day: u16,
    ) -> Reservation {
        let client = self.seed_guest("Guest", email).await;
        self.reservation_service()
            .create(
                NewReservation {
                    restaurant_id: restaurant_id(restaurant),
                    client,
                    guests,
                    date,
                    minute_of_day,
                    duration_minutes: None,
                },
                at(date, minute_of_day) - 24 * 60 * 60 * 1000,
            )
            .await
            .unwrap()
    }
}

/// Receive one event with a timeout, panicking on silence
async fn recv_event(rx: &mut broadcast::Receiver<FloorEvent>) -> FloorEvent {
    tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
        .await
        .expect("no event within 1s")
        .expect("event channel closed")
}
