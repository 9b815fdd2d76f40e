use super::*;
use crate::db::models::TableStatus;
use crate::db::repository::DiningTableRepository;
use shared::event::{EventAction, customer_room, restaurant_room};

#[tokio::test]
async fn planning_assignment_reserves_the_table() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    let table = h.seed_table(&restaurant, 1, 4).await;
    let reservation = h
        .seed_reservation(&restaurant, "plan@example.com", 2, monday(), 14 * 60)
        .await;

    let (table, reservation) = h
        .coordinator()
        .assign_table(
            &table_id(&table),
            &reservation_id(&reservation),
            at(monday(), 9 * 60),
        )
        .await
        .unwrap();

    assert_eq!(table.status, TableStatus::Reserved);
    assert!(table.current_reservation.is_none());
    assert_eq!(reservation.assigned_table, table.id);
    assert_eq!(reservation.table_number, Some(1));
}

#[tokio::test]
async fn seated_assignment_inside_window_occupies() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    let table = h.seed_table(&restaurant, 1, 4).await;
    let reservation = h
        .seed_reservation(&restaurant, "walkin@example.com", 2, monday(), 14 * 60)
        .await;
    h.reservation_service()
        .update_status(&reservation_id(&reservation), ReservationStatus::Seated)
        .await
        .unwrap();

    // now = 14:30, inside [14:00, 15:30)
    let (table, _) = h
        .coordinator()
        .assign_table(
            &table_id(&table),
            &reservation_id(&reservation),
            at(monday(), 14 * 60 + 30),
        )
        .await
        .unwrap();

    assert_eq!(table.status, TableStatus::Occupied);
    assert_eq!(table.current_reservation, reservation.id);
}

#[tokio::test]
async fn reassigning_a_reserved_table_fails() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    let table = h.seed_table(&restaurant, 1, 4).await;
    let first = h
        .seed_reservation(&restaurant, "one@example.com", 2, monday(), 14 * 60)
        .await;
    let second = h
        .seed_reservation(&restaurant, "two@example.com", 2, monday(), 18 * 60)
        .await;

    h.coordinator()
        .assign_table(&table_id(&table), &reservation_id(&first), at(monday(), 9 * 60))
        .await
        .unwrap();

    // table status is reserved now; even a non-overlapping window is refused
    let err = h
        .coordinator()
        .assign_table(&table_id(&table), &reservation_id(&second), at(monday(), 9 * 60))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::TableNotAvailable { number: 1 }));
}

#[tokio::test]
async fn capacity_is_checked() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    let table = h.seed_table(&restaurant, 1, 2).await;
    let reservation = h
        .seed_reservation(&restaurant, "six@example.com", 6, monday(), 14 * 60)
        .await;

    let err = h
        .coordinator()
        .assign_table(&table_id(&table), &reservation_id(&reservation), at(monday(), 9 * 60))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BookingError::InsufficientCapacity {
            number: 1,
            seats: 2,
            guests: 6
        }
    ));
}

#[tokio::test]
async fn overlapping_binding_is_a_time_conflict() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    let table = h.seed_table(&restaurant, 1, 4).await;
    let first = h
        .seed_reservation(&restaurant, "early@example.com", 2, monday(), 14 * 60)
        .await;
    // overlapping window 14:30–16:00
    let second = h
        .seed_reservation(&restaurant, "late@example.com", 2, monday(), 14 * 60 + 30)
        .await;

    h.coordinator()
        .assign_table(&table_id(&table), &reservation_id(&first), at(monday(), 9 * 60))
        .await
        .unwrap();

    // free the status while keeping the first binding in place
    h.registry()
        .set_status(&table_id(&table), TableStatus::Available)
        .await
        .unwrap();

    let err = h
        .coordinator()
        .assign_table(&table_id(&table), &reservation_id(&second), at(monday(), 9 * 60))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::TimeConflict { number: 1 }));
}

#[tokio::test]
async fn back_to_back_binding_is_allowed() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    let table = h.seed_table(&restaurant, 1, 4).await;
    let first = h
        .seed_reservation(&restaurant, "lunch@example.com", 2, monday(), 14 * 60)
        .await;
    // 15:30–17:00 starts exactly when the first window ends
    let second = h
        .seed_reservation(&restaurant, "dinner@example.com", 2, monday(), 15 * 60 + 30)
        .await;

    h.coordinator()
        .assign_table(&table_id(&table), &reservation_id(&first), at(monday(), 9 * 60))
        .await
        .unwrap();
    h.registry()
        .set_status(&table_id(&table), TableStatus::Available)
        .await
        .unwrap();

    let (_, second) = h
        .coordinator()
        .assign_table(&table_id(&table), &reservation_id(&second), at(monday(), 9 * 60))
        .await
        .unwrap();
    assert_eq!(second.table_number, Some(1));
}

#[tokio::test]
async fn missing_table_or_reservation() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    let table = h.seed_table(&restaurant, 1, 4).await;
    let reservation = h
        .seed_reservation(&restaurant, "ghost@example.com", 2, monday(), 14 * 60)
        .await;

    let err = h
        .coordinator()
        .assign_table("dining_table:missing", &reservation_id(&reservation), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::TableNotFound(_)));

    let err = h
        .coordinator()
        .assign_table(&table_id(&table), "reservation:missing", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::ReservationNotFound(_)));
}

#[tokio::test]
async fn stale_version_write_is_rejected() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    let table = h.seed_table(&restaurant, 1, 4).await;

    let repo = DiningTableRepository::new(h.db.clone());
    let stale = repo.find_by_id(&table_id(&table)).await.unwrap().unwrap();

    // another writer bumps the version in between
    h.registry()
        .set_status(&table_id(&table), TableStatus::Maintenance)
        .await
        .unwrap();

    // the stale copy loses the compare-and-swap
    assert!(repo.update_checked(&stale).await.unwrap().is_none());
}

#[tokio::test]
async fn assignment_emits_restaurant_and_customer_events() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    let table = h.seed_table(&restaurant, 1, 4).await;
    let reservation = h
        .seed_reservation(&restaurant, "maria@example.com", 2, monday(), 14 * 60)
        .await;

    let mut restaurant_rx = h
        .hub
        .subscribe(&restaurant_room(&restaurant_id(&restaurant)));
    let mut customer_rx = h.hub.subscribe(&customer_room("maria@example.com"));

    h.coordinator()
        .assign_table(&table_id(&table), &reservation_id(&reservation), at(monday(), 9 * 60))
        .await
        .unwrap();

    let event = recv_event(&mut restaurant_rx).await;
    assert_eq!(event.action, EventAction::ReservationAssigned);
    // tableAdded was seq 1 for this room, before we subscribed
    assert_eq!(event.seq, 2);
    assert!(event.data.is_some());

    let event = recv_event(&mut customer_rx).await;
    assert_eq!(event.action, EventAction::TableAssigned);
}
