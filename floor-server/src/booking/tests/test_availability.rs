use super::*;

#[tokio::test]
async fn free_table_at_requested_time() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    let table = h.seed_table(&restaurant, 1, 4).await;

    let report = h
        .availability()
        .check(&restaurant_id(&restaurant), monday(), 14 * 60, 4)
        .await
        .unwrap();

    assert!(report.available);
    assert_eq!(report.tables.len(), 1);
    assert_eq!(report.tables[0].number, table.number);
    assert!(report.alternatives.is_empty());
}

#[tokio::test]
async fn capacity_filters_candidates() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    h.seed_table(&restaurant, 1, 4).await;

    let report = h
        .availability()
        .check(&restaurant_id(&restaurant), monday(), 14 * 60, 6)
        .await
        .unwrap();

    // the only table seats 4; no slot can ever fit 6 guests
    assert!(!report.available);
    assert!(report.tables.is_empty());
    assert!(report.alternatives.is_empty());
}

#[tokio::test]
async fn unknown_restaurant() {
    let h = Harness::new().await;
    let err = h
        .availability()
        .check("restaurant:missing", monday(), 14 * 60, 2)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::RestaurantNotFound(_)));
}

#[tokio::test]
async fn fully_booked_slot_proposes_nearest_free_offsets() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    let table = h.seed_table(&restaurant, 1, 4).await;

    // the single table is taken 14:00–15:30
    let reservation = h
        .seed_reservation(&restaurant, "booked@example.com", 2, monday(), 14 * 60)
        .await;
    h.coordinator()
        .assign_table(
            &table_id(&table),
            &reservation_id(&reservation),
            at(monday(), 9 * 60),
        )
        .await
        .unwrap();

    let report = h
        .availability()
        .check(&restaurant_id(&restaurant), monday(), 14 * 60, 2)
        .await
        .unwrap();

    assert!(!report.available);
    // ±30 and ±60 all overlap the 14:00–15:30 booking; the free slots are
    // at distance 90, earlier one first
    let times: Vec<&str> = report.alternatives.iter().map(|a| a.time.as_str()).collect();
    assert_eq!(times, vec!["12:30", "15:30"]);
    assert!(report.alternatives.iter().all(|a| !a.tables.is_empty()));
}

#[tokio::test]
async fn second_table_keeps_slot_available() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    let t1 = h.seed_table(&restaurant, 1, 4).await;
    h.seed_table(&restaurant, 2, 4).await;

    let reservation = h
        .seed_reservation(&restaurant, "first@example.com", 2, monday(), 14 * 60)
        .await;
    h.coordinator()
        .assign_table(
            &table_id(&t1),
            &reservation_id(&reservation),
            at(monday(), 9 * 60),
        )
        .await
        .unwrap();

    let report = h
        .availability()
        .check(&restaurant_id(&restaurant), monday(), 14 * 60, 2)
        .await
        .unwrap();

    assert!(report.available);
    assert_eq!(report.tables.len(), 1);
    assert_eq!(report.tables[0].number, 2);
}

#[tokio::test]
async fn alternatives_respect_closing_buffer() {
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await; // closes 22:00
    let table = h.seed_table(&restaurant, 1, 4).await;

    // table taken 19:00–20:30
    let reservation = h
        .seed_reservation(&restaurant, "evening@example.com", 2, monday(), 19 * 60)
        .await;
    h.coordinator()
        .assign_table(
            &table_id(&table),
            &reservation_id(&reservation),
            at(monday(), 9 * 60),
        )
        .await
        .unwrap();

    let report = h
        .availability()
        .check(&restaurant_id(&restaurant), monday(), 19 * 60, 2)
        .await
        .unwrap();

    assert!(!report.available);
    // 20:30 (+90) is free and inside opening hours, but within 120 minutes
    // of the 22:00 close; only 17:30 (-90) survives
    let times: Vec<&str> = report.alternatives.iter().map(|a| a.time.as_str()).collect();
    assert_eq!(times, vec!["17:30"]);
}

#[tokio::test]
async fn bistro_a_scenario() {
    // open Monday 09:00–22:00, one table seating 2
    let h = Harness::new().await;
    let restaurant = h.seed_restaurant("Bistro A").await;
    let table = h.seed_table(&restaurant, 1, 2).await;

    // first reservation Monday 12:00 → success, Planning
    let reservation = h
        .seed_reservation(&restaurant, "ana@example.com", 2, monday(), 12 * 60)
        .await;
    assert_eq!(reservation.status, ReservationStatus::Planning);
    h.coordinator()
        .assign_table(
            &table_id(&table),
            &reservation_id(&reservation),
            at(monday(), 9 * 60),
        )
        .await
        .unwrap();

    // second request Monday 12:30 → table occupied 12:00–13:30
    let report = h
        .availability()
        .check(&restaurant_id(&restaurant), monday(), 12 * 60 + 30, 2)
        .await
        .unwrap();

    assert!(!report.available);
    assert!(!report.alternatives.is_empty());
    // every proposal is 13:30 or later, within opening hours
    for alt in &report.alternatives {
        assert!(alt.start_time >= at(monday(), 13 * 60 + 30), "unexpected slot {}", alt.time);
    }
}
