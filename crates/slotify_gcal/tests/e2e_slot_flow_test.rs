use slotify_gcal::codec::SlotState;
use slotify_gcal::logic::{SlotSpec, DEFAULT_SLOT_LIMIT};
mod fixtures;

use fixtures::at;

#[tokio::test]
async fn test_e2e_slot_flow() {
    let (_store, engine) = fixtures::create_engine();

    // Step 1: one hour split into two 30 minute slots
    let batch = engine
        .create_slots(
            Some("clinic"),
            SlotSpec::Batch {
                range_start: at(9, 0),
                range_end: at(10, 0),
                slot_minutes: 30,
                step_minutes: Some(30),
            },
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(batch.created_count, 2);
    assert!(batch.failure.is_none());
    let intervals: Vec<_> = batch.created.iter().map(|s| (s.start, s.end)).collect();
    assert_eq!(
        intervals,
        vec![
            (at(9, 0).fixed_offset(), at(9, 30).fixed_offset()),
            (at(9, 30).fixed_offset(), at(10, 0).fixed_offset()),
        ]
    );
    let first = batch.created[0].id.clone();
    let second = batch.created[1].id.clone();

    // Step 2: both are listed as available
    let listed = engine
        .list_slots(Some("clinic"), None, None, DEFAULT_SLOT_LIMIT)
        .await
        .unwrap();
    let ids: Vec<_> = listed.slots.iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec![first.clone(), second.clone()]);
    assert!(listed.slots.iter().all(|s| s.state == SlotState::Available));

    // Step 3: reserve the first for Ana
    let reserved = engine
        .reserve_slot(Some("clinic"), &first, fixtures::reservation("Ana"))
        .await
        .unwrap();
    assert_eq!(reserved.state, SlotState::Reserved);
    assert_eq!(reserved.label, "RESERVED - Ana");

    // Step 4: only the second remains available
    let listed = engine
        .list_slots(Some("clinic"), None, None, DEFAULT_SLOT_LIMIT)
        .await
        .unwrap();
    let ids: Vec<_> = listed.slots.iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec![second]);

    // Step 5: fetching the first directly shows the reservation
    let fetched = engine.get_slot(Some("clinic"), &first).await.unwrap();
    assert_eq!(fetched.state, SlotState::Reserved);
    assert_eq!(fetched.label, "RESERVED - Ana");
    assert_eq!(fetched.reservation.unwrap().customer_name, "Ana");
}

#[tokio::test]
async fn test_second_reservation_is_rejected_sequentially() {
    let (store, engine) = fixtures::create_engine();
    let batch = engine
        .create_slots(
            None,
            SlotSpec::Single {
                start: at(11, 0),
                end: at(11, 30),
            },
            None,
            None,
        )
        .await
        .unwrap();
    let id = batch.created[0].id.clone();

    engine
        .reserve_slot(None, &id, fixtures::reservation("Ana"))
        .await
        .unwrap();
    let err = engine
        .reserve_slot(None, &id, fixtures::reservation("Bruno"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        slotify_gcal::SlotError::SlotAlreadyReserved(id.clone())
    );

    let slot = engine.get_slot(None, &id).await.unwrap();
    assert_eq!(slot.reservation.unwrap().customer_name, "Ana");
    assert_eq!(store.len(fixtures::CLINIC_CALENDAR), 1);
}
