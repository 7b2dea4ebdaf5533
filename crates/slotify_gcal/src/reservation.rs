// --- File: crates/slotify_gcal/src/reservation.rs ---
//! The `available -> reserved` transition.

use slotify_common::{ItemPatch, StoreItem};
use tracing::{info, warn};

use crate::arbiter::ReservationArbiter;
use crate::codec::{self, Reservation, SlotMetadata};
use crate::error::SlotError;
use crate::store::AgendaStore;

/// Longest accepted customer name, matching the provider's summary limit.
pub const MAX_CUSTOMER_NAME_LEN: usize = 200;

/// Trims the details and rejects a blank or oversized customer name.
pub fn normalize_reservation(details: Reservation) -> Result<Reservation, SlotError> {
    let customer_name = details.customer_name.trim().to_string();
    if customer_name.is_empty() {
        return Err(SlotError::validation("customer_name must not be empty"));
    }
    if customer_name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(SlotError::validation(format!(
            "customer_name must be at most {} characters",
            MAX_CUSTOMER_NAME_LEN
        )));
    }
    let trimmed = |v: Option<String>| {
        v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    };
    Ok(Reservation {
        customer_name,
        customer_phone: trimmed(details.customer_phone),
        notes: trimmed(details.notes),
    })
}

/// Classifies a fetched item, failing with `NotASlot` for anything unmanaged.
pub fn classify(item: &StoreItem) -> Result<SlotMetadata, SlotError> {
    codec::decode(item.description.as_deref().unwrap_or_default())
        .ok_or_else(|| SlotError::NotASlot(item.id.clone()))
}

/// Reserves one slot.
///
/// The slot's arbiter guard is held from the fetch until the patch has been applied,
/// so concurrent attempts on the same slot observe each other's outcome: exactly one
/// succeeds and the rest fail with `SlotAlreadyReserved`. No step is retried.
///
/// When the patch fails without an answer the slot is left unsettled, and the next
/// attempt waits out the arbiter's settle window before re-reading it.
pub async fn reserve(
    store: &AgendaStore,
    arbiter: &ReservationArbiter,
    slot_id: &str,
    details: Reservation,
) -> Result<StoreItem, SlotError> {
    let details = normalize_reservation(details)?;
    let calendar_id = store.calendar_id();
    let _guard = arbiter.acquire(calendar_id, slot_id).await;
    arbiter.wait_settled(calendar_id, slot_id).await;

    let current = store.fetch(slot_id).await?;
    arbiter.clear_unsettled(calendar_id, slot_id);
    let metadata = classify(&current)?;
    if !metadata.is_available() {
        warn!(
            calendar_id = %calendar_id,
            slot_id,
            state = metadata.state.as_str(),
            "Reservation rejected: slot not available"
        );
        return Err(SlotError::SlotAlreadyReserved(slot_id.to_string()));
    }

    let description = codec::mark_reserved(
        current.description.as_deref().unwrap_or_default(),
        &details,
    );
    let patch = ItemPatch {
        summary: Some(codec::reserved_label(&details.customer_name)),
        description: Some(description),
    };
    let updated = match store.update(slot_id, patch).await {
        Ok(updated) => updated,
        Err(e @ SlotError::StoreUnavailable { .. }) => {
            warn!(
                calendar_id = %calendar_id,
                slot_id,
                settle_window_secs = arbiter.settle_window().as_secs(),
                "Reservation write unanswered, slot left unsettled"
            );
            arbiter.mark_unsettled(calendar_id, slot_id);
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    info!(
        calendar_id = %calendar_id,
        slot_id,
        customer = %details.customer_name,
        "Slot reserved"
    );
    Ok(updated)
}
