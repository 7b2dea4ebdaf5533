// --- File: crates/slotify_gcal/src/partition.rs ---
//! Splits a time range into candidate slot intervals.

use chrono::{DateTime, Duration, TimeZone};

use crate::error::SlotError;

/// Smallest slot length and step accepted, in minutes.
pub const MIN_SLOT_MINUTES: i64 = 5;

/// Produces `[cursor, cursor + slot)` intervals, advancing the cursor by `step`,
/// for as long as the interval fits inside the range.
///
/// The sequence is a pure function of its inputs: cloning it restarts enumeration
/// from wherever the clone was taken. Overlapping slots (`step < slot`) and gaps
/// (`step > slot`) are both allowed.
#[derive(Debug, Clone)]
pub struct Partition<Tz: TimeZone> {
    cursor: DateTime<Tz>,
    range_end: DateTime<Tz>,
    slot: Duration,
    step: Duration,
}

/// Builds the partition of `[range_start, range_end]`.
///
/// # Errors
///
/// Returns `SlotError::Validation` when `range_end <= range_start` or when either
/// duration is below [`MIN_SLOT_MINUTES`]. An empty sequence (range shorter than one
/// slot) is not an error.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use slotify_gcal::partition::partition;
///
/// let start = Utc.with_ymd_and_hms(2025, 5, 5, 9, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap();
/// let slots: Vec<_> = partition(start, end, 30, 30).unwrap().collect();
/// assert_eq!(slots.len(), 2);
/// ```
pub fn partition<Tz: TimeZone>(
    range_start: DateTime<Tz>,
    range_end: DateTime<Tz>,
    slot_minutes: i64,
    step_minutes: i64,
) -> Result<Partition<Tz>, SlotError> {
    if range_end <= range_start {
        return Err(SlotError::validation("range_end must be after range_start"));
    }
    if slot_minutes < MIN_SLOT_MINUTES {
        return Err(SlotError::validation(format!(
            "slot_minutes must be at least {}",
            MIN_SLOT_MINUTES
        )));
    }
    if step_minutes < MIN_SLOT_MINUTES {
        return Err(SlotError::validation(format!(
            "step_minutes must be at least {}",
            MIN_SLOT_MINUTES
        )));
    }
    let slot = Duration::try_minutes(slot_minutes)
        .ok_or_else(|| SlotError::validation("slot_minutes is out of range"))?;
    let step = Duration::try_minutes(step_minutes)
        .ok_or_else(|| SlotError::validation("step_minutes is out of range"))?;

    Ok(Partition {
        cursor: range_start,
        range_end,
        slot,
        step,
    })
}

impl<Tz: TimeZone> Partition<Tz> {
    /// Number of intervals left to produce, without consuming the sequence.
    pub fn remaining(&self) -> usize {
        let span = self.range_end.clone() - self.cursor.clone();
        if span < self.slot {
            return 0;
        }
        let free = (span - self.slot).num_seconds();
        (free / self.step.num_seconds()) as usize + 1
    }
}

impl<Tz: TimeZone> Iterator for Partition<Tz> {
    type Item = (DateTime<Tz>, DateTime<Tz>);

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.cursor.clone().checked_add_signed(self.slot)?;
        if end > self.range_end {
            return None;
        }
        let start = self.cursor.clone();
        // Overflow ends the sequence after this item.
        self.cursor = match self.cursor.clone().checked_add_signed(self.step) {
            Some(next) => next,
            None => self.range_end.clone(),
        };
        Some((start, end))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}
