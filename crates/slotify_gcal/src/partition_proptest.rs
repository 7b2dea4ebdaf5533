#[cfg(test)]
mod tests {
    use crate::partition::partition;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap()
    }

    proptest! {
        #[test]
        fn test_partition_properties(
            offset_minutes in 0..10_000i64,
            span_minutes in 1..3_000i64,
            slot_minutes in 5..240i64,
            step_minutes in 5..240i64,
        ) {
            let range_start = base() + Duration::minutes(offset_minutes);
            let range_end = range_start + Duration::minutes(span_minutes);
            let slots: Vec<_> = partition(range_start, range_end, slot_minutes, step_minutes)
                .unwrap()
                .collect();

            for (start, end) in &slots {
                prop_assert!(*start >= range_start);
                prop_assert!(*end <= range_end);
                prop_assert_eq!(*end - *start, Duration::minutes(slot_minutes));
            }
            for pair in slots.windows(2) {
                prop_assert_eq!(pair[1].0 - pair[0].0, Duration::minutes(step_minutes));
            }

            let expected = if span_minutes >= slot_minutes {
                ((span_minutes - slot_minutes) / step_minutes + 1) as usize
            } else {
                0
            };
            prop_assert_eq!(slots.len(), expected);
        }

        #[test]
        fn test_remaining_matches_count(
            span_minutes in 1..3_000i64,
            slot_minutes in 5..240i64,
            step_minutes in 5..240i64,
            skip in 0..5usize,
        ) {
            let mut slots = partition(base(), base() + Duration::minutes(span_minutes), slot_minutes, step_minutes).unwrap();
            for _ in 0..skip {
                slots.next();
            }
            let remaining = slots.remaining();
            prop_assert_eq!(slots.count(), remaining);
        }

        #[test]
        fn test_invalid_durations_rejected(slot_minutes in -10..5i64, step_minutes in 5..60i64) {
            let end = base() + Duration::hours(2);
            prop_assert!(partition(base(), end, slot_minutes, step_minutes).is_err());
            prop_assert!(partition(base(), end, step_minutes, slot_minutes).is_err());
        }
    }
}
