#[cfg(test)]
mod tests {
    use crate::codec::{decode, encode, mark_reserved, Reservation, SlotMetadata, SlotState};
    use proptest::prelude::*;

    fn text() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 +.,'-]{1,40}".prop_map(|s| s.trim().to_string())
            .prop_filter("non-empty", |s| !s.is_empty())
    }

    fn reservation() -> impl Strategy<Value = Reservation> {
        (text(), proptest::option::of(text()), proptest::option::of(text())).prop_map(
            |(customer_name, customer_phone, notes)| Reservation {
                customer_name,
                customer_phone,
                notes,
            },
        )
    }

    proptest! {
        #[test]
        fn test_reserved_metadata_round_trips(reservation in reservation()) {
            let metadata = SlotMetadata {
                state: SlotState::Reserved,
                reservation: Some(reservation),
            };
            prop_assert_eq!(decode(&encode(&metadata)), Some(metadata));
        }

        #[test]
        fn test_transition_preserves_foreign_lines(
            foreign in proptest::collection::vec("[a-z]{1,8}=[a-z0-9]{0,8}", 0..4),
            reservation in reservation(),
        ) {
            let foreign: Vec<String> = foreign
                .into_iter()
                .filter(|line| !line.starts_with("state=") && !line.starts_with("type="))
                .filter(|line| {
                    !line.starts_with("customer_") && !line.starts_with("notes=")
                })
                .collect();
            let mut lines = vec![encode(&SlotMetadata::available())];
            lines.extend(foreign.iter().cloned());
            let blob = lines.join("\n");

            let reserved = mark_reserved(&blob, &reservation);
            for line in &foreign {
                prop_assert!(reserved.lines().any(|l| l == line));
            }
            let decoded = decode(&reserved).unwrap();
            prop_assert_eq!(decoded.state, SlotState::Reserved);
            prop_assert_eq!(decoded.reservation, Some(reservation));
        }

        #[test]
        fn test_blobs_without_marker_are_never_slots(blob in "[a-z=\n ]{0,80}") {
            prop_assume!(!blob.contains("type=slot"));
            prop_assume!(!blob.lines().any(|l| {
                l.split_once('=').map(|(k, v)| k.trim() == "type" && v.trim() == "slot").unwrap_or(false)
            }));
            prop_assert_eq!(decode(&blob), None);
        }
    }
}
