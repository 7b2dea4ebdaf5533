#[cfg(test)]
mod tests {
    use crate::codec::*;

    #[test]
    fn test_encode_available() {
        assert_eq!(encode(&SlotMetadata::available()), "type=slot\nstate=available");
    }

    #[test]
    fn test_decode_available_and_reserved() {
        assert_eq!(
            decode("type=slot\nstate=available"),
            Some(SlotMetadata::available())
        );
        let reserved = decode("type=slot\nstate=reserved\ncustomer_name=Ana\nnotes=first visit").unwrap();
        assert_eq!(reserved.state, SlotState::Reserved);
        assert_eq!(
            reserved.reservation,
            Some(Reservation {
                customer_name: "Ana".into(),
                customer_phone: None,
                notes: Some("first visit".into()),
            })
        );
    }

    #[test]
    fn test_items_without_marker_are_not_slots() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("state=available"), None);
        assert_eq!(decode("Team meeting\nstate=available"), None);
        assert_eq!(decode("type = slots are open\nstate=available"), None);
    }

    #[test]
    fn test_markers_match_as_substrings() {
        let decoded = decode("subtype=slotted\nstate=available").unwrap();
        assert!(decoded.is_available());
        let decoded = decode("notes: type=slot, state=reserved").unwrap();
        assert_eq!(decoded.state, SlotState::Reserved);
    }

    #[test]
    fn test_html_description_from_web_ui() {
        let blob = "<p>type=slot<br>state=available<br/>Room 3</p>";
        assert!(has_slot_marker(blob));
        assert_eq!(decode(blob), Some(SlotMetadata::available()));

        let reservation = Reservation {
            customer_name: "Ana".into(),
            customer_phone: Some("+34 600".into()),
            notes: None,
        };
        let reserved = mark_reserved(blob, &reservation);
        assert!(reserved.starts_with("<p>type=slot<br>state=reserved<br/>Room 3</p>\n"));
        assert!(!reserved.contains("state=available"));
        let decoded = decode(&reserved).unwrap();
        assert_eq!(decoded.state, SlotState::Reserved);
        assert_eq!(decoded.reservation, Some(reservation));
    }

    #[test]
    fn test_html_breaks_split_fields() {
        let decoded = decode("type=slot<br />state=reserved<br>customer_name=Bruno").unwrap();
        assert_eq!(decoded.reservation.unwrap().customer_name, "Bruno");
    }

    #[test]
    fn test_unrecognized_state_is_not_a_managed_slot() {
        assert_eq!(decode("type=slot"), None);
        assert_eq!(decode("type=slot\nstate=pending"), None);
        assert!(has_slot_marker("type=slot\nstate=pending"));
    }

    #[test]
    fn test_reserved_wins_over_available() {
        let decoded = decode("type=slot\nstate=available\nstate=reserved").unwrap();
        assert_eq!(decoded.state, SlotState::Reserved);
        let decoded = decode("type=slot\nstate=reserved\nstate=available").unwrap();
        assert_eq!(decoded.state, SlotState::Reserved);
    }

    #[test]
    fn test_whitespace_and_crlf_tolerated() {
        let decoded = decode(" type = slot \r\n state = available \r\n").unwrap();
        assert!(decoded.is_available());
    }

    #[test]
    fn test_mark_reserved_keeps_other_lines_in_place() {
        let blob = "Booked via front desk\ntype=slot\nstate=available\nroom=3";
        let reservation = Reservation {
            customer_name: "Ana".into(),
            customer_phone: Some("+34 600".into()),
            notes: None,
        };
        assert_eq!(
            mark_reserved(blob, &reservation),
            "Booked via front desk\ntype=slot\nstate=reserved\nroom=3\ncustomer_name=Ana\ncustomer_phone=+34 600"
        );
    }

    #[test]
    fn test_values_are_kept_on_one_line() {
        let reservation = Reservation {
            customer_name: "Ana".into(),
            customer_phone: None,
            notes: Some("line one\nstate=available\nline three".into()),
        };
        let blob = mark_reserved("type=slot\nstate=available", &reservation);
        assert_eq!(blob.lines().count(), 4);
        let decoded = decode(&blob).unwrap();
        assert_eq!(decoded.state, SlotState::Reserved);
        assert_eq!(
            decoded.reservation.unwrap().notes.as_deref(),
            Some("line one state=available line three")
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(available_label(None, None), "AVAILABLE");
        assert_eq!(available_label(None, Some("Haircut")), "AVAILABLE - Haircut");
        assert_eq!(available_label(Some("OPEN"), Some("  ")), "OPEN");
        assert_eq!(available_label(Some(" "), Some("Massage")), "AVAILABLE - Massage");
        assert_eq!(reserved_label("Ana"), "RESERVED - Ana");
    }
}
