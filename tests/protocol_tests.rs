use broadside::{Coord, LineBuffer, Message, Orientation, ProtocolError, Span, COLUMN, ROW};
use proptest::prelude::*;

fn c(x: usize, y: usize) -> Coord {
    Coord::new(x, y)
}

#[test]
fn encode_mirrors_x() {
    assert_eq!(Message::Fire(c(2, 1)).encode(), "FIRE 7,1\n");
    assert_eq!(Message::Hit(c(0, 11)).encode(), "HIT 9,11\n");
    assert_eq!(Message::Miss(c(9, 0)).encode(), "MISS 0,0\n");
    assert_eq!(Message::Ignore.encode(), "IGNORE\n");
    assert_eq!(
        Message::Ready {
            turn_factor: true,
            max_hp: 17
        }
        .encode(),
        "READY 1,17\n"
    );
}

#[test]
fn destroyed_lines() {
    let vertical = Span::between(c(2, 0), c(2, 2)).unwrap();
    assert_eq!(Message::Destroyed(vertical).encode(), "DESTROYED v,7,0,2\n");
    let horizontal = Span::between(c(1, 4), c(3, 4)).unwrap();
    assert_eq!(Message::Destroyed(horizontal).encode(), "DESTROYED h,8,6,4\n");
    assert_eq!(
        Message::decode("DESTROYED h,8,6,4").unwrap(),
        Message::Destroyed(Span {
            orientation: Orientation::Horizontal,
            start: c(6, 4),
            end: c(8, 4)
        })
    );
    let single = Span::between(c(5, 5), c(5, 5)).unwrap();
    assert_eq!(Message::Destroyed(single).encode(), "DESTROYED v,4,5,5\n");
}

#[test]
fn decode_is_untransformed() {
    assert_eq!(Message::decode("FIRE 7,1\n").unwrap(), Message::Fire(c(7, 1)));
    assert_eq!(Message::decode("HIT 7,1\r\n").unwrap(), Message::Hit(c(7, 1)));
    assert_eq!(Message::decode("IGNORE").unwrap(), Message::Ignore);
    assert_eq!(
        Message::decode("READY 0,5").unwrap(),
        Message::Ready {
            turn_factor: false,
            max_hp: 5
        }
    );
}

#[test]
fn malformed_lines_are_errors() {
    assert_eq!(Message::decode("BOOM 1,2"), Err(ProtocolError::UnknownMessage("BOOM".into())));
    assert_eq!(Message::decode("FIRE"), Err(ProtocolError::MissingArgument));
    assert_eq!(Message::decode("FIRE 1"), Err(ProtocolError::MissingArgument));
    assert_eq!(Message::decode("FIRE 1,2,3"), Err(ProtocolError::ExtraArgument));
    assert_eq!(Message::decode("FIRE a,2"), Err(ProtocolError::InvalidNumber("a".into())));
    assert_eq!(Message::decode("FIRE 10,2"), Err(ProtocolError::OutOfRange(10)));
    assert_eq!(Message::decode("MISS 1,12"), Err(ProtocolError::OutOfRange(12)));
    assert_eq!(Message::decode("READY 2,17"), Err(ProtocolError::InvalidTurnFactor("2".into())));
    assert_eq!(
        Message::decode("DESTROYED d,1,2,3"),
        Err(ProtocolError::InvalidDirection("d".into()))
    );
    assert_eq!(Message::decode("IGNORE now"), Err(ProtocolError::ExtraArgument));
    let long = format!("FIRE {}", "1".repeat(300));
    assert!(matches!(Message::decode(&long), Err(ProtocolError::LineTooLong(_))));
}

#[test]
fn line_buffer_reassembles_split_reads() {
    let mut lines = LineBuffer::new();
    lines.push(b"FIRE 1,");
    assert_eq!(lines.next_message().unwrap(), None);
    lines.push(b"2\nMISS 3,4\nHI");
    assert_eq!(lines.next_message().unwrap(), Some(Message::Fire(c(1, 2))));
    assert_eq!(lines.next_message().unwrap(), Some(Message::Miss(c(3, 4))));
    assert_eq!(lines.next_message().unwrap(), None);
    assert_eq!(lines.pending(), 2);
    lines.push(b"T 0,0\n");
    assert_eq!(lines.next_message().unwrap(), Some(Message::Hit(c(0, 0))));
    assert_eq!(lines.pending(), 0);
}

#[test]
fn line_buffer_rejects_runaway_line() {
    let mut lines = LineBuffer::new();
    lines.push(&[b'A'; 300]);
    assert!(matches!(lines.next_line(), Err(ProtocolError::LineTooLong(_))));
}

fn coord() -> impl Strategy<Value = Coord> {
    (0..COLUMN, 0..ROW).prop_map(|(x, y)| Coord::new(x, y))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Sending through two mirrors lands back on the original cell.
    #[test]
    fn reply_lands_on_fired_cell(target in coord()) {
        let fired = Message::decode(&Message::Fire(target).encode()).unwrap();
        let Message::Fire(at_receiver) = fired else { panic!("not a FIRE") };
        prop_assert_eq!(at_receiver, target.mirrored());
        let reply = Message::decode(&Message::Hit(at_receiver).encode()).unwrap();
        prop_assert_eq!(reply, Message::Hit(target));
    }

    #[test]
    fn destroyed_round_trip_through_both_mirrors(a in coord(), len in 1..5usize, vertical in any::<bool>()) {
        let b = if vertical {
            Coord::new(a.x, (a.y + len - 1).min(ROW - 1))
        } else {
            Coord::new((a.x + len - 1).min(COLUMN - 1), a.y)
        };
        let span = Span::between(a, b).unwrap();
        let once = Message::decode(&Message::Destroyed(span).encode()).unwrap();
        let Message::Destroyed(mirrored) = once else { panic!("not DESTROYED") };
        prop_assert_eq!(mirrored.len(), span.len());
        let twice = Message::decode(&Message::Destroyed(mirrored).encode()).unwrap();
        prop_assert_eq!(twice, Message::Destroyed(span));
    }
}
