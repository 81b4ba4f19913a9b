#![cfg(feature = "std")]

use broadside::relay::{PendingList, RelayKey};
use broadside::MIN_PENDING_CAPACITY;

fn key(i: usize) -> RelayKey {
    let letters: String = [i / 676, (i / 26) % 26, i % 26, 0, 0]
        .iter()
        .map(|&n| (b'a' + n as u8) as char)
        .collect();
    RelayKey::parse(&letters).unwrap()
}

#[test]
fn capacity_doubles_when_full() {
    let mut list = PendingList::new(MIN_PENDING_CAPACITY);
    assert_eq!(list.capacity(), 16);
    for i in 0..16 {
        list.push(key(i), i);
    }
    assert_eq!(list.capacity(), 16);
    list.push(key(16), 16);
    assert_eq!(list.capacity(), 32);
    for i in 17..33 {
        list.push(key(i), i);
    }
    assert_eq!(list.len(), 33);
    assert_eq!(list.capacity(), 64);
}

#[test]
fn capacity_halves_but_not_below_floor() {
    let mut list = PendingList::new(MIN_PENDING_CAPACITY);
    for i in 0..33 {
        list.push(key(i), i);
    }
    let mut seen = Vec::new();
    for i in 0..33 {
        assert_eq!(list.take(&key(i)), Some(i));
        seen.push((list.len(), list.capacity()));
    }
    assert!(seen.contains(&(15, 32)));
    assert!(seen.contains(&(7, 16)));
    assert_eq!(list.capacity(), 16);
    assert!(list.is_empty());
}

#[test]
fn take_preserves_order_and_matches_oldest() {
    let mut list = PendingList::new(4);
    list.push(key(1), "first");
    list.push(key(2), "second");
    list.push(key(1), "third");
    list.push(key(3), "fourth");
    assert_eq!(list.take(&key(1)), Some("first"));
    let keys: Vec<_> = list.keys().cloned().collect();
    assert_eq!(keys, vec![key(2), key(1), key(3)]);
    assert_eq!(list.take(&key(9)), None);
    assert!(list.contains(&key(1)));
}

#[test]
fn keys_must_be_five_lowercase_letters() {
    assert!(RelayKey::parse("abcde").is_ok());
    assert!(RelayKey::parse("abcde\n").is_ok());
    assert!(RelayKey::parse("abcd").is_err());
    assert!(RelayKey::parse("abcdef").is_err());
    assert!(RelayKey::parse("abCde").is_err());
    assert!(RelayKey::parse("ab1de").is_err());
    assert!(RelayKey::parse("").is_err());
}

#[tokio::test]
async fn read_line_stops_at_newline() {
    use broadside::relay::wire::read_line;
    use tokio::io::AsyncReadExt;

    let mut input: &[u8] = b"CONNECTED AS 1\nFIRE 2,1\n";
    let line = read_line(&mut input, 64).await.unwrap();
    assert_eq!(line.as_deref(), Some("CONNECTED AS 1"));
    let mut rest = String::new();
    input.read_to_string(&mut rest).await.unwrap();
    assert_eq!(rest, "FIRE 2,1\n");

    let mut long: &[u8] = &[b'a'; 200];
    assert!(read_line(&mut long, 64).await.is_err());

    let mut empty: &[u8] = b"";
    assert_eq!(read_line(&mut empty, 64).await.unwrap(), None);

    let mut cut: &[u8] = b"abc";
    assert!(read_line(&mut cut, 64).await.is_err());
}
