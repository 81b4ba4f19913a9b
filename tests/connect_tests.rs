#![cfg(feature = "std")]

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use broadside::net::parse_addr;
use broadside::relay::wire::read_line;
use broadside::{
    establish, start_relay, ConnectError, Coord, Message, PlayerSlot, RelayConfig, RelayKey, Stage, Strategy,
    TcpTransport, Transport,
};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::time::{sleep, timeout};

#[test]
fn parses_addresses() {
    assert_eq!(parse_addr("localhost:7300").unwrap(), SocketAddr::from((Ipv4Addr::LOCALHOST, 7300)));
    assert_eq!(parse_addr("10.0.0.2:80").unwrap(), SocketAddr::from(([10, 0, 0, 2], 80)));
    assert_eq!(parse_addr("[::1]:9").unwrap(), "[::1]:9".parse::<SocketAddr>().unwrap());
    assert!(matches!(parse_addr("localhost"), Err(ConnectError::InvalidAddress(_))));
    assert!(matches!(parse_addr("localhost:99999"), Err(ConnectError::InvalidAddress(_))));
    assert!(matches!(parse_addr("example:80"), Err(ConnectError::InvalidAddress(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn listen_and_dial() -> anyhow::Result<()> {
    let (host_stage, mut host_rx) = watch::channel(Stage::Idle);
    let host = tokio::spawn(async move { establish(Strategy::Listen { port: 0 }, &host_stage).await });

    let bound = timeout(Duration::from_secs(5), host_rx.wait_for(|s| matches!(s, Stage::Listening(_)))).await??.clone();
    let Stage::Listening(bound) = bound else { unreachable!() };

    let (dial_stage, dial_rx) = watch::channel(Stage::Idle);
    let addr = format!("localhost:{}", bound.port());
    let guest = establish(Strategy::Dial { addr }, &dial_stage).await?;
    let host = host.await??;

    assert_eq!(host.slot, PlayerSlot::One);
    assert_eq!(guest.slot, PlayerSlot::Two);
    assert_eq!(*dial_rx.borrow(), Stage::Connected(PlayerSlot::Two));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn relay_assigns_slots_without_eating_game_bytes() -> anyhow::Result<()> {
    let relay = start_relay(RelayConfig::local()).await?;
    let addr = relay.addr().to_string();
    let key = RelayKey::parse("qwert")?;

    let first = {
        let (addr, key) = (addr.clone(), key.clone());
        tokio::spawn(async move {
            let (stage, _) = watch::channel(Stage::Idle);
            establish(Strategy::Relay { addr, key }, &stage).await
        })
    };
    while relay.pending_len() == 0 {
        sleep(Duration::from_millis(5)).await;
    }
    let (stage, stage_rx) = watch::channel(Stage::Idle);
    let second = establish(Strategy::Relay { addr, key }, &stage).await?;
    let first = first.await??;

    assert_eq!(first.slot, PlayerSlot::One);
    assert_eq!(second.slot, PlayerSlot::Two);
    assert_eq!(*stage_rx.borrow(), Stage::Connected(PlayerSlot::Two));

    let mut sender = TcpTransport::new(first.stream);
    let mut receiver = TcpTransport::new(second.stream);
    sender.send(&Message::Fire(Coord::new(7, 1))).await?;
    let mut got = Vec::new();
    for _ in 0..500 {
        got.extend(receiver.drain()?.messages);
        if !got.is_empty() {
            break;
        }
        sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(got, vec![Message::Fire(Coord::new(2, 1))]);

    relay.stop().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn relay_rejection_is_reported() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?.to_string();
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let _ = read_line(&mut stream, 64).await;
            let _ = stream.write_all(b"error: invalid connection\n").await;
            sleep(Duration::from_millis(100)).await;
        }
    });

    let (stage, _) = watch::channel(Stage::Idle);
    let key = RelayKey::parse("zzzzz")?;
    let err = establish(Strategy::Relay { addr, key }, &stage).await.unwrap_err();
    assert!(matches!(err, ConnectError::Rejected(ref reason) if reason == "invalid connection"), "{}", err);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn dial_failure_is_an_error() -> anyhow::Result<()> {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        listener.local_addr()?.port()
    };
    let (stage, _) = watch::channel(Stage::Idle);
    let err = establish(Strategy::Dial { addr: format!("127.0.0.1:{}", port) }, &stage)
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectError::Io(_)));
    Ok(())
}
