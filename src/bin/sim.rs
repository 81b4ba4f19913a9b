use broadside::{
    establish, start_relay, AutoPlayer, NullFrontend, RelayConfig, RelayKey, Session, SessionEnd, Stage, Strategy,
    TcpTransport,
};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;
use tokio::sync::watch;
use tokio::time::Duration;

async fn play(relay: String, key: RelayKey, seed: u64) -> anyhow::Result<(bool, SessionEnd, usize)> {
    let (stage, _) = watch::channel(Stage::Idle);
    let established = establish(Strategy::Relay { addr: relay, key }, &stage).await?;
    let is_player_1 = established.slot.is_player_1();
    let mut session = Session::new(
        is_player_1,
        Box::new(AutoPlayer::new()),
        Box::new(TcpTransport::new(established.stream)),
        Box::new(NullFrontend),
        SmallRng::seed_from_u64(seed),
    );
    let end = session.run(Duration::from_millis(1)).await?;
    Ok((is_player_1, end, session.shots_fired()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let relay = start_relay(RelayConfig::local()).await?;
    let addr = relay.addr().to_string();
    let key = RelayKey::parse("salvo")?;

    let (res1, res2) = tokio::try_join!(play(addr.clone(), key.clone(), seed1), play(addr, key, seed2))?;
    relay.stop().await;

    let winner = match (res1.1, res2.1) {
        (SessionEnd::Won, SessionEnd::Lost) => Some("player1"),
        (SessionEnd::Lost, SessionEnd::Won) => Some("player2"),
        _ => None,
    };

    let result = json!({
        "player1": {"slot": if res1.0 { 1 } else { 2 }, "status": res1.1, "shots": res1.2},
        "player2": {"slot": if res2.0 { 1 } else { 2 }, "status": res2.1, "shots": res2.2},
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
