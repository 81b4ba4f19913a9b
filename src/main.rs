#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use broadside::{
    establish, init_logging, start_relay, AutoPlayer, ClientConfig, Frontend, KeyboardPlayer, Player,
    RelayConfig, RelayKey, Session, SessionEnd, Stage, Strategy, TcpTransport, TextFrontend,
};

#[cfg(feature = "std")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::sync::watch;
#[cfg(feature = "std")]
use tokio::time::interval;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum PlayerType {
    Human,
    Auto,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Wait for the other player to connect directly.
    Host {
        #[arg(long)]
        port: u16,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Connect directly to a hosting player.
    Join {
        #[arg(long, help = "Host address, e.g. localhost:7301")]
        addr: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Meet the other player at a relay under a shared five-letter key.
    RelayJoin {
        #[arg(long)]
        key: RelayKey,
        #[arg(long, help = "Relay address (default: $BROADSIDE_RELAY_ADDR or 127.0.0.1:7300)")]
        relay: Option<String>,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Run a relay that pairs players presenting the same key.
    RelayServer {
        #[arg(long, help = "Bind address (default: $BROADSIDE_RELAY_BIND or 0.0.0.0:7300)")]
        bind: Option<String>,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    match cli.command {
        Commands::Host { port, player, seed } => play(Strategy::Listen { port }, player, seed, &config).await,
        Commands::Join { addr, player, seed } => play(Strategy::Dial { addr }, player, seed, &config).await,
        Commands::RelayJoin {
            key,
            relay,
            player,
            seed,
        } => {
            let addr = relay.unwrap_or_else(|| config.relay_addr.clone());
            play(Strategy::Relay { addr, key }, player, seed, &config).await
        }
        Commands::RelayServer { bind } => {
            let mut relay_config = RelayConfig::from_env();
            if let Some(bind) = bind {
                relay_config.bind_addr = bind;
            }
            let relay = start_relay(relay_config).await?;
            println!("Relay listening on {}. Press Ctrl-C to stop.", relay.addr());
            tokio::signal::ctrl_c().await?;
            relay.stop().await;
            Ok(())
        }
    }
}

#[cfg(feature = "std")]
async fn play(strategy: Strategy, player: PlayerType, seed: Option<u64>, config: &ClientConfig) -> anyhow::Result<()> {
    if let Some(s) = seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
    }
    let rng = match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    };
    let mut frontend: Box<dyn Frontend> = Box::new(TextFrontend::new());

    let (stage_tx, mut stage_rx) = watch::channel(Stage::Idle);
    let connect = establish(strategy, &stage_tx);
    tokio::pin!(connect);
    let mut ticker = interval(config.tick_interval());
    let established = loop {
        tokio::select! {
            res = &mut connect => break res?,
            _ = ticker.tick() => {
                if stage_rx.has_changed().unwrap_or(false) {
                    frontend.stage(&stage_rx.borrow_and_update());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Interrupted.");
                return Ok(());
            }
        }
    };
    frontend.stage(&Stage::Connected(established.slot));

    let player: Box<dyn Player> = match player {
        PlayerType::Human => Box::new(KeyboardPlayer::new(broadside::ui::spawn_key_reader())),
        PlayerType::Auto => Box::new(AutoPlayer::new()),
    };
    let transport = Box::new(TcpTransport::new(established.stream));
    let mut session = Session::new(established.slot.is_player_1(), player, transport, frontend, rng);

    tokio::select! {
        res = session.run(config.tick_interval()) => {
            match res {
                Ok(SessionEnd::PeerClosed) => log::info!("peer left before the match was decided"),
                Ok(_) => {}
                Err(e) => eprintln!("Game ended with an error: {:#}", e),
            }
        }
        _ = tokio::signal::ctrl_c() => println!("Interrupted."),
    }
    Ok(())
}
