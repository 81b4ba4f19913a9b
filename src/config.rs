//! Board dimensions, fleet layout and network defaults.

/// Number of columns on each board.
pub const COLUMN: usize = 10;
/// Number of rows on each board.
pub const ROW: usize = 12;

/// Ship lengths laid out by the automatic player.
pub const FLEET: [usize; 5] = [5, 4, 3, 3, 2];

/// Total number of ship segments in [`FLEET`].
pub const FLEET_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Length of a relay rendezvous key.
pub const KEY_LEN: usize = 5;

/// Longest key line the relay reads before rejecting the connection.
pub const MAX_KEY_LINE: usize = 64;

/// Longest protocol line accepted from a peer, newline included.
pub const MAX_LINE_LEN: usize = 256;

/// Smallest capacity the relay's pending list shrinks to.
pub const MIN_PENDING_CAPACITY: usize = 16;

/// Client tick rate.
pub const TICK_RATE_HZ: u64 = 60;

/// Fastest tick rate accepted; one tick per microsecond.
pub const MAX_TICK_RATE_HZ: u64 = 1_000_000;

/// Relay address used when neither the command line nor the environment names one.
pub const DEFAULT_RELAY_ADDR: &str = "127.0.0.1:7300";

/// Address the relay server binds by default.
pub const DEFAULT_RELAY_BIND: &str = "0.0.0.0:7300";

#[cfg(feature = "std")]
pub use runtime::*;

#[cfg(feature = "std")]
mod runtime {
    use std::env;
    use std::str::FromStr;
    use std::time::Duration;

    use super::{DEFAULT_RELAY_ADDR, DEFAULT_RELAY_BIND, MAX_TICK_RATE_HZ, TICK_RATE_HZ};

    /// Upper bound on a single socket write.
    pub const SEND_TIMEOUT: Duration = Duration::from_secs(10);

    /// Client settings, read from the environment:
    ///
    /// - `BROADSIDE_RELAY_ADDR` (default: [`DEFAULT_RELAY_ADDR`])
    /// - `BROADSIDE_TICK_HZ`    (default: [`TICK_RATE_HZ`])
    #[derive(Debug, Clone)]
    pub struct ClientConfig {
        pub relay_addr: String,
        pub tick_rate_hz: u64,
    }

    impl ClientConfig {
        pub fn from_env() -> anyhow::Result<Self> {
            let relay_addr =
                env::var("BROADSIDE_RELAY_ADDR").unwrap_or_else(|_| DEFAULT_RELAY_ADDR.to_string());
            let tick_rate_hz = read_env_or_default("BROADSIDE_TICK_HZ", TICK_RATE_HZ)?;
            if tick_rate_hz == 0 || tick_rate_hz > MAX_TICK_RATE_HZ {
                anyhow::bail!("BROADSIDE_TICK_HZ must be between 1 and {}", MAX_TICK_RATE_HZ);
            }
            Ok(Self {
                relay_addr,
                tick_rate_hz,
            })
        }

        /// Duration of one client tick.
        pub fn tick_interval(&self) -> Duration {
            Duration::from_micros((1_000_000 / self.tick_rate_hz.max(1)).max(1))
        }
    }

    impl Default for ClientConfig {
        fn default() -> Self {
            Self {
                relay_addr: DEFAULT_RELAY_ADDR.to_string(),
                tick_rate_hz: TICK_RATE_HZ,
            }
        }
    }

    /// Relay server settings. `BROADSIDE_RELAY_BIND` overrides the bind address.
    #[derive(Debug, Clone)]
    pub struct RelayConfig {
        pub bind_addr: String,
        pub min_capacity: usize,
    }

    impl RelayConfig {
        pub fn from_env() -> Self {
            let bind_addr =
                env::var("BROADSIDE_RELAY_BIND").unwrap_or_else(|_| DEFAULT_RELAY_BIND.to_string());
            Self {
                bind_addr,
                ..Self::default()
            }
        }

        /// Loopback config on an OS-assigned port.
        pub fn local() -> Self {
            Self {
                bind_addr: "127.0.0.1:0".to_string(),
                ..Self::default()
            }
        }
    }

    impl Default for RelayConfig {
        fn default() -> Self {
            Self {
                bind_addr: DEFAULT_RELAY_BIND.to_string(),
                min_capacity: super::MIN_PENDING_CAPACITY,
            }
        }
    }

    fn read_env_or_default<T>(key: &str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match env::var(key) {
            Ok(val) => val
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("invalid {}={:?}: {}", key, val, e)),
            Err(_) => Ok(default),
        }
    }
}
