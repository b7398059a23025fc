//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

/// Default bind address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8765";

/// Display name used when a join descriptor carries no `user_name`.
pub const DEFAULT_USER_NAME: &str = "Unknown User";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8765`).
    pub listen_addr: SocketAddr,

    /// Seconds a new connection may take to send its join descriptor.
    pub join_timeout_secs: u64,

    /// Milliseconds allowed for one write to a client transport.
    pub send_timeout_ms: u64,

    /// Capacity of each connection's outbound queue.
    pub outbound_queue_capacity: usize,

    /// Largest accepted WebSocket message, in bytes.
    pub max_message_bytes: usize,

    /// Whether newly joined connections receive a system acknowledgement.
    pub join_ack_enabled: bool,

    /// Seconds before a REST request times out.
    pub http_timeout_secs: u64,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8765)),
            join_timeout_secs: 30,
            send_timeout_ms: 5_000,
            outbound_queue_capacity: 256,
            max_message_bytes: 1 << 20,
            join_ack_enabled: true,
            http_timeout_secs: 10,
            log_format: LogFormat::Text,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as a
    /// [`SocketAddr`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
            .parse()?;

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            join_timeout_secs: parse_env("JOIN_TIMEOUT_SECS", defaults.join_timeout_secs),
            send_timeout_ms: parse_env("SEND_TIMEOUT_MS", defaults.send_timeout_ms),
            outbound_queue_capacity: non_zero(
                parse_env("OUTBOUND_QUEUE_CAPACITY", defaults.outbound_queue_capacity),
                defaults.outbound_queue_capacity,
            ),
            max_message_bytes: non_zero(
                parse_env("MAX_MESSAGE_BYTES", defaults.max_message_bytes),
                defaults.max_message_bytes,
            ),
            join_ack_enabled: parse_env_bool("JOIN_ACK_ENABLED", defaults.join_ack_enabled),
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            log_format,
        })
    }

    /// Per-connection settings derived from this configuration.
    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            join_timeout: Duration::from_secs(self.join_timeout_secs),
            send_timeout: Duration::from_millis(self.send_timeout_ms),
            outbound_queue_capacity: self.outbound_queue_capacity.max(1),
            max_message_bytes: self.max_message_bytes,
            join_ack: self.join_ack_enabled,
        }
    }
}

/// Settings every connection session runs with.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    /// Maximum wait for the join descriptor.
    pub join_timeout: Duration,
    /// Maximum duration of one transport write.
    pub send_timeout: Duration,
    /// Capacity of the outbound queue.
    pub outbound_queue_capacity: usize,
    /// Largest accepted inbound message.
    pub max_message_bytes: usize,
    /// Send a system acknowledgement after joining.
    pub join_ack: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        RelayConfig::default().session_settings()
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key)
        .ok()
        .map(|v| v.to_ascii_lowercase())
        .as_deref()
    {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

fn non_zero(value: usize, default: usize) -> usize {
    if value == 0 { default } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RelayConfig::default();
        assert_eq!(config.listen_addr.port(), 8765);
        assert_eq!(config.outbound_queue_capacity, 256);
        assert!(config.join_ack_enabled);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn session_settings_convert_units() {
        let config = RelayConfig {
            join_timeout_secs: 3,
            send_timeout_ms: 250,
            ..RelayConfig::default()
        };
        let settings = config.session_settings();
        assert_eq!(settings.join_timeout, Duration::from_secs(3));
        assert_eq!(settings.send_timeout, Duration::from_millis(250));
        assert!(settings.join_ack);
    }

    #[test]
    fn parse_env_falls_back_on_missing_key() {
        assert_eq!(parse_env("CANVAS_RELAY_TEST_UNSET_KEY", 42u64), 42);
        assert!(parse_env_bool("CANVAS_RELAY_TEST_UNSET_KEY", true));
    }

    #[test]
    fn non_zero_replaces_zero() {
        assert_eq!(non_zero(0, 7), 7);
        assert_eq!(non_zero(3, 7), 3);
    }

    #[test]
    fn default_listen_addr_constant_parses() {
        tokio_test::assert_ok!(DEFAULT_LISTEN_ADDR.parse::<SocketAddr>());
    }
}
