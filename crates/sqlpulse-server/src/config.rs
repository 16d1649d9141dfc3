//! Server configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the sqlpulse server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `8080`, `0` for auto-assign).
    pub port: u16,
    /// Capacity of the hub ingestion queue. Publishes past this bound are
    /// dropped, never blocked on.
    pub hub_queue_capacity: usize,
    /// Capacity of each subscriber's outbound frame queue.
    pub subscriber_queue_capacity: usize,
    /// WebSocket ping interval in seconds.
    pub ping_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            hub_queue_capacity: 256,
            subscriber_queue_capacity: 32,
            ping_interval_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_host() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.host, "127.0.0.1");
    }

    #[test]
    fn default_port() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn default_hub_queue_capacity() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.hub_queue_capacity, 256);
    }

    #[test]
    fn default_subscriber_queue_capacity() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.subscriber_queue_capacity, 32);
    }

    #[test]
    fn default_ping_interval() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.ping_interval_secs, 30);
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = ServerConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ServerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.host, cfg.host);
        assert_eq!(back.port, cfg.port);
        assert_eq!(back.hub_queue_capacity, cfg.hub_queue_capacity);
        assert_eq!(back.subscriber_queue_capacity, cfg.subscriber_queue_capacity);
        assert_eq!(back.ping_interval_secs, cfg.ping_interval_secs);
    }

    #[test]
    fn custom_values() {
        let cfg = ServerConfig {
            host: "0.0.0.0".into(),
            port: 3000,
            hub_queue_capacity: 8,
            subscriber_queue_capacity: 2,
            ping_interval_secs: 5,
        };
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.hub_queue_capacity, 8);
        assert_eq!(cfg.subscriber_queue_capacity, 2);
        assert_eq!(cfg.ping_interval_secs, 5);
    }

    #[test]
    fn deserialize_from_json_string() {
        let json = r#"{"host":"10.0.0.1","port":9000,"hub_queue_capacity":64,"subscriber_queue_capacity":16,"ping_interval_secs":10}"#;
        let cfg: ServerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.host, "10.0.0.1");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.hub_queue_capacity, 64);
    }
}
