//! Tests for configuration defaults.

use super::*;

#[test]
fn default_tcp_config_matches_source_defaults() {
    let config = TcpConfig::default();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 7070);
    assert_eq!(config.visibility_timeout(), Duration::from_secs(60));
}

#[test]
fn default_auth_config_requires_auth() {
    assert!(!AuthConfig::default().disable_auth);
}

#[test]
fn broker_config_default_composes_all_sections() {
    let config = BrokerConfig::default();
    assert_eq!(config.tcp.port, 7070);
    assert_eq!(config.admin_http.port, 8080);
    assert_eq!(config.logging.level, "info");
}
