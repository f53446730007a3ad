//! Unit tests for configuration structures and parsing.

#[cfg(test)]
mod config_tests {
    use crate::config::*;
    use crate::error::ConfigError;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    // ============= Defaults Tests =============

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.webhook_path, "/webhook");
        assert_eq!(config.broker.base_url, "https://po.trade/api");
        assert_eq!(config.broker.account_mode, AccountMode::Practice);
        assert!(!config.broker.ssid.is_configured());
        assert_eq!(config.signal.default_asset, "EURUSD");
        assert_eq!(config.signal.martingale_levels, vec![1.0, 3.0, 7.0, 16.0, 35.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = AppConfig::from_yaml_str("").unwrap();
        assert_eq!(config.server.port, 5000);
    }

    // ============= YAML Tests =============

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
server:
  host: 127.0.0.1
  port: 8080
  webhook_path: /tv
broker:
  base_url: https://broker.example/api
  account_mode: REAL
  ssid: d93a33d0
signal:
  default_asset: GBPUSD
  martingale_levels: [2.0, 4.0]
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.server.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.server.webhook_path, "/tv");
        assert_eq!(config.broker.account_mode, AccountMode::Real);
        assert_eq!(config.broker.ssid.expose(), "d93a33d0");
        assert!(config.broker.ssid.is_configured());
        assert_eq!(config.signal.default_asset, "GBPUSD");
        assert_eq!(config.signal.martingale_levels, vec![2.0, 4.0]);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
broker:
  ssid: abc
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.broker.base_url, "https://po.trade/api");
        assert_eq!(config.broker.account_mode, AccountMode::Practice);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.signal.default_asset, "EURUSD");
    }

    #[test]
    fn test_yaml_with_bom() {
        let yaml = "\u{feff}server:\n  port: 9000\n";
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_invalid_account_mode_yaml() {
        let yaml = r#"
broker:
  account_mode: DEMO
"#;
        assert!(matches!(AppConfig::from_yaml_str(yaml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = AppConfig::from_file("/nonexistent/relay-config.yaml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    // ============= Override Tests =============

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("PO_SSID", "secret-ssid"),
                ("PO_ACCOUNT_TYPE", "real"),
                ("PO_API_BASE_URL", "http://localhost:9999/api"),
                ("RELAY_HOST", "127.0.0.1"),
                ("RELAY_PORT", "7000"),
            ]))
            .unwrap();

        assert_eq!(config.broker.ssid.expose(), "secret-ssid");
        assert_eq!(config.broker.account_mode, AccountMode::Real);
        assert_eq!(config.broker.base_url, "http://localhost:9999/api");
        assert_eq!(config.server.bind_addr(), "127.0.0.1:7000");
    }

    #[test]
    fn test_no_overrides_keeps_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(lookup_from(&[])).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.broker.account_mode, AccountMode::Practice);
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(lookup_from(&[("RELAY_PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::Invalid { field: "server.port", .. })));
    }

    #[test]
    fn test_invalid_account_type_override() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(lookup_from(&[("PO_ACCOUNT_TYPE", "demo")]));
        assert!(matches!(result, Err(ConfigError::Invalid { field: "broker.account_mode", .. })));
    }

    // ============= Validation Tests =============

    #[test]
    fn test_validate_bad_base_url() {
        let mut config = AppConfig::default();
        config.broker.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "broker.base_url", .. })));

        config.broker.base_url = "ftp://po.trade/api".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "broker.base_url", .. })));
    }

    #[test]
    fn test_validate_webhook_path() {
        let mut config = AppConfig::default();
        config.server.webhook_path = "webhook".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "server.webhook_path", .. })
        ));
    }

    #[test]
    fn test_validate_martingale_levels() {
        let mut config = AppConfig::default();
        config.signal.martingale_levels = vec![1.0, -2.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "signal.martingale_levels", .. })
        ));
    }

    #[test]
    fn test_unconfigured_ssid_is_valid_config() {
        let mut config = AppConfig::default();
        config.broker.ssid = SessionCredential::new("");
        assert!(config.validate().is_ok());
    }

    // ============= SessionCredential Tests =============

    #[test]
    fn test_session_credential_sentinels() {
        assert!(!SessionCredential::new("").is_configured());
        assert!(!SessionCredential::new("   ").is_configured());
        assert!(!SessionCredential::new("YOUR_PO_SSID_HERE").is_configured());
        assert!(SessionCredential::new("d93a33d0b4f1").is_configured());
    }

    #[test]
    fn test_session_credential_redacted() {
        let ssid = SessionCredential::new("d93a33d0b4f1");
        assert_eq!(format!("{}", ssid), "***");
        assert!(!format!("{:?}", ssid).contains("d93a33d0b4f1"));

        let mut config = AppConfig::default();
        config.broker.ssid = ssid;
        assert!(!format!("{:?}", config).contains("d93a33d0b4f1"));
    }

    // ============= AccountMode / Helpers Tests =============

    #[test]
    fn test_account_mode_balance_type() {
        assert_eq!(AccountMode::Practice.balance_type(), 1);
        assert_eq!(AccountMode::Real.balance_type(), 2);
        assert_eq!("Practice".parse::<AccountMode>().unwrap(), AccountMode::Practice);
        assert_eq!(AccountMode::Real.to_string(), "REAL");
    }

    #[test]
    fn test_broker_endpoint_join() {
        let mut broker = BrokerConfig::default();
        assert_eq!(broker.endpoint("/spot/instruments"), "https://po.trade/api/spot/instruments");

        broker.base_url = "http://127.0.0.1:4000/api/".to_string();
        assert_eq!(broker.endpoint("/trading/open-trade"), "http://127.0.0.1:4000/api/trading/open-trade");
    }

    #[test]
    fn test_martingale_level_check() {
        let signal = SignalConfig::default();
        assert!(signal.is_martingale_level(3.0));
        assert!(signal.is_martingale_level(35.0));
        assert!(!signal.is_martingale_level(2.5));
    }
}
