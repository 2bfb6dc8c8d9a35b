//! Config schema - Configuration for a dvtrack workspace

use serde::{Deserialize, Serialize};

/// Main configuration for dvtrack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Office name shown in listings
    #[serde(default = "default_office")]
    pub office: String,

    /// Actor recorded in the ledger when none is given on the command line
    #[serde(default = "default_actor")]
    pub default_actor: String,

    /// Reject "in" dates earlier than the matching "out" date
    #[serde(default)]
    pub enforce_date_order: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_office() -> String {
    "Accounting Office".to_string()
}

fn default_actor() -> String {
    "system".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            schema_version: 1,
            office: default_office(),
            default_actor: default_actor(),
            enforce_date_order: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.schema_version, 1);
        assert_eq!(config.office, "Accounting Office");
        assert_eq!(config.default_actor, "system");
        assert!(!config.enforce_date_order);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{"office": "Regional Accounting Unit", "enforce_date_order": true}"#;
        let parsed: Config = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.office, "Regional Accounting Unit");
        assert!(parsed.enforce_date_order);
        assert_eq!(parsed.default_actor, "system");
        assert_eq!(parsed.schema_version, 1);
    }
}
