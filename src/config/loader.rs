//! Configuration loading with defaults

use std::path::Path;

use crate::domain::TransitionContext;
use crate::errors::{DvError, Result};
use crate::fs;
use crate::schemas::Config;

/// Load configuration from the workspace, falling back to defaults.
///
/// Fields missing from config.json take their default values. An unsupported
/// schema version is a `ConfigError`.
pub fn load_config(root: &Path) -> Result<Config> {
    let config = fs::read_config(root)?;
    if config.schema_version != 1 {
        return Err(DvError::ConfigError(format!(
            "unsupported config schema_version {}",
            config.schema_version
        )));
    }
    tracing::debug!(office = %config.office, enforce_date_order = config.enforce_date_order, "config loaded");
    Ok(config)
}

/// Transition context for `actor`, or the configured default actor
pub fn transition_context(config: &Config, actor: Option<&str>) -> TransitionContext {
    let actor = actor
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(config.default_actor.as_str());
    TransitionContext::new(actor).with_date_order(config.enforce_date_order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults() {
        let temp = TempDir::new().unwrap();
        std_fs::create_dir(temp.path().join(".dvtrack")).unwrap();

        let config = load_config(temp.path()).unwrap();
        assert_eq!(config.office, "Accounting Office");
        assert_eq!(config.default_actor, "system");
        assert!(!config.enforce_date_order);
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().unwrap();
        let dvtrack_dir = temp.path().join(".dvtrack");
        std_fs::create_dir(&dvtrack_dir).unwrap();

        let config_content = r#"{
            "office": "Regional Accounting",
            "enforce_date_order": true
        }"#;
        std_fs::write(dvtrack_dir.join("config.json"), config_content).unwrap();

        let config = load_config(temp.path()).unwrap();
        assert_eq!(config.office, "Regional Accounting");
        assert!(config.enforce_date_order);
        // Default for unspecified field
        assert_eq!(config.default_actor, "system");
    }

    #[test]
    fn test_load_config_rejects_unknown_schema() {
        let temp = TempDir::new().unwrap();
        let dvtrack_dir = temp.path().join(".dvtrack");
        std_fs::create_dir(&dvtrack_dir).unwrap();
        std_fs::write(dvtrack_dir.join("config.json"), r#"{"schema_version": 2}"#).unwrap();

        let err = load_config(temp.path()).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_transition_context_actor() {
        let mut config = Config::default();
        config.enforce_date_order = true;

        let ctx = transition_context(&config, None);
        assert_eq!(ctx.actor, "system");
        assert!(ctx.enforce_date_order);

        let ctx = transition_context(&config, Some(" budget officer "));
        assert_eq!(ctx.actor, "budget officer");

        let ctx = transition_context(&config, Some("  "));
        assert_eq!(ctx.actor, "system");
    }
}
