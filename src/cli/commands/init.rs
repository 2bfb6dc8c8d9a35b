//! Init command - Initialize a dvtrack workspace

use std::path::Path;

use crate::errors::{DvError, Result};
use crate::fs::{get_config_path, get_vouchers_dir, resolve_cwd, write_config};
use crate::schemas::Config;

/// Initialize a workspace in the specified directory
pub async fn run(cwd: Option<&Path>, force: bool) -> Result<()> {
    let root = resolve_cwd(cwd);
    let config_path = get_config_path(&root);
    if config_path.exists() && !force {
        return Err(DvError::ConfigError(format!(
            "{} already exists (use --force to reset it)",
            config_path.display()
        )));
    }

    std::fs::create_dir_all(get_vouchers_dir(&root))?;
    write_config(&root, &Config::default())?;
    tracing::info!(root = %root.display(), "workspace initialized");
    println!("Initialized dvtrack workspace in {}", root.display());
    Ok(())
}
