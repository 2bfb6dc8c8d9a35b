//! Path resolution utilities for dvtrack
//!
//! Provides functions to locate the workspace root and construct paths
//! to the voucher store.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{DvError, Result};

/// Name of the directory marking a dvtrack workspace
pub const DVTRACK_DIR: &str = ".dvtrack";

lazy_static! {
    static ref VOUCHER_ID_REGEX: Regex = Regex::new(r"^dv-[0-9]{4,}$").unwrap();
}

/// Check that `id` has the store's `dv-NNNN` shape.
///
/// Ids become directory names, so anything else is refused before a path is
/// built from it.
pub fn validate_voucher_id(id: &str) -> Result<()> {
    if VOUCHER_ID_REGEX.is_match(id) {
        Ok(())
    } else {
        Err(DvError::wrap(
            format!("'{}' is not a voucher id (expected dv-NNNN)", id),
            "Invalid voucher id",
        ))
    }
}

/// Find the workspace root containing a .dvtrack directory.
///
/// Walks up the directory tree from the starting directory.
///
/// # Errors
/// * `RootNotFound` - If no ancestor contains .dvtrack
pub fn find_workspace_root(start_cwd: &Path) -> Result<PathBuf> {
    let mut current = start_cwd
        .canonicalize()
        .map_err(|e| DvError::RootNotFound(format!("Cannot resolve path: {}", e)))?;

    loop {
        if current.join(DVTRACK_DIR).is_dir() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(DvError::RootNotFound(
                    "Could not find a .dvtrack directory; run `dvtrack init` first".to_string(),
                ));
            }
        }
    }
}

/// Resolve the current working directory, optionally using an override.
pub fn resolve_cwd(cwd_option: Option<&Path>) -> PathBuf {
    match cwd_option {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Get the path to the .dvtrack directory.
pub fn get_dvtrack_dir(root: &Path) -> PathBuf {
    root.join(DVTRACK_DIR)
}

/// Get the path to the config.json file.
pub fn get_config_path(root: &Path) -> PathBuf {
    get_dvtrack_dir(root).join("config.json")
}

/// Get the path to the vouchers directory.
pub fn get_vouchers_dir(root: &Path) -> PathBuf {
    get_dvtrack_dir(root).join("vouchers")
}

/// Get the path to a specific voucher's directory.
pub fn get_voucher_dir(root: &Path, id: &str) -> PathBuf {
    get_vouchers_dir(root).join(id)
}

/// Get the path to a voucher's voucher.json file.
pub fn get_voucher_json_path(root: &Path, id: &str) -> PathBuf {
    get_voucher_dir(root, id).join("voucher.json")
}

/// Get the path to the lock file guarding a voucher's snapshot.
pub fn get_voucher_lock_path(root: &Path, id: &str) -> PathBuf {
    get_voucher_dir(root, id).join("voucher.lock")
}
