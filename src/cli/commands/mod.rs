//! CLI command implementations

pub mod apply;
pub mod create;
pub mod doctor;
pub mod history;
pub mod init;
pub mod list;
pub mod ors;
pub mod reallocate;
pub mod show;
pub mod validate;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::{DvError, Result};
use crate::fs::{find_workspace_root, resolve_cwd};
use crate::schemas::Payload;

/// Locate the workspace the command operates on
pub(crate) fn workspace_root(cwd: Option<&Path>) -> Result<PathBuf> {
    find_workspace_root(&resolve_cwd(cwd))
}

/// Parse repeated `key=value` arguments into an action payload
pub(crate) fn parse_fields(fields: &[String]) -> Result<Payload> {
    let mut payload = Payload::new();
    for field in fields {
        let (key, value) = field.split_once('=').ok_or_else(|| {
            DvError::wrap(
                format!("'{}' is not of the form key=value", field),
                "Invalid field",
            )
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(DvError::wrap(format!("'{}' has no key", field), "Invalid field"));
        }
        payload.insert(key.to_string(), value.to_string());
    }
    Ok(payload)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).map_err(|e| DvError::InvalidJson(e.to_string()))?;
    println!("{}", out);
    Ok(())
}
