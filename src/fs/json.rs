//! JSON file operations and the voucher store
//!
//! Every voucher is one pretty-printed snapshot file. Writes are atomic, and
//! `save_voucher` refuses to overwrite a snapshot that changed on disk since it
//! was read. Creating or saving a voucher holds an exclusive lock on its
//! `voucher.lock` file, so the version check and the write happen as one step
//! across processes.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{DvError, Result};
use crate::schemas::{Config, DisbursementVoucher};

use super::paths::{
    get_config_path, get_voucher_json_path, get_voucher_lock_path, get_vouchers_dir,
    validate_voucher_id,
};

/// Read and deserialize a JSON file.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidJson` - If the file contains invalid JSON or does not match the schema
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DvError::FileNotFound(format!("File not found: {}", path.display()))
        } else {
            DvError::Io(e)
        }
    })?;

    serde_json::from_str(&content).map_err(|e| {
        DvError::InvalidJson(format!("Invalid JSON in file {}: {}", path.display(), e))
    })
}

/// Write a value to a JSON file with pretty formatting.
///
/// Uses atomic write (write to temp file, then rename) to avoid partial writes.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content =
        serde_json::to_string_pretty(data).map_err(|e| DvError::InvalidJson(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read the config.json file for a workspace.
///
/// Returns the default config if the file doesn't exist.
pub fn read_config(root: &Path) -> Result<Config> {
    let path = get_config_path(root);
    if !path.exists() {
        return Ok(Config::default());
    }
    read_json(&path)
}

/// Write the config.json file for a workspace.
pub fn write_config(root: &Path, config: &Config) -> Result<()> {
    write_json(&get_config_path(root), config)
}

/// Exclusive advisory lock on one voucher, released on drop.
struct VoucherLock {
    file: File,
}

impl VoucherLock {
    /// Block until this process holds the voucher's lock.
    fn acquire(root: &Path, id: &str) -> Result<Self> {
        let path = get_voucher_lock_path(root, id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for VoucherLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(error = %e, "failed to release voucher lock");
        }
    }
}

/// Read a voucher snapshot.
///
/// # Errors
/// * `VoucherNotFound` - If no snapshot exists for `id`
/// * `Wrapped` - If `id` is not a `dv-NNNN` voucher id
pub fn read_voucher(root: &Path, id: &str) -> Result<DisbursementVoucher> {
    validate_voucher_id(id)?;
    let path = get_voucher_json_path(root, id);
    read_json(&path).map_err(|e| match e {
        DvError::FileNotFound(_) => DvError::VoucherNotFound(id.to_string()),
        other => other,
    })
}

/// Store a newly opened voucher.
///
/// # Errors
/// * `DuplicateDvNumber` - If another voucher already uses its DV number
/// * `Wrapped` - If the id is malformed or a voucher with the same id already exists
pub fn create_voucher(root: &Path, voucher: &DisbursementVoucher) -> Result<()> {
    validate_voucher_id(&voucher.id)?;
    let _lock = VoucherLock::acquire(root, &voucher.id)?;
    let path = get_voucher_json_path(root, &voucher.id);
    if path.exists() {
        return Err(DvError::wrap(
            format!("voucher id {} is already taken", voucher.id),
            "Cannot create voucher",
        ));
    }
    if list_vouchers(root)?
        .iter()
        .any(|v| v.dv_number == voucher.dv_number)
    {
        return Err(DvError::DuplicateDvNumber(voucher.dv_number.clone()));
    }

    write_json(&path, voucher)?;
    tracing::info!(voucher = %voucher.id, dv_number = %voucher.dv_number, "voucher created");
    Ok(())
}

/// Persist a new snapshot of an existing voucher.
///
/// `expected_version` is the version the caller read before transitioning.
/// The voucher's lock is held from the version check until the new snapshot
/// is in place, so of two concurrent saves from the same version exactly one
/// wins.
///
/// # Errors
/// * `VoucherNotFound` - If the voucher was never created
/// * `VersionConflict` - If the stored snapshot is no longer at `expected_version`
pub fn save_voucher(root: &Path, voucher: &DisbursementVoucher, expected_version: u64) -> Result<()> {
    validate_voucher_id(&voucher.id)?;
    if !get_voucher_json_path(root, &voucher.id).exists() {
        return Err(DvError::VoucherNotFound(voucher.id.clone()));
    }

    let _lock = VoucherLock::acquire(root, &voucher.id)?;
    let stored = read_voucher(root, &voucher.id)?;
    if stored.version != expected_version {
        tracing::warn!(
            voucher = %voucher.id,
            expected = expected_version,
            found = stored.version,
            "stale snapshot rejected"
        );
        return Err(DvError::VersionConflict {
            id: voucher.id.clone(),
            expected: expected_version,
            found: stored.version,
        });
    }

    write_json(&get_voucher_json_path(root, &voucher.id), voucher)?;
    tracing::info!(
        voucher = %voucher.id,
        status = %voucher.status,
        version = voucher.version,
        "voucher saved"
    );
    Ok(())
}

/// Load every voucher in the workspace, sorted by DV number.
pub fn list_vouchers(root: &Path) -> Result<Vec<DisbursementVoucher>> {
    let dir = get_vouchers_dir(root);
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut vouchers = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let path = entry.path().join("voucher.json");
        if path.exists() {
            vouchers.push(read_json::<DisbursementVoucher>(&path)?);
        }
    }

    vouchers.sort_by(|a, b| a.dv_number.cmp(&b.dv_number));
    Ok(vouchers)
}

/// Next free voucher id (`dv-0001`, `dv-0002`, ...)
pub fn next_voucher_id(root: &Path) -> Result<String> {
    let highest = list_vouchers(root)?
        .iter()
        .filter_map(|v| v.id.strip_prefix("dv-"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    Ok(format!("dv-{:04}", highest + 1))
}
