//! File system utilities for dvtrack
//!
//! Provides path resolution and the JSON-backed voucher store.

mod json;
mod paths;

pub use json::{
    create_voucher, list_vouchers, next_voucher_id, read_config, read_json, read_voucher,
    save_voucher, write_config, write_json,
};
pub use paths::{
    find_workspace_root, get_config_path, get_dvtrack_dir, get_voucher_dir,
    get_voucher_json_path, get_vouchers_dir, resolve_cwd, DVTRACK_DIR,
};
