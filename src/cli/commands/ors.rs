//! ORS command - Maintain a voucher's obligation request entries

use std::path::Path;

use crate::domain::{add_ors_entry, remove_ors_entry, update_ors_entry};
use crate::errors::{DvError, Result};
use crate::fs::{read_voucher, save_voucher};
use crate::schemas::OrsEntry;

use super::workspace_root;

/// An ORS edit; positions are 1-based as shown by `show`
#[derive(Debug, Clone)]
pub enum OrsEdit {
    Add(OrsEntry),
    Update(usize, OrsEntry),
    Remove(usize),
}

/// Apply one ORS edit and store the voucher
pub async fn run(cwd: Option<&Path>, id: &str, edit: OrsEdit) -> Result<()> {
    let root = workspace_root(cwd)?;
    let voucher = read_voucher(&root, id)?;

    let next = match edit {
        OrsEdit::Add(entry) => add_ors_entry(&voucher, entry)?,
        OrsEdit::Update(position, entry) => {
            update_ors_entry(&voucher, to_index(position)?, entry)?
        }
        OrsEdit::Remove(position) => remove_ors_entry(&voucher, to_index(position)?)?,
    };
    save_voucher(&root, &next, voucher.version)?;

    println!("{} now has {} ORS entries", id, next.ors_entries.len());
    Ok(())
}

fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| DvError::wrap("positions start at 1", "Invalid ORS position"))
}
