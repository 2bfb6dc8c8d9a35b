//! ORS entry schema - Obligation request lines attached to a voucher

use serde::{Deserialize, Serialize};

/// One obligation request and status line charged by the voucher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrsEntry {
    /// ORS/BURS number
    pub ors_number: String,

    /// Fund source the obligation is charged to
    pub fund_source: String,

    /// UACS object/expenditure code
    pub uacs: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ors_entry_json_round_trip() {
        let entry = OrsEntry {
            ors_number: "02-101101-2025-06-0031".to_string(),
            fund_source: "Regular Agency Fund".to_string(),
            uacs: "5020201000".to_string(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: OrsEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
