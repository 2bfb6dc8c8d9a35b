//! Validate command - Check an identifier against its grammar

use chrono::{Datelike, Utc};
use clap::ValueEnum;

use crate::domain::validation::{
    parse_date, validate_cash_allocation_number, validate_engas_number,
    validate_lddap_ada_number, validate_lddap_certification_number, validate_norsa_number,
};
use crate::errors::Result;

/// Identifier kinds that can be checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdentifierKind {
    Allocation,
    Norsa,
    Engas,
    LddapAda,
    LddapCertification,
    Date,
}

/// Validate `value` as `kind`; a malformed value is a format error
pub async fn run(kind: IdentifierKind, value: &str) -> Result<()> {
    let accepted = match kind {
        IdentifierKind::Allocation => validate_cash_allocation_number(value)?,
        IdentifierKind::Norsa => validate_norsa_number(value, Utc::now().year())?,
        IdentifierKind::Engas => validate_engas_number(value)?,
        IdentifierKind::LddapAda => validate_lddap_ada_number(value)?,
        IdentifierKind::LddapCertification => validate_lddap_certification_number(value)?,
        IdentifierKind::Date => parse_date("date", value)?.to_string(),
    };
    println!("ok: {}", accepted);
    Ok(())
}
