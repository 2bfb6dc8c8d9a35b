//! Identifier grammars, dates and amounts
//!
//! Every check is pure: it returns the accepted, trimmed value or a
//! `FormatError` naming the field and the expected pattern. Identifiers are
//! checked against their grammar only, never against a registry or checksum.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use crate::errors::{CoreError, CoreResult};

pub const CASH_ALLOCATION_PATTERN: &str = "YYYY-MM-NNNNN";
pub const NORSA_PATTERN: &str = "YYYY-MM-NNNN";
pub const ENGAS_PATTERN: &str = "YYYY-MM-NNNNNN";
pub const LDDAP_ADA_PATTERN: &str = "NNN-MM-SRN-YYYY";
pub const LDDAP_CERTIFICATION_PATTERN: &str = "NNN-MM-SRNBR-NNNNN";
pub const DATE_PATTERN: &str = "YYYY-MM-DD";

/// Earliest year accepted in NORSA, E-NGAS and LDDAP-ADA numbers
pub const MIN_IDENTIFIER_YEAR: i32 = 2020;

/// Latest year accepted in E-NGAS and LDDAP-ADA numbers
pub const MAX_FIXED_IDENTIFIER_YEAR: i32 = 2030;

lazy_static! {
    static ref CASH_ALLOCATION_REGEX: Regex =
        Regex::new(r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<serial>[0-9]{5})$").unwrap();

    static ref NORSA_REGEX: Regex =
        Regex::new(r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<serial>[0-9]{4})$").unwrap();

    static ref ENGAS_REGEX: Regex =
        Regex::new(r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<serial>[0-9]{6})$").unwrap();

    static ref LDDAP_ADA_REGEX: Regex =
        Regex::new(r"^(?P<prefix>[0-9]{3})-(?P<month>[0-9]{2})-(?P<serial>[0-9]{3})-(?P<year>[0-9]{4})$").unwrap();

    static ref LDDAP_CERTIFICATION_REGEX: Regex =
        Regex::new(r"^(?P<prefix>[0-9]{3})-(?P<month>[0-9]{2})-(?P<serial>[0-9]{1,5})-(?P<batch>[0-9]{1,5})$").unwrap();
}

/// Validate a cash-allocation number (`YYYY-MM-NNNNN`).
///
/// The year is only checked for digit count.
pub fn validate_cash_allocation_number(value: &str) -> CoreResult<String> {
    let field = "allocation_number";
    let value = value.trim();
    let caps = match_grammar(&CASH_ALLOCATION_REGEX, field, CASH_ALLOCATION_PATTERN, value)?;
    check_month(field, CASH_ALLOCATION_PATTERN, value, &caps["month"])?;
    Ok(value.to_string())
}

/// Validate a NORSA number (`YYYY-MM-NNNN`).
///
/// The year must fall in `[2020, current_year + 1]`.
pub fn validate_norsa_number(value: &str, current_year: i32) -> CoreResult<String> {
    let field = "norsa_number";
    let value = value.trim();
    let caps = match_grammar(&NORSA_REGEX, field, NORSA_PATTERN, value)?;
    check_year(field, NORSA_PATTERN, value, &caps["year"], MIN_IDENTIFIER_YEAR, current_year + 1)?;
    check_month(field, NORSA_PATTERN, value, &caps["month"])?;
    Ok(value.to_string())
}

/// Validate an E-NGAS number (`YYYY-MM-NNNNNN`, year 2020-2030, serial not zero).
pub fn validate_engas_number(value: &str) -> CoreResult<String> {
    let field = "engas_number";
    let value = value.trim();
    let caps = match_grammar(&ENGAS_REGEX, field, ENGAS_PATTERN, value)?;
    check_year(
        field,
        ENGAS_PATTERN,
        value,
        &caps["year"],
        MIN_IDENTIFIER_YEAR,
        MAX_FIXED_IDENTIFIER_YEAR,
    )?;
    check_month(field, ENGAS_PATTERN, value, &caps["month"])?;
    check_nonzero(field, ENGAS_PATTERN, value, &caps["serial"])?;
    Ok(value.to_string())
}

/// Validate the LDDAP-ADA number given at payment-method selection
/// (`NNN-MM-SRN-YYYY`, trailing year 2020-2030).
pub fn validate_lddap_ada_number(value: &str) -> CoreResult<String> {
    let field = "lddap_number";
    let value = value.trim();
    let caps = match_grammar(&LDDAP_ADA_REGEX, field, LDDAP_ADA_PATTERN, value)?;
    check_month(field, LDDAP_ADA_PATTERN, value, &caps["month"])?;
    check_year(
        field,
        LDDAP_ADA_PATTERN,
        value,
        &caps["year"],
        MIN_IDENTIFIER_YEAR,
        MAX_FIXED_IDENTIFIER_YEAR,
    )?;
    Ok(value.to_string())
}

/// Validate the LDDAP number given at LDDAP certification
/// (`NNN-MM-SRNBR-NNNNN`, last two segments 1-5 digits each).
pub fn validate_lddap_certification_number(value: &str) -> CoreResult<String> {
    let field = "lddap_number";
    let value = value.trim();
    let caps = match_grammar(
        &LDDAP_CERTIFICATION_REGEX,
        field,
        LDDAP_CERTIFICATION_PATTERN,
        value,
    )?;
    check_month(field, LDDAP_CERTIFICATION_PATTERN, value, &caps["month"])?;
    Ok(value.to_string())
}

/// Parse a calendar date in `YYYY-MM-DD` form
pub fn parse_date(field: &str, value: &str) -> CoreResult<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::MissingField(field.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| CoreError::format(field, DATE_PATTERN, value, e.to_string()))
}

/// Parse a decimal amount
pub fn parse_amount(field: &str, value: &str) -> CoreResult<Decimal> {
    let value = value.trim();
    value
        .parse::<Decimal>()
        .map_err(|e| CoreError::format(field, "decimal amount", value, e.to_string()))
}

/// Require an amount strictly greater than zero
pub fn validate_positive_amount(field: &str, amount: Decimal) -> CoreResult<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::format(
            field,
            "amount greater than zero",
            amount.to_string(),
            "amount must be positive",
        ));
    }
    Ok(amount)
}

/// Require a non-blank string, returning it trimmed
pub fn validate_non_empty(field: &str, value: &str) -> CoreResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::MissingField(field.to_string()));
    }
    Ok(value.to_string())
}

/// Require `later` to be on or after `earlier`
pub fn validate_date_order(
    earlier_field: &str,
    earlier: NaiveDate,
    later_field: &str,
    later: NaiveDate,
) -> CoreResult<()> {
    if later < earlier {
        return Err(CoreError::PreconditionFailed(format!(
            "{} {} is earlier than {} {}",
            later_field, later, earlier_field, earlier
        )));
    }
    Ok(())
}

fn match_grammar<'a>(
    regex: &Regex,
    field: &str,
    pattern: &str,
    value: &'a str,
) -> CoreResult<regex::Captures<'a>> {
    if value.is_empty() {
        return Err(CoreError::MissingField(field.to_string()));
    }
    regex
        .captures(value)
        .ok_or_else(|| CoreError::format(field, pattern, value, "does not match pattern"))
}

fn check_month(field: &str, pattern: &str, value: &str, month: &str) -> CoreResult<()> {
    match month.parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => Ok(()),
        _ => Err(CoreError::format(
            field,
            pattern,
            value,
            format!("month {} is not between 01 and 12", month),
        )),
    }
}

fn check_year(
    field: &str,
    pattern: &str,
    value: &str,
    year: &str,
    min: i32,
    max: i32,
) -> CoreResult<()> {
    match year.parse::<i32>() {
        Ok(y) if (min..=max).contains(&y) => Ok(()),
        _ => Err(CoreError::format(
            field,
            pattern,
            value,
            format!("year {} is not between {} and {}", year, min, max),
        )),
    }
}

fn check_nonzero(field: &str, pattern: &str, value: &str, serial: &str) -> CoreResult<()> {
    if serial.bytes().all(|b| b == b'0') {
        return Err(CoreError::format(field, pattern, value, "serial must not be zero"));
    }
    Ok(())
}
