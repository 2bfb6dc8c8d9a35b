//! CLI module for dvtrack
//!
//! Provides the command-line interface using clap.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::validate::IdentifierKind;

/// dvtrack - Track disbursement vouchers through the accounting pipeline
#[derive(Parser, Debug)]
#[command(name = "dvtrack")]
#[command(version)]
#[command(about = "Track disbursement vouchers from review to LDDAP certification")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Override the working directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a dvtrack workspace in the current directory
    Init {
        /// Reset the config even if .dvtrack already exists
        #[arg(long)]
        force: bool,
    },

    /// Register a received voucher (starts at for_review)
    Create(CreateOpts),

    /// Apply an action to a voucher
    Apply {
        /// Voucher ID
        id: String,

        /// Action name (review_done, rts_out, allocate, certify, ...)
        action: String,

        /// Action field as key=value (repeatable)
        #[arg(short = 'f', long = "field")]
        fields: Vec<String>,

        /// Actor recorded in the ledger (defaults to config default_actor)
        #[arg(long)]
        actor: Option<String>,

        /// Print the recorded ledger entry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reopen a processed voucher at cash allocation
    Reallocate {
        /// Voucher ID
        id: String,

        /// Why the voucher was sent back
        #[arg(long)]
        reason: Option<String>,

        /// Actor recorded in the ledger
        #[arg(long)]
        actor: Option<String>,
    },

    /// Show details of a voucher
    Show {
        /// Voucher ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a voucher's audit ledger
    History {
        /// Voucher ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Only entries whose label contains this text (e.g. RTS)
        #[arg(long)]
        label: Option<String>,
    },

    /// List vouchers with optional filtering
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Filter by status (for_review, for_box_c, processed, ...)
        #[arg(long)]
        status: Option<String>,
    },

    /// Edit ORS entries while the voucher is in review
    Ors {
        #[command(subcommand)]
        command: OrsCommands,
    },

    /// Check an identifier against its grammar
    Validate {
        /// Identifier kind
        #[arg(value_enum)]
        kind: IdentifierKind,

        /// Value to check
        value: String,
    },

    /// Check stored vouchers for inconsistencies
    Doctor,
}

#[derive(Args, Debug)]
pub struct CreateOpts {
    #[arg(long)]
    pub dv_number: String,

    #[arg(long)]
    pub payee: String,

    #[arg(long)]
    pub transaction_type: String,

    #[arg(long)]
    pub implementing_unit: String,

    #[arg(long)]
    pub account_number: String,

    /// Gross amount, e.g. 15000.00
    #[arg(long)]
    pub amount: String,

    #[arg(long)]
    pub particulars: String,
}

#[derive(Args, Debug)]
pub struct OrsOpts {
    #[arg(long)]
    pub ors_number: String,

    #[arg(long)]
    pub fund_source: String,

    #[arg(long)]
    pub uacs: String,
}

#[derive(Subcommand, Debug)]
pub enum OrsCommands {
    /// Append an ORS entry
    Add {
        /// Voucher ID
        id: String,

        #[command(flatten)]
        entry: OrsOpts,
    },

    /// Replace the ORS entry at a position (1-based)
    Update {
        /// Voucher ID
        id: String,

        position: usize,

        #[command(flatten)]
        entry: OrsOpts,
    },

    /// Remove the ORS entry at a position (1-based)
    Remove {
        /// Voucher ID
        id: String,

        position: usize,
    },
}

impl From<CreateOpts> for commands::create::CreateArgs {
    fn from(opts: CreateOpts) -> Self {
        commands::create::CreateArgs {
            dv_number: opts.dv_number,
            payee: opts.payee,
            transaction_type: opts.transaction_type,
            implementing_unit: opts.implementing_unit,
            account_number: opts.account_number,
            amount: opts.amount,
            particulars: opts.particulars,
        }
    }
}

impl From<OrsOpts> for crate::schemas::OrsEntry {
    fn from(opts: OrsOpts) -> Self {
        crate::schemas::OrsEntry {
            ors_number: opts.ors_number,
            fund_source: opts.fund_source,
            uacs: opts.uacs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply_with_fields() {
        let cli = Cli::parse_from([
            "dvtrack",
            "apply",
            "dv-0001",
            "allocate",
            "-f",
            "allocation_number=2025-06-04734",
            "-f",
            "net_amount=14250.00",
            "--actor",
            "budget officer",
        ]);
        match cli.command {
            Some(Commands::Apply { id, action, fields, actor, json }) => {
                assert_eq!(id, "dv-0001");
                assert_eq!(action, "allocate");
                assert_eq!(fields.len(), 2);
                assert_eq!(actor.as_deref(), Some("budget officer"));
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_validate_kind() {
        let cli = Cli::parse_from(["dvtrack", "validate", "lddap-ada", "101-06-001-2025"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Validate { kind: IdentifierKind::LddapAda, .. })
        ));
    }

    #[test]
    fn test_parse_ors_update() {
        let cli = Cli::parse_from([
            "dvtrack",
            "ors",
            "update",
            "dv-0001",
            "2",
            "--ors-number",
            "02-101101-2025-06-0031",
            "--fund-source",
            "Regular Agency Fund",
            "--uacs",
            "5020201000",
        ]);
        match cli.command {
            Some(Commands::Ors { command: OrsCommands::Update { position, entry, .. } }) => {
                assert_eq!(position, 2);
                assert_eq!(entry.uacs, "5020201000");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
