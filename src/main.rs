//! dvtrack CLI - Track disbursement vouchers through the accounting pipeline

use clap::Parser;
use dvtrack::cli::commands::ors::OrsEdit;
use dvtrack::cli::{Cli, Commands, OrsCommands};
use dvtrack::errors::to_exit_code;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --verbose/--quiet pick the level
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            std::process::exit(to_exit_code(&e));
        }
    }
}

async fn run(cli: Cli) -> dvtrack::Result<()> {
    let cwd = cli.cwd.as_deref();
    match cli.command {
        Some(Commands::Init { force }) => dvtrack::cli::commands::init::run(cwd, force).await,
        Some(Commands::Create(opts)) => {
            dvtrack::cli::commands::create::run(cwd, opts.into()).await
        }
        Some(Commands::Apply {
            id,
            action,
            fields,
            actor,
            json,
        }) => {
            dvtrack::cli::commands::apply::run(cwd, &id, &action, &fields, actor.as_deref(), json)
                .await
        }
        Some(Commands::Reallocate { id, reason, actor }) => {
            dvtrack::cli::commands::reallocate::run(
                cwd,
                &id,
                reason.as_deref(),
                actor.as_deref(),
            )
            .await
        }
        Some(Commands::Show { id, json }) => {
            dvtrack::cli::commands::show::run(cwd, &id, json).await
        }
        Some(Commands::History { id, json, label }) => {
            dvtrack::cli::commands::history::run(cwd, &id, json, label.as_deref()).await
        }
        Some(Commands::List { json, status }) => {
            dvtrack::cli::commands::list::run(cwd, json, status.as_deref()).await
        }
        Some(Commands::Ors { command }) => {
            let (id, edit) = match command {
                OrsCommands::Add { id, entry } => (id, OrsEdit::Add(entry.into())),
                OrsCommands::Update { id, position, entry } => {
                    (id, OrsEdit::Update(position, entry.into()))
                }
                OrsCommands::Remove { id, position } => (id, OrsEdit::Remove(position)),
            };
            dvtrack::cli::commands::ors::run(cwd, &id, edit).await
        }
        Some(Commands::Validate { kind, value }) => {
            dvtrack::cli::commands::validate::run(kind, &value).await
        }
        Some(Commands::Doctor) => dvtrack::cli::commands::doctor::run(cwd).await,
        None => {
            // Default to showing help - clap handles this
            println!("Use --help for usage information");
            Ok(())
        }
    }
}
